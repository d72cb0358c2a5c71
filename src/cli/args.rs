//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::application::{ExportFormat, GraphFormat};

/// Build hierarchical outlines and graphs from PDF, DOCX, PPTX and text documents
#[derive(Parser, Debug)]
#[command(name = "rsoutline")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = clap::ArgAction::Count, global = true)]
    pub debug: u8,

    /// Project directory holding .rsoutline.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Overrides of the configured transform pipeline.
#[derive(Args, Debug, Clone, Default)]
pub struct TransformArgs {
    /// Deepest depth that keeps children (root = 0)
    #[arg(long, conflicts_with = "all_levels")]
    pub max_depth: Option<usize>,

    /// Keep every level regardless of configured max_depth
    #[arg(long)]
    pub all_levels: bool,

    /// Merge single-child chains into one node ("A / B")
    #[arg(long)]
    pub collapse: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the outline of a document
    Outline {
        /// Source document (.pdf, .docx, .pptx, .txt, .md)
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutlineFormat::Tree)]
        format: OutlineFormat,
    },

    /// Render the outline of a document as a node/edge graph
    Graph {
        /// Source document
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,

        #[command(flatten)]
        transform: TransformArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = GraphFormatArg::Dot)]
        format: GraphFormatArg,

        /// Write to this file instead of stdout
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Outline many documents and export each into an output directory
    Batch {
        /// Files or directories (walked recursively)
        #[arg(required = true, value_hint = ValueHint::AnyPath)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        transform: TransformArgs,

        /// Output directory (default: configured output_dir)
        #[arg(short, long, value_hint = ValueHint::DirPath)]
        out_dir: Option<PathBuf>,

        /// Export format
        #[arg(short, long, value_enum, default_value_t = BatchFormat::Json)]
        format: BatchFormat,
    },

    /// Show the inferred depth of lines
    Level {
        /// Lines to classify
        #[arg(required = true)]
        lines: Vec<String>,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config
    Show,

    /// Create config template
    Init {
        /// Create global config
        #[arg(short, long)]
        global: bool,
    },

    /// Show config paths
    Path,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineFormat {
    Tree,
    Json,
    Markdown,
    Opml,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphFormatArg {
    Dot,
    Html,
    Json,
}

impl From<GraphFormatArg> for GraphFormat {
    fn from(value: GraphFormatArg) -> Self {
        match value {
            GraphFormatArg::Dot => GraphFormat::Dot,
            GraphFormatArg::Html => GraphFormat::Html,
            GraphFormatArg::Json => GraphFormat::Json,
        }
    }
}

/// Batch exports: tree formats plus graph renderings.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchFormat {
    Json,
    Markdown,
    Opml,
    Dot,
    Html,
}

/// Either kind of export a batch run writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchExport {
    Tree(ExportFormat),
    Graph(GraphFormat),
}

impl From<BatchFormat> for BatchExport {
    fn from(value: BatchFormat) -> Self {
        match value {
            BatchFormat::Json => Self::Tree(ExportFormat::Json),
            BatchFormat::Markdown => Self::Tree(ExportFormat::Markdown),
            BatchFormat::Opml => Self::Tree(ExportFormat::Opml),
            BatchFormat::Dot => Self::Graph(GraphFormat::Dot),
            BatchFormat::Html => Self::Graph(GraphFormat::Html),
        }
    }
}

//! Command handlers

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use colored::Colorize;
use tracing::{debug, instrument};

use crate::application::export::{export_tree, render_graph, ToTermTree};
use crate::application::services::BatchOutcome;
use crate::application::ExportFormat;
use crate::cli::args::{
    BatchExport, BatchFormat, Cli, Commands, ConfigCommands, GraphFormatArg, OutlineFormat,
    TransformArgs,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_dir, global_config_path, local_config_path, Settings};
use crate::domain::TransformOptions;
use crate::infrastructure::di::ServiceContainer;

/// Dispatch the parsed command line.
pub fn execute(cli: &Cli) -> CliResult<()> {
    let Some(command) = &cli.command else {
        return Err(CliError::Usage(
            "no command given, see `rsoutline --help`".to_string(),
        ));
    };

    if let Commands::Completion { shell } = command {
        cmd_completion(*shell);
        return Ok(());
    }

    let project_dir = resolve_project_dir(cli)?;
    if let Commands::Config { command } = command {
        return match command {
            ConfigCommands::Show => cmd_config_show(&project_dir),
            ConfigCommands::Path => cmd_config_path(&project_dir),
            ConfigCommands::Init { global } => cmd_config_init(&project_dir, *global),
        };
    }

    let settings = Settings::load(Some(&project_dir))?;
    let container = ServiceContainer::new(settings)?;

    match command {
        Commands::Outline {
            file,
            transform,
            format,
        } => cmd_outline(&container, file, transform, *format),
        Commands::Graph {
            file,
            transform,
            format,
            output,
        } => cmd_graph(&container, file, transform, *format, output.as_deref()),
        Commands::Batch {
            paths,
            transform,
            out_dir,
            format,
        } => cmd_batch(&container, paths, transform, out_dir.as_deref(), *format),
        Commands::Level { lines } => cmd_level(&container, lines),
        Commands::Config { .. } | Commands::Completion { .. } => Ok(()),
    }
}

fn resolve_project_dir(cli: &Cli) -> CliResult<PathBuf> {
    match &cli.project_dir {
        Some(dir) => Ok(dir.clone()),
        None => std::env::current_dir().map_err(|e| CliError::io("get current directory", e)),
    }
}

/// Configured transforms overridden by command line flags.
pub fn resolve_transform(args: &TransformArgs, settings: &Settings) -> TransformOptions {
    let mut options = settings.transform_options();
    if args.all_levels {
        options.max_depth = None;
    } else if let Some(depth) = args.max_depth {
        options.max_depth = Some(depth);
    }
    options.collapse |= args.collapse;
    options
}

#[instrument(skip(container, transform))]
fn cmd_outline(
    container: &ServiceContainer,
    file: &Path,
    transform: &TransformArgs,
    format: OutlineFormat,
) -> CliResult<()> {
    let options = resolve_transform(transform, &container.settings);
    let doc = container.outline.outline_file(file, &options)?;

    let rendered = match format {
        OutlineFormat::Tree => doc.tree.to_term_tree().to_string(),
        OutlineFormat::Json => export_tree(&doc.tree, ExportFormat::Json, &doc.name())?,
        OutlineFormat::Markdown => export_tree(&doc.tree, ExportFormat::Markdown, &doc.name())?,
        OutlineFormat::Opml => export_tree(&doc.tree, ExportFormat::Opml, &doc.name())?,
    };
    output::info(rendered.trim_end());
    Ok(())
}

#[instrument(skip(container, transform))]
fn cmd_graph(
    container: &ServiceContainer,
    file: &Path,
    transform: &TransformArgs,
    format: GraphFormatArg,
    target: Option<&Path>,
) -> CliResult<()> {
    let options = resolve_transform(transform, &container.settings);
    let doc = container.outline.outline_file(file, &options)?;
    let graph = doc.graph();
    debug!(nodes = graph.nodes.len(), edges = graph.edges.len(), "graph projected");

    let rendered = render_graph(&graph, format.into(), &doc.name())?;
    match target {
        Some(path) => {
            container
                .fs
                .write(path, &rendered)
                .map_err(|e| CliError::write_failed(path, e))?;
            output::action("Wrote", &path.display());
        }
        None => output::info(rendered.trim_end()),
    }
    Ok(())
}

#[instrument(skip(container, transform))]
fn cmd_batch(
    container: &ServiceContainer,
    paths: &[PathBuf],
    transform: &TransformArgs,
    out_dir: Option<&Path>,
    format: BatchFormat,
) -> CliResult<()> {
    let options = resolve_transform(transform, &container.settings);
    let out_dir = out_dir.unwrap_or(container.settings.output_dir.as_path());

    let sources = container.outline.collect_sources(paths);
    if sources.is_empty() {
        return Err(CliError::InvalidArgs(
            "no supported documents found".to_string(),
        ));
    }

    let outcomes = container.outline.outline_batch(&sources, &options);
    let export = BatchExport::from(format);
    let mut failed = 0;

    output::header(&format!("Outlining {} document(s)", outcomes.len()));
    for BatchOutcome { source, result } in &outcomes {
        let written = match result {
            Ok(doc) => match export {
                BatchExport::Tree(f) => container.outline.export(doc, f, out_dir),
                BatchExport::Graph(f) => container.outline.export_graph(doc, f, out_dir),
            }
            .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };
        match written {
            Ok(target) => output::success_detail(&format!(
                "{} -> {}",
                source.display(),
                target.display()
            )),
            Err(message) => {
                failed += 1;
                output::failure(&format!("{}: {}", source.display(), message));
            }
        }
    }

    if failed > 0 {
        return Err(CliError::BatchFailed {
            failed,
            total: outcomes.len(),
        });
    }
    output::success(&format!("Exported to {}", out_dir.display()));
    Ok(())
}

fn cmd_level(container: &ServiceContainer, lines: &[String]) -> CliResult<()> {
    for line in lines {
        let inference = container.inference.explain(line);
        let rule = inference.rule.unwrap_or("default");
        let candidate = if inference.heading_candidate {
            "heading".green()
        } else {
            "text".dimmed()
        };
        output::info(&format!(
            "{}  {:<20} {:<8} {}",
            inference.depth.to_string().cyan().bold(),
            rule,
            candidate,
            line
        ));
    }
    Ok(())
}

fn cmd_config_show(project_dir: &Path) -> CliResult<()> {
    let settings = Settings::load(Some(project_dir))?;
    output::info(settings.to_toml()?.trim_end());
    Ok(())
}

fn cmd_config_path(project_dir: &Path) -> CliResult<()> {
    let describe = |path: &Path| {
        let marker = if path.exists() {
            "exists".green()
        } else {
            "missing".dimmed()
        };
        format!("{} ({})", path.display(), marker)
    };

    match global_config_path() {
        Some(path) => output::action("global", &describe(&path)),
        None => output::warning("no config directory available for this platform"),
    }
    output::action("local", &describe(&local_config_path(project_dir)));
    Ok(())
}

fn cmd_config_init(project_dir: &Path, global: bool) -> CliResult<()> {
    let target = if global {
        let dir = global_config_dir().ok_or_else(|| {
            CliError::Usage("no config directory available for this platform".to_string())
        })?;
        std::fs::create_dir_all(&dir)
            .map_err(|e| CliError::io(format!("create {}", dir.display()), e))?;
        dir.join("rsoutline.toml")
    } else {
        local_config_path(project_dir)
    };

    if target.exists() {
        return Err(CliError::Usage(format!(
            "config already exists: {}",
            target.display()
        )));
    }
    std::fs::write(&target, Settings::template()).map_err(|e| CliError::write_failed(&target, e))?;
    output::action("Created", &target.display());
    Ok(())
}

fn cmd_completion(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

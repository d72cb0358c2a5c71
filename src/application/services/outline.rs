//! Outline construction service
//!
//! Runs the full pipeline for a source file: classify, read, extract entries
//! through the matching adapter, build the tree and apply transforms.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use itertools::Itertools;
use rayon::prelude::*;
use tracing::{debug, info, instrument, warn};
use walkdir::WalkDir;

use crate::application::export::{export_tree, render_graph, ExportFormat, GraphFormat};
use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{project, DomainError, OutlineGraph, OutlineNode, SourceKind, TransformOptions, TreeBuilder};
use crate::infrastructure::adapters::AdapterRegistry;
use crate::infrastructure::traits::FileSystem;

/// Outline of one source file.
#[derive(Debug, Clone)]
pub struct OutlineDocument {
    pub source: PathBuf,
    pub kind: SourceKind,
    pub tree: OutlineNode,
    /// Base name of written exports; unique within one batch
    pub output_name: String,
}

impl OutlineDocument {
    /// File name of the source, used for titles and output names.
    pub fn name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.source.display().to_string())
    }

    pub fn graph(&self) -> OutlineGraph {
        project(&self.tree)
    }
}

/// Result of one input of a batch run.
#[derive(Debug)]
pub struct BatchOutcome {
    pub source: PathBuf,
    pub result: ApplicationResult<OutlineDocument>,
}

/// Service building outlines from source files.
pub struct OutlineService {
    fs: Arc<dyn FileSystem>,
    adapters: Arc<AdapterRegistry>,
}

impl OutlineService {
    pub fn new(fs: Arc<dyn FileSystem>, adapters: Arc<AdapterRegistry>) -> Self {
        Self { fs, adapters }
    }

    /// Build the transformed outline of a single file.
    #[instrument(level = "debug", skip(self, path, options), fields(path = %path.display()))]
    pub fn outline_file(&self, path: &Path, options: &TransformOptions) -> ApplicationResult<OutlineDocument> {
        let kind = SourceKind::from_path(path)
            .ok_or_else(|| DomainError::UnsupportedSource(path.to_path_buf()))?;
        let adapter = self
            .adapters
            .get(kind)
            .ok_or_else(|| DomainError::UnsupportedSource(path.to_path_buf()))?;

        let bytes = self.fs.read(path).with_path_context("read source", path)?;
        let entries = adapter
            .extract(&bytes)
            .map_err(|source| ApplicationError::MalformedSource {
                path: path.to_path_buf(),
                source,
            })?;
        debug!(entries = entries.len(), kind = %kind, "extracted");

        let tree = TreeBuilder::build_from(kind.root_title(), entries);
        let mut doc = OutlineDocument {
            source: path.to_path_buf(),
            kind,
            tree: options.apply(&tree),
            output_name: String::new(),
        };
        doc.output_name = doc.name();
        Ok(doc)
    }

    /// Outline every input in parallel; failures are reported per input.
    ///
    /// Outcomes keep the order of `paths`. Inputs sharing a file name in
    /// different directories get numbered output names (`x.pdf`, `x-2.pdf`).
    pub fn outline_batch(&self, paths: &[PathBuf], options: &TransformOptions) -> Vec<BatchOutcome> {
        let mut outcomes: Vec<BatchOutcome> = paths
            .par_iter()
            .map(|path| BatchOutcome {
                source: path.clone(),
                result: self.outline_file(path, options),
            })
            .collect();

        disambiguate_output_names(&mut outcomes);
        let failed = outcomes.iter().filter(|o| o.result.is_err()).count();
        info!(total = outcomes.len(), failed, "batch finished");
        outcomes
    }

    /// Expand directories into the supported files below them.
    ///
    /// Files given explicitly are kept whatever their extension, so that an
    /// unsupported input is reported instead of silently dropped.
    pub fn collect_sources(&self, inputs: &[PathBuf]) -> Vec<PathBuf> {
        let mut sources = Vec::new();
        for input in inputs {
            if !self.fs.is_dir(input) {
                sources.push(input.clone());
                continue;
            }
            let found = WalkDir::new(input)
                .follow_links(false)
                .into_iter()
                .filter_map(|entry| match entry {
                    Ok(entry) => Some(entry),
                    Err(e) => {
                        warn!(error = %e, "skipping unreadable entry");
                        None
                    }
                })
                .filter(|entry| entry.file_type().is_file())
                .map(|entry| entry.into_path())
                .filter(|path| SourceKind::from_path(path).is_some())
                .sorted();
            sources.extend(found);
        }
        sources.into_iter().unique().collect()
    }

    /// Write the tree export of a document into `out_dir`; returns the written path.
    pub fn export(&self, doc: &OutlineDocument, format: ExportFormat, out_dir: &Path) -> ApplicationResult<PathBuf> {
        let content = export_tree(&doc.tree, format, &doc.name())?;
        self.write_output(doc, format.extension(), out_dir, &content)
    }

    /// Write the graph rendering of a document into `out_dir`; returns the written path.
    pub fn export_graph(&self, doc: &OutlineDocument, format: GraphFormat, out_dir: &Path) -> ApplicationResult<PathBuf> {
        let content = render_graph(&doc.graph(), format, &doc.name())?;
        self.write_output(doc, format.extension(), out_dir, &content)
    }

    fn write_output(&self, doc: &OutlineDocument, extension: &str, out_dir: &Path, content: &str) -> ApplicationResult<PathBuf> {
        self.fs
            .create_dir_all(out_dir)
            .with_path_context("create output directory", out_dir)?;
        let target = out_dir.join(format!("{}.{}", doc.output_name, extension));
        self.fs
            .write(&target, content)
            .with_path_context("write export", &target)?;
        debug!(target = %target.display(), "export written");
        Ok(target)
    }
}

fn disambiguate_output_names(outcomes: &mut [BatchOutcome]) {
    let mut taken = HashSet::new();
    for doc in outcomes.iter_mut().filter_map(|o| o.result.as_mut().ok()) {
        let mut candidate = doc.output_name.clone();
        let mut n = 1;
        while !taken.insert(candidate.clone()) {
            n += 1;
            candidate = numbered(&doc.output_name, n);
        }
        if candidate != doc.output_name {
            warn!(
                source = %doc.source.display(),
                output = %candidate,
                "output name already used in this batch"
            );
            doc.output_name = candidate;
        }
    }
}

fn numbered(name: &str, n: usize) -> String {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => format!("{stem}-{n}.{ext}"),
        _ => format!("{name}-{n}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_name_with_and_without_extension_when_numbering_then_suffix_before_extension() {
        assert_eq!(numbered("x.pdf", 2), "x-2.pdf");
        assert_eq!(numbered("README", 3), "README-3");
        assert_eq!(numbered(".hidden", 2), ".hidden-2");
    }
}

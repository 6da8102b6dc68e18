//! Build orchestration.
//!
//! Runs each task through script inlining, image inlining, engine
//! permutations and finally default stylesheet inlining, writing every
//! resulting document.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    time::Instant,
};

use embedify_core::{BuildTask, Engine, Options};
use tracing::{debug, info, warn};

use crate::{
    error::{InlineError, Result},
    fs::{FileSystem, StdFileSystem, write_document},
    image::inline_images,
    matcher::{Reference, ReferenceKind, scan_references},
    partial::PartialContext,
    permutation::{RenderedDocument, build_permutations},
    script::inline_scripts,
    style::inline_stylesheets,
};

/// What one task produced.
#[derive(Debug, Clone, Default)]
pub struct TaskReport {
    /// Default output document.
    pub dest: PathBuf,

    /// Source fragments that were not found.
    pub missing_sources: Vec<PathBuf>,

    /// Stylesheets inlined into the default document.
    pub stylesheets: Vec<String>,

    /// Scripts inlined.
    pub scripts: Vec<String>,

    /// Images and sprite atlases inlined.
    pub images: Vec<String>,

    /// Engine permutation documents written.
    pub permutations: Vec<PathBuf>,
}

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of tasks processed.
    pub tasks: usize,

    /// Number of documents written, permutations included.
    pub documents: usize,

    /// Number of permutation documents written.
    pub permutations: usize,

    /// Number of stylesheets inlined into default documents.
    pub stylesheets: usize,

    /// Number of scripts inlined.
    pub scripts: usize,

    /// Number of images inlined.
    pub images: usize,

    /// Build duration in milliseconds.
    pub duration_ms: u64,

    /// Per-task details, in task order.
    pub reports: Vec<TaskReport>,
}

impl BuildStats {
    fn record(&mut self, report: TaskReport) {
        self.tasks += 1;
        self.documents += 1 + report.permutations.len();
        self.permutations += report.permutations.len();
        self.stylesheets += report.stylesheets.len();
        self.scripts += report.scripts.len();
        self.images += report.images.len();
        self.reports.push(report);
    }
}

/// A reference found in a task, with the file it would be read from.
#[derive(Debug, Clone)]
pub struct ResolvedReference {
    pub reference: Reference,

    /// Path the default build reads, after partial resolution.
    pub path: PathBuf,

    /// Whether the reference is on the ignore list.
    pub ignored: bool,

    /// Whether `path` exists.
    pub exists: bool,
}

/// Dry-run view of a task: what it references and which engines it can target.
#[derive(Debug, Clone)]
pub struct TaskScan {
    pub dest: PathBuf,
    pub missing_sources: Vec<PathBuf>,
    pub partial: PartialContext,
    pub references: Vec<ResolvedReference>,
    pub engines: Vec<Engine>,
}

/// Runs build tasks against a file system.
#[derive(Debug)]
pub struct Builder<F = StdFileSystem> {
    options: Options,
    fs: F,
}

impl Builder<StdFileSystem> {
    /// Create a builder working on the local disk.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_fs(options, StdFileSystem)
    }
}

impl<F: FileSystem> Builder<F> {
    /// Create a builder over a custom file system.
    #[must_use]
    pub fn with_fs(options: Options, fs: F) -> Self {
        Self { options, fs }
    }

    /// The options shared by all tasks.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Run every task in order. The first fatal error stops the run.
    pub fn build(&self, tasks: &[BuildTask]) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            tasks = tasks.len(),
            relative_to = %self.options.relative_to.display(),
            "processing HTML files"
        );

        for task in tasks {
            let report = self.build_task(task)?;
            stats.record(report);
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            tasks = stats.tasks,
            documents = stats.documents,
            permutations = stats.permutations,
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Build one task and write its documents.
    pub fn build_task(&self, task: &BuildTask) -> Result<TaskReport> {
        let (documents, report) = self.render_task(task)?;

        for doc in &documents {
            write_document(&self.fs, &doc.dest, &doc.markup)?;
            debug!(path = %doc.dest.display(), engine = ?doc.engine, "wrote document");
        }

        info!(dest = %task.dest.display(), "created build");
        if !report.permutations.is_empty() {
            info!(permutations = ?report.permutations, "created style-permutated builds");
        }

        Ok(report)
    }

    /// Render every document of a task without writing anything.
    ///
    /// Permutations come first, the default document last.
    pub fn render_task(&self, task: &BuildTask) -> Result<(Vec<RenderedDocument>, TaskReport)> {
        info!(sources = ?task.sources, "processing");

        let (markup, missing_sources) = self.load_sources(task)?;
        let partial = self.partial_context(task);
        let options = &self.options;

        let scripts = inline_scripts(&markup, &partial, options, &self.fs)?;
        let images = inline_images(&scripts.markup, &partial, options, &self.fs)?;
        let mut documents =
            build_permutations(&images.markup, &task.dest, &partial, options, &self.fs);
        let styles = inline_stylesheets(&images.markup, &partial, options, &self.fs)?;

        let report = TaskReport {
            dest: task.dest.clone(),
            missing_sources,
            stylesheets: styles.files.clone(),
            scripts: scripts.files,
            images: images.files,
            permutations: documents.iter().map(|d| d.dest.clone()).collect(),
        };

        documents.push(RenderedDocument {
            engine: None,
            dest: task.dest.clone(),
            markup: styles.markup,
            stylesheets: styles.files,
        });

        Ok((documents, report))
    }

    /// Resolve a task's references and engine coverage without writing.
    pub fn scan_task(&self, task: &BuildTask) -> Result<TaskScan> {
        let (markup, missing_sources) = self.load_sources(task)?;
        let partial = self.partial_context(task);

        let references = scan_references(&markup)
            .into_iter()
            .map(|reference| self.resolve_reference(reference, &partial))
            .collect();

        let engines = build_permutations(&markup, &task.dest, &partial, &self.options, &self.fs)
            .into_iter()
            .filter_map(|doc| doc.engine)
            .collect();

        Ok(TaskScan {
            dest: task.dest.clone(),
            missing_sources,
            partial,
            references,
            engines,
        })
    }

    fn resolve_reference(
        &self,
        reference: Reference,
        partial: &PartialContext,
    ) -> ResolvedReference {
        let name = partial.resolve(&reference.path);
        let ignored = self.options.is_ignored(&reference.path) || self.options.is_ignored(&name);

        let path = match (reference.kind, self.options.tags.stylesheet.remap()) {
            (ReferenceKind::Stylesheet, Some(remap)) => self.options.resolve(remap(&name, None)),
            (ReferenceKind::Script, _) => {
                let path = self.options.resolve(&name);
                match self.options.tags.script.remap() {
                    Some(remap) => remap(&path),
                    None => path,
                }
            }
            _ => self.options.resolve(&name),
        };
        let exists = self.fs.exists(&path);

        ResolvedReference {
            reference,
            path,
            ignored,
            exists,
        }
    }

    /// Concatenate the task's existing sources, newline separated.
    fn load_sources(&self, task: &BuildTask) -> Result<(String, Vec<PathBuf>)> {
        let mut contents = Vec::with_capacity(task.sources.len());
        let mut missing = Vec::new();

        for source in &task.sources {
            if !self.fs.exists(source) {
                warn!(source = %source.display(), "source file not found");
                missing.push(source.clone());
                continue;
            }

            let text = self
                .fs
                .read_to_string(source)
                .map_err(|e| InlineError::read(source, e))?;
            contents.push(text);
        }

        Ok((contents.join("\n"), missing))
    }

    fn partial_context(&self, task: &BuildTask) -> PartialContext {
        task.primary_source()
            .map(|source| PartialContext::for_source(&self.options.relative_to, source))
            .unwrap_or_default()
    }
}

/// Output paths a task can write, permutations included.
#[must_use]
pub fn output_paths(task: &BuildTask) -> Vec<PathBuf> {
    std::iter::once(task.dest.clone())
        .chain(Engine::ALL.into_iter().map(|e| e.document_variant(&task.dest)))
        .collect()
}

/// Absolute paths of every document `tasks` can write.
///
/// Watchers report absolute or `./`-prefixed paths while task destinations
/// may be relative, so both sides are compared in absolute form.
#[must_use]
pub fn output_set(tasks: &[BuildTask]) -> BTreeSet<PathBuf> {
    tasks
        .iter()
        .flat_map(output_paths)
        .map(|out| absolute(&out))
        .collect()
}

/// Whether `path` is one of the documents in `outputs` (see [`output_set`]).
#[must_use]
pub fn is_output(outputs: &BTreeSet<PathBuf>, path: &Path) -> bool {
    outputs.contains(&absolute(path))
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

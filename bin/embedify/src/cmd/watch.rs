//! Watch command - rebuild whenever a source or referenced file changes

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use color_eyre::eyre::{Result, WrapErr};
use embedify_core::BuildTask;
use embedify_inliner::{
    Builder,
    build::{is_output, output_set},
};
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, event::ModifyKind};
use tokio::sync::mpsc;

use super::build::print_build_stats;

/// Debounce interval for file changes.
const DEBOUNCE_MS: u64 = 200;

/// Run the watch command.
///
/// Builds once, then rebuilds on every relevant change until Ctrl+C.
pub async fn run(config_path: &Path, relative_to: Option<&Path>) -> Result<()> {
    tracing::info!(?config_path, "Starting watch mode");

    let (options, tasks) = super::load(config_path, relative_to)?;
    let roots = watch_roots(&options.relative_to, &tasks);
    let builder = Builder::new(options);

    tracing::info!("Running initial build...");
    rebuild(&builder, &tasks);

    let (tx, mut rx) = mpsc::channel::<()>(16);
    let outputs = output_set(&tasks);

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| {
            if let Ok(event) = res {
                // Only trigger on write/modify events
                let relevant = matches!(
                    event.kind,
                    EventKind::Modify(ModifyKind::Data(_))
                        | EventKind::Create(_)
                        | EventKind::Remove(_)
                );
                // Our own output would retrigger forever
                let external = event
                    .paths
                    .iter()
                    .any(|path| !is_output(&outputs, path));
                if relevant && external {
                    let _ = tx.blocking_send(());
                }
            }
        },
        notify::Config::default(),
    )
    .wrap_err("Failed to create file watcher")?;

    for root in &roots {
        watcher
            .watch(root, RecursiveMode::Recursive)
            .wrap_err_with(|| format!("Failed to watch {}", root.display()))?;
        tracing::debug!(dir = %root.display(), "Watching directory");
    }

    println!();
    println!("  Watching for changes, press Ctrl+C to stop");
    println!();

    let mut last_rebuild = Instant::now();
    loop {
        tokio::select! {
            received = rx.recv() => {
                if received.is_none() {
                    break;
                }

                // Debounce
                if last_rebuild.elapsed() < Duration::from_millis(DEBOUNCE_MS) {
                    continue;
                }

                // Drain any queued events
                while rx.try_recv().is_ok() {}

                println!();
                println!("  File change detected, rebuilding...");
                rebuild(&builder, &tasks);
                last_rebuild = Instant::now();
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Stopping watch mode");
                break;
            }
        }
    }

    Ok(())
}

fn rebuild(builder: &Builder, tasks: &[BuildTask]) {
    match builder.build(tasks) {
        Ok(stats) => {
            print_build_stats(&stats);
            println!("  ✓ Rebuilt {} documents in {}ms", stats.documents, stats.duration_ms);
        }
        Err(e) => {
            tracing::error!("Rebuild failed: {e}");
            eprintln!("  ✗ Rebuild failed: {e}");
        }
    }
}

/// Directories to watch: `relative_to` plus every source directory outside it.
fn watch_roots(relative_to: &Path, tasks: &[BuildTask]) -> Vec<PathBuf> {
    let mut roots = BTreeSet::new();
    if relative_to.is_dir() {
        roots.insert(relative_to.to_path_buf());
    }

    for source in tasks.iter().flat_map(|t| &t.sources) {
        let dir = match source.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if dir.is_dir() && !dir.starts_with(relative_to) {
            roots.insert(dir.to_path_buf());
        }
    }

    roots.into_iter().collect()
}

//! Build command - inlines every configured task

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use embedify_inliner::{BuildStats, Builder};

/// Run the build command.
pub fn run(config_path: &Path, relative_to: Option<&Path>) -> Result<()> {
    let start = Instant::now();
    tracing::info!(?config_path, ?relative_to, "Starting build");

    let (options, tasks) = super::load(config_path, relative_to)?;
    let stats = Builder::new(options)
        .build(&tasks)
        .wrap_err("Build failed")?;

    let duration = start.elapsed();
    print_build_stats(&stats);
    println!("  Duration:     {:.2}s", duration.as_secs_f64());
    println!();

    tracing::info!(?duration, "Build completed successfully");

    Ok(())
}

/// Print per-task results and totals.
pub(crate) fn print_build_stats(stats: &BuildStats) {
    println!();
    for report in &stats.reports {
        println!("  - {}", report.dest.display());
        for missing in &report.missing_sources {
            println!("    ⚠ source not found: {}", missing.display());
        }
        if !report.stylesheets.is_empty() {
            println!("    stylesheets: {}", report.stylesheets.join(", "));
        }
        if !report.scripts.is_empty() {
            println!("    scripts:     {}", report.scripts.join(", "));
        }
        if !report.images.is_empty() {
            println!("    images:      {}", report.images.join(", "));
        }
        for permutation in &report.permutations {
            println!("    permutation: {}", permutation.display());
        }
    }

    println!();
    println!("  Build Statistics:");
    println!("  ─────────────────────────────────");
    println!("  Tasks:        {:>6}", stats.tasks);
    println!("  Documents:    {:>6}", stats.documents);
    println!("  Permutations: {:>6}", stats.permutations);
    println!("  Stylesheets:  {:>6}", stats.stylesheets);
    println!("  Scripts:      {:>6}", stats.scripts);
    println!("  Images:       {:>6}", stats.images);
    println!("  ─────────────────────────────────");
}

//! Check command - validate configuration and references without writing

use std::path::Path;

use color_eyre::eyre::{Result, bail};
use embedify_inliner::{Builder, ReferenceKind, TaskScan};

/// Validation result.
#[derive(Debug, Default)]
struct ValidationResult {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ValidationResult {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Run the check command.
///
/// Loads the configuration and resolves every reference of every task,
/// reporting anything a build would fail or warn on.
pub fn run(config_path: &Path, strict: bool) -> Result<()> {
    tracing::info!(?config_path, strict, "Checking configuration and references");

    let mut result = ValidationResult::default();

    println!("Checking configuration...");
    let (options, tasks) = match super::load(config_path, None) {
        Ok(loaded) => {
            println!("  ✓ Configuration valid");
            loaded
        }
        Err(e) => {
            println!("  ✗ Configuration invalid: {e:#}");
            bail!("Validation failed: {e:#}");
        }
    };

    if !options.relative_to.is_dir() {
        result.add_error(format!(
            "relative_to is not a directory: {}",
            options.relative_to.display()
        ));
    }

    let builder = Builder::new(options);
    for task in &tasks {
        println!("\nChecking {}...", task.dest.display());
        match builder.scan_task(task) {
            Ok(scan) => validate_scan(&scan, &mut result),
            Err(e) => result.add_error(format!("{}: {e}", task.dest.display())),
        }
    }

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", result.errors.len());
    println!("  Warnings: {}", result.warnings.len());

    if result.has_errors() {
        println!();
        println!("Errors:");
        for err in &result.errors {
            println!("  ✗ {err}");
        }
    }

    if result.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &result.warnings {
            println!("  ⚠ {warn}");
        }
    }

    if result.has_errors() {
        bail!("Validation failed with {} error(s)", result.errors.len());
    }

    if strict && result.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            result.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(())
}

/// Turn one task scan into errors and warnings.
fn validate_scan(scan: &TaskScan, result: &mut ValidationResult) {
    let dest = scan.dest.display();

    for missing in &scan.missing_sources {
        result.add_warning(format!("{dest}: source not found: {}", missing.display()));
    }

    for resolved in &scan.references {
        let reference = &resolved.reference;
        if resolved.ignored {
            println!("  - {} {} (ignored)", reference.kind.as_str(), reference.path);
            continue;
        }
        // Already-embedded images are never read.
        if reference.kind == ReferenceKind::Image && reference.path.contains("base64") {
            continue;
        }

        if resolved.exists {
            println!("  ✓ {} {}", reference.kind.as_str(), reference.path);
        } else {
            println!("  ✗ {} {}", reference.kind.as_str(), reference.path);
            result.add_error(format!(
                "{dest}: {} {} not found at {}",
                reference.kind.as_str(),
                reference.path,
                resolved.path.display()
            ));
        }
    }

    if scan.engines.is_empty() {
        println!("  - no engine permutations");
    } else {
        let engines: Vec<_> = scan.engines.iter().map(|e| e.as_str()).collect();
        println!("  - engine permutations: {}", engines.join(", "));
    }
}

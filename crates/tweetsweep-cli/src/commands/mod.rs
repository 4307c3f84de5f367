pub mod api;
pub mod archive;
pub mod status;

use tweetsweep_core::{sweep::RunSummary, sweep::SweepOptions, AppConfig};

pub(crate) fn sweep_options(config: &AppConfig, dry_run: bool) -> SweepOptions {
    SweepOptions {
        dry_run,
        ..SweepOptions::from_config(&config.sweep)
    }
}

pub(crate) fn print_summary(summary: &RunSummary) {
    println!("\nRun complete:");
    for line in summary_lines(summary) {
        println!("  {}", line);
    }
}

fn summary_lines(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec![
        format!("Scanned: {}", summary.scanned()),
        format!("Deleted: {}", summary.deleted),
        format!("Skipped (already deleted): {}", summary.skipped),
        format!("Failed: {}", summary.failed),
    ];
    if summary.would_delete > 0 {
        lines.push(format!("Would delete (dry run): {}", summary.would_delete));
    }
    if summary.cap_reached {
        lines.push("Deletion limit reached, run again later for the rest.".to_string());
    }
    lines.push(format!("Total deleted so far: {}", summary.total_deleted));
    lines
}

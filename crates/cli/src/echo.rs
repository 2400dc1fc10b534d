use std::time::Duration;

use lawdispatch_core::UpdateReport;
use owo_colors::OwoColorize;

use crate::VERSION;

/// Print a styled banner for verbose mode
pub fn print_banner() {
    eprintln!(
        "\n{} {} {}",
        "lawdispatch".bold().bright_blue(),
        "v".dimmed(),
        VERSION.dimmed()
    );
    eprintln!("{}", "Keep law dispatches in sync with the law archive\n".dimmed());
}

/// Print a styled step message
pub fn print_step(step: usize, total: usize, message: &str) {
    eprintln!("{} {}", format!("[{}/{}]", step, total).dimmed(), message.bright_cyan());
}

/// Print a success message
pub fn print_success(message: &str) {
    eprintln!("{} {}", "✓".green(), message.bright_green());
}

/// Print an info message
pub fn print_info(message: &str) {
    eprintln!("{} {}", "ℹ".blue(), message.bright_blue());
}

/// Print a warning message
pub fn print_warning(message: &str) {
    eprintln!("{} {}", "⚠".yellow(), message.bright_yellow());
}

/// Print an error message
pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red(), message.bright_red());
}

/// Print elapsed time, colored by how long the run took per law
pub fn print_timing(label: &str, duration: Duration, laws: usize) {
    let secs = duration.as_secs_f64();
    let per_law = if laws == 0 { secs } else { secs / laws as f64 };
    let text = format!("{:.2}s ({:.2}s per law)", secs, per_law);

    if per_law < 5.0 {
        eprintln!("  {} {}", format!("{}:", label).dimmed(), text.green());
    } else {
        eprintln!("  {} {}", format!("{}:", label).dimmed(), text.bright_yellow());
    }
}

/// Print the outcome of an update run
pub fn print_report(report: &UpdateReport) {
    eprintln!("\n{}", "═".repeat(60).dimmed());
    eprintln!("{}", "Update Summary".bold().cyan());
    eprintln!("{}", "═".repeat(60).dimmed());

    for (name, path) in &report.written {
        print_success(&format!("{} → {}", name, path.display().bright_white()));
    }
    for failure in &report.failed {
        print_error(&format!("{}: {}", failure.name, failure.error));
    }

    eprintln!(
        "  {} {}   {} {}\n",
        "Written:".dimmed(),
        report.written.len().to_string().bright_white(),
        "Failed:".dimmed(),
        report.failed.len().to_string().bright_white()
    );
}

/// Format file size for display
pub fn format_size(bytes: usize) -> String {
    const KB: usize = 1024;
    const MB: usize = 1024 * KB;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

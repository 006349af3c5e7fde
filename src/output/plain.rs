//! Plain text output formatting.
//!
//! Produces human-readable output with colors, plus the live display that
//! follows a run as it progresses.

use crate::report::RunReport;
use crate::scanner::{CollisionResult, ResultSink};
use console::{style, Style};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};

const RULE_HEAVY: &str = "═══════════════════════════════════════════════════════════════════════════";
const RULE_LIGHT: &str = "───────────────────────────────────────────────────────────────────────────";

/// Live run display: a progress bar plus one line per result.
pub struct LiveDisplay {
    progress: Option<ProgressBar>,
    print_results: bool,
}

impl LiveDisplay {
    /// Create a display for a run over `total` targets.
    ///
    /// `show_progress` draws the bar; `print_results` echoes each result as it
    /// arrives.
    pub fn new(total: usize, show_progress: bool, print_results: bool) -> Self {
        let progress = show_progress.then(|| {
            let pb = ProgressBar::new(total as u64);
            if let Ok(bar_style) = ProgressStyle::default_bar().template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
            ) {
                pb.set_style(bar_style.progress_chars("=>-"));
            }
            pb
        });

        Self {
            progress,
            print_results,
        }
    }

    /// Finish the progress bar.
    pub fn finish(&self, message: &str) {
        if let Some(pb) = &self.progress {
            pb.finish_with_message(message.to_string());
        }
    }
}

impl ResultSink for LiveDisplay {
    fn on_result(&mut self, result: &CollisionResult) {
        if !self.print_results {
            return;
        }
        let line = format_result_line(result);
        match &self.progress {
            Some(pb) => pb.println(line),
            None => println!("{}", line),
        }
    }

    fn on_progress(&mut self, completed: usize, _total: usize) {
        if let Some(pb) = &self.progress {
            pb.set_position(completed as u64);
        }
    }
}

/// One result as a single styled line.
pub fn format_result_line(result: &CollisionResult) -> String {
    format!(
        "  {} {:<40} {:<24} {} {}",
        status_style(result.status_code).apply_to(result.status_code),
        truncate_string(&result.domain, 40),
        result.url,
        style(format!("{:>8}B", result.content_length)).dim(),
        style(truncate_string(&result.title, 40)).white().bold()
    )
}

fn status_style(code: u16) -> Style {
    match code {
        200..=299 => Style::new().green().bold(),
        300..=399 => Style::new().cyan(),
        400..=499 => Style::new().yellow(),
        _ => Style::new().red(),
    }
}

/// Print a run header before probing begins.
pub fn print_run_header(ips: usize, hostnames: usize, ports: &str, targets: usize, concurrency: usize) {
    println!();
    println!(
        "{} {} v{}",
        style("Starting").cyan(),
        style("hostcollide").cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!(
        "{} {} hostnames x {} IPs on ports {}",
        style("•").dim(),
        style(hostnames).white().bold(),
        style(ips).white().bold(),
        style(ports).yellow()
    );
    println!(
        "{} Probing {} targets, {} at a time...",
        style("•").dim(),
        style(targets).white().bold(),
        concurrency
    );
    println!();
}

/// Print a finished run in human-readable plain text format.
pub fn print_plain(report: &RunReport) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    writeln!(out)?;
    writeln!(out, "{}", style(RULE_HEAVY).cyan())?;
    writeln!(
        out,
        "                    {} Collision Results",
        style("hostcollide").cyan().bold()
    )?;
    writeln!(out, "{}", style(RULE_HEAVY).cyan())?;
    writeln!(out)?;

    writeln!(out, "  {} {}", style("Ports:").bold(), report.ports)?;
    writeln!(out, "  {} {}", style("Concurrency:").bold(), report.concurrency)?;
    writeln!(
        out,
        "  {} {} of {} targets checked in {:.2}s{}",
        style("Statistics:").bold(),
        report.attempted,
        report.total,
        report.duration_ms as f64 / 1000.0,
        if report.stopped { " (stopped)" } else { "" }
    )?;
    writeln!(
        out,
        "               {} results",
        style(report.found).green().bold()
    )?;
    writeln!(out)?;

    if report.results.is_empty() {
        writeln!(out, "  {}", style("No collisions found.").dim())?;
    } else {
        writeln!(out, "  {}", style(RULE_LIGHT).dim())?;
        writeln!(
            out,
            "  {:<6} {:<40} {:<24} {:>9} {}",
            style("STATUS").bold(),
            style("DOMAIN").bold(),
            style("URL").bold(),
            style("LENGTH").bold(),
            style("TITLE").bold()
        )?;
        writeln!(out, "  {}", style(RULE_LIGHT).dim())?;

        for result in &report.results {
            writeln!(
                out,
                "  {:<6} {:<40} {:<24} {:>9} {}",
                status_style(result.status_code).apply_to(result.status_code),
                truncate_string(&result.domain, 40),
                result.url,
                result.content_length,
                style(truncate_string(&result.title, 40)).dim()
            )?;
        }

        writeln!(out, "  {}", style(RULE_LIGHT).dim())?;
    }

    writeln!(out)?;
    writeln!(out, "{}", style(RULE_HEAVY).cyan())?;
    writeln!(out)?;

    Ok(())
}

/// Print an error message.
pub fn print_error(msg: &str) {
    eprintln!("{} {}", style("Error:").red().bold(), msg);
}

/// Print a warning message.
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", style("Warning:").yellow().bold(), msg);
}

/// Print a success message.
pub fn print_success(msg: &str) {
    println!("{} {}", style("✓").green().bold(), msg);
}

/// Print an info message.
pub fn print_info(msg: &str) {
    println!("{} {}", style("ℹ").blue().bold(), msg);
}

/// Truncate a string to a maximum number of characters, adding an ellipsis.
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Port;

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("管理后台登录页面", 6), "管理后...");
    }

    #[test]
    fn test_result_line_mentions_fields() {
        console::set_colors_enabled(false);
        let result = CollisionResult {
            url: "http://10.0.0.1:80".to_string(),
            domain: "intranet.example.com".to_string(),
            ip: "10.0.0.1".parse().unwrap(),
            port: Port::HTTP,
            title: "Intranet".to_string(),
            status_code: 200,
            content_length: 42,
        };

        let line = format_result_line(&result);
        assert!(line.contains("200"));
        assert!(line.contains("intranet.example.com"));
        assert!(line.contains("http://10.0.0.1:80"));
        assert!(line.contains("42B"));
        assert!(line.contains("Intranet"));
    }

    #[test]
    fn test_hidden_display_accepts_events() {
        let mut display = LiveDisplay::new(3, false, false);
        display.on_progress(1, 3);
        display.finish("done");
    }
}

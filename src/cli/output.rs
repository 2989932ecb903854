//! Shared output formatting for CLI commands.
//!
//! The probe report format is one line per case, printed as soon as the
//! case completes: `<NAME>: PASS`, `<NAME>: FAIL (<code>)`, or
//! `<NAME>: SKIP (<reason>)`. Verdicts are informational; they never decide
//! the exit code.

use owo_colors::OwoColorize;

use crate::probe::{ProbeReport, Verdict};

/// Print the single report line for one completed case
pub fn print_report(report: &ProbeReport) {
    match &report.verdict {
        Verdict::Pass => {
            println!("{}: {}", report.name, "PASS".green());
            if let Some(detail) = &report.detail {
                println!("  Health OK: {}", detail);
            }
        }
        Verdict::Fail(status) => {
            println!("{}: {} ({})", report.name, "FAIL".red(), status);
            if let Some(detail) = &report.detail {
                println!("  response: {}", truncate(&detail.to_string(), 120));
            }
        }
        Verdict::Unreachable(reason) => {
            println!("{}: {} (unreachable: {})", report.name, "FAIL".red(), reason);
        }
        Verdict::Skip(reason) => {
            println!("{}: {} ({})", report.name, "SKIP".yellow(), reason);
        }
    }
}

/// Print the trailing pass/fail/skip tally
pub fn print_summary(reports: &[ProbeReport]) {
    let passed = reports.iter().filter(|r| r.verdict.is_pass()).count();
    let skipped = reports.iter().filter(|r| r.verdict.is_skip()).count();
    let failed = reports.len() - passed - skipped;

    println!();
    println!("{} passed, {} failed, {} skipped", passed, failed, skipped);
}

/// Truncate string to maximum length with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        s.to_string()
    } else {
        format!("{}...", &s[..max_len.saturating_sub(3)])
    }
}

/// Print a horizontal separator line
pub fn print_separator(width: usize) {
    println!("{}", "-".repeat(width));
}

/// Print a table header
pub fn print_table_header(columns: &[(&str, usize)]) {
    println!();
    let mut header = String::new();
    for (name, width) in columns {
        header.push_str(&format!("{:<width$} ", name, width = width));
    }
    println!("{}", header.trim());

    let total_width: usize = columns.iter().map(|(_, w)| w + 1).sum();
    print_separator(total_width.saturating_sub(1));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ProbeReport;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello world", 8), "hello...");
        assert_eq!(truncate("hi", 5), "hi");
    }

    #[test]
    fn test_print_report_does_not_panic() {
        print_report(&ProbeReport::passed("ROOT"));
        print_report(&ProbeReport::failed("BARS", 503));
        print_report(&ProbeReport::unreachable("ROOT", "connection refused".to_string()));
        print_report(&ProbeReport::skipped("INTENT", "no secret configured"));
    }

    #[test]
    fn test_print_summary_counts() {
        let reports = vec![
            ProbeReport::passed("A"),
            ProbeReport::failed("B", 503),
            ProbeReport::skipped("C", "no secret configured"),
        ];
        // Counting logic is exercised through the printer; this must not panic.
        print_summary(&reports);
    }
}

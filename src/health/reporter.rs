//! Table output for health check reports

use colored::Colorize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::runner::HealthCheckReport;

/// Formats a health check report as a table followed by a summary
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();
    builder.push_record(["System", "Status", "Duration", "Message"]);

    for (name, result) in &report.results {
        builder.push_record([
            name.clone(),
            result.status.as_colored_str(),
            format!("{:.2?}", result.duration),
            result.message.clone(),
        ]);
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    format!("{table}\n{}", format_summary(report))
}

fn format_summary(report: &HealthCheckReport) -> String {
    let mut lines = vec![
        String::new(),
        "Summary".bold().underline().to_string(),
        format!("  Total checks: {}", report.total),
        format!("  {} Passed: {}", "✓".green(), report.passed),
    ];
    if report.warned > 0 {
        lines.push(format!("  {} Warned: {}", "⚠".yellow(), report.warned));
    }
    if report.failed > 0 {
        lines.push(format!("  {} Failed: {}", "✗".red(), report.failed));
    }

    lines.push(String::new());
    let overall = match (report.is_healthy(), report.has_warnings()) {
        (false, _) => "Overall: UNHEALTHY".red().bold(),
        (true, true) => "Overall: HEALTHY (with warnings)".yellow().bold(),
        (true, false) => "Overall: HEALTHY".green().bold(),
    };
    lines.push(format!("  {overall}"));
    lines.push(String::new());

    lines.join("\n")
}

/// Formats the detail lines of every check that has them
pub fn format_details(report: &HealthCheckReport) -> String {
    report
        .results
        .iter()
        .filter(|(_, result)| !result.details.is_empty())
        .map(|(name, result)| format!("\n{} Details:\n{}", name.bold(), result.details.join("\n")))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Prints a health check report to stdout
pub fn print_report(report: &HealthCheckReport) {
    println!("{}", format_report(report));
    println!("{}", format_details(report));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::CheckResult;

    #[test]
    fn test_report_lists_every_check() {
        colored::control::set_override(false);
        let report = HealthCheckReport {
            results: vec![
                ("Physics".to_string(), CheckResult::pass("settles")),
                (
                    "Overlay".to_string(),
                    CheckResult::warn("slow").with_details(["  ⚠ took long"]),
                ),
            ],
            total: 2,
            passed: 1,
            warned: 1,
            failed: 0,
        };

        let text = format_report(&report);
        assert!(text.contains("Physics"));
        assert!(text.contains("HEALTHY (with warnings)"));

        let details = format_details(&report);
        assert!(details.contains("Overlay Details:"));
        assert!(!details.contains("Physics"));
    }
}

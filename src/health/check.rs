//! Core health check trait and types

use std::time::Duration;

/// Status of a system check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckStatus {
    Pass,
    /// Passed, but something deserves a look
    Warn,
    Fail,
}

impl CheckStatus {
    /// Returns true if the check passed (Pass or Warn)
    pub fn is_ok(&self) -> bool {
        !self.is_fail()
    }

    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Returns the status as a colored string
    pub fn as_colored_str(&self) -> String {
        use colored::Colorize;
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

/// Result of a system check
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub status: CheckStatus,
    /// One-line summary shown in the report table
    pub message: String,
    /// Lines printed below the table
    pub details: Vec<String>,
    pub duration: Duration,
}

impl CheckResult {
    fn new(status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            details: Vec::new(),
            duration: Duration::ZERO,
        }
    }

    pub fn pass(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Pass, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Warn, message)
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self::new(CheckStatus::Fail, message)
    }

    /// Appends detail lines
    pub fn with_details<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Sets the duration for this check
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

/// Accumulates per-step outcomes of a check into one result
#[derive(Debug, Default)]
pub struct Findings {
    lines: Vec<String>,
    worst: Option<CheckStatus>,
}

impl Findings {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, status: CheckStatus, marker: &str, line: String) {
        self.worst = self.worst.max(Some(status));
        self.lines.push(format!("  {marker} {line}"));
    }

    pub fn ok(&mut self, line: impl Into<String>) {
        self.record(CheckStatus::Pass, "✓", line.into());
    }

    pub fn warn(&mut self, line: impl Into<String>) {
        self.record(CheckStatus::Warn, "⚠", line.into());
    }

    pub fn fail(&mut self, line: impl Into<String>) {
        self.record(CheckStatus::Fail, "✗", line.into());
    }

    /// Adds a line that does not affect the status
    pub fn note(&mut self, line: impl Into<String>) {
        self.lines.push(format!("    {}", line.into()));
    }

    /// Records `ok` or `fail` depending on `passed`
    pub fn expect(&mut self, passed: bool, line: impl Into<String>) {
        if passed {
            self.ok(line);
        } else {
            self.fail(line);
        }
    }

    /// Builds the result; `summary` is used when nothing failed or warned
    pub fn finish(self, summary: impl Into<String>) -> CheckResult {
        let count = |marker: &str| {
            self.lines
                .iter()
                .filter(|line| line.trim_start().starts_with(marker))
                .count()
        };
        let result = match self.worst {
            Some(CheckStatus::Fail) => CheckResult::fail(format!("{} step(s) failed", count("✗"))),
            Some(CheckStatus::Warn) => {
                CheckResult::warn(format!("{} step(s) with warnings", count("⚠")))
            }
            _ => CheckResult::pass(summary),
        };
        result.with_details(self.lines)
    }
}

/// Trait for system health checks
pub trait SystemCheck {
    /// Name of the system being checked
    fn name(&self) -> &'static str;

    /// Perform the health check
    fn check(&self) -> CheckResult;

    /// Optional description of what this check validates
    fn description(&self) -> Option<&'static str> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_findings_take_worst_status() {
        let mut findings = Findings::new();
        findings.ok("first");
        assert_eq!(findings.worst, Some(CheckStatus::Pass));
        findings.warn("second");
        findings.ok("third");
        let result = findings.finish("all good");
        assert_eq!(result.status, CheckStatus::Warn);
        assert_eq!(result.details.len(), 3);
    }

    #[test]
    fn test_findings_failure_message() {
        let mut findings = Findings::new();
        findings.expect(false, "broken");
        findings.expect(true, "fine");
        let result = findings.finish("unused");
        assert!(result.status.is_fail());
        assert_eq!(result.message, "1 step(s) failed");
    }

    #[test]
    fn test_empty_findings_pass() {
        let result = Findings::new().finish("nothing to do");
        assert_eq!(result.status, CheckStatus::Pass);
        assert_eq!(result.message, "nothing to do");
    }
}

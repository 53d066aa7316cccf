/// Core domain types shared by discovery, analysis, and patching.
use std::fmt;

/// One reported compatibility finding.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Optional remediation advice shown under the description.
    pub advice: Option<String>,
    /// Human-readable description of the incompatibility.
    pub description: String,
    /// Whether the producing rule also queued an automatic fix.
    pub fixable: bool,
    /// Name of the rule that fired.
    pub name: &'static str,
    /// Severity level of the finding.
    pub severity: Severity,
    /// Location of the finding in its source document, when known.
    pub span: Option<Span>,
    /// Sub-name distinguishing findings within one rule.
    pub subname: String,
}

/// A proposed textual replacement over a byte range of a source file.
/// Independent of the rule that produced it once collected; the rule name
/// is kept for conflict reporting.
#[derive(Debug, Clone)]
pub struct Edit {
    /// End byte offset (exclusive) of the replaced span.
    pub end: usize,
    /// Text substituted for the span. The replacement may be empty
    /// (deletion) and so may the span (pure insertion).
    pub replacement: String,
    /// Name of the rule that proposed this edit.
    pub rule: &'static str,
    /// Start byte offset of the replaced span.
    pub start: usize,
}

/// Severity ladder. Ordering is significant: diagnostics sort most severe
/// first, and the log-level threshold compares against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Chatty detail, hidden by any threshold above 0.
    Verbose,
    /// Informational finding, no action strictly required.
    Info,
    /// Likely incompatibility; the page may render differently.
    Warn,
    /// Certain incompatibility; the page will not render correctly.
    Error,
}

impl Severity {
    /// Map a numeric `--log-level` (0..=3) onto the ladder.
    pub fn from_level(level: u8) -> Self {
        return match level {
            0 => Severity::Verbose,
            1 => Severity::Info,
            2 => Severity::Warn,
            _ => Severity::Error,
        };
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Severity::Verbose => "verbose",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        return write!(f, "{label}");
    }
}

/// Location of a node in its source document. Byte offsets lie within
/// document bounds by construction; line and column are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// 1-based column of the start position.
    pub column: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// 1-based line of the start position.
    pub line: usize,
    /// Start byte offset.
    pub start: usize,
}

/// Role of a manifest unit in the dependency graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitRole {
    /// Reached through a `usingComponents` reference.
    Component,
    /// Reached only through a style `@import` chain.
    Imported,
    /// Listed in the manifest and selected for analysis.
    Page,
}

impl UnitRole {
    /// Uppercase label used in report group headers.
    pub fn label(self) -> &'static str {
        return match self {
            UnitRole::Component => "COMPONENT",
            UnitRole::Imported => "IMPORTED",
            UnitRole::Page => "PAGE",
        };
    }
}

#[cfg(test)]
mod tests {
    use super::Severity;

    #[test]
    fn severity_orders_by_weight() {
        assert!(Severity::Error > Severity::Warn);
        assert!(Severity::Warn > Severity::Info);
        assert!(Severity::Info > Severity::Verbose);
    }

    #[test]
    fn level_mapping_saturates() {
        assert_eq!(Severity::from_level(0), Severity::Verbose);
        assert_eq!(Severity::from_level(2), Severity::Warn);
        assert_eq!(Severity::from_level(9), Severity::Error);
    }
}

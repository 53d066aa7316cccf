//! Console reporting: unit group headers, severity coloring, summaries.

use crate::types::{Diagnostic, Severity};

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const GRAY: &str = "\x1b[90m";
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const YELLOW: &str = "\x1b[33m";

fn severity_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => RED,
        Severity::Warn => YELLOW,
        Severity::Info => "",
        Severity::Verbose => GRAY,
    }
}

/// Print the banner for one analyzed unit.
pub fn print_unit_header(label: &str, unit: &str) {
    println!("\n{BOLD}============ {label} {CYAN}{unit}{RESET}{BOLD} ============{RESET}");
}

/// Print one unit's findings, each paired with its display location.
///
/// The caller passes findings pre-sorted by the engine's ordering
/// contract; consecutive findings with the same name and subname share
/// one description header, each contributing its location line.
pub fn print_findings(findings: &[(String, Diagnostic)], min_level: Severity) {
    let mut last: Option<(&str, &str)> = None;
    for (location, diagnostic) in findings {
        if diagnostic.severity < min_level {
            continue;
        }
        let header = (diagnostic.name, diagnostic.subname.as_str());
        if last != Some(header) {
            let color = severity_color(diagnostic.severity);
            println!("@{color}{}{RESET} {}", diagnostic.name, diagnostic.description);
            if let Some(advice) = &diagnostic.advice {
                println!("  {GRAY}hint: {advice}{RESET}");
            }
            if diagnostic.fixable {
                println!("  {GREEN}fix available (run `skylint fix`){RESET}");
            }
            last = Some(header);
        }
        println!("  {location}");
    }
}

/// Print a file-level failure (parse error, rule error) inside a group.
pub fn print_failure(message: &str) {
    println!("  {RED}failed:{RESET} {message}");
}

/// Final line of a check run. Partial success (skipped files or failed
/// rules) is called out explicitly, never folded into a clean summary.
pub fn print_check_summary(
    files: usize,
    skipped: usize,
    errors: usize,
    warnings: usize,
    fixable: usize,
) {
    println!();
    if skipped > 0 {
        println!(
            "{BOLD}{files} files analyzed, {RED}{skipped} skipped{RESET}{BOLD}: {errors} errors, {warnings} warnings{RESET}"
        );
        return;
    }
    if errors == 0 && warnings == 0 {
        println!("{BOLD}{GREEN}All {files} files compatible{RESET}");
        return;
    }
    println!("{BOLD}{files} files analyzed: {errors} errors, {warnings} warnings{RESET}");
    if fixable > 0 {
        println!("{GREEN}{fixable} findings can be fixed automatically: run `skylint fix`{RESET}");
    }
}

/// Final line of a fix run.
pub fn print_fix_summary(patched: usize, skipped: usize) {
    println!();
    if patched == 0 && skipped == 0 {
        println!("Nothing to fix.");
        return;
    }
    if skipped > 0 {
        println!("{BOLD}{patched} files patched, {RED}{skipped} skipped{RESET}");
        return;
    }
    println!("{BOLD}{GREEN}{patched} files patched{RESET}");
}

/// Hint printed when the manifest leaves lazy code loading off.
pub fn print_lazy_loading_hint() {
    println!(
        "{GRAY}hint: app.json does not set \"lazyCodeLoading\": \"requiredComponents\"; on-demand injection is recommended{RESET}"
    );
}

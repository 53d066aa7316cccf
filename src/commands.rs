//! Core CLI commands for skylint: check, fix, rules.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::thread;

use crate::config::Config;
use crate::discovery;
use crate::document::{Document, Grammar};
use crate::engine::{self, FileAnalysis, Rule};
use crate::error::Error;
use crate::patch;
use crate::report;
use crate::rules;
use crate::styles;
use crate::types::{Diagnostic, Severity, UnitRole};

/// One analyzed file: original text plus everything the rules produced.
struct FileOutcome {
    analysis: FileAnalysis,
    text: String,
}

/// Results of one full analysis pass over the project. An `Err` outcome is
/// a file-local parse failure; the rest of the run carried on.
struct ProjectAnalysis {
    imported: BTreeSet<PathBuf>,
    outcomes: BTreeMap<PathBuf, Result<FileOutcome, Error>>,
    work: discovery::WorkList,
}

/// Running tally across the whole report.
#[derive(Default)]
struct Totals {
    errors: usize,
    failures: usize,
    files: usize,
    fixable: usize,
    skipped: usize,
    warnings: usize,
}

/// Analyze the project and report incompatibilities grouped per unit.
///
/// # Errors
///
/// Returns discovery and config errors; everything below the file level is
/// reported inline instead of propagated.
pub fn check(root: &Path, cli_pages: &[String], min_level: Severity) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let pages = if cli_pages.is_empty() { config.pages.clone() } else { cli_pages.to_vec() };
    let registry = rules::registry(&config.skip_rules);
    let project = analyze_project(root, &pages, &registry)?;

    if project.work.is_empty() {
        println!("No pages selected. Mark pages with \"renderer\": \"skyline\" or pass --pages.");
        return Ok(ExitCode::SUCCESS);
    }

    let manifest = discovery::read_manifest(root)?;
    if manifest.lazy_code_loading.as_deref() != Some("requiredComponents") {
        report::print_lazy_loading_hint();
    }

    let mut totals = Totals::default();
    for (base, role) in &project.work {
        print_unit(root, base, *role, &project.outcomes, min_level, &mut totals);
    }
    print_imported(root, &project.imported, &project.outcomes, min_level, &mut totals);

    totals.files = project.outcomes.values().filter(|o| o.is_ok()).count();
    report::print_check_summary(
        totals.files,
        totals.skipped,
        totals.errors,
        totals.warnings,
        totals.fixable,
    );

    // Exit code priority: errors or failures (2) > warnings (1) > clean (0).
    if totals.errors > 0 || totals.skipped > 0 || totals.failures > 0 {
        return Ok(ExitCode::from(2));
    } else if totals.warnings > 0 {
        return Ok(ExitCode::from(1));
    } else {
        return Ok(ExitCode::SUCCESS);
    }
}

/// Analyze the project, then merge and write every file's accepted edits.
///
/// A merge conflict skips that file only; the conflict is reported with
/// both rule names and the rest of the fixes still land.
///
/// # Errors
///
/// Returns discovery and config errors, or I/O errors while writing.
pub fn fix(root: &Path, cli_pages: &[String]) -> Result<ExitCode, Error> {
    let config = Config::load(root)?;
    let pages = if cli_pages.is_empty() { config.pages.clone() } else { cli_pages.to_vec() };
    let registry = rules::registry(&config.skip_rules);
    let project = analyze_project(root, &pages, &registry)?;

    let mut patched = 0_usize;
    let mut skipped = 0_usize;
    for (path, outcome) in &project.outcomes {
        let Ok(file) = outcome else { continue };
        if file.analysis.edits.is_empty() {
            continue;
        }
        match patch::apply(&file.text, &file.analysis.edits) {
            Ok(rewritten) => {
                std::fs::write(path, rewritten)?;
                patched += 1;
                println!("patched {}", display_path(root, path));
            },
            // Any merge failure skips just this file; the rest still land.
            Err(e) => {
                skipped += 1;
                eprintln!("skipped {}: {e}", display_path(root, path));
            },
        }
    }

    report::print_fix_summary(patched, skipped);
    if skipped > 0 {
        return Ok(ExitCode::from(1));
    }
    return Ok(ExitCode::SUCCESS);
}

/// Print the rule registry, one rule per line.
pub fn rules_list() {
    for rule in rules::registry(&[]) {
        let meta = rule.meta();
        println!("{:<20} {}", meta.name, meta.grammar);
    }
}

/// Discover units, collect style imports, and analyze every candidate file.
fn analyze_project(
    root: &Path,
    pages: &[String],
    registry: &[Box<dyn Rule>],
) -> Result<ProjectAnalysis, Error> {
    let work = discovery::discover(root, pages)?;

    let unit_sheets: BTreeSet<PathBuf> =
        work.keys().map(|base| base.with_extension("wxss")).collect();
    let entries: Vec<PathBuf> = unit_sheets.iter().cloned().collect();
    let closure = styles::collect(&entries);

    let mut imported = BTreeSet::new();
    for sheet in closure.sheets.iter().chain(closure.errors.iter().map(|(path, _)| path)) {
        if !unit_sheets.contains(sheet) {
            imported.insert(sheet.clone());
        }
    }

    let mut files: Vec<PathBuf> = Vec::new();
    for base in work.keys() {
        for ext in ["json", "wxml", "wxss"] {
            let candidate = base.with_extension(ext);
            if candidate.is_file() {
                files.push(candidate);
            }
        }
    }
    files.extend(closure.sheets.iter().filter(|sheet| !unit_sheets.contains(*sheet)).cloned());

    let mut outcomes = analyze_files(&files, registry);
    for (path, error) in closure.errors {
        outcomes.insert(path, Err(error));
    }

    Ok(ProjectAnalysis { imported, outcomes, work })
}

/// Analyze files concurrently on a fixed worker pool.
///
/// Parse trees stay on the worker that built them; only plain result
/// structs cross the channel, and results land in a `BTreeMap`, so
/// completion order cannot affect output.
fn analyze_files(
    files: &[PathBuf],
    registry: &[Box<dyn Rule>],
) -> BTreeMap<PathBuf, Result<FileOutcome, Error>> {
    if files.is_empty() {
        return BTreeMap::new();
    }
    let workers = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .min(8)
        .min(files.len());

    let (job_tx, job_rx) = crossbeam_channel::unbounded();
    let (result_tx, result_rx) = crossbeam_channel::unbounded();
    for file in files {
        let _ = job_tx.send(file.clone());
    }
    drop(job_tx);

    thread::scope(|scope| {
        for _ in 0..workers {
            let job_rx = job_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || {
                while let Ok(path) = job_rx.recv() {
                    let outcome = analyze_file(&path, registry);
                    let _ = result_tx.send((path, outcome));
                }
            });
        }
    });
    drop(result_tx);

    result_rx.into_iter().collect()
}

/// Read, parse, and run the matching rules over one file.
fn analyze_file(path: &Path, registry: &[Box<dyn Rule>]) -> Result<FileOutcome, Error> {
    let Some(grammar) = Grammar::for_path(path) else {
        return Err(Error::UnsupportedExtension { path: path.to_path_buf() });
    };
    let text = std::fs::read_to_string(path)?;
    let doc = Document::parse(grammar, path, text)?;
    let analysis = engine::run(registry, &doc);
    Ok(FileOutcome { analysis, text: doc.text })
}

/// Print one unit's group: its config, markup, and style findings merged
/// and re-sorted under the engine's ordering contract.
fn print_unit(
    root: &Path,
    base: &Path,
    role: UnitRole,
    outcomes: &BTreeMap<PathBuf, Result<FileOutcome, Error>>,
    min_level: Severity,
    totals: &mut Totals,
) {
    let mut findings: Vec<(String, Diagnostic)> = Vec::new();
    let mut failures: Vec<String> = Vec::new();
    for ext in ["json", "wxml", "wxss"] {
        collect_file(root, &base.with_extension(ext), outcomes, &mut findings, &mut failures, totals);
    }
    findings.sort_by(|a, b| engine::diagnostic_order(&a.1, &b.1));

    let visible = findings.iter().any(|(_, d)| d.severity >= min_level);
    if !visible && failures.is_empty() {
        return;
    }
    report::print_unit_header(role.label(), &display_path(root, base));
    report::print_findings(&findings, min_level);
    for failure in &failures {
        report::print_failure(failure);
    }
}

/// Print the group for style sheets reached only through imports.
fn print_imported(
    root: &Path,
    imported: &BTreeSet<PathBuf>,
    outcomes: &BTreeMap<PathBuf, Result<FileOutcome, Error>>,
    min_level: Severity,
    totals: &mut Totals,
) {
    let mut findings: Vec<(String, Diagnostic)> = Vec::new();
    let mut failures: Vec<String> = Vec::new();
    for path in imported {
        collect_file(root, path, outcomes, &mut findings, &mut failures, totals);
    }
    findings.sort_by(|a, b| engine::diagnostic_order(&a.1, &b.1));

    let visible = findings.iter().any(|(_, d)| d.severity >= min_level);
    if !visible && failures.is_empty() {
        return;
    }
    report::print_unit_header(UnitRole::Imported.label(), "style sheets");
    report::print_findings(&findings, min_level);
    for failure in &failures {
        report::print_failure(failure);
    }
}

/// Fold one file's outcome into a unit group and the running totals.
fn collect_file(
    root: &Path,
    path: &Path,
    outcomes: &BTreeMap<PathBuf, Result<FileOutcome, Error>>,
    findings: &mut Vec<(String, Diagnostic)>,
    failures: &mut Vec<String>,
    totals: &mut Totals,
) {
    match outcomes.get(path) {
        // A unit need not have all three files.
        None => {},
        Some(Ok(outcome)) => {
            for diagnostic in &outcome.analysis.diagnostics {
                match diagnostic.severity {
                    Severity::Error => totals.errors += 1,
                    Severity::Warn => totals.warnings += 1,
                    Severity::Info | Severity::Verbose => {},
                }
                if diagnostic.fixable {
                    totals.fixable += 1;
                }
                findings.push((display_location(root, path, diagnostic), diagnostic.clone()));
            }
            for failure in &outcome.analysis.failures {
                totals.failures += 1;
                failures.push(failure.to_string());
            }
        },
        Some(Err(e)) => {
            totals.skipped += 1;
            failures.push(e.to_string());
        },
    }
}

fn display_path(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

fn display_location(root: &Path, path: &Path, diagnostic: &Diagnostic) -> String {
    match diagnostic.span {
        Some(span) => format!("{}:{}:{}", display_path(root, path), span.line, span.column),
        None => display_path(root, path),
    }
}

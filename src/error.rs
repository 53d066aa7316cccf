/// Crate-level error types for skylint.
use std::path::PathBuf;

use crate::document::Grammar;

/// Every error carries enough context (file path, rule, span) to locate the
/// source problem without a debugger. Discovery errors are run-fatal; parse,
/// rule, and edit errors stay local to one file.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A component configuration reachable from the manifest is not valid JSON.
    #[error("component config invalid: {}: {reason}", path.display())]
    ConfigInvalid {
        /// Path to the offending configuration file.
        path: PathBuf,
        /// Raw message from the JSON deserializer.
        reason: String,
    },

    /// A component configuration reachable from the manifest does not exist.
    #[error("component config not found: {}", path.display())]
    ConfigNotFound {
        /// Path to the missing configuration file.
        path: PathBuf,
    },

    /// Two accepted edits overlap, or share a start offset that makes their
    /// ordering ambiguous. The merge for that file is rejected.
    #[error("conflicting edits: `{first_rule}` and `{second_rule}` overlap at bytes {start}..{end}")]
    ConflictingEdits {
        /// End of the overlapping region.
        end: usize,
        /// Rule that produced the earlier edit.
        first_rule: String,
        /// Rule that produced the later edit.
        second_rule: String,
        /// Start of the overlapping region.
        start: usize,
    },

    /// An edit's span falls outside the document or splits a UTF-8 boundary.
    #[error("edit out of bounds: `{rule}` edits up to byte {end}, text is {len} bytes")]
    EditOutOfBounds {
        /// End offset of the offending edit.
        end: usize,
        /// Length of the text being patched.
        len: usize,
        /// Rule that produced the offending edit.
        rule: String,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// The root manifest exists but is not valid JSON.
    #[error("manifest invalid: {}: {reason}", path.display())]
    ManifestInvalid {
        /// Path to the root manifest.
        path: PathBuf,
        /// Raw message from the JSON deserializer.
        reason: String,
    },

    /// No root manifest at the expected location.
    #[error("manifest not found: {}", path.display())]
    ManifestNotFound {
        /// Path where the manifest was expected.
        path: PathBuf,
    },

    /// A source file could not be parsed with its grammar.
    #[error("parse failed: {}: {grammar} grammar, byte {offset}: {reason}", file.display())]
    ParseFailed {
        /// File that failed to parse.
        file: PathBuf,
        /// Grammar the file was parsed with.
        grammar: Grammar,
        /// Byte offset of the first syntax error.
        offset: usize,
        /// Raw message from the underlying parser.
        reason: String,
    },

    /// A rule's visitor failed partway through a document. Its partial
    /// output for that file is discarded.
    #[error("rule `{rule}` failed on {}: {reason}", file.display())]
    RuleFailed {
        /// File the rule was visiting.
        file: PathBuf,
        /// Description of the failure.
        reason: String,
        /// Name of the failing rule.
        rule: String,
    },

    /// Project config (`skylint.toml`) deserialization failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// A selected page is not declared in the manifest's page list.
    #[error("page not in manifest: `{page}`")]
    UnknownPage {
        /// Page identifier that was requested.
        page: String,
    },

    /// No grammar registered for this file extension.
    #[error("no grammar for file: {}", path.display())]
    UnsupportedExtension {
        /// Path with the unrecognized extension.
        path: PathBuf,
    },
}

use std::path::Path;

use crate::error::Error;

/// Project configuration loaded from `skylint.toml`.
/// `pages` narrows the analyzed selection (the `--pages` flag wins when
/// both are given); `skip_rules` removes rules from the registry by name.
pub struct Config {
    /// Pages to analyze when the CLI does not name any.
    pub pages: Vec<String>,
    /// Rule names excluded from the registry.
    pub skip_rules: Vec<String>,
}

/// Raw TOML structure for `skylint.toml`.
#[derive(serde::Deserialize)]
struct SkylintTomlConfig {
    #[serde(default)]
    pages: Vec<String>,
    #[serde(default, rename = "skip-rules")]
    skip_rules: Vec<String>,
}

impl Config {
    /// Load config from `skylint.toml` in the project root.
    /// Returns a default that checks everything if the file doesn't exist.
    /// Returns an error if the file exists but is malformed; it never silently
    /// falls back to defaults when the user wrote a config file.
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` if reading fails (other than not-found),
    /// or `Error::TomlDe` if the TOML is malformed.
    pub fn load(root: &Path) -> Result<Self, Error> {
        let path = root.join("skylint.toml");
        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::check_everything_by_default());
            },
            Err(e) => return Err(Error::Io(e)),
        };

        let raw: SkylintTomlConfig = toml::from_str(&content)?;
        Ok(Self {
            pages: raw.pages,
            skip_rules: raw.skip_rules,
        })
    }

    /// Default config: no page narrowing, full rule registry.
    fn check_everything_by_default() -> Self {
        Self {
            pages: Vec::new(),
            skip_rules: Vec::new(),
        }
    }
}

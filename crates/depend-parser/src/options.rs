use serde::{Deserialize, Serialize};

use crate::version::PhpVersion;

/// Per-unit parser configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParserOptions {
    pub version: PhpVersion,
    /// Reported in error messages and stamped into declared types.
    pub file_name: Option<String>,
}

impl ParserOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_version(mut self, version: PhpVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Name used in diagnostics when no file name was configured.
    pub fn display_name(&self) -> &str {
        self.file_name.as_deref().unwrap_or("<unknown>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ParserOptions::new();
        assert_eq!(options.version, PhpVersion::Php70);
        assert_eq!(options.display_name(), "<unknown>");
    }

    #[test]
    fn test_from_json() {
        let options = ParserOptions::from_json(r#"{"version": "5.4", "fileName": "src/Foo.php"}"#).unwrap();
        assert_eq!(options.version, PhpVersion::Php54);
        assert_eq!(options.file_name.as_deref(), Some("src/Foo.php"));

        let options = ParserOptions::from_json("{}").unwrap();
        assert_eq!(options, ParserOptions::default());
    }

    #[test]
    fn test_builder() {
        let options = ParserOptions::new()
            .with_version(PhpVersion::Php53)
            .with_file_name("a.php");
        assert_eq!(options.version, PhpVersion::Php53);
        assert_eq!(options.display_name(), "a.php");
    }
}

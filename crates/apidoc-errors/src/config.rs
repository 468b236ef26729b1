//! Per-API generation settings.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// One API surface: where its sources live, where its document goes and which
/// error codes each method is expected to document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Identifier of the API surface (used in logs and `--only`).
    pub name: String,
    /// Paths scanned by the generator, passed in order.
    #[serde(default)]
    pub code_paths: Vec<PathBuf>,
    /// Primary source file passed to the generator after the code paths.
    pub entry_point: PathBuf,
    /// Where the document is generated, read back and rewritten.
    pub target: PathBuf,
    /// Expected error codes keyed by method (`"get"`, `"post"`, ...).
    #[serde(default)]
    error_codes: HashMap<String, Vec<u16>>,
}

impl ApiConfig {
    /// Create a config with no expected error codes.
    pub fn new<P>(
        name: impl Into<String>,
        code_paths: impl IntoIterator<Item = P>,
        entry_point: impl Into<PathBuf>,
        target: impl Into<PathBuf>,
    ) -> Self
    where
        P: Into<PathBuf>,
    {
        Self {
            name: name.into(),
            code_paths: code_paths.into_iter().map(Into::into).collect(),
            entry_point: entry_point.into(),
            target: target.into(),
            error_codes: HashMap::new(),
        }
    }

    /// Set the expected error codes for a method, replacing earlier ones.
    pub fn with_error_codes(
        mut self,
        method: impl Into<String>,
        codes: impl IntoIterator<Item = u16>,
    ) -> Self {
        self.set_error_codes(method, codes);
        self
    }

    /// Set the expected error codes for a method, replacing earlier ones.
    pub fn set_error_codes(
        &mut self,
        method: impl Into<String>,
        codes: impl IntoIterator<Item = u16>,
    ) -> &mut Self {
        self.error_codes
            .insert(method.into(), codes.into_iter().collect());
        self
    }

    /// Expected error codes for a method. Unconfigured methods have none.
    pub fn error_codes(&self, method: &str) -> &[u16] {
        self.error_codes
            .get(method)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Output path of the generated document.
    pub fn target(&self) -> &Path {
        &self.target
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unconfigured_method_is_empty() {
        let config = ApiConfig::new("api", ["src"], "src/index.php", "out.json");

        assert!(config.error_codes("get").is_empty());
        assert!(config.error_codes("").is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut config = ApiConfig::new("api", ["src"], "src/index.php", "out.json")
            .with_error_codes("get", [404]);
        config.set_error_codes("get", [400, 401]);

        assert_eq!(config.error_codes("get"), &[400, 401]);
    }

    #[test]
    fn test_method_keys_are_case_sensitive() {
        let config = ApiConfig::new("api", Vec::<PathBuf>::new(), "index.php", "out.json")
            .with_error_codes("get", [404]);

        assert_eq!(config.error_codes("get"), &[404]);
        assert!(config.error_codes("GET").is_empty());
    }

    #[test]
    fn test_code_paths_keep_order() {
        let config = ApiConfig::new("api", ["b", "a", "c"], "index.php", "out.json");

        assert_eq!(
            config.code_paths,
            vec![PathBuf::from("b"), PathBuf::from("a"), PathBuf::from("c")]
        );
        assert_eq!(config.target(), Path::new("out.json"));
    }
}

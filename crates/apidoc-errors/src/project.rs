//! Project file loading.
//!
//! A project file names the document format, optionally the generator to run,
//! and lists the APIs to document:
//!
//! ```toml
//! format = "v3"
//! generator = "vendor/bin/openapi"
//!
//! [[api]]
//! name = "public"
//! code_paths = ["src/Controller"]
//! entry_point = "src/OpenApi.php"
//! target = "public/openapi.json"
//!
//! [api.error_codes]
//! get = [404]
//! post = [400, 422]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;
use crate::config::ApiConfig;
use crate::error::Error;
use crate::format::DocumentFormat;
use crate::generate::Generator;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawProject {
    format: String,
    generator: Option<PathBuf>,
    #[serde(default)]
    generator_args: Vec<String>,
    #[serde(default, rename = "api")]
    apis: Vec<ApiConfig>,
}

/// Parsed project file.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Document format produced by the generator.
    pub format: DocumentFormat,
    /// Generator executable; the format default when unset.
    pub generator: Option<PathBuf>,
    /// Arguments passed to the generator before the code paths.
    pub generator_args: Vec<String>,
    /// APIs in processing order.
    pub apis: Vec<ApiConfig>,
}

impl ProjectConfig {
    /// Read and parse a project file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse a project file from a string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Self::parse(content, Path::new("<string>"))
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        let raw: RawProject = toml::from_str(content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;

        Ok(Self {
            format: raw.format.parse()?,
            generator: raw.generator,
            generator_args: raw.generator_args,
            apis: raw.apis,
        })
    }

    /// Look up an API by name.
    pub fn api(&self, name: &str) -> Result<&ApiConfig> {
        self.apis
            .iter()
            .find(|api| api.name == name)
            .ok_or_else(|| Error::UnknownApi(name.to_string()))
    }

    /// The APIs named in `names`, in project order, or all of them when empty.
    pub fn select(&self, names: &[String]) -> Result<Vec<ApiConfig>> {
        if let Some(missing) = names.iter().find(|name| self.api(name).is_err()) {
            return Err(Error::UnknownApi(missing.clone()));
        }

        Ok(self
            .apis
            .iter()
            .filter(|api| names.is_empty() || names.contains(&api.name))
            .cloned()
            .collect())
    }

    /// Build the generator described by this project.
    pub fn generator(&self) -> Generator {
        let generator = match &self.generator {
            Some(program) => Generator::new(self.format, program),
            None => Generator::for_format(self.format),
        };
        generator.args(&self.generator_args)
    }
}

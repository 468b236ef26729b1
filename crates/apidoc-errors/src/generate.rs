//! Running the external generator and post-processing its output.

use std::ffi::OsString;
use std::path::Path;
use std::process::Command;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};

use crate::Result;
use crate::config::ApiConfig;
use crate::error::Error;
use crate::format::DocumentFormat;

/// Runs the document generator for each API and injects the error responses.
///
/// The generator is called as
/// `<program> [args...] <code_path>... <entry_point> --output <target>`
/// and must exit zero after writing the document to `target`.
///
/// # Example
///
/// ```ignore
/// use apidoc_errors::{ApiConfig, DocumentFormat, Generator};
///
/// let apis = [ApiConfig::new("public", ["src/Controller"], "src/OpenApi.php", "openapi.json")
///     .with_error_codes("get", [404])];
///
/// Generator::for_format(DocumentFormat::OpenApiV3).run(&apis)?;
/// ```
#[derive(Debug, Clone)]
pub struct Generator {
    format: DocumentFormat,
    program: OsString,
    args: Vec<OsString>,
}

impl Generator {
    /// Create a generator running `program`.
    pub fn new(format: DocumentFormat, program: impl Into<OsString>) -> Self {
        Self {
            format,
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Create a generator running the default executable for `format`.
    pub fn for_format(format: DocumentFormat) -> Self {
        Self::new(format, format.default_generator())
    }

    /// Add arguments passed before the code paths (e.g. a script for an interpreter).
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// The document format this generator produces.
    pub fn format(&self) -> DocumentFormat {
        self.format
    }

    /// Generate and augment the document of every API, in order.
    ///
    /// Stops at the first failure; later APIs are left untouched.
    pub fn run(&self, apis: &[ApiConfig]) -> Result<()> {
        for api in apis {
            self.generate(api)?;
        }
        Ok(())
    }

    /// Generate and augment the document of a single API.
    pub fn generate(&self, api: &ApiConfig) -> Result<()> {
        let mut command = self.command(api);
        tracing::debug!(api = %api.name, command = ?command, "running generator");

        let status = command.status().map_err(|source| Error::GeneratorSpawn {
            program: self.program.to_string_lossy().into_owned(),
            source,
        })?;
        if !status.success() {
            return Err(Error::GeneratorFailed {
                api: api.name.clone(),
                status,
            });
        }

        self.process_document(api)
    }

    /// Inject the error responses into the document already at `api.target`.
    pub fn process_document(&self, api: &ApiConfig) -> Result<()> {
        let document = read_document(api.target())?;
        let document = self.format.inject(document, api)?;
        write_document(api.target(), &document)?;

        tracing::info!(
            api = %api.name,
            format = %self.format,
            target = %api.target().display(),
            "documented error responses"
        );
        Ok(())
    }

    fn command(&self, api: &ApiConfig) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .args(&api.code_paths)
            .arg(&api.entry_point)
            .arg("--output")
            .arg(api.target());
        command
    }
}

/// Read and parse a JSON document.
pub fn read_document(path: &Path) -> Result<Value> {
    let content = std::fs::read_to_string(path).map_err(|source| Error::DocumentRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| Error::DocumentParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Write a document pretty-printed with four-space indentation.
///
/// Slashes are left unescaped and the file ends with a newline, so committed
/// documents diff cleanly.
pub fn write_document(path: &Path, document: &Value) -> Result<()> {
    let mut buf = Vec::new();
    let mut serializer =
        Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    document
        .serialize(&mut serializer)
        .map_err(|source| Error::DocumentWrite {
            path: path.to_path_buf(),
            source: source.into(),
        })?;
    buf.push(b'\n');

    std::fs::write(path, buf).map_err(|source| Error::DocumentWrite {
        path: path.to_path_buf(),
        source,
    })
}

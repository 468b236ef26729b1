//! `apidoc-errors` command line.
//!
//! Usage:
//!   apidoc-errors generate [-c apidoc.toml] [--only NAME]...
//!   apidoc-errors inject -i openapi.json [-f v3] [-o out.json] [-c apidoc.toml --api NAME]

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use apidoc_errors::{ApiConfig, DocumentFormat, ProjectConfig, read_document, write_document};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "apidoc-errors",
    version,
    about = "Document error responses in generated API descriptions"
)]
struct Args {
    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Run the generator for each configured API and inject error responses
    Generate {
        /// Project file
        #[arg(short, long, value_name = "FILE", default_value = "apidoc.toml")]
        config: PathBuf,
        /// Only process the named APIs (repeatable)
        #[arg(long, value_name = "NAME")]
        only: Vec<String>,
    },
    /// Inject error responses into an existing document
    Inject {
        /// Document to process
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        /// Where to write the result (defaults to the input)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,
        /// Document format: v2 or v3 (detected from the document when omitted)
        #[arg(short, long)]
        format: Option<String>,
        /// Project file providing the expected error codes
        #[arg(short, long, value_name = "FILE", requires = "api")]
        config: Option<PathBuf>,
        /// API in the project file whose error codes apply
        #[arg(long, value_name = "NAME", requires = "config")]
        api: Option<String>,
    },
}

fn main() {
    init_tracing();

    if let Err(err) = run(Args::parse()) {
        tracing::error!(error = %format!("{err:#}"), "fatal error");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    match args.command {
        Cmd::Generate { config, only } => generate(&config, &only),
        Cmd::Inject {
            input,
            output,
            format,
            config,
            api,
        } => {
            let output = output.unwrap_or_else(|| input.clone());
            inject(&input, &output, format.as_deref(), config.as_deref(), api.as_deref())
        }
    }
}

fn generate(config: &Path, only: &[String]) -> Result<()> {
    let project = ProjectConfig::load(config)?;
    let apis = project.select(only)?;
    if apis.is_empty() {
        tracing::warn!(config = %config.display(), "no APIs configured");
        return Ok(());
    }

    project
        .generator()
        .run(&apis)
        .context("documentation generation failed")
}

fn inject(
    input: &Path,
    output: &Path,
    format: Option<&str>,
    config: Option<&Path>,
    api: Option<&str>,
) -> Result<()> {
    let document = read_document(input)?;

    let format = match format {
        Some(format) => format.parse::<DocumentFormat>()?,
        None => match DocumentFormat::detect(&document) {
            Some(format) => format,
            None => bail!(
                "cannot tell the format of {}; pass --format v2 or v3",
                input.display()
            ),
        },
    };

    let api = match (config, api) {
        (Some(config), Some(name)) => ProjectConfig::load(config)?.api(name)?.clone(),
        _ => ApiConfig::new("document", Vec::<PathBuf>::new(), input, output),
    };

    let document = format
        .inject(document, &api)
        .with_context(|| format!("injecting error responses into {}", input.display()))?;
    write_document(output, &document)?;

    tracing::info!(format = %format, output = %output.display(), "documented error responses");
    Ok(())
}

fn init_tracing() {
    let env_filter = std::env::var("RUST_LOG")
        .ok()
        .unwrap_or_else(|| "info".to_string());

    let subscriber = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(env_filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    if subscriber.try_init().is_err() {
        tracing::warn!("tracing subscriber already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_defaults() {
        let args = Args::try_parse_from(["apidoc-errors", "generate"]).unwrap();
        match args.command {
            Cmd::Generate { config, only } => {
                assert_eq!(config, PathBuf::from("apidoc.toml"));
                assert!(only.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_inject_api_requires_config() {
        let result =
            Args::try_parse_from(["apidoc-errors", "inject", "-i", "a.json", "--api", "public"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_inject_detects_format() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("swagger.json");
        let output = dir.path().join("out.json");
        std::fs::write(
            &input,
            r#"{"swagger": "2.0", "paths": {"/a": {"get": {"x-errors": [403]}}}}"#,
        )
        .unwrap();

        inject(&input, &output, None, None, None).unwrap();

        let out = read_document(&output).unwrap();
        assert_eq!(
            out["paths"]["/a"]["get"]["responses"]["403"]["schema"]["$ref"],
            "#/definitions/Error403"
        );
        assert!(out["definitions"]["Error403"].is_object());
    }

    #[test]
    fn test_inject_uses_project_codes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("openapi.json");
        let project = dir.path().join("apidoc.toml");
        std::fs::write(&input, r#"{"paths": {"/a": {"delete": {}}}}"#).unwrap();
        std::fs::write(
            &project,
            r#"
format = "v3"

[[api]]
name = "public"
entry_point = "index.php"
target = "openapi.json"

[api.error_codes]
delete = [401, 404]
"#,
        )
        .unwrap();

        inject(&input, &input, Some("v3"), Some(&project), Some("public")).unwrap();

        let out = read_document(&input).unwrap();
        let responses = out["paths"]["/a"]["delete"]["responses"].as_object().unwrap();
        assert_eq!(responses.len(), 2);
        assert!(out["components"]["schemas"]["Error401"].is_object());
    }

    #[test]
    fn test_inject_without_format_hint_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("doc.json");
        std::fs::write(&input, r#"{"paths": {}}"#).unwrap();

        assert!(inject(&input, &input, None, None, None).is_err());
    }
}

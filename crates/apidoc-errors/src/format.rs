//! Error response injection for Swagger 2 and OpenAPI 3 documents.
//!
//! Both formats share one traversal. They differ only in where the schema
//! registry lives and how a response points at its schema:
//!
//! | Format     | Response reference                                 | Registry             |
//! |------------|----------------------------------------------------|----------------------|
//! | Swagger 2  | `schema.$ref = #/definitions/ErrorN`               | `definitions`        |
//! | OpenAPI 3  | `content.application/json.schema.$ref = #/components/schemas/ErrorN` | `components.schemas` |

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value, json};

use crate::Result;
use crate::catalog::{description_for, response_schema_for};
use crate::config::ApiConfig;
use crate::error::Error;

/// Operation field listing error codes found in source annotations.
///
/// It is consumed by [`DocumentFormat::inject`] and never left in the output.
pub const DISCOVERED_ERRORS_KEY: &str = "x-errors";

/// Registry name of the schema for an error code.
pub fn schema_name(code: u16) -> String {
    format!("Error{code}")
}

/// Layout of the document being augmented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentFormat {
    /// Swagger 2.0: schemas under `definitions`.
    SwaggerV2,
    /// OpenAPI 3.x: schemas under `components.schemas`.
    OpenApiV3,
}

impl FromStr for DocumentFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v2" | "swagger" | "swagger2" => Ok(DocumentFormat::SwaggerV2),
            "v3" | "openapi" | "openapi3" => Ok(DocumentFormat::OpenApiV3),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentFormat::SwaggerV2 => f.write_str("v2"),
            DocumentFormat::OpenApiV3 => f.write_str("v3"),
        }
    }
}

impl DocumentFormat {
    /// Guess the format from the document's `swagger` / `openapi` version field.
    pub fn detect(document: &Value) -> Option<Self> {
        if document.get("swagger").is_some() {
            Some(DocumentFormat::SwaggerV2)
        } else if document.get("openapi").is_some() {
            Some(DocumentFormat::OpenApiV3)
        } else {
            None
        }
    }

    /// Default generator executable for this format.
    pub fn default_generator(self) -> &'static str {
        match self {
            DocumentFormat::SwaggerV2 => "vendor/bin/swagger",
            DocumentFormat::OpenApiV3 => "vendor/bin/openapi",
        }
    }

    /// JSON reference to the registry entry of an error code.
    pub fn schema_ref(self, code: u16) -> String {
        match self {
            DocumentFormat::SwaggerV2 => format!("#/definitions/{}", schema_name(code)),
            DocumentFormat::OpenApiV3 => format!("#/components/schemas/{}", schema_name(code)),
        }
    }

    /// Response entry documenting an error code.
    pub fn error_response(self, code: u16) -> Value {
        let schema = json!({ "$ref": self.schema_ref(code) });
        match self {
            DocumentFormat::SwaggerV2 => json!({
                "description": description_for(code),
                "schema": schema,
            }),
            DocumentFormat::OpenApiV3 => json!({
                "description": description_for(code),
                "content": {
                    "application/json": {
                        "schema": schema,
                    },
                },
            }),
        }
    }

    /// Add the configured and discovered error responses to every operation.
    ///
    /// Existing responses and registry entries are never overwritten, so
    /// running this twice gives the same document as running it once.
    pub fn inject(self, mut document: Value, config: &ApiConfig) -> Result<Value> {
        let root = document
            .as_object_mut()
            .ok_or_else(|| Error::malformed("document root is not an object"))?;

        let mut used = Vec::new();

        match root.get_mut("paths") {
            None | Some(Value::Null) => {}
            Some(Value::Object(paths)) => {
                for (path, item) in paths.iter_mut() {
                    let item = item.as_object_mut().ok_or_else(|| {
                        Error::malformed(format!("path item '{path}' is not an object"))
                    })?;

                    for (method, operation) in item.iter_mut() {
                        // Path-level `parameters`, `summary` etc. are not operations
                        let Some(operation) = operation.as_object_mut() else {
                            continue;
                        };
                        self.inject_operation(path, method, operation, config, &mut used)?;
                    }
                }
            }
            Some(_) => return Err(Error::malformed("'paths' is not an object")),
        }

        if !used.is_empty() {
            let registry = self.registry_mut(root)?;
            for code in used {
                let name = schema_name(code);
                if !is_present(registry.get(&name)) {
                    registry.insert(name, response_schema_for(code));
                }
            }
        }

        Ok(document)
    }

    fn inject_operation(
        self,
        path: &str,
        method: &str,
        operation: &mut Map<String, Value>,
        config: &ApiConfig,
        used: &mut Vec<u16>,
    ) -> Result<()> {
        let discovered = discovered_codes(
            operation.shift_remove(DISCOVERED_ERRORS_KEY),
            path,
            method,
        )?;

        for &code in config.error_codes(method).iter().chain(&discovered) {
            if !used.contains(&code) {
                used.push(code);
            }

            let status = code.to_string();
            let documented = operation
                .get("responses")
                .and_then(|responses| responses.get(&status));
            if is_present(documented) {
                continue;
            }

            tracing::debug!(path, method, code, "adding error response");
            let responses = object_entry(operation, "responses", || {
                format!("responses of {method} {path}")
            })?;
            responses.insert(status, self.error_response(code));
        }

        Ok(())
    }

    fn registry_mut(self, root: &mut Map<String, Value>) -> Result<&mut Map<String, Value>> {
        match self {
            DocumentFormat::SwaggerV2 => {
                object_entry(root, "definitions", || "'definitions'".to_string())
            }
            DocumentFormat::OpenApiV3 => {
                let components =
                    object_entry(root, "components", || "'components'".to_string())?;
                object_entry(components, "schemas", || "'components.schemas'".to_string())
            }
        }
    }
}

/// Null counts as absent, the same as a missing key.
fn is_present(value: Option<&Value>) -> bool {
    value.is_some_and(|value| !value.is_null())
}

/// Get an object member, creating it when missing or null.
fn object_entry<'a>(
    map: &'a mut Map<String, Value>,
    key: &str,
    describe: impl FnOnce() -> String,
) -> Result<&'a mut Map<String, Value>> {
    let slot = map.entry(key).or_insert(Value::Null);
    if slot.is_null() {
        *slot = Value::Object(Map::new());
    }
    slot.as_object_mut()
        .ok_or_else(|| Error::malformed(format!("{} is not an object", describe())))
}

fn discovered_codes(value: Option<Value>, path: &str, method: &str) -> Result<Vec<u16>> {
    match value {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                parse_code(item).ok_or_else(|| {
                    Error::malformed(format!(
                        "{DISCOVERED_ERRORS_KEY} of {method} {path} contains {item}, expected a status code"
                    ))
                })
            })
            .collect(),
        Some(other) => Err(Error::malformed(format!(
            "{DISCOVERED_ERRORS_KEY} of {method} {path} is {other}, expected an array"
        ))),
    }
}

fn parse_code(value: &Value) -> Option<u16> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

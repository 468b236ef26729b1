//! Descriptions and response schemas for error status codes.

use serde_json::{Value, json};

/// Status code whose schema also documents the invalid parameters.
const VALIDATION_ERROR: u16 = 422;

/// Human readable description for an error status code.
///
/// Codes without a dedicated description get the generic `"Error"`.
pub fn description_for(code: u16) -> &'static str {
    match code {
        400 => "Bad request, failed to parse the request",
        401 => "Authorization required for calling this endpoint",
        402 => "Billing error, payment required",
        403 => "The authenticated user has no permission for this operation",
        404 => "Entity not found",
        422 => "Unprocessable entity, the request contained invalid values. See params for details",
        _ => "Error",
    }
}

/// Schema body registered as `Error<code>` for an error status code.
///
/// Every body has the `errorCode` and `errorMessage` string properties. The
/// 422 body additionally has an object-typed `params` property.
pub fn response_schema_for(code: u16) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "errorCode".to_string(),
        json!({
            "type": "string",
            "description": "The code of the error",
        }),
    );
    properties.insert(
        "errorMessage".to_string(),
        json!({
            "type": "string",
            "description": "Description of the error",
        }),
    );

    if code == VALIDATION_ERROR {
        properties.insert(
            "params".to_string(),
            json!({
                "type": "object",
                "description": "List of the invalid params where the property is the parameter name and the value is the describing the issue",
            }),
        );
    }

    json!({
        "properties": Value::Object(properties),
        "type": "object",
    })
}

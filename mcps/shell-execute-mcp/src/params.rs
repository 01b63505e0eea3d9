//! Parameter types for shell execute MCP tools

use schemars::JsonSchema;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExecuteCommandParams {
    #[schemars(description = "The shell command to execute")]
    pub command: String,

    #[schemars(
        description = "Timeout in milliseconds (optional, defaults to 60000)",
        extend("default" = 60000, "minimum" = 1)
    )]
    #[serde(
        rename = "timeoutMillis",
        alias = "timeout",
        default,
        deserialize_with = "whole_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout_millis: Option<u64>,
}

/// Accept any JSON number with no fractional part, so `1000.0` reads as 1000
fn whole_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(millis) = number.as_u64() {
        return Ok(Some(millis));
    }
    match number.as_f64() {
        Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
        _ => Err(D::Error::custom(format!(
            "timeoutMillis must be a positive whole number, got {}",
            number
        ))),
    }
}

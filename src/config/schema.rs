//! JSON Schema validation for orgdeck settings

use anyhow::{Result, anyhow};
use jsonschema::Validator;
use serde_json::Value;

/// Build a validator from the embedded settings schema
pub fn get_schema() -> Result<Validator> {
    let schema_str = include_str!("../../docs/settings.schema.json");
    let schema: Value = serde_json::from_str(schema_str)
        .map_err(|e| anyhow!("Failed to parse embedded JSON schema: {e}"))?;

    jsonschema::draft7::new(&schema).map_err(|e| anyhow!("Failed to compile JSON schema: {e}"))
}

/// Validate a raw settings document against the schema
pub fn validate_against_schema(settings: &Value) -> Result<()> {
    let schema = get_schema()?;

    let error_messages: Vec<String> = schema
        .iter_errors(settings)
        .map(|e| format!("  - {e}"))
        .collect();

    if !error_messages.is_empty() {
        return Err(anyhow!(
            "Settings validation failed:\n{}",
            error_messages.join("\n")
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn accepts_known_keys() {
        let settings = json!({
            "cliPath": "/usr/local/bin/sf",
            "minCliVersion": "2.10.0",
            "hideDisconnected": false,
            "timeBuckets": {"daysUntil": 14}
        });
        assert!(validate_against_schema(&settings).is_ok());
    }

    #[test]
    fn rejects_unknown_keys_and_bad_types() {
        let err = validate_against_schema(&json!({"cli": "sf"})).unwrap_err();
        assert!(err.to_string().contains("Settings validation failed"));

        assert!(validate_against_schema(&json!({"hideDisconnected": "yes"})).is_err());
        assert!(validate_against_schema(&json!({"minCliVersion": "2.x"})).is_err());
        assert!(validate_against_schema(&json!({"timeBuckets": {"daysUntil": 0}})).is_err());
    }
}

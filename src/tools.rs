pub mod schema;

use serde::{Serialize, Deserialize};
use serde_json::Value;

pub use schema::{ArgSchema, ToolSchema};

/// Function body of a callable-tool declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub parameters: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strict: Option<bool>,
}

/// One entry of the chat-completions `tools` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    #[serde(rename = "type")]
    pub t_type: String,
    pub function: FunctionDeclaration,
}

impl ToolDeclaration {
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            t_type: "function".to_string(),
            function: FunctionDeclaration {
                name: name.into(),
                description: description.into(),
                parameters,
                strict: None,
            },
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.function.strict = Some(strict);
        self
    }
}

impl From<&ToolSchema> for ToolDeclaration {
    fn from(schema: &ToolSchema) -> Self {
        ToolDeclaration::function(schema.name.clone(), schema.description.clone(), schema.parameters())
    }
}

impl From<ToolSchema> for ToolDeclaration {
    fn from(schema: ToolSchema) -> Self {
        ToolDeclaration::from(&schema)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn weather_schema() -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Get weather for a given city".into(),
            args: vec![
                ArgSchema::new("city", "string", "City name, e.g. 'San Francisco'", true),
                ArgSchema::new("unit", "string", "celsius or fahrenheit", false),
            ],
        }
    }

    #[test]
    fn schema_renders_openai_function_declaration() {
        let decl = ToolDeclaration::from(weather_schema());
        let value = serde_json::to_value(&decl).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "function",
                "function": {
                    "name": "get_weather",
                    "description": "Get weather for a given city",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "city": { "type": "string", "description": "City name, e.g. 'San Francisco'" },
                            "unit": { "type": "string", "description": "celsius or fahrenheit" }
                        },
                        "required": ["city"]
                    }
                }
            })
        );
    }

    #[test]
    fn strict_flag_is_only_sent_when_set() {
        let decl = ToolDeclaration::function("noop", "does nothing", json!({"type": "object"}));
        assert!(serde_json::to_value(&decl).unwrap()["function"].get("strict").is_none());
        let decl = decl.strict(true);
        assert_eq!(serde_json::to_value(&decl).unwrap()["function"]["strict"], true);
    }
}

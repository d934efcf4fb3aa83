use serde::Deserialize;
use serde_json::Value;

use crate::error::Result;

/// JSON payload a hook receives on stdin.
///
/// Only the prompt locations are read; every other field is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub prompt: Option<Value>,
}

impl HookInput {
    /// Parse a hook payload. Valid JSON that is not an object carries no prompt.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_value(value)?)
    }

    /// `tool_input.prompt`, then top-level `prompt`; first non-empty string wins.
    pub fn resolve_prompt(&self) -> Option<&str> {
        let nested = self
            .tool_input
            .as_ref()
            .and_then(|v| v.get("prompt"))
            .and_then(Value::as_str);
        let top = self.prompt.as_ref().and_then(Value::as_str);

        [nested, top].into_iter().flatten().find(|p| !p.is_empty())
    }
}

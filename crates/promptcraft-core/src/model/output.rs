use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::metaprompt::MetapromptAnalysis;
use crate::quality::EnhancementLevel;

/// Current UTC time as ISO-8601 with millisecond precision, e.g. `2026-10-16T08:30:00.123Z`.
pub fn timestamp_now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Stdout payload of the optimizer hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizerOutput {
    pub original_prompt: String,
    pub optimized_prompt: String,
    /// Set whenever a prompt was processed, including passthroughs.
    pub optimization_applied: bool,
    pub timestamp: String,
}

/// Stdout payload of the metaprompt hook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MetapromptOutput {
    Success {
        original_prompt: String,
        metaprompt_enhanced: String,
        analysis: MetapromptAnalysis,
        enhancement_level: EnhancementLevel,
        timestamp: String,
    },
    Error {
        error: String,
        timestamp: String,
    },
}

impl MetapromptOutput {
    pub fn error(message: impl Into<String>, timestamp: String) -> Self {
        Self::Error {
            error: message.into(),
            timestamp,
        }
    }

    pub fn timestamp(&self) -> &str {
        match self {
            Self::Success { timestamp, .. } | Self::Error { timestamp, .. } => timestamp,
        }
    }
}

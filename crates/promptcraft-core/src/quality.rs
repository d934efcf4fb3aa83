use serde::{Deserialize, Serialize};

use crate::keywords::{CompiledTable, Indicator};

/// Bucket of the 0–4 quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnhancementLevel {
    Basic,
    Intermediate,
    Advanced,
}

impl EnhancementLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            0 | 1 => Self::Basic,
            2 => Self::Intermediate,
            _ => Self::Advanced,
        }
    }
}

impl std::fmt::Display for EnhancementLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Basic => write!(f, "basic"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
        }
    }
}

/// Quality indicators as emitted by the metaprompt hook.
/// Field names and order are part of the wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    pub score: u8,
    #[serde(rename = "hasPersona")]
    pub has_persona: bool,
    #[serde(rename = "hasContext")]
    pub has_context: bool,
    #[serde(rename = "hasConstraints")]
    pub has_constraints: bool,
    #[serde(rename = "hasOutputFormat")]
    pub has_output_format: bool,
    pub enhancement_level: EnhancementLevel,
}

pub fn assess_quality(prompt: &str, table: &CompiledTable<Indicator>) -> QualityReport {
    let has_persona = table.matches(Indicator::Persona, prompt);
    let has_context = table.matches(Indicator::Context, prompt);
    let has_constraints = table.matches(Indicator::Constraints, prompt);
    let has_output_format = table.matches(Indicator::Format, prompt);

    let score = [has_persona, has_context, has_constraints, has_output_format]
        .iter()
        .filter(|&&hit| hit)
        .count() as u8;

    QualityReport {
        score,
        has_persona,
        has_context,
        has_constraints,
        has_output_format,
        enhancement_level: EnhancementLevel::from_score(score),
    }
}

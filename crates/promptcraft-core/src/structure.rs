//! Structural classifier for the optimizer hook.
//!
//! Detects whether a prompt already carries a persona, a task verb, context
//! and a format request, and buckets it by length.

use serde::{Deserialize, Serialize};

use crate::keywords::{CompiledTable, Indicator};

/// Character-length buckets used by the template assembler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl std::fmt::Display for Complexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Simple => write!(f, "simple"),
            Self::Medium => write!(f, "medium"),
            Self::Complex => write!(f, "complex"),
        }
    }
}

/// Upper bounds (inclusive, in characters) of the `simple` and `medium` buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexityThresholds {
    pub simple_max_chars: usize,
    pub medium_max_chars: usize,
}

impl Default for ComplexityThresholds {
    fn default() -> Self {
        Self {
            simple_max_chars: 50,
            medium_max_chars: 100,
        }
    }
}

impl ComplexityThresholds {
    pub fn bucket(&self, char_count: usize) -> Complexity {
        if char_count > self.medium_max_chars {
            Complexity::Complex
        } else if char_count > self.simple_max_chars {
            Complexity::Medium
        } else {
            Complexity::Simple
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructureAnalysis {
    pub has_persona: bool,
    pub has_task: bool,
    pub has_context: bool,
    pub has_format: bool,
    pub word_count: usize,
    pub complexity: Complexity,
}

pub fn analyze_structure(
    prompt: &str,
    table: &CompiledTable<Indicator>,
    thresholds: &ComplexityThresholds,
) -> StructureAnalysis {
    StructureAnalysis {
        has_persona: table.matches(Indicator::Persona, prompt),
        has_task: table.matches(Indicator::Task, prompt),
        has_context: table.matches(Indicator::Context, prompt),
        has_format: table.matches(Indicator::Format, prompt),
        word_count: word_count(prompt),
        // Length in Unicode scalar values, not UTF-16 code units: characters
        // outside the BMP (most emoji) count once.
        complexity: thresholds.bucket(prompt.chars().count()),
    }
}

/// Number of pieces produced by splitting on runs of whitespace.
///
/// Leading or trailing whitespace yields an empty piece that still counts,
/// and scripts written without spaces count as a single word.
pub fn word_count(text: &str) -> usize {
    let mut runs = 0;
    let mut in_space = false;
    for c in text.chars() {
        if is_word_separator(c) {
            if !in_space {
                runs += 1;
                in_space = true;
            }
        } else {
            in_space = false;
        }
    }
    runs + 1
}

/// The ECMAScript `\s` class: Unicode `White_Space` minus NEL, plus the BOM.
fn is_word_separator(c: char) -> bool {
    match c {
        '\u{feff}' => true,
        '\u{85}' => false,
        c => c.is_whitespace(),
    }
}

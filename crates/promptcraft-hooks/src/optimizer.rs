use std::time::Duration;

use promptcraft_core::config::OptimizerConfig;
use promptcraft_core::error::Result;
use promptcraft_core::keywords::{CompiledTable, Indicator};
use promptcraft_core::model::OptimizerOutput;
use promptcraft_core::optimizer::optimize;
use promptcraft_core::structure::{analyze_structure, ComplexityThresholds};

use crate::Hook;

/// Appends advice for missing persona / context / format to the prompt.
pub struct OptimizerHook {
    structure: CompiledTable<Indicator>,
    thresholds: ComplexityThresholds,
    min_words: usize,
    timeout: Duration,
}

impl OptimizerHook {
    pub const DEBUG_ENV: &'static str = "DEBUG_PROMPT_OPTIMIZER";

    pub fn new(config: &OptimizerConfig, structure: CompiledTable<Indicator>) -> Self {
        Self {
            structure,
            thresholds: config.thresholds(),
            min_words: config.min_words,
            timeout: config.timeout(),
        }
    }

    pub fn output(&self, prompt: &str, timestamp: String) -> OptimizerOutput {
        let analysis = analyze_structure(prompt, &self.structure, &self.thresholds);
        tracing::debug!("prompt-optimizer: analysis {analysis:?}");

        let optimization = optimize(prompt, &analysis, self.min_words);
        tracing::debug!(
            "prompt-optimizer: {} addition(s)",
            optimization.additions.len()
        );

        OptimizerOutput {
            original_prompt: prompt.to_string(),
            optimized_prompt: optimization.optimized,
            optimization_applied: true,
            timestamp,
        }
    }
}

impl Hook for OptimizerHook {
    fn name(&self) -> &'static str {
        "prompt-optimizer"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn respond(&self, prompt: &str, timestamp: String) -> Result<String> {
        Ok(serde_json::to_string(&self.output(prompt, timestamp))?)
    }

    fn failure_response(&self, _message: &str, _timestamp: String) -> Option<String> {
        None
    }
}

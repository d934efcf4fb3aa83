use std::time::Duration;

use promptcraft_core::config::MetapromptConfig;
use promptcraft_core::error::Result;
use promptcraft_core::keywords::{CompiledTable, Indicator};
use promptcraft_core::metaprompt::{generate, MetapromptAnalysis};
use promptcraft_core::model::MetapromptOutput;
use promptcraft_core::task_type::TaskType;

use crate::Hook;

/// Classifies the prompt and emits a full metaprompt alongside the analysis.
pub struct MetapromptHook {
    task_types: CompiledTable<TaskType>,
    quality: CompiledTable<Indicator>,
    timeout: Duration,
}

impl MetapromptHook {
    pub const DEBUG_ENV: &'static str = "DEBUG_METAPROMPT";

    pub fn new(
        config: &MetapromptConfig,
        task_types: CompiledTable<TaskType>,
        quality: CompiledTable<Indicator>,
    ) -> Self {
        Self {
            task_types,
            quality,
            timeout: config.timeout(),
        }
    }

    pub fn output(&self, prompt: &str, timestamp: String) -> MetapromptOutput {
        let analysis = MetapromptAnalysis::of(prompt, &self.task_types, &self.quality);
        tracing::debug!(
            "metaprompt-enhancer: task type {}, quality score {}",
            analysis.task_type,
            analysis.quality.score
        );

        let metaprompt = generate(&analysis);
        let enhancement_level = analysis.quality.enhancement_level;

        MetapromptOutput::Success {
            original_prompt: prompt.to_string(),
            metaprompt_enhanced: metaprompt,
            analysis,
            enhancement_level,
            timestamp,
        }
    }
}

impl Hook for MetapromptHook {
    fn name(&self) -> &'static str {
        "metaprompt-enhancer"
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn respond(&self, prompt: &str, timestamp: String) -> Result<String> {
        Ok(serde_json::to_string(&self.output(prompt, timestamp))?)
    }

    fn failure_response(&self, message: &str, timestamp: String) -> Option<String> {
        serde_json::to_string(&MetapromptOutput::error(message, timestamp)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::harness::process;
    use promptcraft_core::keywords::{default_quality_table, default_task_table};
    use promptcraft_core::metaprompt::Persona;
    use serde_json::Value;

    fn hook() -> MetapromptHook {
        MetapromptHook::new(
            &MetapromptConfig::default(),
            default_task_table().compile().unwrap(),
            default_quality_table().compile().unwrap(),
        )
    }

    fn run(raw: &str) -> Option<Value> {
        process(&hook(), raw.as_bytes(), "2026-10-16T00:00:00.000Z".into())
            .map(|line| serde_json::from_str(&line).unwrap())
    }

    #[test]
    fn test_design_logo() {
        let out = run(r#"{"prompt":"设计一个logo"}"#).unwrap();
        assert_eq!(out["status"], "success");
        assert_eq!(out["original_prompt"], "设计一个logo");
        assert_eq!(out["analysis"]["taskType"], "creative");
        let text = out["metaprompt_enhanced"].as_str().unwrap();
        assert!(text.starts_with(Persona::Creative.text()));
    }

    #[test]
    fn test_analysis_task() {
        let out = run(r#"{"tool_input":{"prompt":"请分析数据"}}"#).unwrap();
        assert_eq!(out["analysis"]["taskType"], "analysis");
        assert_eq!(out["enhancement_level"], "basic");
        assert_eq!(out["analysis"]["quality"]["enhancement_level"], "basic");
    }

    #[test]
    fn test_malformed_json_reports_error() {
        let out = run("{broken").unwrap();
        assert_eq!(out["status"], "error");
        assert!(out["error"].as_str().is_some_and(|e| !e.is_empty()));
        assert_eq!(out["timestamp"], "2026-10-16T00:00:00.000Z");
        assert!(out.get("original_prompt").is_none());
    }

    #[test]
    fn test_missing_prompt_is_silent() {
        assert!(run(r#"{"tool_input":{}}"#).is_none());
        assert!(run(r#"{"prompt":""}"#).is_none());
    }

    #[test]
    fn test_identical_input_identical_output() {
        assert_eq!(
            run(r#"{"prompt":"explain monads"}"#),
            run(r#"{"prompt":"explain monads"}"#)
        );
    }
}

//! Metaprompt generation: persona + task template + fixed advisory blocks.
//!
//! Task templates contain placeholders such as `{type}` and `{topic}`. They
//! are emitted verbatim; the downstream assistant is expected to fill them in
//! from the user's original prompt. No substitution happens here.

use serde::{Deserialize, Serialize};

use crate::keywords::{CompiledTable, Indicator};
use crate::quality::{assess_quality, QualityReport};
use crate::task_type::{classify_task, TaskType};

/// Fixed persona paragraphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Persona {
    Creative,
    Analytical,
    Educator,
    Strategist,
}

impl Persona {
    pub fn text(&self) -> &'static str {
        match self {
            Self::Creative => "你是一位富有创造力的创意总监，擅长突破性思维和创新解决方案。",
            Self::Analytical => "你是一位资深的分析师，精通数据分析和逻辑推理，总能提供深入的见解。",
            Self::Educator => "你是一位经验丰富的教育家，善于将复杂的概念简单化，并循序渐进地解释。",
            Self::Strategist => "你是一位战略专家，擅长从宏观角度分析问题，制定长远规划。",
        }
    }

    /// Persona used for a task type.
    pub fn for_task(task_type: TaskType) -> Self {
        match task_type {
            TaskType::Writing | TaskType::Creative => Self::Creative,
            TaskType::Analysis => Self::Analytical,
            TaskType::ProblemSolving => Self::Strategist,
            TaskType::Explanation | TaskType::General => Self::Educator,
        }
    }
}

pub const FALLBACK_TASK: &str = "请高效地完成用户请求的任务";

/// Task template for a type, with placeholders left in place.
pub fn task_template(task_type: TaskType) -> Option<&'static str> {
    match task_type {
        TaskType::Writing => Some("请创作一篇{type}，主题是{topic}，目标读者是{audience}，要求{requirements}"),
        TaskType::Analysis => Some("请分析{subject}，从{perspectives}角度，重点关注{focus}，输出{format}"),
        TaskType::ProblemSolving => Some("请解决{problem}，考虑{constraints}，提供{solutions}，并评估{evaluation}"),
        TaskType::Creative => Some("请设计{creation}，风格为{style}，包含{elements}，达到{goal}"),
        TaskType::Explanation | TaskType::General => None,
    }
}

const CONTEXT_BLOCK: &str = "【上下文增强】
基于谷歌提示词工程最佳实践，结合行业标准和专业规范。";

const OUTPUT_BLOCK: &str = "【输出要求】
请使用结构化格式输出，包含具体的步骤和说明。";

const DIRECTIVES_BLOCK: &str = "【强化指令】
1. 基于谷歌68页提示词圣经的原则
2. 确保输出清晰、准确、有价值
3. 提供具体可行的建议或解决方案
4. 考虑实际应用场景";

const CLOSING_INSTRUCTION: &str = "现在，请将用户的原始提示词与以上元提示词结合，生成一个优化后的超级提示词。";

/// What the metaprompt hook learned about a prompt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetapromptAnalysis {
    #[serde(rename = "taskType")]
    pub task_type: TaskType,
    pub quality: QualityReport,
}

impl MetapromptAnalysis {
    pub fn of(
        prompt: &str,
        task_table: &CompiledTable<TaskType>,
        quality_table: &CompiledTable<Indicator>,
    ) -> Self {
        Self {
            task_type: classify_task(prompt, task_table),
            quality: assess_quality(prompt, quality_table),
        }
    }
}

/// Assemble the metaprompt. Depends only on the task type; the quality
/// report is carried alongside in the hook output.
pub fn generate(analysis: &MetapromptAnalysis) -> String {
    let persona = Persona::for_task(analysis.task_type).text();
    let task = task_template(analysis.task_type).unwrap_or(FALLBACK_TASK);

    let metaprompt = format!(
        "\n{persona}\n\n【核心任务】\n{task}\n\n{CONTEXT_BLOCK}\n\n{OUTPUT_BLOCK}\n\n{DIRECTIVES_BLOCK}\n\n{CLOSING_INSTRUCTION}"
    );
    metaprompt.trim().to_string()
}

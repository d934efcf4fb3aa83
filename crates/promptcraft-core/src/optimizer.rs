//! Template assembler for the optimizer hook.
//!
//! Appends advice for every structural element a prompt is missing. A prompt
//! that already has everything passes through untouched.

use crate::structure::{Complexity, StructureAnalysis};

pub const PERSONA_TEMPLATE: &str = "你是一个专业的提示词工程师，精通谷歌68页提示词圣经的精髓。你的任务是优化用户的提示词，使其更加精确、有效和富有创造力。";

pub const TASK_TEMPLATE: &str = "请分析以下提示词，并根据四大要素进行优化：
1. Persona（角色）：明确AI应该扮演的角色
2. Task（任务）：清晰定义要完成的任务
3. Context（上下文）：提供充足的背景信息
4. Format（格式）：指定输出格式要求";

pub const CONTEXT_TEMPLATE: &str = "基于谷歌提示词指南的最佳实践：
- 使用自然语言，但保持精确
- 提供具体的例子和约束条件
- 明确目标和受众
- 包含必要的背景信息";

pub const FORMAT_TEMPLATE: &str = "优化后的提示词应该：
- 清晰简洁（建议21个词左右）
- 包含明确的指令
- 提供输出格式指导
- 设置合理的约束条件";

pub const MORE_DETAIL_HINT: &str = "请提供更多具体细节和约束条件以获得更好的结果。";

const SUGGESTIONS_HEADER: &str = "【优化建议】";
const METAPROMPT_HEADER: &str = "【元提示词】";
const CLOSING_INSTRUCTION: &str = "现在请基于以上优化建议重新生成一个更有效的提示词版本。";

/// Default word count below which the context template is added.
pub const DEFAULT_MIN_WORDS: usize = 10;

/// Result of running the assembler on one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Optimization {
    /// Template blocks appended, in order.
    pub additions: Vec<&'static str>,
    pub optimized: String,
}

impl Optimization {
    pub fn is_passthrough(&self) -> bool {
        self.additions.is_empty()
    }
}

/// Decide which templates a prompt is missing, in assembly order.
pub fn select_additions(analysis: &StructureAnalysis, min_words: usize) -> Vec<&'static str> {
    let mut additions = Vec::new();
    if !analysis.has_persona {
        additions.push(PERSONA_TEMPLATE);
    }
    if analysis.word_count < min_words {
        additions.push(CONTEXT_TEMPLATE);
    }
    if !analysis.has_format {
        additions.push(FORMAT_TEMPLATE);
    }
    if analysis.complexity == Complexity::Simple {
        additions.push(MORE_DETAIL_HINT);
    }
    additions
}

pub fn optimize(original: &str, analysis: &StructureAnalysis, min_words: usize) -> Optimization {
    let additions = select_additions(analysis, min_words);
    if additions.is_empty() {
        return Optimization {
            additions,
            optimized: original.to_string(),
        };
    }

    let optimized = format!(
        "{original}\n\n{SUGGESTIONS_HEADER}\n{}\n\n{METAPROMPT_HEADER}\n{TASK_TEMPLATE}\n\n{CLOSING_INSTRUCTION}",
        additions.join("\n"),
    );
    Optimization {
        additions,
        optimized,
    }
}

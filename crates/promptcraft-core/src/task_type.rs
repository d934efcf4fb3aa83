use serde::{Deserialize, Serialize};

use crate::keywords::CompiledTable;

/// Coarse classification of what a prompt asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskType {
    Writing,
    Analysis,
    ProblemSolving,
    Creative,
    Explanation,
    General,
}

impl TaskType {
    pub const ALL: [TaskType; 6] = [
        Self::Writing,
        Self::Analysis,
        Self::ProblemSolving,
        Self::Creative,
        Self::Explanation,
        Self::General,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Writing => "writing",
            Self::Analysis => "analysis",
            Self::ProblemSolving => "problem_solving",
            Self::Creative => "creative",
            Self::Explanation => "explanation",
            Self::General => "general",
        }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "writing" => Ok(Self::Writing),
            "analysis" => Ok(Self::Analysis),
            "problem_solving" => Ok(Self::ProblemSolving),
            "creative" => Ok(Self::Creative),
            "explanation" => Ok(Self::Explanation),
            "general" => Ok(Self::General),
            _ => Err(format!("unknown task type: {s}")),
        }
    }
}

/// Label of the first task pattern that occurs in `prompt`, or `General`.
/// Patterns overlap; table order decides, there is no scoring.
pub fn classify_task(prompt: &str, table: &CompiledTable<TaskType>) -> TaskType {
    table.first_match(prompt).unwrap_or(TaskType::General)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::{default_task_table, KeywordGroup, KeywordTable};

    fn classify(prompt: &str) -> TaskType {
        let table = default_task_table().compile().unwrap();
        classify_task(prompt, &table)
    }

    #[test]
    fn test_design_is_creative() {
        assert_eq!(classify("设计一个logo"), TaskType::Creative);
    }

    #[test]
    fn test_analysis() {
        assert_eq!(classify("请分析数据"), TaskType::Analysis);
        assert_eq!(classify("Evaluate this plan"), TaskType::Analysis);
    }

    #[test]
    fn test_writing_wins_over_later_patterns() {
        // "写" (writing) and "分析" (analysis) both occur; writing comes first.
        assert_eq!(classify("写一篇分析报告"), TaskType::Writing);
        // "create" is a writing keyword even though the intent reads creative.
        assert_eq!(classify("create a creative design"), TaskType::Writing);
    }

    #[test]
    fn test_problem_solving_and_explanation() {
        assert_eq!(classify("How do I solve this bug?"), TaskType::ProblemSolving);
        assert_eq!(classify("解释什么是光合作用"), TaskType::Explanation);
    }

    #[test]
    fn test_general_fallback() {
        assert_eq!(classify("hello"), TaskType::General);
        assert_eq!(classify(""), TaskType::General);
    }

    #[test]
    fn test_custom_order() {
        let table = KeywordTable::new(vec![
            KeywordGroup::new(TaskType::Explanation, &["explain"]),
            KeywordGroup::new(TaskType::Writing, &["write"]),
        ])
        .compile()
        .unwrap();
        assert_eq!(
            classify_task("write and explain", &table),
            TaskType::Explanation
        );
    }

    #[test]
    fn test_task_type_roundtrip_str() {
        for t in TaskType::ALL {
            assert_eq!(t.as_str().parse::<TaskType>().unwrap(), t);
            assert_eq!(
                serde_json::to_string(&t).unwrap(),
                format!("\"{}\"", t.as_str())
            );
        }
        assert!("poetry".parse::<TaskType>().is_err());
    }
}

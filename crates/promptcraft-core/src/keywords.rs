//! Keyword tables shared by every prompt classifier.
//!
//! A table is an ordered list of `(label, keywords)` groups. Keywords are
//! literal strings matched as case-insensitive substrings. The structural
//! classifier, the quality scorer and the task-type classifier all run on
//! this one structure; only the default contents differ.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::task_type::TaskType;

/// A structural element whose presence is tested in a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Indicator {
    Persona,
    Task,
    Context,
    Format,
    Constraints,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persona => write!(f, "persona"),
            Self::Task => write!(f, "task"),
            Self::Context => write!(f, "context"),
            Self::Format => write!(f, "format"),
            Self::Constraints => write!(f, "constraints"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordGroup<L> {
    pub label: L,
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl<L> KeywordGroup<L> {
    pub fn new(label: L, keywords: &[&str]) -> Self {
        Self {
            label,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }
}

/// Ordered keyword groups. Order matters for [`CompiledTable::first_match`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeywordTable<L> {
    pub groups: Vec<KeywordGroup<L>>,
}

impl<L: Copy> KeywordTable<L> {
    pub fn new(groups: Vec<KeywordGroup<L>>) -> Self {
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = L> + '_ {
        self.groups.iter().map(|g| g.label)
    }

    /// Build one case-insensitive alternation per group.
    /// Groups without any non-empty keyword compile to a matcher that never hits.
    pub fn compile(&self) -> Result<CompiledTable<L>> {
        let mut groups = Vec::with_capacity(self.groups.len());
        for group in &self.groups {
            let alternatives: Vec<String> = group
                .keywords
                .iter()
                .filter(|k| !k.is_empty())
                .map(|k| regex::escape(k))
                .collect();

            let matcher = if alternatives.is_empty() {
                None
            } else {
                Some(
                    RegexBuilder::new(&alternatives.join("|"))
                        .case_insensitive(true)
                        .build()?,
                )
            };
            groups.push((group.label, matcher));
        }
        Ok(CompiledTable { groups })
    }
}

/// A [`KeywordTable`] ready for matching.
#[derive(Debug, Clone)]
pub struct CompiledTable<L> {
    groups: Vec<(L, Option<Regex>)>,
}

impl<L: Copy + PartialEq> CompiledTable<L> {
    /// Whether any keyword of the group(s) labelled `label` occurs in `text`.
    /// A label missing from the table never matches.
    pub fn matches(&self, label: L, text: &str) -> bool {
        self.groups
            .iter()
            .filter(|(l, _)| *l == label)
            .any(|(_, re)| re.as_ref().is_some_and(|re| re.is_match(text)))
    }

    /// Label of the first group, in table order, with a keyword in `text`.
    pub fn first_match(&self, text: &str) -> Option<L> {
        self.groups
            .iter()
            .find(|(_, re)| re.as_ref().is_some_and(|re| re.is_match(text)))
            .map(|(label, _)| *label)
    }
}

// ---------------------------------------------------------------------------
// Default tables
// ---------------------------------------------------------------------------

/// Keywords the optimizer hook uses to detect the four structural elements.
pub fn default_structure_table() -> KeywordTable<Indicator> {
    KeywordTable::new(vec![
        KeywordGroup::new(
            Indicator::Persona,
            &["你是", "you are", "act as", "扮演", "作为"],
        ),
        KeywordGroup::new(
            Indicator::Task,
            &["请", "please", "帮助", "help", "生成", "generate", "写", "write"],
        ),
        KeywordGroup::new(
            Indicator::Context,
            &["背景", "context", "关于", "about", "基于", "based on"],
        ),
        KeywordGroup::new(
            Indicator::Format,
            &["格式", "format", "输出", "output", "格式化", "format as"],
        ),
    ])
}

/// Keywords the metaprompt hook uses to score prompt quality.
///
/// Deliberately not identical to [`default_structure_table`]: it tests
/// constraints instead of task verbs and has slightly different synonyms.
pub fn default_quality_table() -> KeywordTable<Indicator> {
    KeywordTable::new(vec![
        KeywordGroup::new(Indicator::Persona, &["你是", "扮演", "you are", "act as"]),
        KeywordGroup::new(
            Indicator::Context,
            &["背景", "关于", "context", "background", "based on"],
        ),
        KeywordGroup::new(
            Indicator::Constraints,
            &["限制", "要求", "必须", "constraint", "require", "must"],
        ),
        KeywordGroup::new(
            Indicator::Format,
            &["格式", "输出", "format", "output", "structure"],
        ),
    ])
}

/// Ordered task-type patterns; the first group that hits wins.
pub fn default_task_table() -> KeywordTable<TaskType> {
    KeywordTable::new(vec![
        KeywordGroup::new(
            TaskType::Writing,
            &["写", "创作", "生成", "编写", "compose", "write", "create", "generate"],
        ),
        KeywordGroup::new(
            TaskType::Analysis,
            &["分析", "解析", "评估", "analyze", "evaluate", "assess"],
        ),
        KeywordGroup::new(
            TaskType::ProblemSolving,
            &["解决", "处理", "solve", "handle", "address"],
        ),
        KeywordGroup::new(
            TaskType::Creative,
            &["设计", "创意", "想象", "design", "imagine", "creative"],
        ),
        KeywordGroup::new(
            TaskType::Explanation,
            &["解释", "说明", "explain", "describe", "clarify"],
        ),
    ])
}

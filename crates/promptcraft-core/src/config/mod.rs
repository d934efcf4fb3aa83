use crate::error::{PromptcraftError, Result};
use crate::keywords::{
    default_quality_table, default_structure_table, default_task_table, CompiledTable, Indicator,
    KeywordTable,
};
use crate::optimizer::DEFAULT_MIN_WORDS;
use crate::structure::ComplexityThresholds;
use crate::task_type::TaskType;
use config::{Config, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptcraftConfig {
    #[serde(default)]
    pub optimizer: OptimizerConfig,
    #[serde(default)]
    pub metaprompt: MetapromptConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Safety timeout for reading stdin.
    #[serde(default = "default_optimizer_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default = "default_simple_max_chars")]
    pub simple_max_chars: usize,
    #[serde(default = "default_medium_max_chars")]
    pub medium_max_chars: usize,
    /// Prompts with fewer words get the context template.
    #[serde(default = "default_min_words")]
    pub min_words: usize,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_optimizer_timeout_ms(),
            simple_max_chars: default_simple_max_chars(),
            medium_max_chars: default_medium_max_chars(),
            min_words: default_min_words(),
        }
    }
}

impl OptimizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn thresholds(&self) -> ComplexityThresholds {
        ComplexityThresholds {
            simple_max_chars: self.simple_max_chars,
            medium_max_chars: self.medium_max_chars,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetapromptConfig {
    #[serde(default = "default_metaprompt_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for MetapromptConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_metaprompt_timeout_ms(),
        }
    }
}

impl MetapromptConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Keyword tables for every classifier. Each replaces its default wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default = "default_structure_table")]
    pub structure: KeywordTable<Indicator>,
    #[serde(default = "default_quality_table")]
    pub quality: KeywordTable<Indicator>,
    #[serde(default = "default_task_table")]
    pub task_types: KeywordTable<TaskType>,
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            structure: default_structure_table(),
            quality: default_quality_table(),
            task_types: default_task_table(),
        }
    }
}

/// Compiled form of [`KeywordsConfig`].
#[derive(Debug, Clone)]
pub struct Classifiers {
    pub structure: CompiledTable<Indicator>,
    pub quality: CompiledTable<Indicator>,
    pub task_types: CompiledTable<TaskType>,
}

impl KeywordsConfig {
    pub fn compile(&self) -> Result<Classifiers> {
        Ok(Classifiers {
            structure: self.structure.compile()?,
            quality: self.quality.compile()?,
            task_types: self.task_types.compile()?,
        })
    }
}

fn default_optimizer_timeout_ms() -> u64 {
    5_000
}
fn default_metaprompt_timeout_ms() -> u64 {
    10_000
}
fn default_simple_max_chars() -> usize {
    50
}
fn default_medium_max_chars() -> usize {
    100
}
fn default_min_words() -> usize {
    DEFAULT_MIN_WORDS
}

impl PromptcraftConfig {
    /// Load configuration with three-layer TOML merge:
    /// 1. ~/.config/promptcraft/config.toml (global)
    /// 2. .promptcraft/config.toml (project)
    /// 3. .promptcraft/config.local.toml (local, gitignored)
    pub fn load(project_dir: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                builder = builder.add_source(File::from(global_path).required(false));
            }
        }

        if let Some(dir) = project_dir {
            let project_config = dir.join(".promptcraft").join("config.toml");
            if project_config.exists() {
                builder = builder.add_source(File::from(project_config).required(false));
            }

            let local_config = dir.join(".promptcraft").join("config.local.toml");
            if local_config.exists() {
                builder = builder.add_source(File::from(local_config).required(false));
            }
        }

        let config = builder
            .build()
            .map_err(|e| PromptcraftError::Config(e.to_string()))?;

        let mut cfg: Self = config
            .try_deserialize()
            .map_err(|e| PromptcraftError::Config(e.to_string()))?;

        cfg.validate();
        Ok(cfg)
    }

    /// Defaults only (no files).
    pub fn default_config() -> Self {
        Self::default()
    }

    /// Render as TOML, the format `load` reads.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| PromptcraftError::Config(e.to_string()))
    }

    /// Fix out-of-range values instead of rejecting the config.
    /// Returns the warnings, which are also logged.
    pub fn validate(&mut self) -> Vec<String> {
        let mut warnings = Vec::new();

        if self.optimizer.timeout_ms == 0 {
            warnings.push(format!(
                "optimizer.timeout_ms = 0, setting to {}",
                default_optimizer_timeout_ms()
            ));
            self.optimizer.timeout_ms = default_optimizer_timeout_ms();
        }
        if self.metaprompt.timeout_ms == 0 {
            warnings.push(format!(
                "metaprompt.timeout_ms = 0, setting to {}",
                default_metaprompt_timeout_ms()
            ));
            self.metaprompt.timeout_ms = default_metaprompt_timeout_ms();
        }

        if self.optimizer.medium_max_chars < self.optimizer.simple_max_chars {
            warnings.push(format!(
                "optimizer.medium_max_chars ({}) < optimizer.simple_max_chars ({}), swapping",
                self.optimizer.medium_max_chars, self.optimizer.simple_max_chars
            ));
            std::mem::swap(
                &mut self.optimizer.medium_max_chars,
                &mut self.optimizer.simple_max_chars,
            );
        }

        let tables: [(&str, bool); 3] = [
            ("keywords.structure", self.keywords.structure.is_empty()),
            ("keywords.quality", self.keywords.quality.is_empty()),
            ("keywords.task_types", self.keywords.task_types.is_empty()),
        ];
        for (name, empty) in tables {
            if empty {
                warnings.push(format!("{name} is empty; no keyword will ever match"));
            }
        }

        if self
            .keywords
            .task_types
            .labels()
            .any(|l| l == TaskType::General)
        {
            warnings.push(
                "keywords.task_types contains a 'general' group; it shadows later groups"
                    .to_string(),
            );
        }

        for w in &warnings {
            tracing::warn!("config: {}", w);
        }

        warnings
    }
}

pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("promptcraft").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keywords::KeywordGroup;

    fn temp_project() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("promptcraft-config-{}", uuid::Uuid::now_v7()));
        std::fs::create_dir_all(dir.join(".promptcraft")).unwrap();
        dir
    }

    #[test]
    fn test_default_config() {
        let config = PromptcraftConfig::default_config();
        assert_eq!(config.optimizer.timeout_ms, 5000);
        assert_eq!(config.metaprompt.timeout_ms, 10000);
        assert_eq!(config.optimizer.thresholds(), ComplexityThresholds::default());
        assert_eq!(config.optimizer.min_words, 10);
        assert_eq!(config.keywords.task_types, default_task_table());
    }

    #[test]
    fn test_load_config_no_files() {
        let config = PromptcraftConfig::load(Some(Path::new("/nonexistent/path"))).unwrap();
        assert_eq!(config.optimizer.timeout(), Duration::from_millis(5000));
        assert_eq!(config.metaprompt.timeout(), Duration::from_millis(10000));
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let config = PromptcraftConfig::default_config();
        let toml_str = config.to_toml().unwrap();
        let parsed: PromptcraftConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.optimizer.timeout_ms, config.optimizer.timeout_ms);
        assert_eq!(parsed.keywords.structure, config.keywords.structure);
        assert_eq!(parsed.keywords.task_types, config.keywords.task_types);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let parsed: PromptcraftConfig = toml::from_str("[optimizer]\nmin_words = 3\n").unwrap();
        assert_eq!(parsed.optimizer.min_words, 3);
        assert_eq!(parsed.optimizer.timeout_ms, 5000);
        assert_eq!(parsed.keywords.quality, default_quality_table());
    }

    #[test]
    fn test_project_and_local_layers() {
        let dir = temp_project();
        std::fs::write(
            dir.join(".promptcraft").join("config.toml"),
            "[optimizer]\ntimeout_ms = 1234\nmin_words = 4\n",
        )
        .unwrap();
        std::fs::write(
            dir.join(".promptcraft").join("config.local.toml"),
            "[optimizer]\nmin_words = 7\n",
        )
        .unwrap();

        let config = PromptcraftConfig::load(Some(&dir)).unwrap();
        assert_eq!(config.optimizer.timeout_ms, 1234);
        assert_eq!(config.optimizer.min_words, 7);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_custom_task_table_from_file() {
        let dir = temp_project();
        std::fs::write(
            dir.join(".promptcraft").join("config.toml"),
            r#"
[[keywords.task_types]]
label = "explanation"
keywords = ["explain"]

[[keywords.task_types]]
label = "writing"
keywords = ["write"]
"#,
        )
        .unwrap();

        let config = PromptcraftConfig::load(Some(&dir)).unwrap();
        let classifiers = config.keywords.compile().unwrap();
        assert_eq!(
            classifiers.task_types.first_match("write then explain"),
            Some(TaskType::Explanation)
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = PromptcraftConfig::default_config();
        config.optimizer.timeout_ms = 0;
        config.metaprompt.timeout_ms = 0;
        config.optimizer.simple_max_chars = 200;
        config.optimizer.medium_max_chars = 20;

        let warnings = config.validate();
        assert_eq!(warnings.len(), 3);
        assert_eq!(config.optimizer.timeout_ms, 5000);
        assert_eq!(config.metaprompt.timeout_ms, 10000);
        assert_eq!(config.optimizer.simple_max_chars, 20);
        assert_eq!(config.optimizer.medium_max_chars, 200);
    }

    #[test]
    fn test_validate_warns_on_empty_and_general() {
        let mut config = PromptcraftConfig::default_config();
        config.keywords.structure = KeywordTable::new(vec![]);
        config.keywords.task_types = KeywordTable::new(vec![KeywordGroup::new(
            TaskType::General,
            &["anything"],
        )]);
        let warnings = config.validate();
        assert!(warnings.iter().any(|w| w.contains("keywords.structure is empty")));
        assert!(warnings.iter().any(|w| w.contains("'general'")));
    }

    #[test]
    fn test_default_config_is_clean() {
        let mut config = PromptcraftConfig::default_config();
        assert!(config.validate().is_empty());
    }
}

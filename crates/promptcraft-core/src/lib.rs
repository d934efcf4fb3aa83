//! Prompt classification and template assembly behind the promptcraft hooks.
//!
//! Two pipelines share one keyword-table engine ([`keywords`]):
//!
//! - **optimizer**: [`structure::analyze_structure`] then [`optimizer::optimize`]
//! - **metaprompt**: [`metaprompt::MetapromptAnalysis::of`] then [`metaprompt::generate`]

pub mod config;
pub mod error;
pub mod keywords;
pub mod metaprompt;
pub mod model;
pub mod optimizer;
pub mod quality;
pub mod structure;
pub mod task_type;

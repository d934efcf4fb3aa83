//! Claude Code prompt hooks.
//!
//! Each hook binary reads one JSON payload from stdin, rewrites the prompt
//! it carries and prints one JSON line to stdout.
//!
//! CRITICAL: hooks always exit 0. A non-zero exit could block Claude Code.

pub mod harness;
pub mod metaprompt;
pub mod optimizer;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use promptcraft_core::config::{Classifiers, KeywordsConfig, PromptcraftConfig};
use promptcraft_core::error::Result;
use tracing::Level;

pub use metaprompt::MetapromptHook;
pub use optimizer::OptimizerHook;

/// One prompt-rewriting hook.
pub trait Hook {
    /// Name used as the prefix of log lines.
    fn name(&self) -> &'static str;

    /// How long to wait for end-of-stream before giving up silently.
    fn timeout(&self) -> Duration;

    /// Serialized stdout line for a resolved, non-empty prompt.
    fn respond(&self, prompt: &str, timestamp: String) -> Result<String>;

    /// Serialized stdout line describing a failure. Hooks whose output
    /// contract has no error shape return `None` and fail silently.
    fn failure_response(&self, message: &str, timestamp: String) -> Option<String>;
}

/// `true` when the hook's debug variable is set to `1`.
pub fn debug_enabled(value: Option<&str>) -> bool {
    value == Some("1")
}

/// Stderr logging; hooks must not write anything but their payload to stdout.
pub fn init_logging(debug_env: &str) {
    let debug = debug_enabled(std::env::var(debug_env).ok().as_deref());
    let level = if debug { Level::DEBUG } else { Level::WARN };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .compact()
        .init();
}

/// Load config for the working directory, falling back to defaults.
pub fn load_config(project_dir: Option<&Path>) -> PromptcraftConfig {
    PromptcraftConfig::load(project_dir).unwrap_or_else(|e| {
        tracing::warn!("failed to load config, using defaults: {e}");
        PromptcraftConfig::default_config()
    })
}

/// Compile the configured keyword tables, falling back to the built-in ones.
pub fn load_classifiers(config: &PromptcraftConfig) -> Result<Classifiers> {
    match config.keywords.compile() {
        Ok(classifiers) => Ok(classifiers),
        Err(e) => {
            tracing::warn!("invalid keyword tables, using defaults: {e}");
            KeywordsConfig::default().compile()
        }
    }
}

/// Shared `main` for the hook binaries.
pub fn main_with<H, F>(debug_env: &str, build: F) -> ExitCode
where
    H: Hook,
    F: FnOnce(&PromptcraftConfig, Classifiers) -> H,
{
    init_logging(debug_env);

    if let Err(e) = run_process(build) {
        tracing::warn!("{e:#}");
    }

    ExitCode::SUCCESS
}

fn run_process<H, F>(build: F) -> anyhow::Result<()>
where
    H: Hook,
    F: FnOnce(&PromptcraftConfig, Classifiers) -> H,
{
    let cwd = std::env::current_dir().ok();
    let config = load_config(cwd.as_deref());
    let classifiers = load_classifiers(&config)?;
    let hook = build(&config, classifiers);

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = rt.block_on(harness::run(&hook, tokio::io::stdin(), &mut out));

    // A stdin read still blocked after a timeout must not hold up exit.
    rt.shutdown_background();
    result
}

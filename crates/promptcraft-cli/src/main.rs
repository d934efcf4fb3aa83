use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;
use promptcraft_core::config::{self, Classifiers, PromptcraftConfig};
use promptcraft_core::metaprompt::{self, MetapromptAnalysis};
use promptcraft_core::model::timestamp_now;
use promptcraft_core::optimizer;
use promptcraft_core::structure::analyze_structure;
use promptcraft_hooks::{load_classifiers, load_config, MetapromptHook, OptimizerHook};
use serde_json::{json, Value};

const HOOK_BINARIES: [&str; 2] = ["prompt-optimizer-hook", "metaprompt-enhancer-hook"];

#[derive(Parser)]
#[command(
    name = "promptcraft",
    about = "promptcraft: keyword-driven prompt hooks for Claude Code",
    version
)]
enum Cli {
    /// Write the default configuration file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
        /// Write config.toml into this directory instead of the global config dir
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Run diagnostic checks on the hook setup
    Doctor,
    /// Run both hooks on a prompt and show what they would send
    Analyze {
        /// Prompt text to analyze
        prompt: String,
        /// Output the hooks' raw JSON payloads
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let cli = Cli::parse();
    let cwd = std::env::current_dir()?;

    match cli {
        Cli::Init { force, dir } => cmd_init(dir.as_deref(), force),
        Cli::Doctor => cmd_doctor(&cwd),
        Cli::Analyze { prompt, json } => {
            let config = load_config(Some(&cwd));
            let classifiers = load_classifiers(&config)?;
            if json {
                if let Some(payload) = analyze_json(&config, classifiers, &prompt)? {
                    println!("{}", serde_json::to_string_pretty(&payload)?);
                }
                Ok(())
            } else if prompt.is_empty() {
                println!("{}", "Empty prompt: both hooks print nothing.".yellow());
                Ok(())
            } else {
                print_analysis(&config, &classifiers, &prompt);
                Ok(())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// init
// ---------------------------------------------------------------------------

/// Hook entries to merge into Claude Code's `settings.json`.
fn hooks_settings_snippet() -> Value {
    json!({
        "hooks": {
            "UserPromptSubmit": [{
                "hooks": HOOK_BINARIES
                    .iter()
                    .map(|bin| json!({ "type": "command", "command": bin }))
                    .collect::<Vec<_>>()
            }]
        }
    })
}

/// Write the default config. Returns the path and whether a file was written.
fn write_default_config(dir: Option<&Path>, force: bool) -> Result<(PathBuf, bool)> {
    let path = match dir {
        Some(dir) => dir.join("config.toml"),
        None => config::global_config_path().context("could not determine the config directory")?,
    };

    if path.exists() && !force {
        return Ok((path, false));
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let body = PromptcraftConfig::default_config().to_toml()?;
    let contents = format!(
        "# promptcraft configuration\n# Project overrides: .promptcraft/config.toml, .promptcraft/config.local.toml\n\n{body}"
    );
    std::fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok((path, true))
}

fn cmd_init(dir: Option<&Path>, force: bool) -> Result<()> {
    let (path, written) = write_default_config(dir, force)?;

    if !written {
        println!(
            "Config already exists at {} (use {} to overwrite).",
            path.display().to_string().cyan(),
            "--force".cyan()
        );
        return Ok(());
    }

    println!("{}", "Wrote default promptcraft config".green());
    println!("  {} {}", "Config:".dimmed(), path.display());
    println!();
    println!("{}", "Register the hooks in ~/.claude/settings.json:".bold());
    println!("{}", serde_json::to_string_pretty(&hooks_settings_snippet())?);
    Ok(())
}

// ---------------------------------------------------------------------------
// doctor
// ---------------------------------------------------------------------------

fn cmd_doctor(cwd: &Path) -> Result<()> {
    println!("{}", "promptcraft doctor".bold());
    println!("{}", "==================".dimmed());
    println!();

    let mut critical_fail = false;

    // 1. Config
    let config = match PromptcraftConfig::load(Some(cwd)) {
        Ok(config) => {
            let source = config::global_config_path()
                .filter(|p| p.exists())
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "defaults (no global config file)".to_string());
            println!("  {} Config         {}", "OK".green(), source.dimmed());
            config
        }
        Err(e) => {
            println!("  {} Config         {}", "FAIL".red(), format!("{e}").red());
            println!(
                "       {} Regenerate with: {}",
                "hint:".dimmed(),
                "promptcraft init --force".cyan()
            );
            critical_fail = true;
            PromptcraftConfig::default_config()
        }
    };

    // 2. Keyword tables
    match config.keywords.compile() {
        Ok(_) => {
            println!(
                "  {} Keywords       {} structure / {} quality / {} task groups",
                "OK".green(),
                config.keywords.structure.groups.len(),
                config.keywords.quality.groups.len(),
                config.keywords.task_types.groups.len(),
            );
        }
        Err(e) => {
            println!("  {} Keywords       {}", "FAIL".red(), format!("{e}").red());
            critical_fail = true;
        }
    }

    // 3. Hook binaries
    for bin in HOOK_BINARIES {
        match which::which(bin) {
            Ok(path) => {
                println!(
                    "  {} {:<14} {}",
                    "OK".green(),
                    bin_label(bin),
                    path.display().to_string().dimmed()
                );
            }
            Err(_) => {
                println!(
                    "  {} {:<14} {}",
                    "FAIL".red(),
                    bin_label(bin),
                    format!("{bin} not found in PATH").red()
                );
                println!(
                    "       {} Install with: {}",
                    "hint:".dimmed(),
                    "cargo install --path crates/promptcraft-hooks".cyan()
                );
                critical_fail = true;
            }
        }
    }

    // 4. Claude Code registration
    let settings = dirs::home_dir().map(|h| h.join(".claude").join("settings.json"));
    let registered = settings
        .as_ref()
        .and_then(|p| std::fs::read_to_string(p).ok())
        .map(|s| HOOK_BINARIES.iter().all(|bin| s.contains(bin)))
        .unwrap_or(false);
    if registered {
        println!("  {} Registration   {}", "OK".green(), "both hooks in settings.json".dimmed());
    } else {
        println!(
            "  {} Registration   {}",
            "WARN".yellow(),
            "hooks not found in ~/.claude/settings.json".yellow()
        );
        println!(
            "       {} Run {} for the snippet",
            "hint:".dimmed(),
            "promptcraft init".cyan()
        );
    }

    println!();
    if critical_fail {
        println!(
            "{}",
            "Some checks failed. Fix the issues above and re-run `promptcraft doctor`.".red()
        );
        std::process::exit(1);
    } else if !registered {
        println!("{}", "All critical checks passed, but some warnings exist.".yellow());
    } else {
        println!("{}", "All checks passed!".green());
    }

    Ok(())
}

fn bin_label(bin: &str) -> &'static str {
    if bin.starts_with("prompt-optimizer") {
        "Optimizer"
    } else {
        "Metaprompt"
    }
}

// ---------------------------------------------------------------------------
// analyze
// ---------------------------------------------------------------------------

/// Both hook payloads for `prompt`, exactly as the hooks would print them.
/// `None` for an empty prompt, which the hooks skip without output.
fn analyze_json(
    config: &PromptcraftConfig,
    classifiers: Classifiers,
    prompt: &str,
) -> Result<Option<Value>> {
    if prompt.is_empty() {
        return Ok(None);
    }

    let optimizer = OptimizerHook::new(&config.optimizer, classifiers.structure);
    let metaprompt = MetapromptHook::new(
        &config.metaprompt,
        classifiers.task_types,
        classifiers.quality,
    );
    let timestamp = timestamp_now();

    Ok(Some(json!({
        "optimizer": serde_json::to_value(optimizer.output(prompt, timestamp.clone()))?,
        "metaprompt": serde_json::to_value(metaprompt.output(prompt, timestamp))?,
    })))
}

fn print_analysis(config: &PromptcraftConfig, classifiers: &Classifiers, prompt: &str) {
    let structure = analyze_structure(prompt, &classifiers.structure, &config.optimizer.thresholds());
    let optimization = optimizer::optimize(prompt, &structure, config.optimizer.min_words);
    let analysis = MetapromptAnalysis::of(prompt, &classifiers.task_types, &classifiers.quality);

    let mark = |hit: bool| if hit { "yes".green().to_string() } else { "no".red().to_string() };

    println!("{}", "Structure".bold());
    println!("  {}    {}", "persona:".dimmed(), mark(structure.has_persona));
    println!("  {}       {}", "task:".dimmed(), mark(structure.has_task));
    println!("  {}    {}", "context:".dimmed(), mark(structure.has_context));
    println!("  {}     {}", "format:".dimmed(), mark(structure.has_format));
    println!("  {}      {}", "words:".dimmed(), structure.word_count);
    println!("  {} {}", "complexity:".dimmed(), structure.complexity.cyan());
    println!();

    println!("{}", "Quality".bold());
    println!("  {}  {}", "task type:".dimmed(), analysis.task_type.cyan());
    println!(
        "  {}      {}/4 ({})",
        "score:".dimmed(),
        analysis.quality.score,
        analysis.quality.enhancement_level.cyan()
    );
    println!();

    if optimization.is_passthrough() {
        println!("{}", "Optimizer: prompt passes through unchanged".green());
    } else {
        println!(
            "{} {}",
            "Optimizer:".bold(),
            format!("{} addition(s)", optimization.additions.len()).yellow()
        );
        println!("{}", optimization.optimized);
    }
    println!();

    println!("{}", "Metaprompt:".bold());
    println!("{}", metaprompt::generate(&analysis));
}

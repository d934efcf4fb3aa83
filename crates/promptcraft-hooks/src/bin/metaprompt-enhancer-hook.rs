use std::process::ExitCode;

use promptcraft_hooks::MetapromptHook;

/// Reads a prompt hook payload from stdin and prints the enhanced metaprompt.
fn main() -> ExitCode {
    promptcraft_hooks::main_with(MetapromptHook::DEBUG_ENV, |config, classifiers| {
        MetapromptHook::new(
            &config.metaprompt,
            classifiers.task_types,
            classifiers.quality,
        )
    })
}

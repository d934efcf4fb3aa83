use std::process::ExitCode;

use promptcraft_hooks::OptimizerHook;

/// Reads a prompt hook payload from stdin and prints the optimized prompt.
fn main() -> ExitCode {
    promptcraft_hooks::main_with(OptimizerHook::DEBUG_ENV, |config, classifiers| {
        OptimizerHook::new(&config.optimizer, classifiers.structure)
    })
}

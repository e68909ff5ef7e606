// src/config/validate.rs

use anyhow::{Result, anyhow};

use crate::config::model::Config;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `delay_ms >= 1` (a zero delay would spin the poll loop)
/// - there is at least one command (the trailing one is the managed run command)
/// - no command or hook has an empty executable
///
/// It does **not** check that the executables exist; spawn failures are
/// handled (and logged) at restart time.
pub fn validate_config(cfg: &Config) -> Result<()> {
    if cfg.delay_ms == 0 {
        return Err(anyhow!("delay_ms must be >= 1 (got 0)"));
    }

    if cfg.commands.is_empty() {
        return Err(anyhow!(
            "config must contain at least one entry in `commands` (the run command)"
        ));
    }

    for (list, name) in [
        (&cfg.commands, "commands"),
        (&cfg.pre_commands, "pre_commands"),
        (&cfg.post_commands, "post_commands"),
    ] {
        for (idx, spec) in list.iter().enumerate() {
            if spec.command.trim().is_empty() {
                return Err(anyhow!("`{}[{}]` has an empty executable", name, idx));
            }
        }
    }

    Ok(())
}

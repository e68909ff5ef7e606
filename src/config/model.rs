// src/config/model.rs

use serde::{Deserialize, Serialize};

/// A single external command: an executable plus its argument list.
///
/// Commands are spawned directly (no shell), so `command` is the executable
/// name or path and `args` are passed through verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandSpec {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>, args: &[&str]) -> Self {
        Self {
            command: command.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// One-line rendering for log output.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.command.clone()
        } else {
            format!("{} {}", self.command, self.args.join(" "))
        }
    }
}

/// Top-level configuration as read from a TOML file.
///
/// Immutable after load: the watch session takes it by value once and never
/// reloads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// File name patterns that qualify for watching, e.g. `["*.go", "*.html"]`.
    ///
    /// `"*"` means all regular files. An empty list is normalised to `["*"]`.
    #[serde(default = "default_watch_file_types")]
    pub watch_file_types: Vec<String>,

    /// Directory subtrees to watch, each polled by its own task.
    ///
    /// An empty list is normalised to `["."]`.
    #[serde(default)]
    pub include_paths: Vec<String>,

    /// Paths excluded from scanning, by exact match (not prefix match).
    ///
    /// An excluded directory is never descended into.
    #[serde(default)]
    pub exclude_paths: Vec<String>,

    /// Poll delay between change-detection cycles, in milliseconds.
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,

    /// The build-and-run command list, in order.
    ///
    /// Every entry but the last runs synchronously as a build step; the last
    /// entry is the managed "run" command, launched non-blocking and tracked
    /// for the next restart.
    #[serde(default)]
    pub commands: Vec<CommandSpec>,

    /// Hooks run synchronously before the build, in order. Best-effort.
    #[serde(default)]
    pub pre_commands: Vec<CommandSpec>,

    /// Hooks run synchronously after the relaunch, in order. Best-effort.
    #[serde(default)]
    pub post_commands: Vec<CommandSpec>,

    /// Collapse multiple Edited records within one poll cycle into a single
    /// restart trigger. On by default.
    #[serde(default = "default_true")]
    pub debounce: bool,

    /// Print the JSON change list for every cycle that saw changes.
    #[serde(default = "default_true")]
    pub notify_on_change: bool,

    /// Log level used when neither `--log-level` nor `REMON_LOG` is set.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Pause after the old process has exited, before the rebuild starts,
    /// in milliseconds. Best-effort guard against the OS still holding the
    /// old binary open.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Where the build is expected to leave its artifact. Removed before
    /// each rebuild and stat'ed after each successful build command.
    #[serde(default = "default_artifact_path")]
    pub artifact_path: String,
}

fn default_watch_file_types() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_delay_ms() -> u64 {
    500
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_settle_delay_ms() -> u64 {
    250
}

fn default_artifact_path() -> String {
    "./bin/app".to_string()
}

impl Default for Config {
    /// The default config written by `remon init`, mirroring the classic
    /// build-then-run pair targeting `./bin/app`.
    fn default() -> Self {
        Self {
            watch_file_types: vec!["*.go".to_string(), "*.html".to_string()],
            include_paths: vec!["./src".to_string(), "./templates".to_string()],
            exclude_paths: vec!["./build".to_string(), "./vendors".to_string()],
            delay_ms: default_delay_ms(),
            commands: vec![
                CommandSpec::new("go", &["build", "-o", "bin/app"]),
                CommandSpec::new("./bin/app", &[]),
            ],
            pre_commands: vec![CommandSpec::new("echo", &["Running pre-build commands..."])],
            post_commands: vec![CommandSpec::new("echo", &["App restarted successfully!"])],
            debounce: true,
            notify_on_change: true,
            log_level: default_log_level(),
            settle_delay_ms: default_settle_delay_ms(),
            artifact_path: default_artifact_path(),
        }
    }
}

impl Config {
    /// Apply the documented invariants for empty lists: no include paths
    /// means "watch the current directory", no file types means "all files".
    pub fn apply_defaults(&mut self) {
        if self.include_paths.is_empty() {
            self.include_paths.push(".".to_string());
        }
        if self.watch_file_types.is_empty() {
            self.watch_file_types.push("*".to_string());
        }
    }

    /// Build commands: every configured command except the trailing run
    /// command. Empty when only a run command is configured.
    pub fn build_commands(&self) -> &[CommandSpec] {
        match self.commands.len() {
            0 => &[],
            n => &self.commands[..n - 1],
        }
    }

    /// The managed run command: the last entry of `commands`.
    pub fn run_command(&self) -> Option<&CommandSpec> {
        self.commands.last()
    }
}

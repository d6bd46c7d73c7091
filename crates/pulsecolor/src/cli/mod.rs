//! CLI subcommands: config inspection, color resolution, contrast, live run.

mod config_cmd;
mod contrast_cmd;
mod resolve;
mod run;

use std::cell::Cell;
use std::path::{Path, PathBuf};

use clap::Subcommand;
use serde::Serialize;

pub(super) use crate::RUNNING;
pub(super) use pulsecolor_lib::color::{format_color, parse_color};
pub(super) use pulsecolor_lib::config::Config;
pub(super) use pulsecolor_lib::error::Result;
pub(super) use pulsecolor_lib::renderer::Renderer;

const PADDING: usize = 2;

/// Compute alignment width for a command's key-value output.
/// Ensures at least PADDING spaces after the longest key in either level,
/// with top-level and indent values aligned to the same column.
pub(super) fn kv_width(top: &[&str], indent: &[&str]) -> usize {
    let top_max = top.iter().map(|k| k.len()).max().unwrap_or(0);
    let indent_max = indent.iter().map(|k| k.len()).max().unwrap_or(0);
    let top_need = if top.is_empty() { 0 } else { top_max + PADDING };
    // Indent keys lose 2 chars of inner width to the "  " prefix
    let indent_need = if indent.is_empty() {
        0
    } else {
        indent_max + PADDING + 2
    };
    top_need.max(indent_need)
}

pub(super) fn format_kv(key: &str, value: impl std::fmt::Display, w: usize) -> String {
    format!("{key:<width$}{value}", width = w)
}

pub(super) fn kv(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("{}", format_kv(key, value, w));
}

pub(super) fn kv_indent(key: &str, value: impl std::fmt::Display, w: usize) {
    println!("  {key:<width$}{value}", width = w - 2);
}

/// Config file the command operates on: `--config`, else the platform path.
pub(super) fn config_path(custom_path: Option<&Path>) -> Option<PathBuf> {
    custom_path.map(Path::to_path_buf).or_else(Config::path)
}

/// Load config from `--config` or the platform path, logging parse warnings.
pub(super) fn load_config(custom_path: Option<&Path>) -> Config {
    let Some(path) = config_path(custom_path) else {
        return Config::default();
    };
    let (config, warnings) = Config::load_from(&path);
    for w in &warnings {
        log::warn!("{w}");
    }
    config
}

/// Renderer that prints colors to stdout as they change.
pub(super) struct ConsoleRenderer {
    stream_ready: bool,
    quiet: bool,
    last: Cell<Option<u32>>,
    updates: Cell<usize>,
}

impl ConsoleRenderer {
    pub(super) fn new(stream_ready: bool, quiet: bool) -> Self {
        Self {
            stream_ready,
            quiet,
            last: Cell::new(None),
            updates: Cell::new(0),
        }
    }

    /// Most recent color received.
    pub(super) fn last(&self) -> Option<u32> {
        self.last.get()
    }

    /// Number of updates received, duplicates included.
    pub(super) fn updates(&self) -> usize {
        self.updates.get()
    }
}

impl Renderer for ConsoleRenderer {
    fn on_update_color(&self, color: u32) {
        self.updates.set(self.updates.get() + 1);
        if !self.quiet && self.last.get() != Some(color) {
            println!("  color -> {}", format_color(color));
        }
        self.last.set(Some(color));
    }

    fn is_valid_stream(&self) -> bool {
        self.stream_ready
    }
}

// ── JSON output structs ──

#[derive(Serialize)]
pub(super) struct ConfigOutput {
    pub config_file: Option<String>,
    pub config_file_exists: bool,
    pub settings: Config,
    pub problems: Vec<String>,
}

#[derive(Serialize)]
pub(super) struct ResolveOutput {
    pub mode: String,
    pub color: Option<String>,
    pub animating: bool,
    pub animation_period_ms: u64,
    pub accent_color: String,
    pub user_color: String,
    pub media_color: String,
}

#[derive(Serialize)]
pub(super) struct ContrastOutput {
    pub input: String,
    pub against_black: String,
    pub result: String,
    pub ratio_black: f64,
    pub ratio_white: f64,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show current configuration, file path, and validation problems
    Config,

    /// Resolve the color the renderer would receive right now
    Resolve {
        /// Colorized now-playing media color
        #[arg(long)]
        media: Option<String>,
        /// Report the renderer as able to take an animated stream
        #[arg(long)]
        stream_ready: bool,
    },

    /// Show how a media color is adjusted for navbar contrast
    Contrast {
        /// Color to adjust (#RRGGBB or a color name)
        color: String,
    },

    /// Stream colors until Ctrl+C, following config file changes
    Run {
        /// Frame interval in milliseconds
        #[arg(long, default_value_t = 50)]
        frame_ms: u64,
        /// Stop after this many seconds (default: run until Ctrl+C)
        #[arg(long)]
        duration: Option<u64>,
        /// Colorized now-playing media color
        #[arg(long)]
        media: Option<String>,
    },
}

/// Warn if `--json` was passed to a command that doesn't support it.
fn warn_json_unsupported(cmd_name: &str) {
    log::warn!("--json is not supported for `{cmd_name}` (ignored)");
}

pub fn run(cmd: Command, json: bool, config: Option<&Path>) -> Result<()> {
    match cmd {
        Command::Config => config_cmd::cmd_config(json, config),
        Command::Resolve {
            media,
            stream_ready,
        } => resolve::cmd_resolve(json, config, media.as_deref(), stream_ready),
        Command::Contrast { color } => contrast_cmd::cmd_contrast(json, &color),
        Command::Run {
            frame_ms,
            duration,
            media,
        } => {
            if json {
                warn_json_unsupported("run");
            }
            run::cmd_run(config, frame_ms, duration, media.as_deref())
        }
    }
}

#[cfg(test)]
mod format_tests {
    use super::*;

    #[test]
    fn kv_width_top_only() {
        let w = kv_width(&["Short:", "Longer key:"], &[]);
        // "Longer key:" = 11 + PADDING = 13
        assert_eq!(w, 13);
    }

    #[test]
    fn kv_width_indent_drives_width() {
        let w = kv_width(&["A:"], &["Very long indent key:"]);
        // "Very long indent key:" = 21 + PADDING + 2 = 25
        assert_eq!(w, 25);
    }

    #[test]
    fn values_align_across_levels() {
        let w = kv_width(&["Top:"], &["Indent:"]);
        let top = format_kv("Top:", "V", w);
        let indent = format!("  {:<width$}{}", "Indent:", "V", width = w - 2);
        assert_eq!(top.find('V'), indent.find('V'));
    }

    #[test]
    fn kv_width_empty_both() {
        assert_eq!(kv_width(&[], &[]), 0);
    }
}

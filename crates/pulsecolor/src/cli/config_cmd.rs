//! `config` subcommand: show current configuration and file path.

use std::path::Path;

use super::{ConfigOutput, Result, format_color, kv, kv_indent, kv_width, parse_color};
use pulsecolor_lib::ColorMode;

pub(super) fn cmd_config(json: bool, custom_path: Option<&Path>) -> Result<()> {
    let config = super::load_config(custom_path);
    let config_path = super::config_path(custom_path);
    let config_exists = config_path.as_ref().is_some_and(|p| p.exists());
    let problems: Vec<String> = match config.validate() {
        Ok(()) => vec![],
        Err(errors) => errors.iter().map(ToString::to_string).collect(),
    };

    if json {
        let output = ConfigOutput {
            config_file: config_path.as_ref().map(|p| p.display().to_string()),
            config_file_exists: config_exists,
            settings: config,
            problems,
        };
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| pulsecolor_lib::PulseColorError::Config(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let w = kv_width(
        &["Config file:"],
        &["color_type:", "color_user:", "lavalamp_speed:", "accent_color:"],
    );

    match &config_path {
        Some(p) if config_exists => kv("Config file:", format_args!("{} (loaded)", p.display()), w),
        Some(p) => kv(
            "Config file:",
            format_args!("{} (not found, using defaults)", p.display()),
            w,
        ),
        None => kv("Config file:", "(no config directory)", w),
    }
    println!();

    println!("Settings:");
    let mode = match config.color_type {
        Some(t) => match ColorMode::try_from_setting(t) {
            Some(m) => format!("{t} ({m})"),
            None => format!("{t} (unknown, using accent)"),
        },
        None => "(unset, accent)".to_string(),
    };
    kv_indent("color_type:", mode, w);
    let color_display = |s: &str| match parse_color(s) {
        Ok(val) => format!("{s} -> {}", format_color(val)),
        Err(_) => format!("{s} (invalid)"),
    };
    let user = match &config.color_user {
        Some(c) => color_display(c),
        None => "(unset, accent)".to_string(),
    };
    kv_indent("color_user:", user, w);
    let speed = match config.lavalamp_speed {
        Some(s) => format!("{s} ms"),
        None => "(unset, 10000 ms)".to_string(),
    };
    kv_indent("lavalamp_speed:", speed, w);
    kv_indent("accent_color:", color_display(&config.accent_color), w);

    if !problems.is_empty() {
        println!();
        println!("Problems:");
        for p in &problems {
            println!("  {p}");
        }
    }
    Ok(())
}

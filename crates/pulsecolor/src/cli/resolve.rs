//! `resolve` subcommand: one-shot color resolution from config.

use std::path::Path;
use std::rc::Rc;
use std::time::Instant;

use super::{
    ConsoleRenderer, Renderer, ResolveOutput, Result, format_color, kv, kv_width, parse_color,
};
use pulsecolor_lib::animator::HueCycle;
use pulsecolor_lib::theme::StaticTheme;
use pulsecolor_lib::{ColorController, ColorMode};

pub(super) fn cmd_resolve(
    json: bool,
    custom_path: Option<&Path>,
    media: Option<&str>,
    stream_ready: bool,
) -> Result<()> {
    let config = super::load_config(custom_path);
    let media = media.map(parse_color).transpose()?;

    let theme = StaticTheme::new(config.accent_or_default());
    let mut controller = ColorController::new(config, theme, HueCycle::default());
    if let Some(color) = media {
        controller.notify_media_color(true, color);
    }

    let console = Rc::new(ConsoleRenderer::new(stream_ready, true));
    let renderer: Rc<dyn Renderer> = console.clone();
    controller.bind_renderer(Some(&renderer));
    let animating = controller.mode() == ColorMode::LavaLamp && stream_ready;
    if animating {
        controller.pump_animation(Instant::now());
    }

    let state = controller.color_state();
    let period_ms = controller.animation_period().as_millis() as u64;
    log::debug!("renderer received {} update(s)", console.updates());

    if json {
        let output = ResolveOutput {
            mode: controller.mode().to_string(),
            color: console.last().map(format_color),
            animating,
            animation_period_ms: period_ms,
            accent_color: format_color(state.accent_color),
            user_color: format_color(state.user_color),
            media_color: format_color(state.media_color),
        };
        let text = serde_json::to_string_pretty(&output)
            .map_err(|e| pulsecolor_lib::PulseColorError::Config(e.to_string()))?;
        println!("{text}");
        return Ok(());
    }

    let w = kv_width(&["Mode:", "Color:", "Accent:", "User:", "Media:"], &[]);
    kv("Mode:", controller.mode(), w);
    match (console.last(), controller.mode()) {
        (Some(c), ColorMode::LavaLamp) => kv(
            "Color:",
            format_args!("{} (animating, {period_ms} ms cycle)", format_color(c)),
            w,
        ),
        (Some(c), _) => kv("Color:", format_color(c), w),
        (None, _) => kv("Color:", "(waiting for a stream-ready renderer)", w),
    }
    kv("Accent:", format_color(state.accent_color), w);
    kv("User:", format_color(state.user_color), w);
    kv("Media:", format_color(state.media_color), w);
    Ok(())
}

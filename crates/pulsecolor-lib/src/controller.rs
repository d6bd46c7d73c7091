//! Color controller: resolves the active pulse color and dispatches it.
//!
//! [`ColorController`] owns the mode and the four candidate colors (accent,
//! user, animated, media). Every input (settings, theme, animator frames,
//! media colors) funnels through it on a single thread, and it pushes the
//! resulting color to the bound [`Renderer`]. In lava lamp mode it drives a
//! [`ColorAnimator`] instead and forwards its frames.

use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::animator::ColorAnimator;
use crate::color::format_color;
use crate::contrast::{self, ContrastAdjuster, WcagContrast};
use crate::events::{AnimationListener, ColorEvent, SettingsObserver, ThemeChangeListener};
use crate::mode::ColorMode;
use crate::renderer::Renderer;
use crate::settings::{LAVA_LAMP_SPEED_DEFAULT, PulseSettings, SettingsProvider};
use crate::theme::ThemeResolver;

/// Snapshot of the candidate colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorState {
    /// Theme accent.
    pub accent_color: u32,
    /// User-chosen color from settings.
    pub user_color: u32,
    /// Last animator frame, `None` while the animator is stopped.
    pub animated_color: Option<u32>,
    /// Contrast-adjusted media color, or the accent when media isn't colorized.
    pub media_color: u32,
}

/// Pulse color state machine.
///
/// Generic over its collaborators so tests can substitute in-memory ones;
/// see [`crate::mock`].
pub struct ColorController<S, T, A, C = WcagContrast> {
    settings: S,
    theme: T,
    animator: A,
    contrast: C,
    renderer: Option<Weak<dyn Renderer>>,
    mode: ColorMode,
    accent_color: u32,
    user_color: u32,
    animated_color: Option<u32>,
    media_color: u32,
    media_colorized: bool,
    animation_period: Duration,
}

impl<S, T, A> ColorController<S, T, A, WcagContrast>
where
    S: SettingsProvider,
    T: ThemeResolver,
    A: ColorAnimator,
{
    /// Create a controller using WCAG contrast adjustment for media colors.
    pub fn new(settings: S, theme: T, animator: A) -> Self {
        Self::with_contrast(settings, theme, animator, WcagContrast)
    }
}

impl<S, T, A, C> ColorController<S, T, A, C>
where
    S: SettingsProvider,
    T: ThemeResolver,
    A: ColorAnimator,
    C: ContrastAdjuster,
{
    /// Create a controller with a custom contrast adjuster.
    ///
    /// The accent is seeded from the theme and everything else from
    /// settings. No renderer is bound yet, so nothing is emitted.
    pub fn with_contrast(settings: S, theme: T, animator: A, contrast: C) -> Self {
        let accent = theme.accent_color();
        let mut controller = Self {
            settings,
            theme,
            animator,
            contrast,
            renderer: None,
            mode: ColorMode::Accent,
            accent_color: accent,
            user_color: accent,
            animated_color: None,
            media_color: accent,
            media_colorized: false,
            animation_period: Duration::from_millis(LAVA_LAMP_SPEED_DEFAULT as u64),
        };
        controller.update_settings();
        controller
    }

    /// Bind a renderer (or unbind with `None`) and refresh immediately.
    ///
    /// Only a weak reference is kept: once the caller drops the renderer,
    /// the controller behaves as if it were unbound.
    pub fn bind_renderer(&mut self, renderer: Option<&Rc<dyn Renderer>>) {
        self.renderer = renderer.map(Rc::downgrade);
        log::debug!(
            "renderer {}",
            if self.renderer.is_some() {
                "bound"
            } else {
                "unbound"
            }
        );
        self.refresh();
    }

    /// Re-read mode, user color and animation period, then refresh.
    pub fn update_settings(&mut self) {
        if self.mode == ColorMode::LavaLamp {
            self.stop_lava_lamp();
        }
        let read = PulseSettings::read(&self.settings, self.theme.accent_color());
        if read.mode != self.mode {
            log::debug!("color mode: {} -> {}", self.mode, read.mode);
        }
        self.mode = read.mode;
        self.user_color = read.user_color;
        self.animation_period = read.animation_period;
        self.animator.set_period(read.animation_period);
        self.refresh();
    }

    /// Push the color for the current mode to the renderer.
    ///
    /// Always re-emits, even if the color did not change. In lava lamp mode
    /// nothing is emitted here; the animator is started (when the renderer
    /// accepts a stream) and its frames are forwarded as they arrive.
    pub fn refresh(&mut self) {
        let Some(renderer) = self.renderer() else {
            return;
        };
        match self.mode {
            ColorMode::Accent => emit(&*renderer, self.accent_color),
            ColorMode::UserChosen => emit(&*renderer, self.user_color),
            ColorMode::LavaLamp => {
                if renderer.is_valid_stream() {
                    self.start_lava_lamp();
                }
            }
            ColorMode::AutoFromMedia => emit(&*renderer, self.media_color),
        }
    }

    /// Forward an animator frame to the renderer verbatim.
    pub fn on_animation_tick(&mut self, color: u32) {
        self.animated_color = Some(color);
        if let Some(renderer) = self.renderer() {
            emit(&*renderer, color);
        }
    }

    /// Look up the accent again; emit it if it changed and accent mode is active.
    ///
    /// In AutoFromMedia with uncolorized media the cached media color follows
    /// the new accent, but nothing is emitted: the renderer only catches up on
    /// the next [`refresh`](Self::refresh).
    pub fn on_theme_changed(&mut self) {
        let current = self.theme.accent_color();
        if current == self.accent_color {
            return;
        }
        log::debug!(
            "accent color: {} -> {}",
            format_color(self.accent_color),
            format_color(current)
        );
        self.accent_color = current;
        if !self.media_colorized {
            self.media_color = current;
        }
        if self.mode == ColorMode::Accent
            && let Some(renderer) = self.renderer()
        {
            emit(&*renderer, current);
        }
    }

    /// Update the media color from now-playing metadata.
    ///
    /// Colorized media is adjusted to contrast with both a black and a white
    /// navbar; otherwise the accent is used.
    pub fn notify_media_color(&mut self, colorized: bool, color: u32) {
        self.media_colorized = colorized;
        self.media_color = if colorized {
            contrast::media_color(&self.contrast, color)
        } else {
            self.accent_color
        };
        log::debug!(
            "media color: {} (colorized: {colorized})",
            format_color(self.media_color)
        );
        if self.mode == ColorMode::AutoFromMedia
            && let Some(renderer) = self.renderer()
        {
            emit(&*renderer, self.media_color);
        }
    }

    /// Pull one frame from the animator and forward it. Returns the frame.
    pub fn pump_animation(&mut self, now: Instant) -> Option<u32> {
        let color = self.animator.tick(now)?;
        self.on_animation_tick(color);
        Some(color)
    }

    /// Dispatch a queued input event.
    pub fn handle_event(&mut self, event: ColorEvent) {
        match event {
            ColorEvent::SettingsChanged => self.update_settings(),
            ColorEvent::ThemeChanged => self.on_theme_changed(),
            ColorEvent::AnimationTick(color) => self.on_animation_tick(color),
            ColorEvent::MediaColor { colorized, color } => {
                self.notify_media_color(colorized, color)
            }
        }
    }

    /// The color a refresh would emit right now.
    ///
    /// For lava lamp mode this is the last animator frame, `None` before the first.
    pub fn effective_color(&self) -> Option<u32> {
        match self.mode {
            ColorMode::Accent => Some(self.accent_color),
            ColorMode::UserChosen => Some(self.user_color),
            ColorMode::LavaLamp => self.animated_color,
            ColorMode::AutoFromMedia => Some(self.media_color),
        }
    }

    pub fn mode(&self) -> ColorMode {
        self.mode
    }

    pub fn color_state(&self) -> ColorState {
        ColorState {
            accent_color: self.accent_color,
            user_color: self.user_color,
            animated_color: self.animated_color,
            media_color: self.media_color,
        }
    }

    pub fn animation_period(&self) -> Duration {
        self.animation_period
    }

    /// Whether a live renderer is bound.
    pub fn has_renderer(&self) -> bool {
        self.renderer().is_some()
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    pub fn theme(&self) -> &T {
        &self.theme
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    fn renderer(&self) -> Option<Rc<dyn Renderer>> {
        self.renderer.as_ref().and_then(Weak::upgrade)
    }

    fn start_lava_lamp(&mut self) {
        if self.mode == ColorMode::LavaLamp {
            self.animator.start();
        }
    }

    fn stop_lava_lamp(&mut self) {
        self.animator.stop();
        self.animated_color = None;
    }
}

fn emit(renderer: &dyn Renderer, color: u32) {
    log::trace!("emit {}", format_color(color));
    renderer.on_update_color(color);
}

impl<S, T, A, C> AnimationListener for ColorController<S, T, A, C>
where
    S: SettingsProvider,
    T: ThemeResolver,
    A: ColorAnimator,
    C: ContrastAdjuster,
{
    fn on_color_changed(&mut self, color: u32) {
        self.on_animation_tick(color);
    }
}

impl<S, T, A, C> ThemeChangeListener for ColorController<S, T, A, C>
where
    S: SettingsProvider,
    T: ThemeResolver,
    A: ColorAnimator,
    C: ContrastAdjuster,
{
    fn on_theme_changed(&mut self) {
        Self::on_theme_changed(self);
    }
}

impl<S, T, A, C> SettingsObserver for ColorController<S, T, A, C>
where
    S: SettingsProvider,
    T: ThemeResolver,
    A: ColorAnimator,
    C: ContrastAdjuster,
{
    fn on_settings_changed(&mut self) {
        self.update_settings();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, WHITE};
    use crate::contrast::{MEDIA_MIN_CONTRAST, contrast_ratio};
    use crate::mock::{MockAnimator, RecordingRenderer};
    use crate::settings::{KEY_COLOR_TYPE, KEY_COLOR_USER, KEY_LAVALAMP_SPEED, MemorySettings};
    use crate::theme::StaticTheme;

    const ACCENT: u32 = 0xFFAA_BBCC;

    type TestController = ColorController<MemorySettings, StaticTheme, MockAnimator>;

    fn make_controller(mode: ColorMode) -> TestController {
        let settings = MemorySettings::new();
        settings.put_int(KEY_COLOR_TYPE, mode.to_setting());
        ColorController::new(settings, StaticTheme::new(ACCENT), MockAnimator::new())
    }

    fn bind(ctl: &mut TestController, ready: bool) -> Rc<RecordingRenderer> {
        let rec = Rc::new(RecordingRenderer::new(ready));
        let renderer: Rc<dyn Renderer> = rec.clone();
        ctl.bind_renderer(Some(&renderer));
        rec
    }

    fn switch_mode(ctl: &mut TestController, mode: ColorMode) {
        ctl.settings().put_int(KEY_COLOR_TYPE, mode.to_setting());
        ctl.on_settings_changed();
    }

    // ── construction ──

    #[test]
    fn defaults_without_settings() {
        let ctl = ColorController::new(
            MemorySettings::new(),
            StaticTheme::new(ACCENT),
            MockAnimator::new(),
        );
        assert_eq!(ctl.mode(), ColorMode::Accent);
        let state = ctl.color_state();
        assert_eq!(state.accent_color, ACCENT);
        assert_eq!(state.user_color, ACCENT);
        assert_eq!(state.media_color, ACCENT);
        assert_eq!(state.animated_color, None);
        assert_eq!(ctl.animation_period(), Duration::from_millis(10_000));
        assert_eq!(ctl.animator().period, Some(Duration::from_millis(10_000)));
    }

    #[test]
    fn construction_without_renderer_emits_nothing() {
        let ctl = make_controller(ColorMode::LavaLamp);
        assert!(!ctl.has_renderer());
        assert_eq!(ctl.animator().start_calls, 0);
    }

    // ── refresh per mode ──

    #[test]
    fn refresh_accent_emits_accent() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        assert_eq!(*rec.colors.borrow(), vec![ACCENT]);
    }

    #[test]
    fn refresh_user_emits_user_color() {
        let settings = MemorySettings::new();
        settings.put_int(KEY_COLOR_TYPE, ColorMode::USER);
        settings.put_color(KEY_COLOR_USER, 0xFFFF_0000);
        let mut ctl =
            ColorController::new(settings, StaticTheme::new(ACCENT), MockAnimator::new());
        let rec = bind(&mut ctl, true);
        assert_eq!(*rec.colors.borrow(), vec![0xFFFF_0000]);
    }

    #[test]
    fn refresh_lava_lamp_starts_animator_without_emitting() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let rec = bind(&mut ctl, true);
        assert_eq!(rec.count(), 0);
        assert_eq!(ctl.animator().start_calls, 1);
        assert!(ctl.animator().is_running());
    }

    #[test]
    fn refresh_lava_lamp_waits_for_stream() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let rec = bind(&mut ctl, false);
        assert_eq!(rec.count(), 0);
        assert_eq!(ctl.animator().start_calls, 0);
    }

    #[test]
    fn refresh_auto_emits_media_color() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        let rec = bind(&mut ctl, true);
        assert_eq!(rec.last(), Some(ACCENT));
        ctl.notify_media_color(true, 0xFF00_00FF);
        rec.clear();
        ctl.refresh();
        assert_eq!(rec.last(), Some(ctl.color_state().media_color));
    }

    #[test]
    fn refresh_always_re_emits() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        ctl.refresh();
        ctl.refresh();
        assert_eq!(*rec.colors.borrow(), vec![ACCENT, ACCENT, ACCENT]);
    }

    // ── settings ──

    #[test]
    fn leaving_lava_lamp_stops_animator() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let _rec = bind(&mut ctl, true);
        switch_mode(&mut ctl, ColorMode::UserChosen);
        assert_eq!(ctl.animator().stop_calls, 1);
        assert!(!ctl.animator().is_running());
    }

    #[test]
    fn leaving_lava_lamp_stops_even_if_never_started() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        assert_eq!(ctl.animator().start_calls, 0);
        switch_mode(&mut ctl, ColorMode::Accent);
        assert_eq!(ctl.animator().stop_calls, 1);
    }

    #[test]
    fn rereading_lava_lamp_restarts_animator() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let _rec = bind(&mut ctl, true);
        ctl.on_settings_changed();
        assert_eq!(ctl.animator().stop_calls, 1);
        assert_eq!(ctl.animator().start_calls, 2);
        assert!(ctl.animator().is_running());
    }

    #[test]
    fn other_modes_never_touch_animator() {
        let mut ctl = make_controller(ColorMode::Accent);
        let _rec = bind(&mut ctl, true);
        switch_mode(&mut ctl, ColorMode::UserChosen);
        switch_mode(&mut ctl, ColorMode::AutoFromMedia);
        assert_eq!(ctl.animator().start_calls, 0);
        assert_eq!(ctl.animator().stop_calls, 0);
    }

    #[test]
    fn settings_change_updates_period() {
        let mut ctl = make_controller(ColorMode::Accent);
        ctl.settings().put_int(KEY_LAVALAMP_SPEED, 3000);
        ctl.on_settings_changed();
        assert_eq!(ctl.animation_period(), Duration::from_millis(3000));
        assert_eq!(ctl.animator().period, Some(Duration::from_millis(3000)));
    }

    #[test]
    fn missing_user_color_uses_current_theme_accent() {
        let mut ctl = make_controller(ColorMode::UserChosen);
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_settings_changed();
        assert_eq!(ctl.color_state().user_color, 0xFF11_2233);
    }

    #[test]
    fn settings_change_always_refreshes() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        ctl.on_settings_changed();
        assert_eq!(rec.count(), 2);
    }

    // ── animation ticks ──

    #[test]
    fn ticks_are_forwarded_verbatim() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let rec = bind(&mut ctl, true);
        ctl.animator_mut().queue(&[0xFF01_0203, 0xFF04_0506]);
        let now = Instant::now();
        assert_eq!(ctl.pump_animation(now), Some(0xFF01_0203));
        assert_eq!(ctl.pump_animation(now), Some(0xFF04_0506));
        assert_eq!(ctl.pump_animation(now), None);
        assert_eq!(*rec.colors.borrow(), vec![0xFF01_0203, 0xFF04_0506]);
        assert_eq!(ctl.effective_color(), Some(0xFF04_0506));
    }

    #[test]
    fn tick_without_renderer_is_dropped() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        ctl.on_animation_tick(0xFF12_3456);
        assert_eq!(ctl.color_state().animated_color, Some(0xFF12_3456));
    }

    #[test]
    fn stopping_clears_animated_color() {
        let mut ctl = make_controller(ColorMode::LavaLamp);
        let _rec = bind(&mut ctl, true);
        ctl.on_color_changed(0xFF12_3456);
        switch_mode(&mut ctl, ColorMode::Accent);
        assert_eq!(ctl.color_state().animated_color, None);
    }

    // ── theme ──

    #[test]
    fn theme_change_emits_in_accent_mode() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        ctl.theme().set_accent(0xFF11_2233);
        ThemeChangeListener::on_theme_changed(&mut ctl);
        assert_eq!(*rec.colors.borrow(), vec![ACCENT, 0xFF11_2233]);
    }

    #[test]
    fn unchanged_theme_does_not_emit() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        ctl.on_theme_changed();
        assert_eq!(rec.count(), 1);
    }

    #[test]
    fn theme_change_in_other_mode_updates_cache_only() {
        let mut ctl = make_controller(ColorMode::UserChosen);
        let rec = bind(&mut ctl, true);
        rec.clear();
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_theme_changed();
        assert_eq!(rec.count(), 0);
        assert_eq!(ctl.color_state().accent_color, 0xFF11_2233);
    }

    #[test]
    fn theme_change_follows_into_uncolorized_media() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_theme_changed();
        assert_eq!(ctl.color_state().media_color, 0xFF11_2233);
    }

    #[test]
    fn uncolorized_media_theme_change_waits_for_refresh() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        let rec = bind(&mut ctl, true);
        rec.clear();
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_theme_changed();
        assert_eq!(rec.count(), 0);
        ctl.refresh();
        assert_eq!(*rec.colors.borrow(), vec![0xFF11_2233]);
    }

    #[test]
    fn theme_change_keeps_colorized_media() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        ctl.notify_media_color(true, 0xFF00_00FF);
        let media = ctl.color_state().media_color;
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_theme_changed();
        assert_eq!(ctl.color_state().media_color, media);
    }

    // ── media ──

    #[test]
    fn colorized_media_meets_contrast() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        for &c in &[0xFF00_0000u32, 0xFFFF_FFFF, 0xFFFF_FF00, 0xFF10_0008] {
            ctl.notify_media_color(true, c);
            let media = ctl.color_state().media_color;
            assert!(contrast_ratio(media, BLACK) >= MEDIA_MIN_CONTRAST);
            assert!(contrast_ratio(media, WHITE) >= MEDIA_MIN_CONTRAST);
        }
    }

    #[test]
    fn uncolorized_media_falls_back_to_accent() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        ctl.notify_media_color(true, 0xFF00_00FF);
        ctl.notify_media_color(false, 0xFF00_00FF);
        assert_eq!(ctl.color_state().media_color, ACCENT);
    }

    #[test]
    fn media_update_emits_only_in_auto_mode() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        rec.clear();
        ctl.notify_media_color(true, 0xFF00_00FF);
        assert_eq!(rec.count(), 0);

        switch_mode(&mut ctl, ColorMode::AutoFromMedia);
        rec.clear();
        ctl.notify_media_color(true, 0xFF00_00FF);
        assert_eq!(rec.last(), Some(0xFF00_00FF));
    }

    #[test]
    fn custom_contrast_adjuster_is_used() {
        struct Invert;
        impl ContrastAdjuster for Invert {
            fn adjust_for_contrast(&self, color: u32, _bg: u32, _min: f64) -> u32 {
                color ^ 0x00FF_FFFF
            }
        }
        let settings = MemorySettings::new();
        settings.put_int(KEY_COLOR_TYPE, ColorMode::AUTO);
        let mut ctl = ColorController::with_contrast(
            settings,
            StaticTheme::new(ACCENT),
            MockAnimator::new(),
            Invert,
        );
        ctl.notify_media_color(true, 0xFF12_3456);
        // Two passes cancel out.
        assert_eq!(ctl.color_state().media_color, 0xFF12_3456);
    }

    // ── binding ──

    #[test]
    fn unbinding_suppresses_emission() {
        let mut ctl = make_controller(ColorMode::Accent);
        let rec = bind(&mut ctl, true);
        ctl.bind_renderer(None);
        rec.clear();
        ctl.refresh();
        ctl.theme().set_accent(0xFF11_2233);
        ctl.on_theme_changed();
        ctl.on_animation_tick(0xFF00_0001);
        assert_eq!(rec.count(), 0);

        let renderer: Rc<dyn Renderer> = rec.clone();
        ctl.bind_renderer(Some(&renderer));
        assert_eq!(rec.last(), Some(0xFF11_2233));
    }

    #[test]
    fn dropped_renderer_behaves_as_unbound() {
        let mut ctl = make_controller(ColorMode::Accent);
        {
            let rec = Rc::new(RecordingRenderer::new(true));
            let renderer: Rc<dyn Renderer> = rec;
            ctl.bind_renderer(Some(&renderer));
            assert!(ctl.has_renderer());
        }
        assert!(!ctl.has_renderer());
        ctl.refresh();
    }

    // ── events ──

    #[test]
    fn handle_event_dispatches() {
        let mut ctl = make_controller(ColorMode::AutoFromMedia);
        let rec = bind(&mut ctl, true);
        rec.clear();
        ctl.handle_event(ColorEvent::MediaColor {
            colorized: false,
            color: 0,
        });
        ctl.handle_event(ColorEvent::AnimationTick(0xFF01_0101));
        ctl.settings().put_int(KEY_COLOR_TYPE, ColorMode::ACCENT);
        ctl.handle_event(ColorEvent::SettingsChanged);
        ctl.theme().set_accent(0xFF00_0002);
        ctl.handle_event(ColorEvent::ThemeChanged);
        assert_eq!(
            *rec.colors.borrow(),
            vec![ACCENT, 0xFF01_0101, ACCENT, 0xFF00_0002]
        );
    }

    #[test]
    fn effective_color_per_mode() {
        let mut ctl = make_controller(ColorMode::Accent);
        assert_eq!(ctl.effective_color(), Some(ACCENT));
        switch_mode(&mut ctl, ColorMode::LavaLamp);
        assert_eq!(ctl.effective_color(), None);
    }
}

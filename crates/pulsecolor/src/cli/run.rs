//! `run` subcommand: stream colors to the console, following config changes.
//!
//! A `notify` watcher on the config file's directory reloads the config on
//! every change and sends it over a channel. The main thread owns the
//! controller and applies everything (config reloads, animator frames) in order.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::atomic::Ordering;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::{Duration, Instant};

use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher, recommended_watcher};

use super::{Config, ConsoleRenderer, RUNNING, Renderer, Result, format_color, parse_color};
use pulsecolor_lib::ColorController;
use pulsecolor_lib::animator::HueCycle;
use pulsecolor_lib::events::ColorEvent;
use pulsecolor_lib::settings::SettingsProvider;
use pulsecolor_lib::theme::{StaticTheme, ThemeResolver};

/// Background → main thread messages.
enum Msg {
    ConfigReloaded(Config),
}

/// Config that can be swapped in place while the controller holds it.
struct LiveConfig(RefCell<Config>);

impl SettingsProvider for LiveConfig {
    fn get_int(&self, key: &str, default: i32) -> i32 {
        self.0.borrow().get_int(key, default)
    }
}

/// Whether a watcher event touches the config file itself.
///
/// Saves land as a tmp-file write followed by a rename onto the config, so
/// the directory is watched and events are matched by file name.
fn is_config_event(event: &notify::Event, config_path: &Path) -> bool {
    let relevant = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    relevant
        && event
            .paths
            .iter()
            .any(|p| p.file_name().is_some() && p.file_name() == config_path.file_name())
}

/// Watch the directory holding `path` and send a reloaded config on each change.
///
/// The returned watcher stops delivering events when dropped.
fn watch_config(path: PathBuf, tx: Sender<Msg>) -> notify::Result<RecommendedWatcher> {
    let watch_dir = path
        .parent()
        .filter(|d| !d.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let mut watcher = recommended_watcher(move |res: notify::Result<notify::Event>| match res {
        Ok(event) if is_config_event(&event, &path) => {
            let (config, warnings) = Config::load_from(&path);
            for w in &warnings {
                log::warn!("{w}");
            }
            // The receiver is gone once the run loop has exited.
            let _ = tx.send(Msg::ConfigReloaded(config));
        }
        Ok(_) => {}
        Err(e) => log::warn!("config watcher error: {e}"),
    })?;
    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

pub(super) fn cmd_run(
    custom_path: Option<&Path>,
    frame_ms: u64,
    duration: Option<u64>,
    media: Option<&str>,
) -> Result<()> {
    let media = media.map(parse_color).transpose()?;
    let config = super::load_config(custom_path);
    let path = super::config_path(custom_path);

    let theme = Rc::new(StaticTheme::new(config.accent_or_default()));
    let settings = Rc::new(LiveConfig(RefCell::new(config)));
    let mut controller =
        ColorController::new(Rc::clone(&settings), Rc::clone(&theme), HueCycle::default());

    let (tx, rx): (Sender<Msg>, Receiver<Msg>) = mpsc::channel();
    let watcher = match path {
        Some(ref p) => match watch_config(p.clone(), tx) {
            Ok(w) => {
                println!("[config] watching {}", p.display());
                Some(w)
            }
            Err(e) => {
                log::warn!(
                    "cannot watch {}: {e}; config changes will not be picked up",
                    p.display()
                );
                None
            }
        },
        None => {
            log::warn!("no config directory: config changes will not be picked up");
            None
        }
    };

    println!("[mode]   {}", controller.mode());
    let console = Rc::new(ConsoleRenderer::new(true, false));
    let renderer: Rc<dyn Renderer> = console.clone();
    controller.bind_renderer(Some(&renderer));
    if let Some(color) = media {
        controller.handle_event(ColorEvent::MediaColor {
            colorized: true,
            color,
        });
    }

    let frame = Duration::from_millis(frame_ms.max(1));
    let deadline = duration.map(|s| Instant::now() + Duration::from_secs(s));

    while RUNNING.load(Ordering::SeqCst) {
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break;
        }

        while let Ok(Msg::ConfigReloaded(new_config)) = rx.try_recv() {
            let accent = new_config.accent_or_default();
            *settings.0.borrow_mut() = new_config;
            if accent != theme.accent_color() {
                theme.set_accent(accent);
                controller.handle_event(ColorEvent::ThemeChanged);
            }
            let previous = controller.mode();
            controller.handle_event(ColorEvent::SettingsChanged);
            if controller.mode() != previous {
                println!("[mode]   {}", controller.mode());
            }
        }

        controller.pump_animation(Instant::now());
        std::thread::sleep(frame);
    }

    // Unbind before tearing down the sources feeding the controller.
    controller.bind_renderer(None);
    RUNNING.store(false, Ordering::SeqCst);
    drop(watcher);
    drop(rx);
    match console.last() {
        Some(c) => println!("[done]   last color {}", format_color(c)),
        None => println!("[done]   no color emitted"),
    }
    Ok(())
}

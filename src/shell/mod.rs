//! Application shell: the blocking input loop that owns the registry and
//! translates key codes into registry notifications.
//!
//! The core engine never decides key-binding policy; this collaborator holds
//! the small default table (Tab / Shift-Tab / q) and the once-per-iteration
//! batched flush.

use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind};
use serde_json::json;

use crate::cursor;
use crate::error::Result;
use crate::geometry::Size;
use crate::logging::{LogLevel, Logger, event_with_fields, json_kv};
use crate::metrics::ShellMetrics;
use crate::registry::{Notification, WindowRegistry};
use crate::render::AnsiRenderer;

mod driver;

pub use driver::{CliDriver, CliDriverError, DriverResult};

/// Key codes the shell translates into registry notifications. Anything
/// else is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub exit: KeyCode,
    pub forward: KeyCode,
    pub backward: KeyCode,
    pub refresh: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            exit: KeyCode::Char('q'),
            forward: KeyCode::Tab,
            backward: KeyCode::BackTab,
            refresh: KeyCode::F(5),
        }
    }
}

/// Configuration knobs for the shell loop.
#[derive(Clone, Default)]
pub struct ShellConfig {
    /// Optional structured logger used by the shell.
    pub logger: Option<Logger>,
    /// Metrics accumulator used for periodic snapshots.
    pub metrics: Option<Arc<Mutex<ShellMetrics>>>,
    /// Interval between metrics snapshot emissions. Zero disables snapshots.
    pub metrics_interval: Duration,
    /// Target field used when emitting metrics snapshots.
    pub metrics_target: String,
    pub bindings: KeyBindings,
}

impl ShellConfig {
    fn with_defaults() -> Self {
        Self {
            logger: None,
            metrics: None,
            metrics_interval: Duration::from_secs(5),
            metrics_target: "sash::shell.metrics".to_string(),
            bindings: KeyBindings::default(),
        }
    }
}

/// Input events the shell understands. Terminal events outside this
/// vocabulary never reach the registry.
#[derive(Debug, Clone)]
pub enum ShellEvent {
    Key(KeyEvent),
    Resize(Size),
    FocusGained,
    FocusLost,
}

/// Blocking, single-threaded event loop around a [`WindowRegistry`].
pub struct Shell {
    registry: WindowRegistry,
    renderer: AnsiRenderer,
    config: ShellConfig,
    should_exit: bool,
    start_instant: Option<Instant>,
    last_metrics_emit: Option<Instant>,
}

impl Shell {
    pub fn new(registry: WindowRegistry, renderer: AnsiRenderer) -> Self {
        Self {
            registry,
            renderer,
            config: ShellConfig::with_defaults(),
            should_exit: false,
            start_instant: None,
            last_metrics_emit: None,
        }
    }

    pub fn config_mut(&mut self) -> &mut ShellConfig {
        &mut self.config
    }

    pub fn registry(&self) -> &WindowRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut WindowRegistry {
        &mut self.registry
    }

    /// Run until the exit binding fires. The only indefinite wait is the
    /// blocking read of the next input event; every iteration ends with one
    /// batched flush.
    pub fn run(&mut self, writer: &mut impl Write) -> Result<()> {
        self.bootstrap(writer)?;
        while !self.should_exit {
            let Some(shell_event) = map_event(event::read()?) else {
                continue;
            };
            self.step(writer, shell_event)?;
        }
        self.finalize();
        Ok(())
    }

    /// Replay a synthetic event script, for tests and benches.
    pub fn run_scripted<I>(&mut self, writer: &mut impl Write, events: I) -> Result<()>
    where
        I: IntoIterator<Item = ShellEvent>,
    {
        self.bootstrap(writer)?;
        for shell_event in events {
            self.step(writer, shell_event)?;
            if self.should_exit {
                break;
            }
        }
        self.finalize();
        Ok(())
    }

    fn step(&mut self, writer: &mut impl Write, shell_event: ShellEvent) -> Result<()> {
        self.record_metric(ShellMetrics::record_event);

        match shell_event {
            ShellEvent::Key(key) if key.kind == KeyEventKind::Press => {
                self.handle_key(writer, key)?;
            }
            ShellEvent::Resize(size) => {
                self.handle_resize(writer, size)?;
            }
            // Keys on release/repeat and focus transitions are ignored.
            _ => {}
        }

        self.registry.flush_pending(writer, &mut self.renderer)?;
        self.record_metric(ShellMetrics::record_flush);
        self.maybe_emit_metrics();
        Ok(())
    }

    fn handle_key(&mut self, writer: &mut impl Write, key: KeyEvent) -> Result<()> {
        let bindings = self.config.bindings;
        if key.code == bindings.exit {
            self.should_exit = true;
            self.log_shell_event(LogLevel::Info, "exit_requested", std::iter::empty());
        } else if key.code == bindings.forward {
            self.registry.notify(Notification::RotateForward)?;
            self.record_metric(ShellMetrics::record_rotation);
            self.log_rotation("forward");
        } else if key.code == bindings.backward {
            self.registry.notify(Notification::RotateBackward)?;
            self.record_metric(ShellMetrics::record_rotation);
            self.log_rotation("backward");
        } else if key.code == bindings.refresh {
            write!(writer, "{}", cursor::clear_screen())?;
            self.registry.notify(Notification::Refresh)?;
            self.log_shell_event(LogLevel::Debug, "refresh_requested", std::iter::empty());
        }
        Ok(())
    }

    fn handle_resize(&mut self, writer: &mut impl Write, size: Size) -> Result<()> {
        // The whole screen is repainted: stale cells outside the new window
        // rects would otherwise survive the reflow.
        write!(writer, "{}", cursor::clear_screen())?;
        self.registry.notify(Notification::Resize(size))?;
        self.registry.notify(Notification::Refresh)?;
        self.record_metric(ShellMetrics::record_resize);
        self.log_shell_event(
            LogLevel::Info,
            "resized",
            [
                json_kv("width", json!(size.width)),
                json_kv("height", json!(size.height)),
            ],
        );
        Ok(())
    }

    fn bootstrap(&mut self, writer: &mut impl Write) -> Result<()> {
        self.should_exit = false;
        self.ensure_metrics_initialized();
        let now = Instant::now();
        self.start_instant = Some(now);
        self.last_metrics_emit = Some(now);
        self.log_shell_event(
            LogLevel::Info,
            "shell_started",
            [
                json_kv("windows", json!(self.registry.len())),
                json_kv("focus_entries", json!(self.registry.focus_order().len())),
            ],
        );

        // Initial focus: one forward rotation, so the configured order's
        // last entry starts selected.
        self.registry.notify(Notification::RotateForward)?;
        self.registry.flush_pending(writer, &mut self.renderer)
    }

    fn finalize(&mut self) {
        let uptime_ms = self
            .start_instant
            .map(|start| start.elapsed().as_millis())
            .unwrap_or(0);
        self.log_shell_event(
            LogLevel::Info,
            "shell_stopped",
            [json_kv("uptime_ms", json!(uptime_ms))],
        );
    }

    fn ensure_metrics_initialized(&mut self) {
        if self.config.metrics.is_none() && self.config.metrics_interval > Duration::ZERO {
            self.config.metrics = Some(Arc::new(Mutex::new(ShellMetrics::new())));
        }
    }

    fn record_metric(&mut self, record: impl Fn(&mut ShellMetrics)) {
        if let Some(metrics) = self.config.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                record(&mut guard);
            }
        }
    }

    fn maybe_emit_metrics(&mut self) {
        if self.config.metrics.is_none() || self.config.metrics_interval == Duration::ZERO {
            return;
        }

        let now = Instant::now();
        match self.last_metrics_emit {
            Some(last) if now.duration_since(last) < self.config.metrics_interval => return,
            _ => self.last_metrics_emit = Some(now),
        }

        let uptime = self
            .start_instant
            .map(|start| now.duration_since(start))
            .unwrap_or_default();

        if let (Some(logger), Some(metrics)) =
            (self.config.logger.as_ref(), self.config.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let target = self.config.metrics_target.as_str();
                let snapshot_event = guard.snapshot(uptime).to_log_event(target);
                let _ = logger.log_event(snapshot_event);
            }
        }
    }

    fn log_rotation(&self, direction: &str) {
        let focused = self.registry.focused().unwrap_or("").to_string();
        self.log_shell_event(
            LogLevel::Debug,
            "focus_rotated",
            [
                json_kv("direction", json!(direction)),
                json_kv("focused", json!(focused)),
            ],
        );
    }

    fn log_shell_event<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, serde_json::Value)>,
    {
        if let Some(logger) = self.config.logger.as_ref() {
            let event = event_with_fields(level, "sash::shell", message, fields);
            let _ = logger.log_event(event);
        }
    }
}

fn map_event(raw: CrosstermEvent) -> Option<ShellEvent> {
    match raw {
        CrosstermEvent::Key(key) => Some(ShellEvent::Key(key)),
        CrosstermEvent::Resize(width, height) => {
            Some(ShellEvent::Resize(Size::new(width, height)))
        }
        CrosstermEvent::FocusGained => Some(ShellEvent::FocusGained),
        CrosstermEvent::FocusLost => Some(ShellEvent::FocusLost),
        // Mouse (and any future event kinds) stay outside the shell's
        // vocabulary.
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::logging::MemorySink;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> ShellEvent {
        ShellEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn stripe(index: u16) -> impl Fn(Size) -> Rect + Send {
        move |t: Size| Rect::new(0, index * 4, t.width.max(1), 4)
    }

    fn shell_abc() -> Shell {
        let mut registry = WindowRegistry::new(Size::new(80, 24));
        registry.insert("A", stripe(0), &[]).unwrap();
        registry.insert("B", stripe(1), &[]).unwrap();
        registry.insert("C", stripe(2), &[]).unwrap();
        registry.set_focus_order(["A", "B", "C"]);
        Shell::new(registry, AnsiRenderer::with_default())
    }

    #[test]
    fn bootstrap_rotates_once_and_paints() {
        let mut shell = shell_abc();
        let mut output = Vec::new();
        shell.run_scripted(&mut output, []).unwrap();
        assert_eq!(shell.registry().focus_order(), ["C", "A", "B"]);
        assert_eq!(shell.registry().focused(), Some("C"));
        assert!(!output.is_empty());
    }

    #[test]
    fn tab_cycle_returns_to_the_start() {
        let mut shell = shell_abc();
        let mut output = Vec::new();
        let script = [
            key(KeyCode::Tab),
            key(KeyCode::Tab),
            key(KeyCode::BackTab),
            key(KeyCode::BackTab),
        ];
        shell.run_scripted(&mut output, script).unwrap();
        // Bootstrap's rotation is the only net change.
        assert_eq!(shell.registry().focus_order(), ["C", "A", "B"]);
    }

    #[test]
    fn exit_binding_stops_the_script() {
        let mut shell = shell_abc();
        let mut output = Vec::new();
        let script = [key(KeyCode::Char('q')), key(KeyCode::Tab)];
        shell.run_scripted(&mut output, script).unwrap();
        // The trailing Tab was never processed.
        assert_eq!(shell.registry().focus_order(), ["C", "A", "B"]);
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut shell = shell_abc();
        let mut output = Vec::new();
        shell
            .run_scripted(&mut output, [key(KeyCode::Char('z')), key(KeyCode::Esc)])
            .unwrap();
        assert_eq!(shell.registry().focus_order(), ["C", "A", "B"]);
    }

    #[test]
    fn resize_clears_and_repaints_everything() {
        let mut shell = shell_abc();
        let mut output = Vec::new();
        shell
            .run_scripted(&mut output, [ShellEvent::Resize(Size::new(40, 24))])
            .unwrap();
        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("\x1b[2J"));
        assert_eq!(shell.registry().window("A").unwrap().rect().width, 40);
    }

    #[test]
    fn shell_lifecycle_is_logged() {
        let sink = MemorySink::new();
        let mut shell = shell_abc();
        shell.config_mut().logger = Some(Logger::new(sink.clone()));
        let mut output = Vec::new();
        shell
            .run_scripted(&mut output, [key(KeyCode::Tab), key(KeyCode::Char('q'))])
            .unwrap();

        let messages: Vec<String> = sink.events().iter().map(|e| e.message.clone()).collect();
        assert!(messages.contains(&"shell_started".to_string()));
        assert!(messages.contains(&"focus_rotated".to_string()));
        assert!(messages.contains(&"exit_requested".to_string()));
        assert!(messages.contains(&"shell_stopped".to_string()));
    }
}

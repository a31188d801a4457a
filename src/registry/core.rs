use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, RwLock};

use crate::error::{Result, WindowError};
use crate::geometry::{GeometrySource, Rect, Size};
use crate::render::AnsiRenderer;
use crate::surface::Frame;
use crate::window::{Window, WindowOption};

/// Structural notifications the registry reacts to. The enum is
/// non-exhaustive on purpose: the registry is shielded from caller-specific
/// event vocabularies, and kinds it does not recognize are ignored.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// The terminal changed size; every window re-evaluates its geometry.
    Resize(Size),
    /// Rotate the focus order right by one (last entry to the front).
    RotateForward,
    /// Rotate the focus order left by one (first entry to the back).
    RotateBackward,
    /// Force every window to re-emit on the next flush.
    Refresh,
}

/// Read-only capability handle onto the registry's solved window rects.
///
/// Dynamic cell producers capture a clone of this to report sibling
/// geometry. It is explicitly a non-owning back-reference: holding one never
/// extends a window's lifetime or creates a destruction-order cycle, and the
/// map is refreshed after every insert and resize so reads are lazy and
/// always current.
#[derive(Clone, Default)]
pub struct GeometryView {
    inner: Arc<RwLock<HashMap<String, Rect>>>,
}

impl GeometryView {
    pub fn rect_of(&self, name: &str) -> Option<Rect> {
        self.inner
            .read()
            .ok()
            .and_then(|rects| rects.get(name).copied())
    }

    fn publish(&self, name: &str, rect: Rect) {
        if let Ok(mut rects) = self.inner.write() {
            rects.insert(name.to_string(), rect);
        }
    }
}

/// Owning collection of windows keyed by name, plus the ordered focus list
/// defining rotation order (head = currently focused).
pub struct WindowRegistry {
    windows: HashMap<String, Window>,
    paint_order: Vec<String>,
    focus_order: Vec<String>,
    terminal: Size,
    geometry: GeometryView,
}

impl WindowRegistry {
    pub fn new(terminal: Size) -> Self {
        Self {
            windows: HashMap::new(),
            paint_order: Vec::new(),
            focus_order: Vec::new(),
            terminal,
            geometry: GeometryView::default(),
        }
    }

    /// Construct and register a window, applying each decoration option in
    /// sequence (each application triggers a resize). Does not touch the
    /// focus order. Fails with `DuplicateName` before any state changes.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        geometry: impl GeometrySource + 'static,
        options: &[WindowOption],
    ) -> Result<()> {
        let name = name.into();
        if self.windows.contains_key(&name) {
            return Err(WindowError::DuplicateName(name));
        }

        let mut window = Window::new(name.clone(), geometry, self.terminal)?;
        for option in options {
            window.apply_option(*option)?;
        }

        self.geometry.publish(&name, window.rect());
        self.paint_order.push(name.clone());
        self.windows.insert(name, window);
        Ok(())
    }

    pub fn window(&self, name: &str) -> Result<&Window> {
        self.windows
            .get(name)
            .ok_or_else(|| WindowError::UnknownWindow(name.to_string()))
    }

    pub fn window_mut(&mut self, name: &str) -> Result<&mut Window> {
        self.windows
            .get_mut(name)
            .ok_or_else(|| WindowError::UnknownWindow(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Replace the rotation list. Unknown names are a deferred contract
    /// violation: they surface as `UnknownWindow` at the next rotation.
    pub fn set_focus_order<I, S>(&mut self, order: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.focus_order = order.into_iter().map(Into::into).collect();
    }

    /// Append one name to the rotation list.
    pub fn push_focus_order(&mut self, name: impl Into<String>) {
        self.focus_order.push(name.into());
    }

    pub fn focus_order(&self) -> &[String] {
        &self.focus_order
    }

    /// Name of the currently focused window, if the focus order is
    /// non-empty.
    pub fn focused(&self) -> Option<&str> {
        self.focus_order.first().map(String::as_str)
    }

    /// Shared read-only view for dynamic cell producers.
    pub fn geometry_view(&self) -> GeometryView {
        self.geometry.clone()
    }

    /// Dispatch one structural notification. Rotation validates the whole
    /// focus order up front so a bad name never leaves a half-rotated list.
    pub fn notify(&mut self, notification: Notification) -> Result<()> {
        match notification {
            Notification::Resize(size) => self.resize_all(size),
            Notification::RotateForward => self.rotate(Direction::Forward),
            Notification::RotateBackward => self.rotate(Direction::Backward),
            Notification::Refresh => {
                for window in self.windows.values_mut() {
                    window.invalidate();
                }
                Ok(())
            }
        }
    }

    /// Collect pending, content-changed frames from every window in paint
    /// order and hand them to the renderer as one batch.
    pub fn flush_pending(&mut self, writer: &mut impl Write, renderer: &mut AnsiRenderer) -> Result<()> {
        let mut frames: Vec<Frame> = Vec::new();
        for name in &self.paint_order {
            if let Some(window) = self.windows.get_mut(name) {
                if let Some(frame) = window.take_frame() {
                    frames.push(frame);
                }
            }
        }
        if !frames.is_empty() {
            renderer.render(writer, &frames)?;
        }
        Ok(())
    }

    /// Two-phase broadcast: every geometry source is solved before any
    /// window moves, so one bad source fails the whole call with the
    /// registry unchanged.
    fn resize_all(&mut self, size: Size) -> Result<()> {
        let mut solved: Vec<(String, Rect)> = Vec::with_capacity(self.windows.len());
        for (name, window) in &self.windows {
            solved.push((name.clone(), window.solve(size)?));
        }

        self.terminal = size;
        for (name, rect) in solved {
            if let Some(window) = self.windows.get_mut(&name) {
                window.apply_rect(size, rect);
                self.geometry.publish(&name, rect);
            }
        }
        Ok(())
    }

    fn rotate(&mut self, direction: Direction) -> Result<()> {
        if self.focus_order.is_empty() {
            return Ok(());
        }
        if let Some(missing) = self
            .focus_order
            .iter()
            .find(|name| !self.windows.contains_key(*name))
        {
            return Err(WindowError::UnknownWindow(missing.clone()));
        }

        match direction {
            Direction::Forward => self.focus_order.rotate_right(1),
            Direction::Backward => self.focus_order.rotate_left(1),
        }
        self.update_marks();
        Ok(())
    }

    /// Re-derive selection: head marked, everyone else unmarked. Names were
    /// validated by the caller.
    fn update_marks(&mut self) {
        for (position, name) in self.focus_order.iter().enumerate() {
            if let Some(window) = self.windows.get_mut(name) {
                if position == 0 {
                    window.mark_selected();
                } else {
                    window.unmark_selected();
                }
            }
        }
    }
}

#[derive(Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::AnsiRenderer;

    fn terminal() -> Size {
        Size::new(80, 24)
    }

    fn stripe(index: u16) -> impl Fn(Size) -> Rect + Send {
        move |t: Size| Rect::new(0, index * 4, t.width, 4)
    }

    fn registry_abc() -> WindowRegistry {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("A", stripe(0), &[]).unwrap();
        registry.insert("B", stripe(1), &[]).unwrap();
        registry.insert("C", stripe(2), &[]).unwrap();
        registry.set_focus_order(["A", "B", "C"]);
        registry
    }

    fn selected_names(registry: &WindowRegistry) -> Vec<&str> {
        ["A", "B", "C"]
            .into_iter()
            .filter(|name| registry.window(name).unwrap().is_selected())
            .collect()
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("A", stripe(0), &[]).unwrap();
        let err = registry.insert("A", stripe(1), &[]).unwrap_err();
        assert!(matches!(err, WindowError::DuplicateName(name) if name == "A"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn insert_does_not_grant_focus() {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("A", stripe(0), &[]).unwrap();
        assert!(registry.focused().is_none());
        assert!(registry.focus_order().is_empty());
    }

    #[test]
    fn forward_rotation_pulls_the_last_entry_to_the_front() {
        let mut registry = registry_abc();
        registry.notify(Notification::RotateForward).unwrap();
        assert_eq!(registry.focus_order(), ["C", "A", "B"]);
        assert_eq!(selected_names(&registry), ["C"]);
    }

    #[test]
    fn backward_rotation_sends_the_head_to_the_back() {
        let mut registry = registry_abc();
        registry.notify(Notification::RotateBackward).unwrap();
        assert_eq!(registry.focus_order(), ["B", "C", "A"]);
        assert_eq!(selected_names(&registry), ["B"]);
    }

    #[test]
    fn rotation_is_invertible() {
        let mut registry = registry_abc();
        for _ in 0..5 {
            registry.notify(Notification::RotateForward).unwrap();
        }
        for _ in 0..5 {
            registry.notify(Notification::RotateBackward).unwrap();
        }
        assert_eq!(registry.focus_order(), ["A", "B", "C"]);
    }

    #[test]
    fn exactly_one_window_is_selected_after_rotation() {
        let mut registry = registry_abc();
        for _ in 0..7 {
            registry.notify(Notification::RotateForward).unwrap();
            assert_eq!(selected_names(&registry).len(), 1);
            assert_eq!(
                selected_names(&registry)[0],
                registry.focused().unwrap().to_string()
            );
        }
    }

    #[test]
    fn unknown_focus_entries_fail_at_rotation_time() {
        let mut registry = registry_abc();
        registry.push_focus_order("Ghost");
        let err = registry.notify(Notification::RotateForward).unwrap_err();
        assert!(matches!(err, WindowError::UnknownWindow(name) if name == "Ghost"));
        // The order was not half-rotated.
        assert_eq!(registry.focus_order(), ["A", "B", "C", "Ghost"]);
    }

    #[test]
    fn rotating_an_empty_focus_order_is_a_no_op() {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("A", stripe(0), &[]).unwrap();
        registry.notify(Notification::RotateForward).unwrap();
        assert!(registry.focused().is_none());
    }

    #[test]
    fn failed_resize_broadcast_leaves_every_window_in_place() {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("Good", stripe(0), &[]).unwrap();
        registry
            .insert(
                "Fragile",
                |t: Size| Rect::new(0, 4, t.width.saturating_sub(60), 4),
                &[],
            )
            .unwrap();
        let view = registry.geometry_view();

        let err = registry
            .notify(Notification::Resize(Size::new(50, 24)))
            .unwrap_err();
        assert!(matches!(err, WindowError::InvalidGeometry { .. }));

        // No window moved and the view still reports the old geometry.
        assert_eq!(registry.window("Good").unwrap().rect().width, 80);
        assert_eq!(view.rect_of("Good").unwrap().width, 80);
        assert_eq!(view.rect_of("Fragile").unwrap().width, 20);

        // A later valid broadcast still lands everywhere.
        registry
            .notify(Notification::Resize(Size::new(70, 24)))
            .unwrap();
        assert_eq!(registry.window("Good").unwrap().rect().width, 70);
        assert_eq!(view.rect_of("Fragile").unwrap().width, 10);
    }

    #[test]
    fn resize_reshapes_every_window_and_the_view() {
        let mut registry = registry_abc();
        let view = registry.geometry_view();
        registry
            .notify(Notification::Resize(Size::new(40, 24)))
            .unwrap();
        for name in ["A", "B", "C"] {
            assert_eq!(registry.window(name).unwrap().rect().width, 40);
            assert_eq!(view.rect_of(name).unwrap().width, 40);
        }
    }

    #[test]
    fn geometry_view_reads_lazily() {
        let mut registry = WindowRegistry::new(terminal());
        registry.insert("A", stripe(0), &[]).unwrap();
        let view = registry.geometry_view();
        let probe = move || match view.rect_of("A") {
            Some(rect) => format!("{}x{}", rect.width, rect.height),
            None => "unplaced".to_string(),
        };
        assert_eq!(probe(), "80x4");
        registry
            .notify(Notification::Resize(Size::new(60, 24)))
            .unwrap();
        assert_eq!(probe(), "60x4");
    }

    #[test]
    fn flush_batches_pending_frames_once() {
        let mut registry = registry_abc();
        let mut renderer = AnsiRenderer::with_default();
        let mut output = Vec::new();
        registry.flush_pending(&mut output, &mut renderer).unwrap();
        assert!(!output.is_empty());

        // Nothing changed; a second flush writes nothing.
        let mut second = Vec::new();
        registry.flush_pending(&mut second, &mut renderer).unwrap();
        assert!(second.is_empty());

        // A refresh forces a full re-emit.
        registry.notify(Notification::Refresh).unwrap();
        let mut third = Vec::new();
        registry.flush_pending(&mut third, &mut renderer).unwrap();
        assert!(!third.is_empty());
    }
}

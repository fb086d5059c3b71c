// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Default wiring of input bindings to editor operations.
//!
//! A [`Session`] owns an [`Editor`], a [`Dispatcher`] preloaded with the
//! level-editor bindings, and the asset registry used for re-rendering. The
//! host forwards raw input events together with a drawing surface and reads
//! back the [`EditorEvent`]s they produced.
//!
//! | Input                     | Event      | Scope  | Action                 |
//! |---------------------------|------------|--------|------------------------|
//! | (none)                    | mouse move | canvas | brush preview          |
//! | `LeftButton`              | mouse down | canvas | draw, or erase in trash mode |
//! | `LeftButton`              | mouse move | canvas | same, only in drag mode |
//! | `c`                       | key down   | global | toggle clipping        |
//! | `d`                       | key down   | global | toggle drag            |
//! | `e`                       | key down   | global | toggle editing         |
//! | `Delete`                  | key down   | global | toggle trash           |
//! | `Control` + `a`           | key down   | global | clear (asks twice)     |
//! | `Control` + `z`           | key down   | global | undo (repeats)         |

use alloc::vec::Vec;

use kurbo::Point;
use mosaic_input::{Combination, Dispatcher, EventKind, Fired, InputEvent, InputId, MouseButton};

use crate::assets::AssetRegistry;
use crate::editor::{Editor, EditorEvent, EditorFlags};
use crate::surface::DrawSurface;

/// Listening scopes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// The drawing surface.
    Canvas,
}

/// Payloads of the default bindings.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EditorAction {
    /// Move the brush preview with the pointer.
    BrushFollow,
    /// Place the brush, or remove in trash mode.
    Draw,
    /// Toggle [`EditorFlags::CLIPPING`].
    ToggleClipping,
    /// Toggle [`EditorFlags::DRAG`].
    ToggleDrag,
    /// Toggle [`EditorFlags::EDITABLE`].
    ToggleEditing,
    /// Toggle [`EditorFlags::TRASH`].
    ToggleTrash,
    /// Clear the canvas after confirmation.
    Clear,
    /// Undo one step.
    Undo,
}

/// An editor with its input bindings and assets.
pub struct Session<H> {
    editor: Editor,
    input: Dispatcher<Scope, EditorAction>,
    assets: AssetRegistry<H>,
    clear_armed_until: Option<u64>,
}

impl<H> core::fmt::Debug for Session<H> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Session")
            .field("editor", &self.editor)
            .field("input", &self.input)
            .field("assets", &self.assets.len())
            .field("clear_armed_until", &self.clear_armed_until)
            .finish()
    }
}

impl<H> Session<H> {
    /// Wrap `editor` and register the default bindings.
    pub fn new(editor: Editor, assets: AssetRegistry<H>) -> Self {
        let mut input = Dispatcher::new();
        register_defaults(&mut input);
        Self {
            editor,
            input,
            assets,
            clear_armed_until: None,
        }
    }

    /// The editor.
    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    /// The editor, mutably.
    pub fn editor_mut(&mut self) -> &mut Editor {
        &mut self.editor
    }

    /// The binding dispatcher.
    pub fn input(&self) -> &Dispatcher<Scope, EditorAction> {
        &self.input
    }

    /// The binding dispatcher, mutably, to rebind or add shortcuts.
    pub fn input_mut(&mut self) -> &mut Dispatcher<Scope, EditorAction> {
        &mut self.input
    }

    /// The asset registry.
    pub fn assets(&self) -> &AssetRegistry<H> {
        &self.assets
    }

    /// The asset registry, mutably.
    pub fn assets_mut(&mut self) -> &mut AssetRegistry<H> {
        &mut self.assets
    }

    /// When the host should call [`tick`](Self::tick) next, if anything is pending.
    pub fn next_deadline(&self) -> Option<u64> {
        match (self.input.next_deadline(), self.clear_armed_until) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Process one input event delivered to `target` at host time `now`.
    ///
    /// Returns the editor events it caused, including those of taps that came due.
    pub fn handle<D: DrawSurface<Image = H>>(
        &mut self,
        surface: &mut D,
        event: &InputEvent,
        target: Option<&Scope>,
        now: u64,
    ) -> Vec<EditorEvent> {
        let mut fired = self.input.advance(now);
        fired.extend(self.input.handle(event, target, now));
        self.apply(surface, fired, now);
        self.editor.drain_events()
    }

    /// Advance time without an event: fires due taps and expires the clear confirmation.
    pub fn tick<D: DrawSurface<Image = H>>(&mut self, surface: &mut D, now: u64) -> Vec<EditorEvent> {
        let fired = self.input.advance(now);
        self.apply(surface, fired, now);
        self.editor.drain_events()
    }

    fn apply<D: DrawSurface<Image = H>>(
        &mut self,
        surface: &mut D,
        fired: Vec<Fired<EditorAction>>,
        now: u64,
    ) {
        for Fired { action, event } in fired {
            match action {
                EditorAction::BrushFollow => {
                    if let Some(at) = event.position {
                        self.editor.track_pointer(at);
                    }
                }
                EditorAction::Draw => {
                    if let Some(at) = event.position {
                        self.draw(surface, &event, at);
                    }
                }
                EditorAction::ToggleClipping => {
                    self.editor.toggle(EditorFlags::CLIPPING);
                }
                EditorAction::ToggleDrag => {
                    self.editor.toggle(EditorFlags::DRAG);
                }
                EditorAction::ToggleEditing => {
                    self.editor.toggle(EditorFlags::EDITABLE);
                }
                EditorAction::ToggleTrash => {
                    self.editor.toggle(EditorFlags::TRASH);
                }
                EditorAction::Clear => self.request_clear(surface, now),
                EditorAction::Undo => {
                    if self.editor.undo(surface) {
                        self.editor.render(surface, &self.assets);
                    }
                }
            }
        }
        if self.clear_armed_until.is_some_and(|deadline| now > deadline) {
            tracing::debug!("clear confirmation expired");
            self.clear_armed_until = None;
        }
    }

    fn draw<D: DrawSurface<Image = H>>(&mut self, surface: &mut D, event: &InputEvent, at: Point) {
        let flags = self.editor.flags();
        if flags.contains(EditorFlags::TRASH) {
            self.editor.remove(surface, at, None);
            return;
        }
        if event.kind == EventKind::MouseMove && !flags.contains(EditorFlags::DRAG) {
            return;
        }
        if self.editor.paint(at).is_some() {
            self.editor.render(surface, &self.assets);
        }
    }

    fn request_clear<D: DrawSurface<Image = H>>(&mut self, surface: &mut D, now: u64) {
        match self.clear_armed_until {
            Some(deadline) if now <= deadline => {
                self.clear_armed_until = None;
                self.editor.clear(surface);
            }
            _ => {
                let deadline = now.saturating_add(self.editor.config().clear_confirm_window_ms);
                tracing::warn!(deadline, "serious action, repeat to clear the canvas");
                self.clear_armed_until = Some(deadline);
                self.editor.emit(EditorEvent::ConfirmRequired { deadline });
            }
        }
    }
}

fn register_defaults(input: &mut Dispatcher<Scope, EditorAction>) {
    let left = InputId::from(MouseButton::Left);
    let canvas = Some(Scope::Canvas);
    input.register(Combination::none(), EventKind::MouseMove, EditorAction::BrushFollow, false, canvas);
    input.register(left.clone(), EventKind::MouseDown, EditorAction::Draw, false, canvas);
    input.register(left, EventKind::MouseMove, EditorAction::Draw, false, canvas);
    for (key, action) in [
        ("c", EditorAction::ToggleClipping),
        ("d", EditorAction::ToggleDrag),
        ("e", EditorAction::ToggleEditing),
        ("Delete", EditorAction::ToggleTrash),
    ] {
        input.register([key], EventKind::KeyDown, action, true, None);
    }
    input.register(["Control", "a"], EventKind::KeyDown, EditorAction::Clear, true, None);
    input.register(["Control", "z"], EventKind::KeyDown, EditorAction::Undo, false, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::Rejection;
    use crate::object::SourceRegion;
    use crate::surface::{DrawOp, RecordingSurface};
    use kurbo::{Rect, Size};
    use mosaic_input::TAP_WINDOW_MS;

    const CANVAS: Option<&Scope> = Some(&Scope::Canvas);

    fn session() -> (Session<u32>, RecordingSurface<u32>) {
        let extent = Size::new(100.0, 100.0);
        let assets: AssetRegistry<u32> = [("grass", 7)].into_iter().collect();
        let mut session = Session::new(Editor::new(extent), assets);
        session
            .editor_mut()
            .set_brush(Some(SourceRegion::new("grass", "tiles", 0.0, 0.0, 20.0, 20.0)));
        session.editor_mut().drain_events();
        (session, RecordingSurface::new(extent))
    }

    fn tap(session: &mut Session<u32>, surface: &mut RecordingSurface<u32>, key: &str, at: u64) -> Vec<EditorEvent> {
        let mut events = session.handle(surface, &InputEvent::key_down(key, false, at), None, at);
        events.extend(session.handle(surface, &InputEvent::key_up(key, at + 20), None, at + 20));
        events.extend(session.tick(surface, at + TAP_WINDOW_MS));
        events
    }

    fn placed(events: &[EditorEvent]) -> usize {
        events
            .iter()
            .filter(|e| matches!(e, EditorEvent::Placed { .. }))
            .count()
    }

    #[test]
    fn click_places_and_renders() {
        let (mut session, mut surface) = session();
        let events = session.handle(
            &mut surface,
            &InputEvent::mouse_down(MouseButton::Left, Point::new(27.0, 3.0), 0),
            CANVAS,
            0,
        );
        assert_eq!(placed(&events), 1);
        assert!(session.editor().is_occupied(Point::new(27.0, 3.0), 1));
        assert_eq!(
            surface.ops(),
            [DrawOp::Draw {
                image: 7,
                src: Rect::new(0.0, 0.0, 20.0, 20.0),
                dst: Rect::new(27.0, 3.0, 47.0, 23.0),
            }]
        );
    }

    #[test]
    fn clicks_outside_the_canvas_scope_do_nothing() {
        let (mut session, mut surface) = session();
        let down = InputEvent::mouse_down(MouseButton::Left, Point::new(5.0, 5.0), 0);
        assert!(session.handle(&mut surface, &down, None, 0).is_empty());
        assert!(session.editor().is_empty());
    }

    #[test]
    fn tap_c_toggles_clipping_after_the_window() {
        let (mut session, mut surface) = session();
        let down = session.handle(&mut surface, &InputEvent::key_down("c", false, 0), None, 0);
        assert!(down.is_empty());
        assert_eq!(session.next_deadline(), Some(TAP_WINDOW_MS));
        session.handle(&mut surface, &InputEvent::key_up("c", 30), None, 30);
        let events = session.tick(&mut surface, TAP_WINDOW_MS);
        assert_eq!(
            events,
            [EditorEvent::ModeChanged {
                flag: EditorFlags::CLIPPING,
                enabled: true,
            }]
        );

        let events = session.handle(
            &mut surface,
            &InputEvent::mouse_down(MouseButton::Left, Point::new(27.0, 3.0), 500),
            CANVAS,
            500,
        );
        assert!(events.contains(&EditorEvent::Placed {
            id: session.editor().select(Point::new(20.0, 0.0)).unwrap(),
            at: Point::new(20.0, 0.0),
            layer: 1,
        }));
    }

    #[test]
    fn held_key_is_not_a_tap() {
        let (mut session, mut surface) = session();
        session.handle(&mut surface, &InputEvent::key_down("d", false, 0), None, 0);
        assert!(session.tick(&mut surface, 1000).is_empty());
        assert!(!session.editor().flags().contains(EditorFlags::DRAG));
    }

    #[test]
    fn drag_drawing_needs_drag_mode() {
        let (mut session, mut surface) = session();
        let mut now = 0;
        session.handle(
            &mut surface,
            &InputEvent::mouse_down(MouseButton::Left, Point::new(0.0, 0.0), now),
            CANVAS,
            now,
        );
        now += 10;
        let events = session.handle(&mut surface, &InputEvent::mouse_move(Point::new(40.0, 0.0), now), CANVAS, now);
        assert_eq!(placed(&events), 0);
        assert!(events.contains(&EditorEvent::BrushMoved(Point::new(40.0, 0.0))));
        session.handle(
            &mut surface,
            &InputEvent::mouse_up(MouseButton::Left, Point::new(40.0, 0.0), now),
            CANVAS,
            now,
        );

        tap(&mut session, &mut surface, "d", 100);
        now = 1000;
        session.handle(
            &mut surface,
            &InputEvent::mouse_down(MouseButton::Left, Point::new(0.0, 40.0), now),
            CANVAS,
            now,
        );
        let mut total = 0;
        for x in [20.0, 40.0, 60.0] {
            now += 10;
            let events = session.handle(&mut surface, &InputEvent::mouse_move(Point::new(x, 40.0), now), CANVAS, now);
            total += placed(&events);
        }
        assert_eq!(total, 3);
        assert_eq!(session.editor().len(), 5);

        // Moving without the button held only previews.
        session.handle(
            &mut surface,
            &InputEvent::mouse_up(MouseButton::Left, Point::new(60.0, 40.0), now),
            CANVAS,
            now,
        );
        let events = session.handle(&mut surface, &InputEvent::mouse_move(Point::new(80.0, 80.0), now + 10), CANVAS, now + 10);
        assert_eq!(events, [EditorEvent::BrushMoved(Point::new(80.0, 80.0))]);
    }

    #[test]
    fn trash_mode_erases() {
        let (mut session, mut surface) = session();
        let down = InputEvent::mouse_down(MouseButton::Left, Point::new(10.0, 10.0), 0);
        session.handle(&mut surface, &down, CANVAS, 0);
        session.handle(&mut surface, &InputEvent::mouse_up(MouseButton::Left, Point::new(10.0, 10.0), 5), CANVAS, 5);
        tap(&mut session, &mut surface, "Delete", 100);
        assert!(session.editor().flags().contains(EditorFlags::TRASH));

        let down = InputEvent::mouse_down(MouseButton::Left, Point::new(15.0, 15.0), 500);
        let events = session.handle(&mut surface, &down, CANVAS, 500);
        assert!(events.iter().any(|e| matches!(e, EditorEvent::Removed { .. })));
        assert!(session.editor().is_empty());
    }

    #[test]
    fn editing_off_rejects_drawing() {
        let (mut session, mut surface) = session();
        tap(&mut session, &mut surface, "e", 0);
        let down = InputEvent::mouse_down(MouseButton::Left, Point::new(10.0, 10.0), 500);
        let events = session.handle(&mut surface, &down, CANVAS, 500);
        assert_eq!(events, [EditorEvent::Rejected(Rejection::NotEditable)]);
    }

    #[test]
    fn clear_needs_confirmation_within_the_window() {
        let (mut session, mut surface) = session();
        let down = InputEvent::mouse_down(MouseButton::Left, Point::new(10.0, 10.0), 0);
        session.handle(&mut surface, &down, CANVAS, 0);

        session.handle(&mut surface, &InputEvent::key_down("Control", false, 100), None, 100);
        let events = session.handle(&mut surface, &InputEvent::key_down("a", false, 110), None, 110);
        assert_eq!(events, [EditorEvent::ConfirmRequired { deadline: 3110 }]);
        assert_eq!(session.editor().len(), 1);
        // Auto-repeat is not a confirmation.
        assert!(session.handle(&mut surface, &InputEvent::key_down("a", true, 140), None, 140).is_empty());
        session.handle(&mut surface, &InputEvent::key_up("a", 200), None, 200);

        let events = session.handle(&mut surface, &InputEvent::key_down("a", false, 1000), None, 1000);
        assert_eq!(events, [EditorEvent::Cleared]);
        assert!(session.editor().is_empty());
    }

    #[test]
    fn clear_confirmation_expires() {
        let (mut session, mut surface) = session();
        session.handle(&mut surface, &InputEvent::key_down("Control", false, 0), None, 0);
        session.handle(&mut surface, &InputEvent::key_down("a", false, 10), None, 10);
        session.handle(&mut surface, &InputEvent::key_up("a", 20), None, 20);
        assert_eq!(session.next_deadline(), Some(3010));
        assert!(session.tick(&mut surface, 3011).is_empty());
        assert_eq!(session.next_deadline(), None);

        let events = session.handle(&mut surface, &InputEvent::key_down("a", false, 4000), None, 4000);
        assert_eq!(events, [EditorEvent::ConfirmRequired { deadline: 7000 }]);
    }

    #[test]
    fn control_z_undoes_and_repeats() {
        let (mut session, mut surface) = session();
        for (i, x) in [0.0, 30.0, 60.0].into_iter().enumerate() {
            let t = i as u64 * 10;
            session.handle(&mut surface, &InputEvent::mouse_down(MouseButton::Left, Point::new(x, 0.0), t), CANVAS, t);
            session.handle(&mut surface, &InputEvent::mouse_up(MouseButton::Left, Point::new(x, 0.0), t + 1), CANVAS, t + 1);
        }
        assert_eq!(session.editor().len(), 3);

        session.handle(&mut surface, &InputEvent::key_down("Control", false, 100), None, 100);
        let events = session.handle(&mut surface, &InputEvent::key_down("z", false, 110), None, 110);
        assert!(matches!(events.as_slice(), [EditorEvent::Undone { .. }]));
        session.handle(&mut surface, &InputEvent::key_down("z", true, 140), None, 140);
        assert_eq!(session.editor().len(), 1);
        assert!(session.editor().is_occupied(Point::ZERO, 1));

        surface.take_ops();
        session.handle(&mut surface, &InputEvent::key_down("z", true, 170), None, 170);
        assert!(session.editor().is_empty());
        // Nothing left to redraw after the last undo.
        assert_eq!(surface.ops(), [DrawOp::Clear(Rect::new(0.0, 0.0, 20.0, 20.0))]);
        assert!(session.handle(&mut surface, &InputEvent::key_down("z", true, 200), None, 200).is_empty());
    }
}

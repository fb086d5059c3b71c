// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The editing engine: placed objects, their spatial index and the undo log.
//!
//! ## Placement
//!
//! [`Editor::add`] turns a raw pointer position into a destination:
//!
//! 1. Clamp each axis so the whole object stays on the canvas.
//! 2. With clipping, snap each axis to the object's own grid.
//! 3. If that spot is taken and snapping rounded x up, shift x back by one
//!    object width. If the spot is still taken and snapping rounded y up,
//!    shift y back by one object height. Each shifted value is clamped again.
//! 4. If it is still taken, stack onto the next layer when
//!    [`EditorFlags::STACKING`] is set, otherwise give up.
//!
//! A spot is taken when a live object has exactly the same `(dx, dy, layer)`.
//! Neighbours merely touching the spot do not count.
//!
//! ## Example
//!
//! ```
//! use kurbo::{Point, Size};
//! use mosaic_editor::{Editor, RecordingSurface, SourceRegion};
//!
//! let mut surface = RecordingSurface::<u32>::new(Size::new(100.0, 100.0));
//! let mut editor = Editor::new(Size::new(100.0, 100.0));
//! let brush = SourceRegion::new("grass", "tiles", 0.0, 0.0, 20.0, 20.0);
//!
//! assert_eq!(editor.add(Point::new(7.0, 7.0), &brush, true, 1), Some(Point::ZERO));
//! assert_eq!(editor.add(Point::new(7.0, 7.0), &brush, true, 1), None);
//! assert!(editor.undo(&mut surface));
//! assert_eq!(editor.add(Point::new(7.0, 7.0), &brush, true, 1), Some(Point::ZERO));
//! ```

use alloc::vec::Vec;

use kurbo::{Point, Rect, Size};
use mosaic_index::{Bounds, IndexError, RTree};

use crate::assets::AssetRegistry;
use crate::object::{ObjectId, PlacedObject, PlacementKey, SourceRegion, rect_bounds};
use crate::placement::{clamp_axis, clamp_point, snap_point};
use crate::revision::{RevisionAction, RevisionEntry, RevisionLog};
use crate::surface::DrawSurface;

bitflags::bitflags! {
    /// Editor modes.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct EditorFlags: u8 {
        /// Objects may be placed.
        const EDITABLE = 0b0000_0001;
        /// Placement snaps to the object's grid.
        const CLIPPING = 0b0000_0010;
        /// Dragging with the button held keeps placing.
        const DRAG     = 0b0000_0100;
        /// Pointer presses remove instead of place.
        const TRASH    = 0b0000_1000;
        /// An occupied spot stacks onto the next layer instead of rejecting.
        const STACKING = 0b0001_0000;
    }
}

impl Default for EditorFlags {
    fn default() -> Self {
        Self::EDITABLE
    }
}

/// Editor configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct EditorConfig {
    /// Maximum children per spatial index node; must be at least 2.
    pub index_capacity: usize,
    /// Record removals in the undo log so they can be undone.
    ///
    /// When off, a removal is final and drops every logged step about the
    /// removed object.
    pub log_removals: bool,
    /// Highest layer stacking may reach.
    pub max_layer: u32,
    /// How long a clear request waits for its confirmation (milliseconds).
    pub clear_confirm_window_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            index_capacity: mosaic_index::DEFAULT_MAX_CAPACITY,
            log_removals: false,
            max_layer: 16,
            clear_confirm_window_ms: 3000,
        }
    }
}

/// Why an operation did nothing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Rejection {
    /// Editing is switched off.
    NotEditable,
    /// No brush is selected.
    NoBrush,
    /// Every candidate spot is taken.
    Occupied,
    /// No object under the pointer.
    NothingHere,
}

/// Notifications for the UI layer, drained with [`Editor::drain_events`].
#[derive(Clone, Debug, PartialEq)]
pub enum EditorEvent {
    /// The brush was set or cleared.
    BrushChanged(Option<SourceRegion>),
    /// A mode flag changed.
    ModeChanged {
        /// The flag.
        flag: EditorFlags,
        /// Its new state.
        enabled: bool,
    },
    /// An object was placed.
    Placed {
        /// The new object.
        id: ObjectId,
        /// Where it went.
        at: Point,
        /// Its layer.
        layer: u32,
    },
    /// An object was removed.
    Removed {
        /// The removed object.
        id: ObjectId,
        /// Where it was.
        at: Point,
    },
    /// An object was moved.
    Moved {
        /// The moved object.
        id: ObjectId,
        /// Old origin.
        from: Point,
        /// New origin.
        to: Point,
    },
    /// A step was undone.
    Undone {
        /// The action that was reversed.
        action: RevisionAction,
        /// Origin of the affected object.
        at: Point,
    },
    /// Every object was removed.
    Cleared,
    /// An operation did nothing.
    Rejected(Rejection),
    /// A destructive action needs to be requested again before `deadline` to go through.
    ConfirmRequired {
        /// Host time (milliseconds) the confirmation window closes.
        deadline: u64,
    },
    /// The pointer moved with a brush selected, for brush preview.
    BrushMoved(Point),
}

#[derive(Clone, Debug)]
struct Slot {
    generation: u32,
    /// Placement order, for stable draw order and topmost picks.
    order: u64,
    object: PlacedObject,
}

/// The editing engine for one canvas.
///
/// Owns the placed objects, an R-tree over their destination rectangles and
/// the undo log. Operations report expected failures (occupied spot, empty
/// history, nothing under the pointer) through their return values and a
/// [`EditorEvent::Rejected`] event, never by panicking.
pub struct Editor {
    slots: Vec<Option<Slot>>,
    /// last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    next_order: u64,
    index: RTree<f64, ObjectId>,
    revisions: RevisionLog,
    flags: EditorFlags,
    brush: Option<SourceRegion>,
    extent: Size,
    config: EditorConfig,
    events: Vec<EditorEvent>,
}

impl core::fmt::Debug for Editor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Editor")
            .field("objects", &self.len())
            .field("free_list", &self.free_list.len())
            .field("index", &self.index)
            .field("revisions", &self.revisions.depth())
            .field("flags", &self.flags)
            .field("brush", &self.brush.as_ref().map(|b| &b.source_key))
            .field("extent", &self.extent)
            .field("config", &self.config)
            .field("pending_events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl Editor {
    /// Create an editor for a canvas of `extent` with the default configuration.
    pub fn new(extent: Size) -> Self {
        Self::build(extent, EditorConfig::default(), RTree::new())
    }

    /// Create an editor with a custom configuration.
    ///
    /// Fails when `config.index_capacity` is below 2.
    pub fn with_config(extent: Size, config: EditorConfig) -> Result<Self, IndexError> {
        let index = RTree::with_capacity(config.index_capacity)?;
        Ok(Self::build(extent, config, index))
    }

    fn build(extent: Size, config: EditorConfig, index: RTree<f64, ObjectId>) -> Self {
        Self {
            slots: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            next_order: 0,
            index,
            revisions: RevisionLog::new(),
            flags: EditorFlags::default(),
            brush: None,
            extent,
            config,
            events: Vec::new(),
        }
    }

    /// The configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Canvas extent used for clamping.
    pub fn extent(&self) -> Size {
        self.extent
    }

    /// Change the canvas extent, e.g. after the host window was resized.
    ///
    /// Existing objects keep their positions.
    pub fn set_extent(&mut self, extent: Size) {
        self.extent = extent;
    }

    // --- modes and brush ---

    /// Current mode flags.
    pub fn flags(&self) -> EditorFlags {
        self.flags
    }

    /// Switch `flag` on or off. Emits [`EditorEvent::ModeChanged`] if anything changed.
    pub fn set_flag(&mut self, flag: EditorFlags, enabled: bool) {
        if self.flags.contains(flag) == enabled {
            return;
        }
        self.flags.set(flag, enabled);
        tracing::warn!(?flag, enabled, "mode changed");
        self.events.push(EditorEvent::ModeChanged { flag, enabled });
    }

    /// Flip `flag` and return its new state.
    pub fn toggle(&mut self, flag: EditorFlags) -> bool {
        let enabled = !self.flags.contains(flag);
        self.set_flag(flag, enabled);
        enabled
    }

    /// The selected brush.
    pub fn brush(&self) -> Option<&SourceRegion> {
        self.brush.as_ref()
    }

    /// Select a brush, or clear it with `None`.
    pub fn set_brush(&mut self, brush: Option<SourceRegion>) {
        if let Some(b) = &brush {
            tracing::debug!(source_key = %b.source_key, group = %b.group_key, "brush selected");
        }
        self.brush = brush.clone();
        self.events.push(EditorEvent::BrushChanged(brush));
    }

    /// Report a pointer position for brush preview. Does nothing without a brush.
    pub fn track_pointer(&mut self, at: Point) {
        if self.brush.is_some() {
            self.events.push(EditorEvent::BrushMoved(at));
        }
    }

    // --- events ---

    /// Events emitted since the last drain.
    pub fn events(&self) -> &[EditorEvent] {
        &self.events
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        core::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.push(event);
    }

    fn reject(&mut self, rejection: Rejection) {
        tracing::warn!(?rejection, "nothing happened");
        self.events.push(EditorEvent::Rejected(rejection));
    }

    // --- placement ---

    /// Place `source` near `raw` on `layer` (layers start at 1).
    ///
    /// Returns the destination, or `None` when editing is off or every
    /// candidate spot is taken.
    pub fn add(
        &mut self,
        raw: Point,
        source: &SourceRegion,
        clipping: bool,
        layer: u32,
    ) -> Option<Point> {
        if !self.flags.contains(EditorFlags::EDITABLE) {
            self.reject(Rejection::NotEditable);
            return None;
        }
        let size = source.size();
        let clamped = clamp_point(raw, size, self.extent);
        let stacking = self.flags.contains(EditorFlags::STACKING);
        let mut layer = layer;
        loop {
            if let Some(at) = self.find_spot(clamped, size, clipping, layer) {
                let object = PlacedObject::from_source(source, at, layer);
                let id = self.insert_object(object.clone());
                self.revisions.push(RevisionEntry {
                    action: RevisionAction::Added,
                    object: id,
                    snapshot: object,
                });
                tracing::debug!(x = at.x, y = at.y, layer, source_key = %source.source_key, "rendered texture");
                self.events.push(EditorEvent::Placed { id, at, layer });
                return Some(at);
            }
            if !stacking || layer >= self.config.max_layer {
                self.reject(Rejection::Occupied);
                return None;
            }
            layer += 1;
        }
    }

    /// Free destination for an object of `size` on `layer`, starting from the clamped point.
    fn find_spot(&self, clamped: Point, size: Size, clipping: bool, layer: u32) -> Option<Point> {
        if !clipping {
            return (!self.is_occupied(clamped, layer)).then_some(clamped);
        }
        let snapped = snap_point(clamped, size);
        if !self.is_occupied(snapped, layer) {
            return Some(snapped);
        }
        // One axis at a time: y only moves if the x-shifted spot is still taken.
        let mut at = snapped;
        if clamped.x < at.x {
            at.x = clamp_axis(at.x - size.width, size.width, self.extent.width);
        }
        if self.is_occupied(at, layer) && clamped.y < at.y {
            at.y = clamp_axis(at.y - size.height, size.height, self.extent.height);
        }
        (!self.is_occupied(at, layer)).then_some(at)
    }

    /// Place the current brush at `raw`, honouring [`EditorFlags::CLIPPING`].
    pub fn paint(&mut self, raw: Point) -> Option<Point> {
        if !self.flags.contains(EditorFlags::EDITABLE) {
            self.reject(Rejection::NotEditable);
            return None;
        }
        let Some(brush) = self.brush.clone() else {
            self.reject(Rejection::NoBrush);
            return None;
        };
        let clipping = self.flags.contains(EditorFlags::CLIPPING);
        self.add(raw, &brush, clipping, 1)
    }

    /// Remove the object under `raw`: the one on `layer`, or the topmost when `layer` is `None`.
    ///
    /// Clears its region on `surface` and returns its origin.
    pub fn remove<S: DrawSurface>(
        &mut self,
        surface: &mut S,
        raw: Point,
        layer: Option<u32>,
    ) -> Option<Point> {
        let Some(id) = self.topmost_at(raw, layer) else {
            self.reject(Rejection::NothingHere);
            return None;
        };
        let object = self.remove_object(id);
        surface.clear_region(object.dst_rect());
        if self.config.log_removals {
            self.revisions.push(RevisionEntry {
                action: RevisionAction::Removed,
                object: id,
                snapshot: object.clone(),
            });
        } else {
            self.revisions.retain(|e| e.object != id);
        }
        let at = object.origin();
        tracing::debug!(x = at.x, y = at.y, layer = object.layer, "removed texture");
        self.events.push(EditorEvent::Removed { id, at });
        Some(at)
    }

    /// Move object `id` to `to`, keeping its layer. Not recorded in the undo log.
    ///
    /// Returns `false` if `id` is stale or another object already holds the target spot.
    pub fn move_object<S: DrawSurface>(&mut self, surface: &mut S, id: ObjectId, to: Point) -> bool {
        let Some(object) = self.object(id) else {
            return false;
        };
        let (old_bounds, old_rect, layer) = (object.bounds(), object.dst_rect(), object.layer);
        let from = object.origin();
        if self
            .occupant(PlacementKey::new(to, layer))
            .is_some_and(|other| other != id)
        {
            self.reject(Rejection::Occupied);
            return false;
        }
        self.index.delete_entry(old_bounds, &id);
        surface.clear_region(old_rect);
        let object = &mut self.slot_mut(id).object;
        object.dx = to.x;
        object.dy = to.y;
        let bounds = object.bounds();
        self.index.insert(bounds, id);
        tracing::debug!(from_x = from.x, from_y = from.y, to_x = to.x, to_y = to.y, "moved texture");
        self.events.push(EditorEvent::Moved { id, from, to });
        true
    }

    /// Reverse the most recent logged step.
    ///
    /// Returns `false` when there is nothing to undo, or when the most recent
    /// step is a removal whose spot has since been taken. In the latter case the
    /// step stays on the log, so a later undo can restore it once the spot is free.
    /// Either way a `false` leaves the objects and the log as they were.
    pub fn undo<S: DrawSurface>(&mut self, surface: &mut S) -> bool {
        while let Some(entry) = self.revisions.pop() {
            match entry.action {
                RevisionAction::Added => {
                    if !self.is_alive(entry.object) {
                        continue;
                    }
                    let object = self.remove_object(entry.object);
                    surface.clear_region(object.dst_rect());
                    tracing::debug!(x = object.dx, y = object.dy, "undo");
                    self.events.push(EditorEvent::Undone {
                        action: RevisionAction::Added,
                        at: object.origin(),
                    });
                    return true;
                }
                RevisionAction::Removed => {
                    if self.occupant(entry.snapshot.key()).is_some() {
                        tracing::warn!(x = entry.snapshot.dx, y = entry.snapshot.dy, "spot taken, removal cannot be undone yet");
                        self.revisions.push(entry);
                        self.reject(Rejection::Occupied);
                        return false;
                    }
                    let at = entry.snapshot.origin();
                    let id = self.insert_object(entry.snapshot);
                    self.revisions.rebind(entry.object, id);
                    tracing::debug!(x = at.x, y = at.y, "undo");
                    self.events.push(EditorEvent::Undone {
                        action: RevisionAction::Removed,
                        at,
                    });
                    return true;
                }
            }
        }
        false
    }

    /// Remove every object, clear the whole canvas and forget the undo log.
    pub fn clear<S: DrawSurface>(&mut self, surface: &mut S) {
        self.index.clear();
        for (idx, slot) in self.slots.iter_mut().enumerate() {
            if slot.take().is_some() {
                self.free_list.push(idx);
            }
        }
        self.revisions.clear();
        let canvas = Rect::from_origin_size(Point::ZERO, surface.extent());
        surface.clear_region(canvas);
        tracing::debug!("canvas cleared");
        self.events.push(EditorEvent::Cleared);
    }

    /// Draw every object onto `surface`, lower layers first.
    ///
    /// Objects whose source is missing from `assets` are skipped with a warning.
    /// Returns how many objects were drawn.
    pub fn render<S: DrawSurface>(&self, surface: &mut S, assets: &AssetRegistry<S::Image>) -> usize {
        let mut drawn = 0;
        for (_, object) in self.objects_in_draw_order() {
            if let Some(image) = assets.lookup(&object.source_key) {
                surface.draw_region(image, object.src_rect(), object.dst_rect());
                drawn += 1;
            }
        }
        drawn
    }

    // --- queries ---

    /// Objects whose destination rectangle touches `rect`, in no particular order.
    pub fn search(&self, rect: Rect) -> Vec<ObjectId> {
        self.index
            .search(rect_bounds(rect))
            .into_iter()
            .map(|r| r.payload)
            .collect()
    }

    /// The topmost object under `point`.
    pub fn select(&self, point: Point) -> Option<ObjectId> {
        self.topmost_at(point, None)
    }

    /// Whether a live object sits exactly at `point` on `layer`.
    pub fn is_occupied(&self, point: Point, layer: u32) -> bool {
        self.occupant(PlacementKey::new(point, layer)).is_some()
    }

    /// The object holding `key`, if any.
    pub fn occupant(&self, key: PlacementKey) -> Option<ObjectId> {
        let mut found = None;
        self.index.visit(Bounds::point(key.dx, key.dy), |r| {
            if found.is_none() && self.object(r.payload).is_some_and(|o| o.key() == key) {
                found = Some(r.payload);
            }
        });
        found
    }

    /// The object for `id`, if it is still live.
    pub fn object(&self, id: ObjectId) -> Option<&PlacedObject> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|s| s.generation == id.1)
            .map(|s| &s.object)
    }

    /// Whether `id` refers to a live object.
    pub fn is_alive(&self, id: ObjectId) -> bool {
        self.object(id).is_some()
    }

    /// Every live object, in slot order.
    pub fn objects(&self) -> impl Iterator<Item = (ObjectId, &PlacedObject)> + '_ {
        self.slots.iter().enumerate().filter_map(|(idx, slot)| {
            slot.as_ref()
                .map(|s| (Self::id_at(idx, s.generation), &s.object))
        })
    }

    /// Number of live objects.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Whether the canvas holds no objects.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of undoable steps.
    pub fn revision_depth(&self) -> usize {
        self.revisions.depth()
    }

    /// Whether [`undo`](Self::undo) has anything to do.
    pub fn can_undo(&self) -> bool {
        !self.revisions.is_empty()
    }

    /// The undo log.
    pub fn revisions(&self) -> &RevisionLog {
        &self.revisions
    }

    /// The spatial index over destination rectangles.
    pub fn index(&self) -> &RTree<f64, ObjectId> {
        &self.index
    }

    // --- internals ---

    fn topmost_at(&self, point: Point, layer: Option<u32>) -> Option<ObjectId> {
        let mut best: Option<(u32, u64, ObjectId)> = None;
        self.index.visit(Bounds::point(point.x, point.y), |r| {
            let Some(slot) = self.slot(r.payload) else {
                return;
            };
            if layer.is_some_and(|l| l != slot.object.layer) {
                return;
            }
            let rank = (slot.object.layer, slot.order);
            if best.is_none_or(|(l, o, _)| rank > (l, o)) {
                best = Some((rank.0, rank.1, r.payload));
            }
        });
        best.map(|(_, _, id)| id)
    }

    fn objects_in_draw_order(&self) -> Vec<(ObjectId, &PlacedObject)> {
        let mut live: Vec<(u32, u64, ObjectId, &PlacedObject)> = self
            .slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                slot.as_ref().map(|s| {
                    (s.object.layer, s.order, Self::id_at(idx, s.generation), &s.object)
                })
            })
            .collect();
        live.sort_unstable_by_key(|&(layer, order, _, _)| (layer, order));
        live.into_iter().map(|(_, _, id, o)| (id, o)).collect()
    }

    fn slot(&self, id: ObjectId) -> Option<&Slot> {
        self.slots
            .get(id.idx())
            .and_then(Option::as_ref)
            .filter(|s| s.generation == id.1)
    }

    fn slot_mut(&mut self, id: ObjectId) -> &mut Slot {
        self.slots[id.idx()]
            .as_mut()
            .filter(|s| s.generation == id.1)
            .expect("editor invariant violated: stale object id")
    }

    #[allow(
        clippy::cast_possible_truncation,
        reason = "ObjectId uses 32-bit indices by design."
    )]
    fn id_at(idx: usize, generation: u32) -> ObjectId {
        ObjectId::new(idx as u32, generation)
    }

    fn insert_object(&mut self, object: PlacedObject) -> ObjectId {
        let bounds = object.bounds();
        let order = self.next_order;
        self.next_order += 1;
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            (idx, generation)
        } else {
            self.slots.push(None);
            self.generations.push(1);
            (self.slots.len() - 1, 1)
        };
        self.slots[idx] = Some(Slot {
            generation,
            order,
            object,
        });
        let id = Self::id_at(idx, generation);
        self.index.insert(bounds, id);
        id
    }

    fn remove_object(&mut self, id: ObjectId) -> PlacedObject {
        let slot = self.slots[id.idx()]
            .take()
            .filter(|s| s.generation == id.1)
            .expect("editor invariant violated: removing a stale object id");
        self.free_list.push(id.idx());
        let removed = self.index.delete_entry(slot.object.bounds(), &id);
        debug_assert!(removed.is_some(), "placed object missing from the index");
        slot.object
    }
}

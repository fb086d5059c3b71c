// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Binding dispatcher: track held inputs per scope and resolve bindings.
//!
//! The dispatcher is an explicit value owned by whoever owns the input surface.
//! It keeps one global [`ActiveInputSet`] plus one per registered scope. An
//! event delivered to a scope updates that scope's set and the global set (the
//! event bubbles to the whole surface), then resolves the scope's bindings
//! before the global ones.
//!
//! ## Resolution rules
//!
//! - An empty combination always fires.
//! - A single input on a keyboard event is a *tap*: if the key is held, the
//!   binding is queued for [`TAP_WINDOW_MS`]. When [`Dispatcher::advance`]
//!   reaches the deadline it fires only if the key has been released in the
//!   meantime. A key held as the prefix of a chord therefore never triggers its
//!   own standalone binding.
//! - A single input on a pointer event fires immediately if it is held.
//! - A chord fires immediately when every input is held, in any press order.
//! - `fire_once` bindings ignore keyboard auto-repeat. Pointer events have no
//!   repeat and always qualify.
//!
//! Firing never calls back into the host: [`Dispatcher::handle`] and
//! [`Dispatcher::advance`] return the [`Fired`] actions and the host applies them.
//!
//! ## Example
//!
//! ```
//! use mosaic_input::{Combination, Dispatcher, EventKind, InputEvent};
//!
//! let mut input: Dispatcher<&str, &str> = Dispatcher::new();
//! input.register(Combination::from(["Control", "a"]), EventKind::KeyDown, "select-all", true, None);
//! input.register(Combination::from(["c"]), EventKind::KeyDown, "clip", true, None);
//!
//! // Control alone keeps the dispatcher idle.
//! assert!(input.handle(&InputEvent::key_down("Control", false, 0), None, 0).is_empty());
//! // `a` while Control is held fires the chord.
//! let fired = input.handle(&InputEvent::key_down("a", false, 10), None, 10);
//! assert_eq!(fired.len(), 1);
//! assert_eq!(fired[0].action, "select-all");
//! // Auto-repeat does not refire a fire-once binding.
//! assert!(input.handle(&InputEvent::key_down("a", true, 40), None, 40).is_empty());
//!
//! // A quick tap on `c` fires once the tap window has passed.
//! input.handle(&InputEvent::key_down("c", false, 100), None, 100);
//! input.handle(&InputEvent::key_up("c", 160), None, 160);
//! assert_eq!(input.next_deadline(), Some(250));
//! let fired = input.advance(250);
//! assert_eq!(fired[0].action, "clip");
//! ```

use alloc::vec::Vec;
use core::fmt::Debug;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::active::ActiveInputSet;
use crate::binding::{Binding, BindingKey, Combination};
use crate::input::{EventKind, InputEvent, InputId};

/// Default tap window in milliseconds.
pub const TAP_WINDOW_MS: u64 = 150;

/// A binding that fired, with the event that triggered it.
#[derive(Clone, Debug, PartialEq)]
pub struct Fired<A> {
    /// The binding's payload.
    pub action: A,
    /// The triggering event. For taps, the key down that started the tap.
    pub event: InputEvent,
}

/// A single-key keyboard binding waiting for its tap window to close.
#[derive(Clone, Debug)]
struct PendingTap<S, A> {
    action: A,
    input: InputId,
    scope: Option<S>,
    event: InputEvent,
    deadline: u64,
}

/// Resolves registered bindings against per-scope active input sets.
///
/// `S` identifies a listening scope (a surface element); `A` is the payload
/// returned when a binding fires.
pub struct Dispatcher<S, A> {
    global: ActiveInputSet,
    scopes: HashMap<S, ActiveInputSet>,
    bindings: Vec<Binding<S, A>>,
    pending: Vec<PendingTap<S, A>>,
    /// Time a single key must be released within to count as a tap (milliseconds).
    pub tap_window: u64,
}

impl<S: Debug, A> Debug for Dispatcher<S, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("global", &self.global)
            .field("scopes", &self.scopes.keys().collect::<Vec<_>>())
            .field("bindings", &self.bindings.len())
            .field("pending", &self.pending.len())
            .field("tap_window", &self.tap_window)
            .finish()
    }
}

impl<S, A> Default for Dispatcher<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Dispatcher<S, A>
where
    S: Clone + Eq + Hash + Debug,
    A: Clone,
{
    /// Create a dispatcher with the default [`TAP_WINDOW_MS`].
    pub fn new() -> Self {
        Self::with_tap_window(TAP_WINDOW_MS)
    }

    /// Create a dispatcher with a custom tap window in milliseconds.
    pub fn with_tap_window(tap_window: u64) -> Self {
        Self {
            global: ActiveInputSet::new(),
            scopes: HashMap::new(),
            bindings: Vec::new(),
            pending: Vec::new(),
            tap_window,
        }
    }

    /// Register a binding, replacing any binding with the same combination and kind.
    ///
    /// A scoped binding gets the scope's active set created on first use.
    pub fn register(
        &mut self,
        combination: impl Into<Combination>,
        kind: EventKind,
        action: A,
        fire_once: bool,
        scope: Option<S>,
    ) {
        let combination = combination.into();
        self.unregister(&combination, kind);
        if let Some(scope) = &scope {
            self.scopes.entry(scope.clone()).or_default();
        }
        tracing::debug!(key = %combination.key(), ?kind, fire_once, ?scope, "binding registered");
        self.bindings.push(Binding {
            combination,
            kind,
            action,
            fire_once,
            scope,
        });
    }

    /// Remove the binding registered for `combination` and `kind`.
    ///
    /// Returns `false` if there was none.
    pub fn unregister(&mut self, combination: &Combination, kind: EventKind) -> bool {
        let before = self.bindings.len();
        self.bindings.retain(|b| !b.matches_key(combination, kind));
        before != self.bindings.len()
    }

    /// Remove every binding. Active sets and scopes are kept.
    pub fn unregister_all(&mut self) {
        self.bindings.clear();
    }

    /// Tear down a scope: drop its active set and every binding listening on it.
    ///
    /// Taps already queued for the scope are dropped when they come due.
    pub fn remove_scope(&mut self, scope: &S) -> bool {
        self.bindings.retain(|b| b.scope.as_ref() != Some(scope));
        let existed = self.scopes.remove(scope).is_some();
        if existed {
            tracing::debug!(?scope, "scope removed");
        }
        existed
    }

    /// Whether `scope` has an active set.
    pub fn has_scope(&self, scope: &S) -> bool {
        self.scopes.contains_key(scope)
    }

    /// Registered bindings, in registration order.
    pub fn bindings(&self) -> &[Binding<S, A>] {
        &self.bindings
    }

    /// The binding registered under `key`, if any.
    pub fn binding(&self, key: &BindingKey) -> Option<&Binding<S, A>> {
        self.bindings.iter().find(|b| b.matches_key(&key.0, key.1))
    }

    /// The global active set.
    pub fn active(&self) -> &ActiveInputSet {
        &self.global
    }

    /// The active set of `scope`, if it exists.
    pub fn scope_active(&self, scope: &S) -> Option<&ActiveInputSet> {
        self.scopes.get(scope)
    }

    /// Release every held input in every scope.
    ///
    /// Useful when the host loses focus and will never deliver the matching releases.
    pub fn release_all(&mut self) {
        self.global.clear();
        for set in self.scopes.values_mut() {
            set.clear();
        }
    }

    /// Deadline of the earliest queued tap, so the host knows when to call [`advance`](Self::advance).
    pub fn next_deadline(&self) -> Option<u64> {
        self.pending.iter().map(|p| p.deadline).min()
    }

    /// Number of queued taps.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Process one input event delivered to `target` (or to the surface when `None`).
    ///
    /// Updates the active sets first, then resolves bindings of the target
    /// scope followed by global bindings. Returns the bindings that fired
    /// immediately; single-key keyboard matches are queued for [`advance`](Self::advance).
    pub fn handle(&mut self, event: &InputEvent, target: Option<&S>, now: u64) -> Vec<Fired<A>> {
        if let Some(set) = target.and_then(|s| self.scopes.get_mut(s)) {
            set.apply(event);
        }
        self.global.apply(event);

        let mut fired = Vec::new();
        let mut queued = Vec::new();
        let scoped = target.filter(|s| self.scopes.contains_key(*s));
        if let Some(scope) = scoped {
            let set = &self.scopes[scope];
            for binding in self.bindings.iter().filter(|b| b.scope.as_ref() == Some(scope)) {
                resolve(binding, set, event, &mut fired, &mut queued);
            }
        }
        for binding in self.bindings.iter().filter(|b| b.scope.is_none()) {
            resolve(binding, &self.global, event, &mut fired, &mut queued);
        }

        for (binding, input) in queued {
            self.pending.push(PendingTap {
                action: binding.action.clone(),
                input,
                scope: binding.scope.clone(),
                event: event.clone(),
                deadline: now.saturating_add(self.tap_window),
            });
        }
        fired
    }

    /// Fire queued taps whose deadline is at or before `now`.
    ///
    /// A tap fires only if its key is no longer held in the scope it was
    /// registered on. Taps whose scope has been torn down are dropped.
    pub fn advance(&mut self, now: u64) -> Vec<Fired<A>> {
        if self.pending.is_empty() {
            return Vec::new();
        }
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|p| p.deadline <= now);
        self.pending = waiting;

        let mut fired = Vec::new();
        for tap in due {
            let set = match &tap.scope {
                Some(scope) => match self.scopes.get(scope) {
                    Some(set) => set,
                    None => {
                        tracing::trace!(?scope, input = %tap.input, "tap for removed scope dropped");
                        continue;
                    }
                },
                None => &self.global,
            };
            if set.is_active(&tap.input) {
                tracing::warn!(input = %tap.input, "key still held after tap window, waiting for chord");
                continue;
            }
            fired.push(Fired {
                action: tap.action,
                event: tap.event,
            });
        }
        fired
    }
}

/// Resolve one binding against `set`: push to `fired` for an immediate match or
/// to `queued` for a tap.
fn resolve<'b, S, A: Clone>(
    binding: &'b Binding<S, A>,
    set: &ActiveInputSet,
    event: &InputEvent,
    fired: &mut Vec<Fired<A>>,
    queued: &mut Vec<(&'b Binding<S, A>, InputId)>,
) {
    if binding.kind != event.kind {
        return;
    }
    let keyboard = event.kind.is_keyboard();
    if binding.fire_once && keyboard && event.repeat {
        return;
    }
    let inputs = binding.combination.inputs();
    match inputs {
        [] => {}
        [single] if keyboard => {
            if set.is_active(single) {
                queued.push((binding, single.clone()));
            }
            return;
        }
        _ => {
            if !set.all_active(inputs) {
                return;
            }
        }
    }
    fired.push(Fired {
        action: binding.action.clone(),
        event: event.clone(),
    });
}

// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Mosaic Input: keyboard and mouse bindings with chords and tap/hold disambiguation.
//!
//! - [`input`]: input identifiers ([`InputId`], [`MouseButton`]) and low-level
//!   [`InputEvent`]s delivered by the host.
//! - [`ActiveInputSet`]: the keys and buttons currently held in one scope.
//! - [`Combination`] and [`Binding`]: what must be held, on which event kind.
//! - [`dispatcher`]: the [`Dispatcher`] that tracks held inputs per scope and
//!   resolves bindings into [`Fired`] actions.
//!
//! The dispatcher never reads a clock or schedules callbacks. Events carry host
//! timestamps, and pending taps are released by calling [`Dispatcher::advance`]
//! at or after [`Dispatcher::next_deadline`].
//!
//! # Example
//!
//! ```rust
//! use kurbo::Point;
//! use mosaic_input::{Dispatcher, EventKind, InputEvent, MouseButton};
//!
//! #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
//! struct Canvas;
//!
//! let mut input: Dispatcher<Canvas, &str> = Dispatcher::new();
//! input.register(["LeftButton"], EventKind::MouseMove, "paint", false, Some(Canvas));
//!
//! let at = Point::new(12.0, 30.0);
//! input.handle(&InputEvent::mouse_down(MouseButton::Left, at, 0), Some(&Canvas), 0);
//! let fired = input.handle(&InputEvent::mouse_move(at, 16), Some(&Canvas), 16);
//! assert_eq!(fired[0].action, "paint");
//! assert_eq!(fired[0].event.position, Some(at));
//! ```

#![no_std]

extern crate alloc;

mod active;
mod binding;
pub mod dispatcher;
pub mod input;

pub use active::ActiveInputSet;
pub use binding::{Binding, BindingKey, Combination};
pub use dispatcher::{Dispatcher, Fired, TAP_WINDOW_MS};
pub use input::{EventKind, InputEvent, InputId, MouseButton};

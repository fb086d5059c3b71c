// Copyright 2025 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property-based tests for binding resolution.
//!
//! 1. A single-key binding fires iff the key is released within the tap window.
//! 2. A chord fires on every key down while all of its keys are held, whatever
//!    order they were pressed in, and never before.
//! 3. Fire-once bindings never fire on auto-repeat.

use mosaic_input::{Dispatcher, EventKind, InputEvent, TAP_WINDOW_MS};
use proptest::prelude::*;

const KEYS: [&str; 4] = ["Control", "Shift", "Alt", "k"];

// ═════════════════════════════════════════════════════════════════════════
// 1. Tap/hold disambiguation
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tap_fires_iff_released_in_window(start in 0u64..10_000, held in 0u64..400) {
        let mut d: Dispatcher<u8, u8> = Dispatcher::new();
        d.register(["c"], EventKind::KeyDown, 1, true, None);

        let mut fired = d.handle(&InputEvent::key_down("c", false, start), None, start).len();
        let deadline = start + TAP_WINDOW_MS;
        if held <= TAP_WINDOW_MS {
            d.handle(&InputEvent::key_up("c", start + held), None, start + held);
            fired += d.advance(deadline).len();
        } else {
            fired += d.advance(deadline).len();
            d.handle(&InputEvent::key_up("c", start + held), None, start + held);
        }
        fired += d.advance(start + 10_000).len();

        prop_assert_eq!(fired, usize::from(held <= TAP_WINDOW_MS));
        prop_assert_eq!(d.pending_len(), 0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 2. Chords complete in any order
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn chord_fires_only_while_complete(
        len in 2usize..=4,
        order in Just((0..4).collect::<Vec<usize>>()).prop_shuffle(),
    ) {
        let chord: Vec<&str> = KEYS[..len].to_vec();
        let mut d: Dispatcher<u8, u8> = Dispatcher::new();
        d.register(mosaic_input::Combination::new(chord.iter().copied()), EventKind::KeyDown, 9, true, None);

        let presses: Vec<&str> = order.iter().map(|&i| KEYS[i]).collect();
        let mut held = Vec::new();
        for (t, key) in presses.iter().enumerate() {
            held.push(*key);
            let fired = d.handle(&InputEvent::key_down(*key, false, t as u64), None, t as u64);
            let complete = chord.iter().all(|k| held.contains(k));
            prop_assert_eq!(fired.len(), usize::from(complete));
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Repeat suppression
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn once_binding_ignores_repeats(repeats in 1usize..30) {
        let mut d: Dispatcher<u8, u8> = Dispatcher::new();
        d.register(["Control", "a"], EventKind::KeyDown, 1, true, None);
        d.register(["Control", "z"], EventKind::KeyDown, 2, false, None);

        d.handle(&InputEvent::key_down("Control", false, 0), None, 0);
        let mut fired = d.handle(&InputEvent::key_down("a", false, 1), None, 1);
        d.handle(&InputEvent::key_up("a", 2), None, 2);
        fired.extend(d.handle(&InputEvent::key_down("z", false, 3), None, 3));
        for r in 0..repeats {
            let t = 4 + r as u64;
            fired.extend(d.handle(&InputEvent::key_down("z", true, t), None, t));
        }
        d.handle(&InputEvent::key_up("z", 90), None, 90);
        // An auto-repeated `a` is not a fresh press of the fire-once chord.
        fired.extend(d.handle(&InputEvent::key_down("a", true, 100), None, 100));

        let once = fired.iter().filter(|f| f.action == 1).count();
        let every = fired.iter().filter(|f| f.action == 2).count();
        prop_assert_eq!(once, 1);
        prop_assert_eq!(every, repeats + 1);
    }
}

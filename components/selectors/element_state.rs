/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Dynamic element state consulted by state pseudo-classes.

use bitflags::bitflags;

bitflags! {
    /// Event-based and form-control state of an element. Elements that
    /// lack a capability (e.g. a `div` and `:checked`) simply never carry
    /// the bit.
    #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
    pub struct ElementState: u32 {
        const HOVER = 1 << 0;
        const ACTIVE = 1 << 1;
        const FOCUS = 1 << 2;
        const DRAG = 1 << 3;
        const TARGET = 1 << 4;
        const CHECKED = 1 << 5;
        const INDETERMINATE = 1 << 6;
        const ENABLED = 1 << 7;
        const DISABLED = 1 << 8;
        const REQUIRED = 1 << 9;
        const OPTIONAL = 1 << 10;
        const READ_ONLY = 1 << 11;
        const READ_WRITE = 1 << 12;
        const DEFAULT = 1 << 13;
        const VALID = 1 << 14;
        const INVALID = 1 << 15;
    }
}

impl ElementState {
    /// States driven by user interaction.
    pub const USER_ACTION: ElementState = ElementState::HOVER
        .union(ElementState::ACTIVE)
        .union(ElementState::FOCUS)
        .union(ElementState::DRAG);
}

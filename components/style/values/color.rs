/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Colors and the named-color table.

use phf::phf_map;

/// A color with 8-bit channels.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct RGBA {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
    pub alpha: u8,
}

impl RGBA {
    pub const fn new(red: u8, green: u8, blue: u8, alpha: u8) -> Self {
        RGBA { red, green, blue, alpha }
    }

    pub const fn opaque(red: u8, green: u8, blue: u8) -> Self {
        RGBA::new(red, green, blue, 255)
    }

    pub const fn transparent() -> Self {
        RGBA::new(0, 0, 0, 0)
    }

    pub const fn black() -> Self {
        RGBA::opaque(0, 0, 0)
    }

    /// Looks up a named color (`transparent` included), ASCII
    /// case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("transparent") {
            return Some(RGBA::transparent());
        }
        NAMED_COLORS
            .get(&*name.to_ascii_lowercase())
            .map(|&(r, g, b)| RGBA::opaque(r, g, b))
    }
}

static NAMED_COLORS: phf::Map<&'static str, (u8, u8, u8)> = phf_map! {
    "aqua" => (0, 255, 255),
    "black" => (0, 0, 0),
    "blue" => (0, 0, 255),
    "brown" => (165, 42, 42),
    "cyan" => (0, 255, 255),
    "darkblue" => (0, 0, 139),
    "darkgray" => (169, 169, 169),
    "darkgreen" => (0, 100, 0),
    "darkred" => (139, 0, 0),
    "fuchsia" => (255, 0, 255),
    "gold" => (255, 215, 0),
    "gray" => (128, 128, 128),
    "green" => (0, 128, 0),
    "grey" => (128, 128, 128),
    "indigo" => (75, 0, 130),
    "lightblue" => (173, 216, 230),
    "lightgray" => (211, 211, 211),
    "lime" => (0, 255, 0),
    "magenta" => (255, 0, 255),
    "maroon" => (128, 0, 0),
    "navy" => (0, 0, 128),
    "olive" => (128, 128, 0),
    "orange" => (255, 165, 0),
    "pink" => (255, 192, 203),
    "purple" => (128, 0, 128),
    "red" => (255, 0, 0),
    "silver" => (192, 192, 192),
    "teal" => (0, 128, 128),
    "violet" => (238, 130, 238),
    "white" => (255, 255, 255),
    "yellow" => (255, 255, 0),
};

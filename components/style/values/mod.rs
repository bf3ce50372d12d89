/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Specified and computed property values.
//!
//! Specified values are what the parsed-stylesheet collaborator hands the
//! engine in declaration blocks; computed values are what resolved styles
//! store, with lengths in app units and keywords resolved.

macro_rules! define_css_keyword_enum {
    ($name: ident: $( $css: expr => $variant: ident ),+,) => {
        define_css_keyword_enum!($name: $( $css => $variant ),+);
    };
    ($name: ident: $( $css: expr => $variant: ident ),+) => {
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            /// Parses a keyword, ASCII case-insensitively.
            pub fn from_ident(ident: &str) -> Option<$name> {
                $(
                    if ident.eq_ignore_ascii_case($css) {
                        return Some($name::$variant);
                    }
                )+
                None
            }

            pub fn as_str(&self) -> &'static str {
                match *self {
                    $( $name::$variant => $css ),+
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

pub mod color;
pub mod computed;
pub mod image;
pub mod specified;

pub use self::color::RGBA;

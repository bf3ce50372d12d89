/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! Image-valued properties.
//!
//! The cascade never fetches anything. An image-valued declaration
//! computes to a pending token carrying the URL, and the tokens of a
//! finished style are handed to an `ImageLoader` outside the hot path.

use crate::properties::LonghandId;
use selectors::{Atom, OpaqueElement};

/// An image that still has to be loaded.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct PendingImage {
    pub url: Atom,
}

/// The computed value of an image-valued property.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum Image {
    None,
    Pending(PendingImage),
}

impl Image {
    pub fn pending(&self) -> Option<&PendingImage> {
        match *self {
            Image::None => None,
            Image::Pending(ref image) => Some(image),
        }
    }
}

/// The external step that resolves pending images once styles are
/// final.
pub trait ImageLoader {
    fn load_pending_image(&mut self, element: OpaqueElement, property: LonghandId, image: &PendingImage);
}

/// A pending image reported by a finished style.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingImageRequest {
    pub element: OpaqueElement,
    pub property: LonghandId,
    pub image: PendingImage,
}

/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! [CSS cascade origins](https://drafts.csswg.org/css-cascade/#cascading-origins).

use std::slice;

/// Each style rule has an origin, which determines where it enters the
/// cascade.
///
/// <https://drafts.csswg.org/css-cascade/#cascading-origins>
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Origin {
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-user-agent>
    UserAgent,
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-user>
    User,
    /// <https://drafts.csswg.org/css-cascade/#cascade-origin-author>
    Author,
}

impl Origin {
    /// All origins, from lowest to highest priority for normal
    /// declarations.
    pub const ALL: [Origin; 3] = [Origin::UserAgent, Origin::User, Origin::Author];

    pub fn iter() -> slice::Iter<'static, Origin> {
        Self::ALL.iter()
    }
}

/// An object that stores a `T` for each origin of the CSS cascade.
#[derive(Debug, Default)]
pub struct PerOrigin<T> {
    pub user_agent: T,
    pub user: T,
    pub author: T,
}

impl<T> PerOrigin<T> {
    #[inline]
    pub fn borrow_for_origin(&self, origin: Origin) -> &T {
        match origin {
            Origin::UserAgent => &self.user_agent,
            Origin::User => &self.user,
            Origin::Author => &self.author,
        }
    }

    #[inline]
    pub fn borrow_mut_for_origin(&mut self, origin: Origin) -> &mut T {
        match origin {
            Origin::UserAgent => &mut self.user_agent,
            Origin::User => &mut self.user,
            Origin::Author => &mut self.author,
        }
    }

    /// Iterates over the values in cascade order, yielding each with its
    /// origin.
    pub fn iter_origins(&self) -> impl Iterator<Item = (&T, Origin)> {
        Origin::iter().map(move |&origin| (self.borrow_for_origin(origin), origin))
    }

    /// Like `iter_origins`, mutably.
    pub fn iter_origins_mut(&mut self) -> impl Iterator<Item = (&mut T, Origin)> {
        [
            (&mut self.user_agent, Origin::UserAgent),
            (&mut self.user, Origin::User),
            (&mut self.author, Origin::Author),
        ]
        .into_iter()
    }
}

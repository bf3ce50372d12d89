/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! [Media queries][mq].
//!
//! Only media types and the `only`/`not` qualifiers are modelled. Whether
//! anything else about the environment matches is the `Device`'s call.
//!
//! [mq]: https://drafts.csswg.org/mediaqueries/

use selectors::Atom;

/// The environment a `Stylist` is built for. Consulted only while rules
/// are indexed, never while matching.
pub trait Device {
    fn media_type(&self) -> MediaType;

    /// Evaluates one query. The default honours the media type and the
    /// `not` qualifier.
    fn matches_query(&self, query: &MediaQuery) -> bool {
        let query_match = query.media_type.matches(self.media_type());
        match query.qualifier {
            Some(Qualifier::Not) => !query_match,
            _ => query_match,
        }
    }
}

/// A device that knows nothing but its media type.
#[derive(Clone, Debug)]
pub struct MediaTypeDevice {
    media_type: MediaType,
}

impl MediaTypeDevice {
    pub fn new(media_type: MediaType) -> Self {
        MediaTypeDevice { media_type }
    }
}

impl Default for MediaTypeDevice {
    fn default() -> Self {
        MediaTypeDevice::new(MediaType::Screen)
    }
}

impl Device for MediaTypeDevice {
    fn media_type(&self) -> MediaType {
        self.media_type
    }
}

/// A type that encapsulates a media query list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MediaList {
    /// The list of media queries.
    pub media_queries: Vec<MediaQuery>,
}

/// <https://drafts.csswg.org/mediaqueries/#mq-prefix>
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Qualifier {
    /// Hide a media query from legacy UAs:
    /// <https://drafts.csswg.org/mediaqueries/#mq-only>
    Only,
    /// Negate a media query:
    /// <https://drafts.csswg.org/mediaqueries/#mq-not>
    Not,
}

/// A [media query][mq].
///
/// [mq]: https://drafts.csswg.org/mediaqueries/
#[derive(Clone, Debug, PartialEq)]
pub struct MediaQuery {
    pub qualifier: Option<Qualifier>,
    pub media_type: MediaQueryType,
}

impl MediaQuery {
    /// Return a media query that never matches, used for when we fail to
    /// parse a given media query.
    fn never_matching() -> Self {
        MediaQuery {
            qualifier: Some(Qualifier::Not),
            media_type: MediaQueryType::All,
        }
    }

    /// Parses `[only | not]? <media-type>`.
    pub fn parse(text: &str) -> Result<MediaQuery, ()> {
        let mut words = text.split_ascii_whitespace();
        let mut word = words.next().ok_or(())?;
        let qualifier = if word.eq_ignore_ascii_case("only") {
            Some(Qualifier::Only)
        } else if word.eq_ignore_ascii_case("not") {
            Some(Qualifier::Not)
        } else {
            None
        };
        if qualifier.is_some() {
            word = words.next().ok_or(())?;
        }
        if words.next().is_some() {
            return Err(());
        }
        Ok(MediaQuery {
            qualifier,
            media_type: MediaQueryType::parse(word),
        })
    }
}

/// <http://dev.w3.org/csswg/mediaqueries-3/#media0>
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MediaQueryType {
    /// A media type that matches every device.
    All,
    /// A known media type, that we parse and understand.
    Known(MediaType),
    /// An unknown media type.
    Unknown(Atom),
}

impl MediaQueryType {
    fn parse(ident: &str) -> Self {
        if ident.eq_ignore_ascii_case("all") {
            return MediaQueryType::All;
        }

        match MediaType::parse(ident) {
            Some(media_type) => MediaQueryType::Known(media_type),
            None => MediaQueryType::Unknown(Atom::from(ident)),
        }
    }

    pub fn matches(&self, other: MediaType) -> bool {
        match *self {
            MediaQueryType::All => true,
            MediaQueryType::Known(known_type) => known_type == other,
            MediaQueryType::Unknown(..) => false,
        }
    }
}

/// <https://drafts.csswg.org/mediaqueries/#media-types>
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MediaType {
    /// The "screen" media type.
    Screen,
    /// The "print" media type.
    Print,
}

impl MediaType {
    fn parse(name: &str) -> Option<Self> {
        if name.eq_ignore_ascii_case("screen") {
            Some(MediaType::Screen)
        } else if name.eq_ignore_ascii_case("print") {
            Some(MediaType::Print)
        } else {
            None
        }
    }
}

impl MediaList {
    /// Parses a comma-separated media query list.
    ///
    /// Always returns a media query list. If any invalid media query is
    /// found, the list is only filled with the equivalent of "not all", see:
    ///
    /// <https://drafts.csswg.org/mediaqueries/#error-handling>
    pub fn parse(text: &str) -> MediaList {
        if text.trim().is_empty() {
            return MediaList::default();
        }
        let media_queries: Result<Vec<_>, ()> = text.split(',').map(MediaQuery::parse).collect();
        MediaList {
            media_queries: media_queries.unwrap_or_else(|()| vec![MediaQuery::never_matching()]),
        }
    }

    /// Evaluate a whole `MediaList` against `Device`.
    pub fn evaluate(&self, device: &dyn Device) -> bool {
        // Check if it is an empty media query list or any queries match (OR condition)
        // https://drafts.csswg.org/mediaqueries-4/#mq-list
        self.media_queries.is_empty() ||
            self.media_queries.iter().any(|mq| device.matches_query(mq))
    }

    /// Whether this `MediaList` contains no media queries.
    pub fn is_empty(&self) -> bool {
        self.media_queries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evaluates_media_types() {
        let screen = MediaTypeDevice::default();
        let print = MediaTypeDevice::new(MediaType::Print);

        assert!(MediaList::default().evaluate(&screen));
        assert!(MediaList::parse("all").evaluate(&print));
        assert!(MediaList::parse("print, tv").evaluate(&print));
        assert!(!MediaList::parse("print, tv").evaluate(&screen));
        assert!(MediaList::parse("not print").evaluate(&screen));
        assert!(MediaList::parse("only screen").evaluate(&screen));
    }

    #[test]
    fn invalid_list_never_matches() {
        let list = MediaList::parse("screen, only");
        assert_eq!(list.media_queries.len(), 1);
        assert!(!list.evaluate(&MediaTypeDevice::default()));
        assert!(!MediaList::parse("screen and (color)").evaluate(&MediaTypeDevice::default()));
    }
}

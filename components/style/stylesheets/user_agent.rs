/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The default style sheets every `Stylist` starts from.
//!
//! They are built on first use and shared by every document in the
//! process until `shutdown()` drops them. Nothing mutates them once
//! built.

use super::{CssRule, Origin, StyleRule, Stylesheet};
use crate::properties::{Importance, LonghandId, PropertyDeclaration, PropertyDeclarationBlock};
use crate::values::specified::{Length, SpecifiedValue};
use crate::values::RGBA;
use log::debug;
use parking_lot::{const_rwlock, RwLock};
use selectors::{NonTSPseudoClass, Selector, SelectorBuilder};
use servo_arc::Arc;

/// The default sheets, in the order they enter the cascade.
#[derive(Debug)]
pub struct UserAgentStylesheets {
    /// The user-agent and user style sheets.
    pub user_or_user_agent_stylesheets: Vec<Arc<Stylesheet>>,
    /// The quirks mode stylesheet.
    pub quirks_mode_stylesheet: Arc<Stylesheet>,
}

static UA_STYLESHEETS: RwLock<Option<Arc<UserAgentStylesheets>>> = const_rwlock(None);

/// Returns the default sheets, building them if no caller has yet.
pub fn stylesheets() -> Arc<UserAgentStylesheets> {
    if let Some(ref sheets) = *UA_STYLESHEETS.read() {
        return sheets.clone();
    }
    // Another thread may have won the race between the two locks.
    UA_STYLESHEETS
        .write()
        .get_or_insert_with(|| {
            debug!("Building user-agent stylesheets");
            Arc::new(UserAgentStylesheets {
                user_or_user_agent_stylesheets: vec![Arc::new(user_agent_sheet())],
                quirks_mode_stylesheet: Arc::new(quirks_mode_sheet()),
            })
        })
        .clone()
}

/// Whether the default sheets are currently built.
pub fn is_initialized() -> bool {
    UA_STYLESHEETS.read().is_some()
}

/// Drops the process-wide default sheets. `Stylist`s that already indexed
/// them keep working; the next `stylesheets()` call builds them again.
pub fn shutdown() {
    if UA_STYLESHEETS.write().take().is_some() {
        debug!("Dropped user-agent stylesheets");
    }
}

fn tags(names: &[&str]) -> Vec<Selector> {
    names
        .iter()
        .filter_map(|name| SelectorBuilder::new().local_name(name).build().ok())
        .collect()
}

fn keyword(id: LonghandId, value: &str) -> PropertyDeclaration {
    PropertyDeclaration::new(id, SpecifiedValue::keyword(value))
}

fn length(id: LonghandId, length: Length) -> PropertyDeclaration {
    PropertyDeclaration::new(id, SpecifiedValue::Length(length))
}

fn color(rgba: RGBA) -> PropertyDeclaration {
    PropertyDeclaration::new(LonghandId::Color, SpecifiedValue::Color(rgba))
}

fn rule(selectors: Vec<Selector>, declarations: Vec<PropertyDeclaration>) -> CssRule {
    let mut block = PropertyDeclarationBlock::new();
    for declaration in declarations {
        block.push(declaration, Importance::Normal);
    }
    CssRule::Style(Arc::new(StyleRule::new(selectors, block)))
}

fn vertical_margins(em: f32) -> Vec<PropertyDeclaration> {
    vec![
        length(LonghandId::MarginTop, Length::em(em)),
        length(LonghandId::MarginBottom, Length::em(em)),
    ]
}

fn heading(name: &str, font_size_em: f32, margin_em: f32) -> CssRule {
    let mut declarations = vec![
        keyword(LonghandId::Display, "block"),
        length(LonghandId::FontSize, Length::em(font_size_em)),
        keyword(LonghandId::FontWeight, "bold"),
    ];
    declarations.extend(vertical_margins(margin_em));
    rule(tags(&[name]), declarations)
}

fn link_selector(pseudo_class: NonTSPseudoClass) -> Vec<Selector> {
    SelectorBuilder::new()
        .local_name("a")
        .pseudo_class(pseudo_class)
        .build()
        .into_iter()
        .collect()
}

/// <https://html.spec.whatwg.org/multipage/#rendering>, trimmed to the
/// properties the engine knows.
fn user_agent_sheet() -> Stylesheet {
    let rules = vec![
        rule(
            tags(&[
                "html", "address", "blockquote", "body", "center", "dialog", "div", "figure",
                "figcaption", "footer", "form", "header", "hr", "legend", "listing", "main", "p",
                "plaintext", "pre", "xmp", "article", "aside", "nav", "section", "details",
                "summary", "dd", "dl", "dt", "ol", "ul", "menu", "dir", "frameset", "frame",
            ]),
            vec![keyword(LonghandId::Display, "block")],
        ),
        rule(
            tags(&[
                "head", "area", "base", "basefont", "datalist", "link", "meta", "noembed",
                "noframes", "param", "rp", "script", "style", "template", "title",
            ]),
            vec![keyword(LonghandId::Display, "none")],
        ),
        rule(
            tags(&["body"]),
            vec![
                length(LonghandId::MarginTop, Length::px(8.)),
                length(LonghandId::MarginRight, Length::px(8.)),
                length(LonghandId::MarginBottom, Length::px(8.)),
                length(LonghandId::MarginLeft, Length::px(8.)),
            ],
        ),
        rule(tags(&["p", "blockquote", "figure", "dl"]), vertical_margins(1.)),
        rule(tags(&["pre", "listing", "xmp", "plaintext"]), {
            let mut declarations = vec![
                keyword(LonghandId::WhiteSpace, "pre"),
                PropertyDeclaration::new(
                    LonghandId::FontFamily,
                    SpecifiedValue::KeywordList(vec!["monospace".into()].into_boxed_slice()),
                ),
            ];
            declarations.extend(vertical_margins(1.));
            declarations
        }),
        heading("h1", 2., 0.67),
        heading("h2", 1.5, 0.83),
        heading("h3", 1.17, 1.),
        heading("h4", 1., 1.33),
        heading("h5", 0.83, 1.67),
        heading("h6", 0.67, 2.33),
        rule(tags(&["ul", "ol", "menu", "dir"]), {
            let mut declarations = vertical_margins(1.);
            declarations.push(length(LonghandId::PaddingLeft, Length::px(40.)));
            declarations
        }),
        rule(tags(&["li"]), vec![keyword(LonghandId::Display, "list-item")]),
        rule(tags(&["table"]), vec![keyword(LonghandId::Display, "table")]),
        rule(tags(&["caption"]), vec![keyword(LonghandId::Display, "table-caption")]),
        rule(tags(&["colgroup"]), vec![keyword(LonghandId::Display, "table-column-group")]),
        rule(tags(&["col"]), vec![keyword(LonghandId::Display, "table-column")]),
        rule(tags(&["thead"]), vec![keyword(LonghandId::Display, "table-header-group")]),
        rule(tags(&["tbody"]), vec![keyword(LonghandId::Display, "table-row-group")]),
        rule(tags(&["tfoot"]), vec![keyword(LonghandId::Display, "table-footer-group")]),
        rule(tags(&["tr"]), vec![keyword(LonghandId::Display, "table-row")]),
        rule(tags(&["td", "th"]), vec![keyword(LonghandId::Display, "table-cell")]),
        rule(tags(&["th"]), vec![keyword(LonghandId::FontWeight, "bold")]),
        rule(tags(&["b", "strong"]), vec![keyword(LonghandId::FontWeight, "bolder")]),
        rule(
            tags(&["i", "em", "cite", "var", "dfn", "address"]),
            vec![keyword(LonghandId::FontStyle, "italic")],
        ),
        rule(tags(&["u", "ins"]), vec![keyword(LonghandId::TextDecorationLine, "underline")]),
        rule(
            tags(&["s", "strike", "del"]),
            vec![keyword(LonghandId::TextDecorationLine, "line-through")],
        ),
        rule(tags(&["center"]), vec![keyword(LonghandId::TextAlign, "center")]),
        rule(tags(&["sub"]), vec![keyword(LonghandId::VerticalAlign, "sub")]),
        rule(tags(&["sup"]), vec![keyword(LonghandId::VerticalAlign, "super")]),
        rule(tags(&["nobr"]), vec![keyword(LonghandId::WhiteSpace, "nowrap")]),
        rule(
            link_selector(NonTSPseudoClass::Link),
            vec![
                color(RGBA::opaque(0, 0, 238)),
                keyword(LonghandId::TextDecorationLine, "underline"),
            ],
        ),
        rule(
            link_selector(NonTSPseudoClass::Visited),
            vec![
                color(RGBA::opaque(85, 26, 139)),
                keyword(LonghandId::TextDecorationLine, "underline"),
            ],
        ),
    ];
    Stylesheet::new(Origin::UserAgent, rules).with_url("resource://user-agent.css")
}

/// Rules that only apply to documents in quirks mode.
fn quirks_mode_sheet() -> Stylesheet {
    let rules = vec![
        rule(
            tags(&["table"]),
            vec![
                keyword(LonghandId::WhiteSpace, "normal"),
                keyword(LonghandId::LineHeight, "normal"),
                keyword(LonghandId::FontWeight, "normal"),
                keyword(LonghandId::FontSize, "medium"),
                keyword(LonghandId::FontStyle, "normal"),
                keyword(LonghandId::TextAlign, "start"),
            ],
        ),
        rule(tags(&["form"]), vec![length(LonghandId::MarginBottom, Length::em(1.))]),
    ];
    Stylesheet::new(Origin::UserAgent, rules).with_url("resource://quirks-mode.css")
}

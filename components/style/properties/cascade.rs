/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/. */

//! The two-pass cascade.
//!
//! Each pass walks the sorted match list from lowest to highest priority
//! and keeps, per property, every declaration in that order. The last one
//! the property accepts wins, so a higher-priority declaration is never
//! overwritten by a lower-priority one. Winners are then applied in table
//! order, which for the first pass is the dependency order of the primary
//! properties.

use super::computed_values::{ComputedValueFlags, ComputedValues, StyleBuilder};
use super::longhands::{LonghandHandler, LONGHANDS};
use super::{CSSWideKeyword, DeclaredValue, LonghandId, LONGHAND_COUNT};
use crate::applicable_declarations::{declarations_in_priority_order, ApplicableDeclarationBlock};
use crate::rule_cache::{RuleCache, RuleCacheOutcome};
use log::debug;
use smallvec::SmallVec;

/// Which properties a cascade pass applies.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CascadeMode {
    /// Properties other declarations depend on: zoom, writing direction,
    /// fonts, color and line-height.
    Primary,
    /// Everything else.
    Other,
    /// The inherited properties among `Other`, when the non-inherited ones
    /// came from the matched-properties cache.
    OtherInheritedOnly,
}

impl CascadeMode {
    #[inline]
    fn includes(self, handler: &LonghandHandler) -> bool {
        match self {
            CascadeMode::Primary => handler.primary,
            CascadeMode::Other => !handler.primary,
            CascadeMode::OtherInheritedOnly => !handler.primary && handler.inherited,
        }
    }
}

/// Computes a style from a sorted match list.
///
/// The result is not adjusted yet. `rule_cache`, when given, is consulted
/// first and filled with the unadjusted result.
pub fn cascade<'a>(
    declarations: &[ApplicableDeclarationBlock],
    parent_style: Option<&'a ComputedValues>,
    root_style: Option<&'a ComputedValues>,
    rule_cache: Option<&mut RuleCache>,
) -> (StyleBuilder<'a>, RuleCacheOutcome) {
    let mut builder = StyleBuilder::new(parent_style, root_style);
    let parent_inherited = parent_style.map(|parent| parent.inherited_arc());

    let rule_cache = match rule_cache {
        Some(cache) => cache,
        None => {
            apply_declarations(declarations, &mut builder, CascadeMode::Primary);
            apply_declarations(declarations, &mut builder, CascadeMode::Other);
            return (builder, RuleCacheOutcome::Disabled);
        },
    };

    if let Some(entry) = rule_cache.find(declarations) {
        if entry.same_parent_inherited(parent_inherited) {
            builder.reuse_inherited(entry.inherited.clone());
            builder.reuse_reset(entry.reset.clone());
            builder.flags = entry.flags;
            return (builder, RuleCacheOutcome::Hit);
        }

        let reset = entry.reset.clone();
        let flags = entry.flags;
        apply_declarations(declarations, &mut builder, CascadeMode::Primary);
        // Absolute lengths in the cached struct were scaled by a zoom of 1.
        if builder.inherited().effective_zoom == 1. {
            builder.reuse_reset(reset);
            builder.flags |= flags;
            apply_declarations(declarations, &mut builder, CascadeMode::OtherInheritedOnly);
            return (builder, RuleCacheOutcome::ResetHit);
        }
        apply_declarations(declarations, &mut builder, CascadeMode::Other);
        return (builder, RuleCacheOutcome::Miss);
    }

    apply_declarations(declarations, &mut builder, CascadeMode::Primary);
    apply_declarations(declarations, &mut builder, CascadeMode::Other);
    rule_cache.insert(declarations, parent_inherited, &builder);
    (builder, RuleCacheOutcome::Miss)
}

/// Runs one cascade pass.
pub fn apply_declarations(
    declarations: &[ApplicableDeclarationBlock],
    builder: &mut StyleBuilder,
    mode: CascadeMode,
) {
    let mut candidates: [SmallVec<[&DeclaredValue; 1]>; LONGHAND_COUNT] =
        std::array::from_fn(|_| SmallVec::new());
    for declaration in declarations_in_priority_order(declarations) {
        let handler = &LONGHANDS[declaration.id as usize];
        if mode.includes(handler) {
            candidates[declaration.id as usize].push(&declaration.value);
        }
    }

    for handler in LONGHANDS.iter().filter(|handler| mode.includes(handler)) {
        for value in candidates[handler.id as usize].iter().rev() {
            if apply_declared_value(handler, value, builder) {
                break;
            }
        }

        if mode == CascadeMode::Primary {
            match handler.id {
                LonghandId::Zoom => builder.fixup_effective_zoom(),
                LonghandId::FontSize => builder.fixup_font_size(),
                _ => {},
            }
        }
    }
}

/// Returns false if the property rejected the value, in which case nothing
/// was written.
fn apply_declared_value(
    handler: &LonghandHandler,
    value: &DeclaredValue,
    builder: &mut StyleBuilder,
) -> bool {
    let specified = match *value {
        DeclaredValue::CSSWideKeyword(keyword) => {
            let inherit = match keyword {
                CSSWideKeyword::Inherit => true,
                CSSWideKeyword::Initial => false,
                CSSWideKeyword::Unset => handler.inherited,
            };
            if inherit {
                if !handler.inherited {
                    builder.flags |= ComputedValueFlags::HAS_EXPLICITLY_INHERITED_PROPERTIES;
                }
                (handler.cascade_inherit)(builder);
            } else {
                (handler.cascade_initial)(builder);
            }
            return true;
        },
        DeclaredValue::Value(ref specified) => specified,
    };

    if (handler.cascade_value)(specified, builder).is_err() {
        debug!("Ignoring unsupported value {:?} for '{}'", specified, handler.name);
        return false;
    }
    if !handler.inherited && specified.is_font_relative() {
        builder.flags |= ComputedValueFlags::USES_FONT_RELATIVE_RESET_VALUES;
    }
    true
}

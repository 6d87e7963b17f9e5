//! Scrub rule tables for boilerplate detection.
//!
//! The mirror family decorates chapter pages with navigation strips, share
//! bars, rating widgets and report buttons, under class names that vary
//! slightly per mirror. Rather than hardcoding that knowledge into the
//! sanitizer, it lives here as ordered tables of (pattern, action) rules:
//! supporting a new mirror means extending a table, not editing logic.
//! Rules are applied in table order; earlier rules run to completion before
//! later ones are considered.

use crate::dom::{self, Document, Selection};

/// Structural pattern a scrub rule matches elements against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Element tag name equals this value (lowercase).
    TagIs(String),

    /// Element class attribute contains this substring (case-insensitive).
    ClassContains(String),
}

/// What to do with an element once a pattern matches it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Drop the element and its whole subtree.
    Remove,

    /// Drop the element but splice its children into its place.
    Unwrap,
}

/// One entry in a scrub table.
#[derive(Debug, Clone)]
pub struct ScrubRule {
    /// Pattern deciding which elements the rule applies to.
    pub pattern: Pattern,

    /// Action taken on matching elements.
    pub action: Action,
}

impl ScrubRule {
    /// Shorthand for a removal rule on a class substring.
    #[must_use]
    pub fn remove_class(fragment: &str) -> Self {
        Self {
            pattern: Pattern::ClassContains(fragment.to_lowercase()),
            action: Action::Remove,
        }
    }

    /// Shorthand for a removal rule on a tag name.
    #[must_use]
    pub fn remove_tag(tag: &str) -> Self {
        Self {
            pattern: Pattern::TagIs(tag.to_lowercase()),
            action: Action::Remove,
        }
    }

    fn matches(&self, tag: &str, class: &str) -> bool {
        match &self.pattern {
            Pattern::TagIs(wanted) => tag == wanted,
            Pattern::ClassContains(fragment) => class.to_lowercase().contains(fragment.as_str()),
        }
    }
}

/// Apply a scrub table to a document, in table order.
pub fn apply(doc: &Document, rules: &[ScrubRule]) {
    for rule in rules {
        let mut matched = Vec::new();
        for node in doc.select("*").nodes() {
            let sel = Selection::from(*node);
            let tag = dom::tag_name(&sel).unwrap_or_default();
            let class = dom::class_name(&sel).unwrap_or_default();
            if rule.matches(&tag, &class) {
                matched.push(sel);
            }
        }

        for sel in matched {
            match rule.action {
                Action::Remove => dom::remove(&sel),
                Action::Unwrap => {
                    let inner = dom::inner_html(&sel).to_string();
                    sel.replace_with_html(inner.as_str());
                }
            }
        }
    }
}

/// Default boilerplate deny-list for the supported mirror family.
///
/// Tuned against the navigation strips, share bars, rating widgets and
/// per-chapter chrome the mirrors wrap around chapter bodies. Extend, don't
/// edit, when onboarding a mirror with new decoration classes.
#[must_use]
pub fn boilerplate_rules() -> Vec<ScrubRule> {
    let class_fragments = [
        "breadcrumb",
        "navbar",
        "btn",
        "nav",
        "chr-nav",
        "novel-title",
        "toggle-nav-open",
        "report",
        "comment",
        "close-popup",
        "share",
        "rating",
        "pf-",
    ];
    let tags = ["aside", "footer", "header", "nav"];

    class_fragments
        .iter()
        .map(|fragment| ScrubRule::remove_class(fragment))
        .chain(tags.iter().map(|tag| ScrubRule::remove_tag(tag)))
        .collect()
}

/// Non-content descendants stripped from candidate containers before
/// scoring: interactive controls and comment/share blocks that sit inside
/// otherwise-good chapter bodies.
#[must_use]
pub fn non_content_rules() -> Vec<ScrubRule> {
    vec![
        ScrubRule::remove_tag("form"),
        ScrubRule::remove_tag("button"),
        ScrubRule::remove_tag("input"),
        ScrubRule::remove_tag("textarea"),
        ScrubRule::remove_class("comment"),
        ScrubRule::remove_class("share"),
    ]
}

//! Boundary-safe variant patterns and the per-request arena that owns them.
//!
//! Two boundary rules:
//! - ordinary variants (letters, digits, whitespace) use regex word boundaries
//! - variants containing symbols such as `+`, `#` or `.` use an adjacency rule:
//!   the characters immediately before and after the match must not be alphanumeric

use std::collections::HashMap;
use std::ops::Range;

use regex::{Regex, RegexBuilder};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryRule {
    Word,
    Adjacency,
}

impl BoundaryRule {
    pub fn for_variant(variant: &str) -> Self {
        if variant
            .chars()
            .any(|c| !c.is_alphanumeric() && !c.is_whitespace())
        {
            BoundaryRule::Adjacency
        } else {
            BoundaryRule::Word
        }
    }
}

/// A compiled, case-insensitive pattern for one candidate form of a variant.
#[derive(Debug, Clone)]
pub struct VariantPattern {
    regex: Regex,
    rule: BoundaryRule,
}

impl VariantPattern {
    pub fn compile(form: &str) -> Result<Self, regex::Error> {
        let rule = BoundaryRule::for_variant(form);
        let escaped = regex::escape(form);
        let source = match rule {
            BoundaryRule::Word => format!(r"\b{escaped}\b"),
            BoundaryRule::Adjacency => escaped,
        };
        let regex = RegexBuilder::new(&source).case_insensitive(true).build()?;
        Ok(Self { regex, rule })
    }

    /// Byte ranges of every boundary-valid, non-overlapping match in `text`, left to right.
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        let mut found = Vec::new();
        let mut at = 0;
        while at <= text.len() {
            let Some(m) = self.regex.find_at(text, at) else {
                break;
            };
            if self.rule == BoundaryRule::Word || adjacency_ok(text, m.start(), m.end()) {
                found.push(m.range());
                at = if m.end() > m.start() {
                    m.end()
                } else {
                    next_char_boundary(text, m.end())
                };
            } else {
                // Rejected: retry one character later so overlapping candidates are still seen.
                at = next_char_boundary(text, m.start());
            }
        }
        found
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self.rule {
            BoundaryRule::Word => self.regex.is_match(text),
            BoundaryRule::Adjacency => !self.find_all(text).is_empty(),
        }
    }
}

fn adjacency_ok(text: &str, start: usize, end: usize) -> bool {
    let before = text[..start].chars().next_back();
    let after = text[end..].chars().next();
    !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
}

fn next_char_boundary(text: &str, from: usize) -> usize {
    text[from..]
        .chars()
        .next()
        .map(|c| from + c.len_utf8())
        .unwrap_or(text.len() + 1)
}

/// The candidate forms tested for a variant: the variant itself, plus its
/// whitespace-collapsed form when that differs ("machine learning" → "machinelearning").
pub fn candidate_forms(variant: &str) -> Vec<String> {
    let mut forms = vec![variant.to_string()];
    let collapsed: String = variant.split_whitespace().collect();
    if !collapsed.is_empty() && collapsed != variant {
        forms.push(collapsed);
    }
    forms
}

/// Compiled patterns keyed by variant, built at most once per request.
#[derive(Debug, Default)]
pub struct PatternArena {
    compiled: HashMap<String, Vec<VariantPattern>>,
}

impl PatternArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the compiled candidate patterns for `variant`, compiling on first use.
    pub fn patterns(&mut self, variant: &str) -> &[VariantPattern] {
        self.compiled
            .entry(variant.to_string())
            .or_insert_with(|| {
                candidate_forms(variant)
                    .iter()
                    .filter_map(|form| match VariantPattern::compile(form) {
                        Ok(p) => Some(p),
                        Err(e) => {
                            warn!("Skipping uncompilable pattern for {form:?}: {e}");
                            None
                        }
                    })
                    .collect()
            })
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.compiled.len()
    }
}

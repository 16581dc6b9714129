//! Job-Relevance Matcher: decides whether a skill, in any of its variants,
//! appears in a job description.

use std::collections::HashMap;

use crate::matching::patterns::{PatternArena, VariantPattern};
use crate::matching::variants::variants;

/// Per-request matcher bound to one job description.
///
/// Owns the compiled pattern arena and memoises each skill's decision, so a
/// `(skill, job_text)` pair is evaluated once per render.
#[derive(Debug)]
pub struct JobMatcher<'j> {
    job_text: &'j str,
    arena: PatternArena,
    decisions: HashMap<String, bool>,
}

impl<'j> JobMatcher<'j> {
    pub fn new(job_text: &'j str) -> Self {
        Self {
            job_text,
            arena: PatternArena::new(),
            decisions: HashMap::new(),
        }
    }

    /// True if any variant of `skill` occurs boundary-delimited in the job text.
    pub fn is_relevant(&mut self, skill: &str) -> bool {
        let key = skill.trim().to_lowercase();
        if key.is_empty() || self.job_text.trim().is_empty() {
            return false;
        }
        if let Some(&decided) = self.decisions.get(&key) {
            return decided;
        }

        let job_text = self.job_text;
        let relevant = variants(&key).iter().any(|variant| {
            self.arena
                .patterns(variant)
                .iter()
                .any(|p| p.is_match(job_text))
        });
        self.decisions.insert(key, relevant);
        relevant
    }

    /// Compiled candidate patterns for a variant, shared with the highlighter.
    pub fn patterns(&mut self, variant: &str) -> &[VariantPattern] {
        self.arena.patterns(variant)
    }
}

/// One-shot relevance check. Prefer a shared [`JobMatcher`] when checking many skills.
pub fn is_relevant(skill: &str, job_text: &str) -> bool {
    JobMatcher::new(job_text).is_relevant(skill)
}

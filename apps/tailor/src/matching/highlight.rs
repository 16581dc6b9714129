//! Text Highlighter: wraps job-relevant skill occurrences in emphasis markers.
//!
//! Guarantees:
//! - output equals input except for inserted marker pairs
//! - marker pairs never nest; text already inside a span is left alone
//! - the same inputs always produce byte-identical output

use std::cmp::Reverse;
use std::ops::Range;

use crate::matching::patterns::VariantPattern;
use crate::matching::relevance::JobMatcher;
use crate::matching::variants::variants_longest_first;

pub const EMPHASIS_OPEN: &str = "<emphasis>";
pub const EMPHASIS_CLOSE: &str = "</emphasis>";

/// Highlights `skills` in `text` against a single job description.
///
/// Builds a throwaway [`JobMatcher`]; use [`highlight_with`] to share compiled
/// patterns across many fields of the same render.
pub fn highlight<S: AsRef<str>>(text: &str, skills: &[S], job_text: &str) -> String {
    let mut matcher = JobMatcher::new(job_text);
    highlight_with(&mut matcher, text, skills)
}

pub fn highlight_with<S: AsRef<str>>(
    matcher: &mut JobMatcher<'_>,
    text: &str,
    skills: &[S],
) -> String {
    if text.is_empty() || skills.is_empty() {
        return text.to_string();
    }

    let mut relevant: Vec<&str> = skills
        .iter()
        .map(AsRef::as_ref)
        .filter(|skill| matcher.is_relevant(skill))
        .collect();
    // Stable: equal-length names keep caller order. "JavaScript" goes before "Java".
    relevant.sort_by_key(|skill| Reverse(skill.trim().chars().count()));

    let mut out = text.to_string();
    for skill in relevant {
        for variant in variants_longest_first(skill) {
            for pattern in matcher.patterns(&variant) {
                wrap_matches(&mut out, pattern);
            }
        }
    }
    out
}

/// Wraps every qualifying match of `pattern` in `out`. Matches are applied right to
/// left so the prefix before each candidate is exactly the text as mutated so far.
fn wrap_matches(out: &mut String, pattern: &VariantPattern) {
    let candidates = pattern.find_all(out);
    for range in candidates.into_iter().rev() {
        if inside_emphasis(&out[..range.start]) || overlaps_marker(out, &range) {
            continue;
        }
        out.insert_str(range.end, EMPHASIS_CLOSE);
        out.insert_str(range.start, EMPHASIS_OPEN);
    }
}

/// More opening than closing markers before an offset means the offset sits inside a span.
fn inside_emphasis(prefix: &str) -> bool {
    prefix.matches(EMPHASIS_OPEN).count() > prefix.matches(EMPHASIS_CLOSE).count()
}

fn overlaps_marker(text: &str, range: &Range<usize>) -> bool {
    [EMPHASIS_OPEN, EMPHASIS_CLOSE].iter().any(|marker| {
        text.match_indices(marker)
            .any(|(at, m)| at < range.end && range.start < at + m.len())
    })
}

/// Removes every emphasis marker, recovering the unhighlighted text.
pub fn strip_emphasis(text: &str) -> String {
    text.replace(EMPHASIS_OPEN, "").replace(EMPHASIS_CLOSE, "")
}

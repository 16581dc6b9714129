//! Skill Normalizer: expands a skill name into the lexical variants used for matching.

use std::collections::BTreeSet;

const JS_SUFFIX: &str = ".js";

/// Returns the lower-cased lexical variants of a skill name.
///
/// - `"React.js"` → `{"react", "react.js", "reactjs"}`
/// - `"Node"` → `{"node", "node.js", "nodejs"}`
///
/// An empty (or whitespace-only) name yields an empty set. The set is ordered so
/// callers iterating it get the same sequence on every call.
pub fn variants(skill: &str) -> BTreeSet<String> {
    let name = skill.trim().to_lowercase();
    let mut out = BTreeSet::new();
    if name.is_empty() {
        return out;
    }

    match name.strip_suffix(JS_SUFFIX) {
        Some(base) if !base.is_empty() => {
            out.insert(base.to_string());
            out.insert(format!("{base}js"));
        }
        Some(_) => {}
        None => {
            out.insert(format!("{name}{JS_SUFFIX}"));
            out.insert(format!("{name}js"));
        }
    }
    out.insert(name);
    out
}

/// Variants ordered longest first (ties broken lexically). Longer variants must be
/// wrapped before shorter ones that could match inside them ("react.js" before "react").
pub fn variants_longest_first(skill: &str) -> Vec<String> {
    let mut ordered: Vec<String> = variants(skill).into_iter().collect();
    ordered.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then_with(|| a.cmp(b)));
    ordered
}

//! Tailoring stages: one completion call each, parsed into a tagged outcome.
//!
//! Every failure mode (collaborator error, timeout, missing JSON, bad JSON, wrong shape)
//! ends in `StageOutcome::FailedFallback`; the assembler then keeps the original field.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::generation::prompts::{
    fill_template, EXPERIENCE_PROMPT_TEMPLATE, SKILLS_PROMPT_TEMPLATE, SUMMARY_PROMPT_TEMPLATE,
};
use crate::llm_client::extract::{extract_json, JsonShape};
use crate::llm_client::prompts::FACTUALITY_INSTRUCTION;
use crate::llm_client::{CompletionRequest, LlmError, TextCompleter};
use crate::matching::JobMatcher;
use crate::models::{ApplicantProfile, Experience, Skill, SkillsByCategory};

// ────────────────────────────────────────────────────────────────────────────
// Stage model
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    SummaryTitle,
    SkillsFilter,
    ExperienceReorder,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::SummaryTitle => "summary_title",
            Stage::SkillsFilter => "skills_filter",
            Stage::ExperienceReorder => "experience_reorder",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    #[default]
    Pending,
    Completed,
    FailedFallback,
}

/// Why a completion could not be turned into a stage result.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON {0:?} found in response")]
    NoJson(JsonShape),

    #[error("malformed JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    #[error("achievements are not a permutation of the original: {0}")]
    PermutationMismatch(String),
}

#[derive(Debug, Error)]
pub enum StageFailure {
    #[error("collaborator error: {0}")]
    Collaborator(#[from] LlmError),

    #[error("unusable response: {0}")]
    Response(#[from] ParseError),
}

/// Terminal state of a stage.
#[derive(Debug)]
pub enum StageOutcome<T> {
    Completed(T),
    FailedFallback(StageFailure),
}

impl<T> StageOutcome<T> {
    pub fn state(&self) -> StageState {
        match self {
            StageOutcome::Completed(_) => StageState::Completed,
            StageOutcome::FailedFallback(_) => StageState::FailedFallback,
        }
    }

    pub fn completed(self) -> Option<T> {
        match self {
            StageOutcome::Completed(value) => Some(value),
            StageOutcome::FailedFallback(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&StageFailure> {
        match self {
            StageOutcome::Completed(_) => None,
            StageOutcome::FailedFallback(failure) => Some(failure),
        }
    }
}

/// Runs one stage: a single completer call under `timeout`, then `parse`.
/// Never retries. An expired timeout is handled exactly like a parse failure.
pub async fn run_stage<T>(
    completer: &dyn TextCompleter,
    stage: Stage,
    prompt: &str,
    max_output_tokens: u32,
    timeout: Duration,
    parse: impl FnOnce(&str) -> Result<T, ParseError>,
) -> StageOutcome<T> {
    debug!(
        "Stage {} {:?}: requesting completion (max_output_tokens={max_output_tokens})",
        stage.name(),
        StageState::Pending
    );

    let request = CompletionRequest {
        prompt,
        max_output_tokens,
    };
    let text = match tokio::time::timeout(timeout, completer.complete(request)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return fallback(stage, e.into()),
        Err(_) => return fallback(stage, LlmError::Timeout(timeout).into()),
    };

    match parse(&text) {
        Ok(value) => {
            info!("Stage {} completed", stage.name());
            StageOutcome::Completed(value)
        }
        Err(e) => fallback(stage, e.into()),
    }
}

fn fallback<T>(stage: Stage, failure: StageFailure) -> StageOutcome<T> {
    warn!(
        "Stage {} failed, keeping original field: {failure}",
        stage.name()
    );
    StageOutcome::FailedFallback(failure)
}

fn extract<'t>(text: &'t str, shape: JsonShape) -> Result<&'t str, ParseError> {
    extract_json(text, shape).ok_or(ParseError::NoJson(shape))
}

// ────────────────────────────────────────────────────────────────────────────
// Stage A: summary / title
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryTitle {
    pub title: String,
    pub summary: String,
}

pub fn build_summary_prompt(
    profile: &ApplicantProfile,
    job_text: &str,
) -> Result<String, serde_json::Error> {
    let skills_json = serde_json::to_string_pretty(&profile.skills)?;
    let experience_json = serde_json::to_string_pretty(&profile.experience)?;
    Ok(fill_template(
        SUMMARY_PROMPT_TEMPLATE,
        &[
            ("factuality", FACTUALITY_INSTRUCTION),
            ("job_text", job_text),
            ("title", &profile.personal_info.title),
            ("summary", &profile.summary),
            ("skills_json", &skills_json),
            ("experience_json", &experience_json),
        ],
    ))
}

/// Requires a JSON object with non-empty string `title` and `summary`.
pub fn parse_summary_title(text: &str) -> Result<SummaryTitle, ParseError> {
    let value: Value = serde_json::from_str(extract(text, JsonShape::Object)?)?;
    Ok(SummaryTitle {
        title: required_string(&value, "title")?,
        summary: required_string(&value, "summary")?,
    })
}

fn required_string(value: &Value, key: &str) -> Result<String, ParseError> {
    match value.get(key).and_then(Value::as_str).map(str::trim) {
        Some(s) if !s.is_empty() => Ok(s.to_string()),
        Some(_) => Err(ParseError::ShapeMismatch(format!("`{key}` is empty"))),
        None => Err(ParseError::ShapeMismatch(format!(
            "missing string field `{key}`"
        ))),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage B: skills filter
// ────────────────────────────────────────────────────────────────────────────

/// A returned skill: the full record, or just its name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SkillRef {
    Record(Skill),
    Name(String),
}

impl SkillRef {
    fn name(&self) -> &str {
        match self {
            SkillRef::Record(skill) => &skill.name,
            SkillRef::Name(name) => name,
        }
    }
}

pub fn build_skills_prompt(
    profile: &ApplicantProfile,
    job_text: &str,
) -> Result<String, serde_json::Error> {
    let skills_json = serde_json::to_string_pretty(&profile.skills)?;
    Ok(fill_template(
        SKILLS_PROMPT_TEMPLATE,
        &[
            ("factuality", FACTUALITY_INSTRUCTION),
            ("job_text", job_text),
            ("skills_json", &skills_json),
        ],
    ))
}

/// Parses a reduced skills map and checks it against the original.
///
/// Every category and skill must exist in `original` (names compared
/// case-insensitively); the original `Skill` record is kept. Categories keep the
/// order the completion returned them in. Keys that differ only by case merge into
/// one original category, deduplicated. The "one unlisted extra per category" rule
/// is prompt-driven: violations are logged only.
pub fn parse_skills(
    text: &str,
    original: &SkillsByCategory,
    job_text: &str,
) -> Result<SkillsByCategory, ParseError> {
    let returned: IndexMap<String, Vec<SkillRef>> =
        serde_json::from_str(extract(text, JsonShape::Object)?)?;

    let mut filtered = SkillsByCategory::new();
    let mut seen: HashMap<&str, HashSet<String>> = HashMap::new();

    for (category, refs) in returned {
        let (original_category, original_skills) = original
            .get_key_value(&category)
            .or_else(|| {
                original
                    .iter()
                    .find(|(name, _)| name.trim().eq_ignore_ascii_case(category.trim()))
            })
            .ok_or_else(|| {
                ParseError::ShapeMismatch(format!("unknown skill category `{category}`"))
            })?;

        let seen_in_category = seen.entry(original_category.as_str()).or_default();
        let mut kept = Vec::new();
        for skill_ref in &refs {
            let wanted = skill_ref.name().trim().to_lowercase();
            let skill = original_skills
                .iter()
                .find(|s| s.name.trim().to_lowercase() == wanted)
                .ok_or_else(|| {
                    ParseError::ShapeMismatch(format!(
                        "skill `{}` is not listed under `{original_category}`",
                        skill_ref.name()
                    ))
                })?;
            if seen_in_category.insert(wanted) {
                kept.push(skill.clone());
            }
        }

        if kept.is_empty() {
            continue;
        }
        filtered
            .entry(original_category.clone())
            .or_insert_with(Vec::new)
            .extend(kept);
    }

    let mut matcher = JobMatcher::new(job_text);
    for (category, skills) in &filtered {
        let extras = skills.iter().filter(|s| !matcher.is_relevant(&s.name)).count();
        if extras > 1 {
            debug!(
                "Skills filter kept {extras} job-unrelated skills in `{category}` (policy allows 1)"
            );
        }
    }

    if filtered.is_empty() {
        return Err(ParseError::ShapeMismatch(
            "skills map has no surviving skills".to_string(),
        ));
    }
    Ok(filtered)
}

// ────────────────────────────────────────────────────────────────────────────
// Stage C: experience reorder
// ────────────────────────────────────────────────────────────────────────────

pub fn build_experience_prompt(
    profile: &ApplicantProfile,
    job_text: &str,
) -> Result<String, serde_json::Error> {
    let experience_json = serde_json::to_string_pretty(&profile.experience)?;
    Ok(fill_template(
        EXPERIENCE_PROMPT_TEMPLATE,
        &[
            ("factuality", FACTUALITY_INSTRUCTION),
            ("job_text", job_text),
            ("experience_json", &experience_json),
        ],
    ))
}

/// Parses the first JSON array in `text` as reordered experience.
///
/// Entries must line up with `original` (same count, role and company per position)
/// and each entry's achievements must be a permutation of the original bullets.
/// The result carries the original records with only achievement order changed.
pub fn parse_experience(text: &str, original: &[Experience]) -> Result<Vec<Experience>, ParseError> {
    let returned: Vec<Experience> = serde_json::from_str(extract(text, JsonShape::Array)?)?;

    if returned.len() != original.len() {
        return Err(ParseError::ShapeMismatch(format!(
            "expected {} experience entries, got {}",
            original.len(),
            returned.len()
        )));
    }

    original
        .iter()
        .zip(returned)
        .enumerate()
        .map(|(index, (orig, reordered))| {
            if !same_text(&orig.role, &reordered.role)
                || !same_text(&orig.company, &reordered.company)
            {
                return Err(ParseError::ShapeMismatch(format!(
                    "entry {index} is `{} @ {}`, expected `{} @ {}`",
                    reordered.role, reordered.company, orig.role, orig.company
                )));
            }
            let achievements = permute_achievements(&orig.achievements, &reordered.achievements)
                .ok_or_else(|| {
                    ParseError::PermutationMismatch(format!(
                        "entry {index} ({} @ {})",
                        orig.role, orig.company
                    ))
                })?;
            Ok(Experience {
                achievements,
                ..orig.clone()
            })
        })
        .collect()
}

fn same_text(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// Original bullets in the order given by `reordered`, or `None` if `reordered`
/// adds, drops, duplicates or edits any bullet.
fn permute_achievements(original: &[String], reordered: &[String]) -> Option<Vec<String>> {
    if original.len() != reordered.len() {
        return None;
    }
    let mut remaining: Vec<&String> = original.iter().collect();
    reordered
        .iter()
        .map(|bullet| {
            let at = remaining.iter().position(|o| o.trim() == bullet.trim())?;
            Some(remaining.swap_remove(at).clone())
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

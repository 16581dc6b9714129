//! Resume Tailoring: the full pipeline for one request.
//!
//! Flow: validate → load profile (cached) → run stages A/B/C concurrently →
//!       assemble with per-field fallback → highlight → return.
//!
//! Stage failures never fail the request. Only profile loading, cancellation and
//! invalid input do.

use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::generation::assembler::assemble;
use crate::generation::orchestrator::run_stages;
use crate::models::TailoredProfile;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

/// Input for one tailoring run.
#[derive(Debug, Clone, Deserialize)]
pub struct TailorRequest {
    pub user_id: Uuid,
    pub job_text: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Produces a tailored profile for `request.user_id` against `request.job_text`.
///
/// Steps:
/// 1. reject an empty job description
/// 2. ProfileCache::get() → Arc<ApplicantProfile>
/// 3. run_stages() → StageResults (A, B, C in parallel, each with its own fallback)
/// 4. assemble() → TailoredProfile with highlighted summary and achievements
pub async fn tailor_resume(
    state: &AppState,
    request: &TailorRequest,
    cancel: &CancellationToken,
) -> Result<TailoredProfile, AppError> {
    let job_text = request.job_text.trim();
    if job_text.is_empty() {
        return Err(AppError::Validation(
            "job_text cannot be empty".to_string(),
        ));
    }

    // Step 2: Load the applicant profile
    let profile = state.profiles.get(request.user_id).await?;
    info!(
        "Tailoring profile for user {} ({} skill categories, {} experience entries)",
        request.user_id,
        profile.skills.len(),
        profile.experience.len()
    );

    // Step 3: Stages
    let results = run_stages(
        state.llm.as_ref(),
        &profile,
        job_text,
        &state.settings,
        cancel,
    )
    .await?;

    // Step 4: Merge and highlight
    let tailored = assemble(
        &profile,
        results.summary_title,
        results.skills,
        results.experience,
        job_text,
    );

    info!(
        "Tailored profile for user {}: title '{}', {} skills kept",
        request.user_id,
        tailored.title,
        tailored.skill_names().len()
    );

    Ok(tailored)
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

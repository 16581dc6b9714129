//! Tailoring Orchestrator: fans the three stages out concurrently and joins them.
//!
//! Stages share immutable borrows of the original profile and job text. The join waits
//! for all three terminal states. On cancellation the in-flight completer futures are
//! dropped and nothing partial is returned.

use std::time::Duration;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::generation::stages::{
    build_experience_prompt, build_skills_prompt, build_summary_prompt, parse_experience,
    parse_skills, parse_summary_title, run_stage, Stage, StageOutcome, StageState, SummaryTitle,
};
use crate::llm_client::TextCompleter;
use crate::models::{ApplicantProfile, Experience, SkillsByCategory};

/// Per-stage token budgets and the per-call timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageSettings {
    pub timeout: Duration,
    pub summary_max_tokens: u32,
    pub skills_max_tokens: u32,
    pub experience_max_tokens: u32,
}

impl Default for StageSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            summary_max_tokens: 1024,
            skills_max_tokens: 2048,
            experience_max_tokens: 4096,
        }
    }
}

/// Terminal outcomes of all three stages.
#[derive(Debug)]
pub struct StageResults {
    pub summary_title: StageOutcome<SummaryTitle>,
    pub skills: StageOutcome<SkillsByCategory>,
    pub experience: StageOutcome<Vec<Experience>>,
}

impl StageResults {
    pub fn states(&self) -> [(Stage, StageState); 3] {
        [
            (Stage::SummaryTitle, self.summary_title.state()),
            (Stage::SkillsFilter, self.skills.state()),
            (Stage::ExperienceReorder, self.experience.state()),
        ]
    }
}

/// Runs stages A, B and C concurrently against `completer`.
///
/// Returns `AppError::Cancelled` if `cancel` fires before all stages finish.
pub async fn run_stages(
    completer: &dyn TextCompleter,
    profile: &ApplicantProfile,
    job_text: &str,
    settings: &StageSettings,
    cancel: &CancellationToken,
) -> Result<StageResults, AppError> {
    let summary_prompt =
        build_summary_prompt(profile, job_text).context("Failed to build summary prompt")?;
    let skills_prompt =
        build_skills_prompt(profile, job_text).context("Failed to build skills prompt")?;
    let experience_prompt = build_experience_prompt(profile, job_text)
        .context("Failed to build experience prompt")?;

    let summary_title = run_stage(
        completer,
        Stage::SummaryTitle,
        &summary_prompt,
        settings.summary_max_tokens,
        settings.timeout,
        parse_summary_title,
    );
    let skills = run_stage(
        completer,
        Stage::SkillsFilter,
        &skills_prompt,
        settings.skills_max_tokens,
        settings.timeout,
        |text| parse_skills(text, &profile.skills, job_text),
    );
    let experience = run_stage(
        completer,
        Stage::ExperienceReorder,
        &experience_prompt,
        settings.experience_max_tokens,
        settings.timeout,
        |text| parse_experience(text, &profile.experience),
    );

    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            warn!("Tailoring cancelled; discarding in-flight stage results");
            Err(AppError::Cancelled)
        }
        (summary_title, skills, experience) = async { tokio::join!(summary_title, skills, experience) } => {
            let results = StageResults { summary_title, skills, experience };
            for (stage, state) in results.states() {
                info!("Stage {} finished: {:?}", stage.name(), state);
            }
            Ok(results)
        }
    }
}

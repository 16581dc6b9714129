//! Artifact Assembler: merges stage outcomes into a `TailoredProfile` and
//! highlights job-relevant skills in its free-text fields.

use crate::generation::stages::{StageOutcome, SummaryTitle};
use crate::matching::{highlight_with, JobMatcher};
use crate::models::{
    flatten_skill_names, ApplicantProfile, Experience, SkillsByCategory, TailoredProfile,
};

/// Field-wise merge: every field falls back to the original independently.
///
/// Summary and achievement bullets are then highlighted against `job_text` using the
/// skill names of the *tailored* skills map. One matcher is shared for the whole render.
pub fn assemble(
    original: &ApplicantProfile,
    summary_title: StageOutcome<SummaryTitle>,
    skills: StageOutcome<SkillsByCategory>,
    experience: StageOutcome<Vec<Experience>>,
    job_text: &str,
) -> TailoredProfile {
    let (title, summary) = match summary_title.completed() {
        Some(tailored) => (tailored.title, tailored.summary),
        None => (
            original.personal_info.title.clone(),
            original.summary.clone(),
        ),
    };
    let skills = skills
        .completed()
        .unwrap_or_else(|| original.skills.clone());
    let mut experience = experience
        .completed()
        .unwrap_or_else(|| original.experience.clone());

    let skill_names = flatten_skill_names(&skills);
    let mut matcher = JobMatcher::new(job_text);

    let summary = highlight_with(&mut matcher, &summary, &skill_names);
    for entry in &mut experience {
        for bullet in &mut entry.achievements {
            *bullet = highlight_with(&mut matcher, bullet, &skill_names);
        }
    }

    TailoredProfile {
        personal_info: original.personal_info.clone(),
        title,
        summary,
        skills,
        experience,
        education: original.education.clone(),
        activities: original.activities.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::stages::{ParseError, StageFailure};
    use crate::generation::test_helpers::sample_profile;
    use crate::matching::{strip_emphasis, EMPHASIS_OPEN};
    use crate::models::{Skill, SkillYears};

    const JOB: &str = "Rust engineer with PostgreSQL and Kubernetes";

    fn failed<T>() -> StageOutcome<T> {
        StageOutcome::FailedFallback(StageFailure::Response(ParseError::ShapeMismatch(
            "test".to_string(),
        )))
    }

    #[test]
    fn test_all_fallbacks_reproduce_original_text() {
        let original = sample_profile();
        let tailored = assemble(&original, failed(), failed(), failed(), JOB);

        assert_eq!(tailored.title, original.personal_info.title);
        assert_eq!(strip_emphasis(&tailored.summary), original.summary);
        assert_eq!(tailored.skills, original.skills);
        assert!(tailored.skills.keys().eq(original.skills.keys()));
        assert_eq!(tailored.personal_info, original.personal_info);
        assert_eq!(tailored.education, original.education);
        assert_eq!(tailored.activities, original.activities);
        for (orig, got) in original.experience.iter().zip(&tailored.experience) {
            let stripped: Vec<String> = got.achievements.iter().map(|a| strip_emphasis(a)).collect();
            assert_eq!(stripped, orig.achievements);
        }
    }

    #[test]
    fn test_fields_fall_back_independently() {
        let original = sample_profile();
        let tailored = assemble(
            &original,
            StageOutcome::Completed(SummaryTitle {
                title: "Rust Backend Engineer".to_string(),
                summary: "Rust and Kubernetes specialist.".to_string(),
            }),
            failed(),
            failed(),
            JOB,
        );
        assert_eq!(tailored.title, "Rust Backend Engineer");
        assert_eq!(
            tailored.summary,
            "<emphasis>Rust</emphasis> and <emphasis>Kubernetes</emphasis> specialist."
        );
        assert_eq!(tailored.skills, original.skills);
    }

    #[test]
    fn test_highlights_use_tailored_skills() {
        let original = sample_profile();
        let mut reduced = SkillsByCategory::new();
        reduced.insert(
            "Languages".to_string(),
            vec![Skill::new("Rust", SkillYears::Number(5.0))],
        );

        let tailored = assemble(
            &original,
            failed(),
            StageOutcome::Completed(reduced),
            failed(),
            JOB,
        );

        // Kubernetes and PostgreSQL are job-relevant but were filtered out of the skills.
        assert_eq!(
            tailored.summary,
            "Engineer building <emphasis>Rust</emphasis> services on PostgreSQL and Kubernetes."
        );
        assert!(tailored.experience[1]
            .achievements
            .iter()
            .all(|a| !a.contains(EMPHASIS_OPEN)));
    }

    #[test]
    fn test_experience_from_completed_stage() {
        let original = sample_profile();
        let mut reordered = original.experience.clone();
        reordered[0].achievements.reverse();

        let tailored = assemble(
            &original,
            failed(),
            failed(),
            StageOutcome::Completed(reordered),
            JOB,
        );
        assert_eq!(
            tailored.experience[0].achievements[0],
            "Migrated 30 services to <emphasis>Kubernetes</emphasis>"
        );
        assert_eq!(
            tailored.experience[0].achievements[2],
            "Designed a billing pipeline in Python"
        );
    }

    #[test]
    fn test_title_is_not_highlighted() {
        let original = sample_profile();
        let tailored = assemble(
            &original,
            StageOutcome::Completed(SummaryTitle {
                title: "Rust Engineer".to_string(),
                summary: "x".to_string(),
            }),
            failed(),
            failed(),
            JOB,
        );
        assert_eq!(tailored.title, "Rust Engineer");
    }
}

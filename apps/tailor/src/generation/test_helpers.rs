//! Shared fixtures for generation tests: a scripted `TextCompleter` and a sample profile.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::generation::prompts::{EXPERIENCE_TASK, SKILLS_TASK};
use crate::generation::stages::Stage;
use crate::llm_client::{CompletionRequest, LlmError, TextCompleter};
use crate::models::{
    Activity, ApplicantProfile, Education, Experience, PersonalInfo, Skill, SkillYears,
};

/// What the scripted completer does for a stage.
#[derive(Debug, Clone)]
pub enum Reply {
    Text(String),
    Fail,
    /// Never resolves; exercises timeouts and cancellation.
    Hang,
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Text(text.into())
    }
}

/// Routes each prompt to a per-stage reply by its task header and counts calls.
pub struct ScriptedCompleter {
    summary: Reply,
    skills: Reply,
    experience: Reply,
    calls: [AtomicUsize; 3],
}

impl ScriptedCompleter {
    pub fn new(summary: Reply, skills: Reply, experience: Reply) -> Self {
        Self {
            summary,
            skills,
            experience,
            calls: Default::default(),
        }
    }

    pub fn uniform(reply: Reply) -> Self {
        Self::new(reply.clone(), reply.clone(), reply)
    }

    pub fn calls_for(&self, stage: Stage) -> usize {
        self.calls[Self::slot(stage)].load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|c| c.load(Ordering::SeqCst)).sum()
    }

    fn slot(stage: Stage) -> usize {
        match stage {
            Stage::SummaryTitle => 0,
            Stage::SkillsFilter => 1,
            Stage::ExperienceReorder => 2,
        }
    }

    fn route(prompt: &str) -> Stage {
        if prompt.starts_with(SKILLS_TASK) {
            Stage::SkillsFilter
        } else if prompt.starts_with(EXPERIENCE_TASK) {
            Stage::ExperienceReorder
        } else {
            Stage::SummaryTitle
        }
    }
}

#[async_trait]
impl TextCompleter for ScriptedCompleter {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String, LlmError> {
        let stage = Self::route(request.prompt);
        self.calls[Self::slot(stage)].fetch_add(1, Ordering::SeqCst);
        let reply = match stage {
            Stage::SummaryTitle => &self.summary,
            Stage::SkillsFilter => &self.skills,
            Stage::ExperienceReorder => &self.experience,
        };
        match reply {
            Reply::Text(text) => Ok(text.clone()),
            Reply::Fail => Err(LlmError::Api {
                status: 503,
                message: "overloaded".to_string(),
            }),
            Reply::Hang => std::future::pending().await,
        }
    }
}

pub fn sample_profile() -> ApplicantProfile {
    let mut profile = ApplicantProfile {
        personal_info: PersonalInfo {
            name: "Ada Example".to_string(),
            title: "Software Engineer".to_string(),
            email: Some("ada@example.com".to_string()),
            phone: None,
            location: Some("Berlin".to_string()),
            links: vec!["https://github.com/ada".to_string()],
        },
        summary: "Engineer building Rust services on PostgreSQL and Kubernetes.".to_string(),
        experience: vec![
            Experience {
                role: "Backend Engineer".to_string(),
                company: "Acme".to_string(),
                location: "Remote".to_string(),
                start_date: "2021".to_string(),
                end_date: "Present".to_string(),
                achievements: vec![
                    "Designed a billing pipeline in Python".to_string(),
                    "Cut p99 latency 40% by rewriting the hot path in Rust".to_string(),
                    "Migrated 30 services to Kubernetes".to_string(),
                ],
            },
            Experience {
                role: "Developer".to_string(),
                company: "Globex".to_string(),
                location: "Berlin".to_string(),
                start_date: "2018".to_string(),
                end_date: "2021".to_string(),
                achievements: vec![
                    "Maintained a C++ trading engine".to_string(),
                    "Tuned PostgreSQL queries for reporting".to_string(),
                ],
            },
        ],
        education: vec![Education {
            institution: "TU Example".to_string(),
            degree: "BSc".to_string(),
            field: "Computer Science".to_string(),
            start_date: "2014".to_string(),
            end_date: "2018".to_string(),
            details: vec![],
        }],
        activities: vec![Activity {
            name: "Rust meetup".to_string(),
            role: "Organizer".to_string(),
            description: "Monthly talks".to_string(),
        }],
        ..Default::default()
    };
    profile.skills.insert(
        "Languages".to_string(),
        vec![
            Skill::new("Rust", SkillYears::Number(5.0)),
            Skill::new("Python", SkillYears::Number(3.0)),
            Skill::new("C++", SkillYears::Text("2+".to_string())),
        ],
    );
    profile.skills.insert(
        "Databases".to_string(),
        vec![Skill::new("PostgreSQL", SkillYears::Number(4.0))],
    );
    profile.skills.insert(
        "Tools".to_string(),
        vec![
            Skill::new("Kubernetes", SkillYears::Number(2.0)),
            Skill::new("Terraform", SkillYears::Number(1.0)),
        ],
    );
    profile
}

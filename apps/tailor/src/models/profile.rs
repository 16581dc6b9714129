use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Years of experience as supplied by the profile owner: either a number or
/// free text such as "5+" or "<1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SkillYears {
    Number(f64),
    Text(String),
}

impl Default for SkillYears {
    fn default() -> Self {
        SkillYears::Text(String::new())
    }
}

impl fmt::Display for SkillYears {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillYears::Number(n) if n.fract() == 0.0 => write!(f, "{}", *n as i64),
            SkillYears::Number(n) => write!(f, "{n}"),
            SkillYears::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    #[serde(default)]
    pub years: SkillYears,
}

impl Skill {
    pub fn new(name: impl Into<String>, years: SkillYears) -> Self {
        Self {
            name: name.into(),
            years,
        }
    }
}

/// Category name → ordered skills. Categories keep the order the profile lists them in.
///
/// `IndexMap` equality ignores key order; compare `keys()` when order matters.
pub type SkillsByCategory = IndexMap<String, Vec<Skill>>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    pub name: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub links: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub institution: String,
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub details: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub name: String,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub description: String,
}

/// The canonical applicant profile. Treated as immutable for the duration of a request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicantProfile {
    pub personal_info: PersonalInfo,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub skills: SkillsByCategory,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub activities: Vec<Activity>,
}

impl ApplicantProfile {
    /// Drops case-insensitive duplicate skills within each category, keeping the
    /// first occurrence, and removes categories left empty.
    pub fn normalized(mut self) -> Self {
        for skills in self.skills.values_mut() {
            let mut seen = HashSet::new();
            skills.retain(|s| {
                let key = s.name.trim().to_lowercase();
                !key.is_empty() && seen.insert(key)
            });
        }
        self.skills.retain(|_, skills| !skills.is_empty());
        self
    }
}

/// Field-wise merge of an `ApplicantProfile` with the tailoring stage outputs.
/// Free-text fields carry emphasis markers around job-relevant skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TailoredProfile {
    pub personal_info: PersonalInfo,
    pub title: String,
    pub summary: String,
    pub skills: SkillsByCategory,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub activities: Vec<Activity>,
}

impl TailoredProfile {
    /// Flattened skill names across all categories, in category order.
    pub fn skill_names(&self) -> Vec<String> {
        flatten_skill_names(&self.skills)
    }
}

pub fn flatten_skill_names(skills: &SkillsByCategory) -> Vec<String> {
    skills
        .values()
        .flat_map(|list| list.iter().map(|s| s.name.clone()))
        .collect()
}

pub mod profile;

pub use profile::{
    flatten_skill_names, Activity, ApplicantProfile, Education, Experience, PersonalInfo, Skill,
    SkillYears, SkillsByCategory, TailoredProfile,
};

// Prompt templates for the three tailoring stages.
// Placeholders are substituted in one pass by `fill_template`.

/// First line of the summary/title prompt. Also used to route scripted completions in tests.
pub const SUMMARY_TASK: &str = "TASK: Tailor the professional title and summary.";
pub const SKILLS_TASK: &str = "TASK: Select the skills relevant to the job.";
pub const EXPERIENCE_TASK: &str = "TASK: Reorder experience achievements by relevance.";

/// Stage A. Replace: {factuality}, {job_text}, {title}, {summary}, {skills_json}, {experience_json}
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"TASK: Tailor the professional title and summary.

{factuality}

JOB DESCRIPTION:
{job_text}

CURRENT TITLE:
{title}

CURRENT SUMMARY:
{summary}

SKILLS BY CATEGORY:
{skills_json}

EXPERIENCE:
{experience_json}

Write a professional title and a 2-4 sentence summary that position this applicant for the job above.
Lead with the experience and skills the job asks for. Keep the applicant's voice; do not exaggerate seniority.

Return a JSON object with EXACTLY these keys:
{
  "title": "Senior Backend Engineer",
  "summary": "Backend engineer with ..."
}"#;

/// Stage B. Replace: {factuality}, {job_text}, {skills_json}
pub const SKILLS_PROMPT_TEMPLATE: &str = r#"TASK: Select the skills relevant to the job.

{factuality}

JOB DESCRIPTION:
{job_text}

APPLICANT SKILLS BY CATEGORY:
{skills_json}

Return the applicant's skills map reduced to what matters for this job:
1. Keep every skill the job description asks for, directly or through an equivalent name.
2. In each category that keeps at least one skill, also keep ONE additional skill from that
   category that the job does not mention, choosing the strongest remaining one.
3. Drop categories with no relevant skills.
4. Copy skill names and years EXACTLY as given. Never add a skill that is not listed above.

Return a JSON object with the SAME shape as the input:
{
  "Category Name": [{"name": "Skill", "years": 3}]
}"#;

/// Stage C. Replace: {factuality}, {job_text}, {experience_json}
pub const EXPERIENCE_PROMPT_TEMPLATE: &str = r#"TASK: Reorder experience achievements by relevance.

{factuality}

JOB DESCRIPTION:
{job_text}

EXPERIENCE:
{experience_json}

For each experience entry, reorder its "achievements" so the bullets most relevant to the job come first.

HARD RULES:
1. Keep the entries in the same order, with the same role, company, location, startDate and endDate.
2. Every achievement must appear exactly once, word for word. Do not edit, merge, split, add or drop bullets.

Return a JSON ARRAY with the same shape as the input."#;

/// Substitutes `{name}` placeholders in a single left-to-right pass.
///
/// Substituted values are never rescanned, so profile text that happens to contain
/// `{job_text}` stays literal. Unknown `{...}` sequences are copied through unchanged.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(at) = rest.find('{') {
        out.push_str(&rest[..at]);
        let tail = &rest[at + 1..];
        let hit = values.iter().find(|(name, _)| {
            tail.strip_prefix(name)
                .is_some_and(|after| after.starts_with('}'))
        });
        match hit {
            Some((name, value)) => {
                out.push_str(value);
                rest = &tail[name.len() + 1..];
            }
            None => {
                out.push('{');
                rest = tail;
            }
        }
    }
    out.push_str(rest);
    out
}

// Shared prompt fragments. Each stage defines its own template in generation::prompts.

/// System prompt that steers every completion toward bare JSON output.
/// Responses are still parsed as untrusted text.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise resume tailoring assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Appended to every stage prompt.
pub const FACTUALITY_INSTRUCTION: &str = "\
    CRITICAL: Use only facts present in the applicant data provided. \
    Do NOT invent employers, dates, metrics, skills, or achievements.";

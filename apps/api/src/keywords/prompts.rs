// Prompt constants for remote keyword extraction.
// Every provider receives the same prompt; only the envelope around it differs.

/// Keyword extraction prompt template. Replace `{jd_text}` before sending.
pub const KEYWORD_PROMPT_TEMPLATE: &str = r#"Analyze this job description for Big 4 or bulge bracket finance roles and extract ATS-optimized keywords. Focus on finance, banking, consulting, and accounting terminology.

Job Description:
{jd_text}

Return ONLY a JSON object with this exact structure:
{
  "highPriority": ["keyword1", "keyword2"],
  "mediumPriority": ["keyword3", "keyword4"],
  "technicalSkills": ["skill1", "skill2"],
  "softSkills": ["skill1", "skill2"],
  "industryTerms": ["term1", "term2"],
  "actionVerbs": ["verb1", "verb2"]
}

Extract 6-10 keywords per category. Focus on terms that would appear in ATS systems for finance roles. DO NOT include any text outside the JSON object."#;

pub fn build_keyword_prompt(jd_text: &str) -> String {
    KEYWORD_PROMPT_TEMPLATE.replace("{jd_text}", jd_text)
}

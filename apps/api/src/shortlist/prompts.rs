// Prompt constants for AI shortlisting.

/// System instruction for the ATS evaluator.
pub const SHORTLIST_SYSTEM: &str = "You are an ATS (Applicant Tracking System) assistant. \
    You evaluate one applicant at a time against a job description. \
    You MUST respond with a single valid JSON object and nothing else.";

/// ATS prompt template. Replace `{application_id}`, `{cover_letter}`, `{resume}`
/// and `{job_description}` before sending.
pub const SHORTLIST_PROMPT_TEMPLATE: &str = r#"Given a resume and a job description, analyze the fit and return the following in JSON format:
{
  "applicationId": "{application_id}",
  "matchScore": (integer from 0 to 100),
  "matchedSummary": [
    "Highlight 1 - a key match between the resume and job description",
    "Highlight 2 - another strong alignment",
    "Optional Highlight 3"
  ],
  "shortlistingDecision": "✅ Shortlist" or "❌ Reject",
  "reason": "Brief but insightful justification for the decision",
  "consider": true or false
}

Cover letter:
{cover_letter}

Resume:
{resume}

Job Description:
{job_description}
"#;

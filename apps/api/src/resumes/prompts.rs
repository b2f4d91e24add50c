// Prompt constants for structured resume extraction.

/// Resume extraction prompt template. Replace `{resume_text}` before sending.
pub const RESUME_EXTRACT_PROMPT_TEMPLATE: &str = r#"You are an AI system that extracts structured information from resumes.
Given the resume text below, identify the candidate's details and return them in the JSON format shown.
If any information is missing, use an empty string for that field or an empty array for lists.
Be accurate and concise. Make the tagline from the resume content and the about field a short summary.

Resume Text:
{resume_text}

Output JSON ONLY:
{
  "personal": {
    "tagline": "",
    "about": "",
    "email": "",
    "state": "",
    "skills": []
  },
  "education": [
    {
      "college_university": "",
      "graduation_year": "",
      "field_of_study": "",
      "degree": ""
    }
  ],
  "projects": [
    {
      "title": "",
      "link": "",
      "description": "",
      "technologies": []
    }
  ],
  "work_experience": [
    {
      "job_title": "",
      "company": "",
      "duration": "",
      "responsibilities": ""
    }
  ]
}
"#;

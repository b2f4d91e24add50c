// Prompt constants for resume analysis and job-description generation.

/// System instruction for resume analysis.
pub const RESUME_ANALYSIS_SYSTEM: &str = "You are an expert career coach and recruiter. \
    You MUST respond with valid JSON only. \
    Do NOT add explanations or text outside the JSON.";

/// Resume analysis prompt. Replace `{resume_text}` and `{job}` before sending.
pub const RESUME_ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the following resume in the context of the given job details.
Return the analysis in strictly JSON format with this schema:

{
  "matchScore": "<percentage from 0 to 100>",
  "resumeAnalysis": {
    "summary": "<2-3 line summary of candidate profile>",
    "matchingSkills": ["skill1", "skill2", "skill3"],
    "missingSkills": ["skillA", "skillB"],
    "experience": "<3-5 line summary of relevant work experience>",
    "education": "<summary of educational qualifications>",
    "about": {
      "extracurricular": "<extracurriculars or projects>",
      "certifications": "<certifications>",
      "other": "<any other useful highlights>"
    }
  }
}

If a section is not available in the resume, output "N/A".

---
Resume:
{resume_text}

Job details:
{job}
"#;

/// Job description prompt. Replace every `{field}` before sending.
pub const JOB_DESCRIPTION_PROMPT_TEMPLATE: &str = r#"You are an expert recruiter. Using the following job details, generate a professional job description in the exact format below:

- Job Title: {job_title}
- Company Name: {company_name}
- Job Type: {job_type}
- Location: {location}
- Salary: {salary}
- Application Expiry Date: {expiry_date}
- Required Skills: {skills}

Start with a **1-line summary under 20 words** about the role (do not include company or title).

Then write the full job description using the following **exact numbered format** (do not skip any section):

1. **About the Company**
Introduce the company: its mission, industry, what it does, and why it's a great place to work.

2. **Job Overview**
Describe the job in detail: responsibilities, the team, who the company is looking for, and what impact the person will make.

3. **Responsibilities** (each as a new line)
- Use bullet points
- Focus on real tasks the candidate will do

4. **Requirements** (each as a new line)
- Use bullet points
- Mention skills, qualifications, tools, tech, or experience

5. **Benefits**
Mention perks, work environment, flexibility, or compensation.

End with a 1-line call-to-action encouraging candidates to apply before the expiry date.

Use **markdown formatting** with bold section titles and blank lines between bullet points for clear readability.

Keep total word count under 300.
"#;

pub mod handlers;
pub mod job_description;
pub mod prompts;
pub mod resume_analysis;

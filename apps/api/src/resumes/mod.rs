// Resume extraction: fetch → model → structured profile → resume_profiles upsert.

pub mod extract;
pub mod handlers;
pub mod prompts;
pub mod store;

// AI shortlisting: Resume Fetcher → Batch Evaluator → Response Parser → Aggregator.
// All model calls go through llm_client::GenerativeBackend.

pub mod evaluator;
pub mod fetcher;
pub mod handlers;
pub mod models;
pub mod parser;
pub mod pipeline;
pub mod prompts;

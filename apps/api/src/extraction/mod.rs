// Parameter extraction: prompt → LLM (ordered failover) → JSON → normalized parameters.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod attribution;
pub mod orchestrator;
pub mod parser;
pub mod prompts;

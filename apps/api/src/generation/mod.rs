// Article generation: drafting, backgrounds, assembly, and the guarded run pipeline.
// All LLM calls go through llm_client — no direct Gemini HTTP calls here.

pub mod assembler;
pub mod generator;
pub mod handlers;
pub mod imagery;
pub mod pipeline;
pub mod prompts;

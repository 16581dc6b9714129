// Resume tailoring engine.
// Implements: stage prompts and parsers, concurrent orchestration, assembly with highlighting.
// All LLM calls go through the `TextCompleter` seam in llm_client.

pub mod assembler;
pub mod generator;
pub mod orchestrator;
pub mod prompts;
pub mod stages;

#[cfg(test)]
pub(crate) mod test_helpers;

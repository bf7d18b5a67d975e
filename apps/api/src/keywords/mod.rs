// Keyword Extraction Engine
// Term database → lexical matcher → (optional) remote provider → normalized result.
// All provider calls go through llm_client — nothing here talks HTTP directly.

pub mod extractor;
pub mod handlers;
pub mod matcher;
pub mod models;
pub mod prompts;
pub mod terms;

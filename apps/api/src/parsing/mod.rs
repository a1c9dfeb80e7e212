// Résumé parsing: uploaded file → raw text → flattened text → model → JSON envelope.
// All model traffic goes through llm_client; nothing here talks HTTP directly.

pub mod error;
pub mod extractor;
pub mod handlers;
pub mod lenient_json;
pub mod pipeline;
pub mod preprocess;
pub mod prompts;

#[cfg(test)]
pub mod fixtures;

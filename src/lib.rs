//! Retrieval-augmented question answering over discussion threads
//!
//! Text is split into overlapping sentence chunks, embedded into a vector
//! index, retrieved by a blend of vector similarity and lexical overlap,
//! optionally reordered by a language model, and handed to a language model
//! for a grounded answer.

pub mod chunking;
pub mod cli;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod index;
pub mod llm;
pub mod logging;
pub mod models;
pub mod rag;
pub mod search;


pub use config::AppConfig;
pub use errors::*;

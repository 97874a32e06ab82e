//! quizsmith-core: quiz model, completion parser, scorer and service.
//!
//! This crate defines the data model, the parser that turns a model
//! completion into questions, the submission scorer, and the service that
//! wires them to an LLM provider and injected repositories.

pub mod error;
pub mod history;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod scoring;
pub mod service;
pub mod store;
pub mod traits;

// HTTP gateway
pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;

// Chat backend
pub mod answer;
pub mod config;
pub mod knowledge;
pub mod leads;
pub mod pages;
pub mod prompt;
pub mod state;

// LLM abstraction layer
pub mod llm;

pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod profiles;
pub mod state;

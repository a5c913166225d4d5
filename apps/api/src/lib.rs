//! covergen: tailored cover letters streamed from a language model, with a
//! fit score and a local history of past applications.
//!
//! Server side: [`generation`] behind [`routes`]. Client side: [`client`].

pub mod client;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod routes;
pub mod state;
pub mod telemetry;

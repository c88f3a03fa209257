//! S1NGULARITY recruiting assistant console.
//!
//! A terminal client for the S1NGULARITY backend: upload a resume PDF,
//! chat with the assistant, fire canned quick actions and read the
//! candidate analysis the backend attaches to its replies.

pub mod api_client;
pub mod config;
pub mod conversation;
pub mod desk;
pub mod errors;
pub mod feedback;
pub mod health;
pub mod models;
pub mod render;
pub mod repl;
pub mod session;
pub mod upload;

#[cfg(test)]
mod testing;

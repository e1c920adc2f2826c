//! AI painting studio - turns a theme into a painting description and an image
//!
//! A small axum service in front of OpenAI: an assistant writes the
//! description through a thread run, the image API renders it, and a studio
//! client (browser page or CLI) drives the two steps.

pub mod ai;
pub mod app;
pub mod error;
pub mod models;
pub mod poll;
pub mod prompts;
pub mod server;
pub mod studio;

pub use error::{Error, Result};

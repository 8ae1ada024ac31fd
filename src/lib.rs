//! botforge - a multi-chatbot knowledge platform
//!
//! This crate provides:
//! - Per-chatbot document ingestion (extract, chunk, embed, index)
//! - Similarity-based retrieval over per-chatbot vector collections
//! - Personality-shaped response composition
//! - A thin CLI surface over the core pipeline

pub mod chunk;
pub mod commands;
pub mod config;
pub mod embed;
pub mod error;
pub mod extract;
pub mod index;
pub mod meta;
pub mod pipeline;
pub mod respond;

pub use config::Config;
pub use error::{Error, Result};

//! CLI command implementations

mod delete;
mod documents;
mod ingest;
mod init;
mod query;
mod respond;
mod status;

pub use delete::*;
pub use documents::*;
pub use ingest::*;
pub use init::*;
pub use query::*;
pub use respond::*;
pub use status::*;

use crate::config::Config;
use crate::embed::create_embedder;
use crate::error::Result;
use crate::index::create_index;
use crate::pipeline::{Pipeline, PipelineOptions};
use crate::respond::{create_generator, ResponseComposer};

/// Assemble the pipeline from configuration
pub async fn build_pipeline(config: &Config) -> Result<Pipeline> {
    let embedder = create_embedder(&config.embedding)?;
    let index = create_index(&config.index).await?;
    let generator = create_generator(&config.generation)?;
    let composer = ResponseComposer::new(generator, config.generation.candidates);

    Ok(Pipeline::new(
        embedder,
        index,
        composer,
        PipelineOptions {
            max_chunk_size: config.chunk.max_chars,
            embed_batch_size: config.embedding.batch_size,
        },
    ))
}

// src/load/mod.rs
use anyhow::{Context, Result};
use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use std::path::Path;
use tracing::{debug, info};

use crate::table::Table;

mod chunk;

pub use chunk::{Chunk, ChunkReader};

/// Rows per chunk when nothing else is asked for.
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// Knobs for reading a delimited file. The header row is always required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Maximum data rows per chunk; must be at least 1.
    pub chunk_size: usize,
    /// Field separator byte.
    pub delimiter: u8,
    /// Records scanned for type inference; `None` scans the whole file.
    pub infer_rows: Option<usize>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            delimiter: b',',
            infer_rows: None,
        }
    }
}

/// Read `path` in chunks of `chunk_size` rows and concatenate them into one table.
pub fn load<P: AsRef<Path>>(path: P, chunk_size: usize) -> Result<Table> {
    let opts = LoadOptions {
        chunk_size,
        ..LoadOptions::default()
    };
    load_with(path, &opts)
}

/// Eagerly drain the chunk sequence for `path`, then concatenate in read order.
///
/// Every chunk is retained until concatenation, so peak memory is the size of
/// the whole file regardless of `chunk_size`. Use [`read_chunks`] to fold over
/// chunks instead.
#[tracing::instrument(
    level = "info",
    skip(path, opts),
    fields(path = %path.as_ref().display(), chunk_size = opts.chunk_size)
)]
pub fn load_with<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<Table> {
    let reader = read_chunks(path.as_ref(), opts)?;
    let schema = reader.schema();

    let mut chunks: Vec<Chunk> = Vec::new();
    for chunk in reader {
        chunks.push(chunk?);
    }
    debug!(chunks = chunks.len(), "collected chunks");

    let table = concat_chunks(schema, &chunks)?;
    info!(
        rows = table.num_rows(),
        columns = table.num_columns(),
        "loaded table"
    );
    Ok(table)
}

/// Open `path` as a lazy sequence of chunks without materializing anything.
pub fn read_chunks<P: AsRef<Path>>(path: P, opts: &LoadOptions) -> Result<ChunkReader> {
    ChunkReader::open(path.as_ref(), opts)
}

/// Stack `chunks` in order into one table, keeping each chunk's row index.
///
/// An empty slice yields a zero-row table with `schema`'s columns.
pub fn concat_chunks(schema: SchemaRef, chunks: &[Chunk]) -> Result<Table> {
    if chunks.is_empty() {
        return Ok(Table::empty(schema));
    }
    let batch = concat_batches(&schema, chunks.iter().map(Chunk::batch))
        .with_context(|| format!("concatenating {} chunks", chunks.len()))?;
    let index: Vec<u64> = chunks.iter().flat_map(Chunk::index).collect();
    Table::new(batch, index)
}

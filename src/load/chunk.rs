// src/load/chunk.rs

use anyhow::{anyhow, bail, Context, Result};
use arrow::csv::reader::Format;
use arrow::csv::{Reader, ReaderBuilder};
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use std::fs::File;
use std::io::Seek;
use std::iter::FusedIterator;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use super::LoadOptions;

/// One read step's worth of rows.
///
/// `index_start` is the zero-based data-row number of the first row, so the
/// row index of a chunk is `index_start..index_start + num_rows`.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    index_start: u64,
    batch: RecordBatch,
}

impl Chunk {
    pub fn new(index_start: u64, batch: RecordBatch) -> Self {
        Self { index_start, batch }
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn index_start(&self) -> u64 {
        self.index_start
    }

    /// Row-index values carried by this chunk, in row order.
    pub fn index(&self) -> Range<u64> {
        self.index_start..self.index_start + self.batch.num_rows() as u64
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }
}

/// Lazy, finite, non-restartable sequence of [`Chunk`]s over one CSV file.
///
/// The file handle lives inside the reader and is dropped as soon as the
/// sequence ends, either by exhaustion or by the first parse error.
pub struct ChunkReader {
    path: PathBuf,
    schema: SchemaRef,
    inner: Option<Reader<File>>,
    next_index: u64,
    chunks_read: usize,
}

impl ChunkReader {
    /// Open `path`, infer the column types once over the file (or the first
    /// `infer_rows` records) and rewind so every chunk shares that schema.
    pub(crate) fn open(path: &Path, opts: &LoadOptions) -> Result<Self> {
        if opts.chunk_size == 0 {
            bail!("chunk size must be at least 1 row");
        }

        let mut file = File::open(path)
            .with_context(|| format!("opening CSV file {}", path.display()))?;

        let format = Format::default()
            .with_header(true)
            .with_delimiter(opts.delimiter)
            .with_truncated_rows(true);

        let (schema, inferred) = format
            .infer_schema(&mut file, opts.infer_rows)
            .with_context(|| format!("inferring schema of {}", path.display()))?;
        if schema.fields().is_empty() {
            bail!("{} has no header row", path.display());
        }
        debug!(
            path = %path.display(),
            columns = schema.fields().len(),
            inferred_from = inferred,
            "inferred schema"
        );

        file.rewind()
            .with_context(|| format!("rewinding {}", path.display()))?;

        let schema = Arc::new(schema);
        let inner = ReaderBuilder::new(schema.clone())
            .with_format(format)
            .with_batch_size(opts.chunk_size)
            .build(file)
            .with_context(|| format!("creating CSV reader for {}", path.display()))?;

        Ok(Self {
            path: path.to_path_buf(),
            schema,
            inner: Some(inner),
            next_index: 0,
            chunks_read: 0,
        })
    }

    /// Column layout shared by every chunk.
    pub fn schema(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn chunks_read(&self) -> usize {
        self.chunks_read
    }

    pub fn rows_read(&self) -> u64 {
        self.next_index
    }

    /// True once the file handle has been released.
    pub fn is_finished(&self) -> bool {
        self.inner.is_none()
    }
}

impl Iterator for ChunkReader {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        let reader = self.inner.as_mut()?;

        match reader.next() {
            Some(Ok(batch)) if batch.num_rows() > 0 => {
                let chunk = Chunk::new(self.next_index, batch);
                trace!(
                    chunk = self.chunks_read,
                    rows = chunk.num_rows(),
                    index_start = chunk.index_start(),
                    "read chunk"
                );
                self.next_index += chunk.num_rows() as u64;
                self.chunks_read += 1;
                Some(Ok(chunk))
            }
            Some(Ok(_)) | None => {
                debug!(
                    path = %self.path.display(),
                    chunks = self.chunks_read,
                    rows = self.next_index,
                    "chunk sequence exhausted"
                );
                self.inner = None;
                None
            }
            Some(Err(e)) => {
                self.inner = None;
                Some(Err(anyhow!(e).context(format!(
                    "parsing chunk {} of {} (after data row {})",
                    self.chunks_read,
                    self.path.display(),
                    self.next_index
                ))))
            }
        }
    }
}

impl FusedIterator for ChunkReader {}

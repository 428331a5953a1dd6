use anyhow::Result;
use arrow::array::Array;
use chunkload::{load::DEFAULT_CHUNK_SIZE, read_chunks, utils::expand_home, Chunk, LoadOptions};
use std::{env, path::Path, process::exit};

fn main() {
    // Expect a CSV path and an optional chunk size.
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 || args.len() > 3 {
        eprintln!("Usage: {} <CSV_FILE> [CHUNK_SIZE]", args[0]);
        exit(1);
    }
    let chunk_size = match args.get(2).map(|s| s.parse::<usize>()) {
        None => DEFAULT_CHUNK_SIZE,
        Some(Ok(n)) if n > 0 => n,
        Some(_) => {
            eprintln!("CHUNK_SIZE must be a positive integer");
            exit(1);
        }
    };
    let path = expand_home(&args[1]);
    match chunk_stats(&path, chunk_size) {
        Ok(stats) => print_stats(&path, &stats),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            exit(1);
        }
    }
}

/// Running totals over a chunk sequence. Only one chunk is alive at a time.
#[derive(Debug, Default, PartialEq)]
struct ChunkStats {
    chunk_size: usize,
    chunks: usize,
    rows: u64,
    smallest_chunk: Option<usize>,
    largest_chunk: Option<usize>,
    /// (column name, null count)
    nulls: Vec<(String, u64)>,
}

impl ChunkStats {
    fn absorb(mut self, chunk: &Chunk) -> Self {
        let n = chunk.num_rows();
        self.chunks += 1;
        self.rows += n as u64;
        self.smallest_chunk = Some(self.smallest_chunk.map_or(n, |s| s.min(n)));
        self.largest_chunk = Some(self.largest_chunk.map_or(n, |l| l.max(n)));
        for ((_, nulls), col) in self.nulls.iter_mut().zip(chunk.batch().columns()) {
            *nulls += col.null_count() as u64;
        }
        self
    }
}

fn chunk_stats(path: &Path, chunk_size: usize) -> Result<ChunkStats> {
    let opts = LoadOptions {
        chunk_size,
        ..LoadOptions::default()
    };
    let reader = read_chunks(path, &opts)?;
    let initial = ChunkStats {
        chunk_size,
        nulls: reader
            .schema()
            .fields()
            .iter()
            .map(|f| (f.name().to_string(), 0))
            .collect(),
        ..ChunkStats::default()
    };
    reader.fold(Ok(initial), |acc, chunk| Ok(acc?.absorb(&chunk?)))
}

fn print_stats(path: &Path, stats: &ChunkStats) {
    println!("=== Chunks: {} ===", path.display());
    println!("Chunk size:     {}", stats.chunk_size);
    println!("Chunks read:    {}", stats.chunks);
    println!("Data rows:      {}", stats.rows);
    if let (Some(min), Some(max)) = (stats.smallest_chunk, stats.largest_chunk) {
        println!("Rows per chunk: {}..={}", min, max);
    }
    println!();

    println!("=== Columns ===");
    for (name, nulls) in &stats.nulls {
        println!("- {:<30} | nulls: {}", name, nulls);
    }
}

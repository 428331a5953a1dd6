pub mod load;
pub mod table;
pub mod utils;

pub use load::{concat_chunks, load, load_with, read_chunks, Chunk, ChunkReader, LoadOptions};
pub use table::{Table, TableShape};

pub mod datasets;
pub mod fs;
pub mod writer;

pub use datasets::{load_json, Datasets};
pub use fs::{read_to_string, write_atomic, write_atomic_with, FileResolver, ResolvedFile};
pub use writer::{OutputWriter, WriteResult};

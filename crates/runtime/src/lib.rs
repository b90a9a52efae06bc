mod config;
pub mod logging;

pub use config::{
    DEFAULT_EXCLUDE_PATTERNS, DEFAULT_INCREMENTAL_MARKER, HASH_CHUNK_SIZE, HASH_PREFIX_LEN,
    PROGRAM_LOG_FILE, PROGRAM_LOG_LEVEL, PROGRAM_NAME, default_hash_workers,
};

pub use logging::init;

use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong while recovering a native table and call
/// sequence from a single container file.
///
/// Every variant is recoverable at the pairing level: the caller logs it and
/// skips the container pair, it never aborts the run.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("{path}: failed to open container")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: truncated container, expected {needed} more byte(s) at offset {at}")]
    Truncated {
        path: PathBuf,
        at: u64,
        needed: usize,
    },

    #[error("{path}: seek past end of file to offset {offset}")]
    BadOffset { path: PathBuf, offset: u64 },

    #[error("{path}: native index {index} out of range (table has {len} entries)")]
    NativeIndexOutOfRange {
        path: PathBuf,
        index: u16,
        len: usize,
    },
}

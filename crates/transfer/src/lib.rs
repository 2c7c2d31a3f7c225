//! Chunked content upload bookkeeping with resume support.
//!
//! This crate knows nothing about HTTP. It turns a byte stream into
//! contiguous, inclusive-end [`ByteRange`]s, renders and parses the
//! `Content-Range` forms the appliance's upload handshake uses, and tracks
//! the client-side state of one upload.

mod chunked;
mod range;
mod types;

pub use chunked::{Chunk, ChunkReader};
pub use range::{ByteRange, ContentRange, parse_committed};
pub use types::{UploadProgress, UploadSession, UploadState, UploadTracker};

/// Default chunk size: 4 MiB.
///
/// Callers pick the real size per upload; this is used when they pass 0.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024 * 1024;

/// Errors produced by the transfer crate.
#[derive(Debug, thiserror::Error)]
pub enum TransferError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid byte range: {0}")]
    InvalidRange(String),

    #[error("malformed {header} header: {value:?}")]
    MalformedHeader { header: &'static str, value: String },

    #[error("invalid upload transition: {0}")]
    InvalidTransition(String),
}

use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::range::{ByteRange, ContentRange};
use crate::{DEFAULT_CHUNK_SIZE, TransferError};

/// A contiguous slice of upload content.
#[derive(Debug, Clone)]
pub struct Chunk {
    /// Absolute byte offset of `data[0]` within the file.
    pub offset: u64,
    /// Raw chunk data. Never empty.
    pub data: Bytes,
    /// Set on the final chunk of the input.
    pub last: bool,
}

impl Chunk {
    /// The inclusive byte span this chunk covers.
    pub fn range(&self) -> ByteRange {
        ByteRange::spanning(self.offset, self.data.len() as u64)
    }

    /// `Content-Range` value to send this chunk with.
    pub fn content_range(&self) -> ContentRange {
        ContentRange::for_chunk(self.range(), self.last)
    }

    /// Offset where the next chunk starts.
    pub fn end_offset(&self) -> u64 {
        self.offset + self.data.len() as u64
    }
}

/// Reads an async byte stream in fixed-size chunks.
///
/// The reader holds one chunk of lookahead so that the chunk which
/// exhausts the input can be flagged `last`, including when the input
/// length is an exact multiple of the chunk size.
pub struct ChunkReader<R> {
    reader: R,
    chunk_size: usize,
    offset: u64,
    lookahead: Option<Bytes>,
    primed: bool,
}

impl<R: AsyncRead + Unpin> ChunkReader<R> {
    /// Wraps `reader`, starting at offset 0.
    ///
    /// If `chunk_size` is 0, [`DEFAULT_CHUNK_SIZE`] is used.
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self::with_offset(reader, chunk_size, 0)
    }

    /// Wraps a `reader` that is already positioned at byte `offset` of the
    /// file. Chunk offsets are reported relative to the file start.
    pub fn with_offset(reader: R, chunk_size: usize, offset: u64) -> Self {
        let chunk_size = if chunk_size == 0 {
            DEFAULT_CHUNK_SIZE
        } else {
            chunk_size
        };
        Self {
            reader,
            chunk_size,
            offset,
            lookahead: None,
            primed: false,
        }
    }

    /// Reads the next chunk. Returns `None` once the input is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Chunk>, TransferError> {
        if !self.primed {
            self.lookahead = self.fill().await?;
            self.primed = true;
        }

        let Some(data) = self.lookahead.take() else {
            return Ok(None);
        };
        self.lookahead = self.fill().await?;

        let chunk = Chunk {
            offset: self.offset,
            last: self.lookahead.is_none(),
            data,
        };
        self.offset = chunk.end_offset();
        Ok(Some(chunk))
    }

    /// Offset of the next chunk to be returned.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Configured chunk size in bytes.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Reads up to `chunk_size` bytes, tolerating short reads.
    async fn fill(&mut self) -> Result<Option<Bytes>, TransferError> {
        let mut buf = vec![0u8; self.chunk_size];
        let mut filled = 0;
        while filled < buf.len() {
            let n = self.reader.read(&mut buf[filled..]).await?;
            if n == 0 {
                break;
            }
            filled += n;
        }
        if filled == 0 {
            return Ok(None);
        }
        buf.truncate(filled);
        Ok(Some(Bytes::from(buf)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn collect<R: AsyncRead + Unpin>(mut reader: ChunkReader<R>) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        while let Some(chunk) = reader.next_chunk().await.unwrap() {
            chunks.push(chunk);
        }
        chunks
    }

    #[tokio::test]
    async fn splits_with_short_tail() {
        let data = vec![7u8; 12_345];
        let chunks = collect(ChunkReader::new(&data[..], 5000)).await;

        let sizes: Vec<usize> = chunks.iter().map(|c| c.data.len()).collect();
        assert_eq!(sizes, vec![5000, 5000, 2345]);
        let flags: Vec<bool> = chunks.iter().map(|c| c.last).collect();
        assert_eq!(flags, vec![false, false, true]);

        assert_eq!(chunks[0].content_range().to_string(), "bytes 0-4999/*");
        assert_eq!(chunks[1].content_range().to_string(), "bytes 5000-9999/*");
        assert_eq!(
            chunks[2].content_range().to_string(),
            "bytes 10000-12344/12345"
        );
    }

    #[tokio::test]
    async fn aligned_input_marks_last_full_chunk() {
        let data = vec![1u8; 8];
        let chunks = collect(ChunkReader::new(&data[..], 4)).await;
        assert_eq!(chunks.len(), 2);
        assert!(!chunks[0].last);
        assert!(chunks[1].last);
        assert_eq!(chunks[1].content_range().to_string(), "bytes 4-7/8");
    }

    #[tokio::test]
    async fn empty_input_yields_nothing() {
        let data: &[u8] = &[];
        let mut reader = ChunkReader::new(data, 4);
        assert!(reader.next_chunk().await.unwrap().is_none());
        assert!(reader.next_chunk().await.unwrap().is_none());
        assert_eq!(reader.offset(), 0);
    }

    #[tokio::test]
    async fn chunks_are_contiguous() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let chunks = collect(ChunkReader::new(&data[..], 97)).await;

        let mut expected = 0u64;
        let mut joined = Vec::new();
        for chunk in &chunks {
            assert_eq!(chunk.offset, expected);
            expected = chunk.end_offset();
            joined.extend_from_slice(&chunk.data);
        }
        assert_eq!(expected, 1000);
        assert_eq!(joined, data);
        assert_eq!(chunks.iter().filter(|c| c.last).count(), 1);
    }

    #[tokio::test]
    async fn offset_start_shifts_ranges() {
        let tail = vec![0u8; 2345];
        let chunks = collect(ChunkReader::with_offset(&tail[..], 5000, 10_000)).await;
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].offset, 10_000);
        assert_eq!(
            chunks[0].content_range().to_string(),
            "bytes 10000-12344/12345"
        );
    }

    #[tokio::test]
    async fn zero_chunk_size_uses_default() {
        let data = b"x";
        let reader = ChunkReader::new(&data[..], 0);
        assert_eq!(reader.chunk_size(), DEFAULT_CHUNK_SIZE);
    }

    #[tokio::test]
    async fn tolerates_short_reads() {
        let (client, mut server) = tokio::io::duplex(3);
        tokio::spawn(async move {
            use tokio::io::AsyncWriteExt;
            server.write_all(b"abcdefghij").await.unwrap();
        });

        let chunks = collect(ChunkReader::new(client, 4)).await;
        let sizes: Vec<usize> = chunks.iter().map(|c| c.data.len()).collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(&chunks[2].data[..], b"ij");
    }
}

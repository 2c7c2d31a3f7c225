//! Resumable chunked content upload.
//!
//! An upload is a sequence of `PUT files/<id>/content` requests:
//!
//! 1. open a session (`Content-Range: bytes */*`) and keep its `Upload-ID`;
//! 2. send chunks in order with inclusive ranges, `bytes <s>-<e>/*`;
//! 3. close with the terminal chunk, `bytes <s>-<e>/<total>`, or with
//!    `bytes */<total>` when no bytes remain to be sent.
//!
//! After an interruption, `bytes /*/` asks the appliance how many bytes it
//! already holds and the drive continues from there. Chunks are strictly
//! sequential: chunk N+1 is only sent once chunk N was acknowledged.
//!
//! Nothing here locks against other writers. Two drives racing on one file
//! are arbitrated by the appliance's `If-Match` check when a session opens.

use std::io::SeekFrom;

use aerofs_transfer::{
    ChunkReader, ContentRange, DEFAULT_CHUNK_SIZE, UploadProgress, UploadSession, UploadState,
    UploadTracker, parse_committed,
};
use bytes::Bytes;
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tokio::io::{AsyncRead, AsyncSeek, AsyncSeekExt};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::client::{Client, Preconditions, Unpacked, header_value};
use crate::error::Error;
use crate::routes::Route;

/// Request header carrying the session token.
pub const UPLOAD_ID: HeaderName = HeaderName::from_static("upload-id");

/// Per-drive settings.
#[derive(Debug, Clone)]
pub struct UploadOptions {
    /// Bytes per chunk. 0 selects [`DEFAULT_CHUNK_SIZE`].
    pub chunk_size: usize,
    /// File offset the reader is positioned at. Non-zero when continuing a
    /// partially committed upload.
    pub offset: u64,
    /// Receives a snapshot on every state change.
    pub progress: Option<mpsc::UnboundedSender<UploadProgress>>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            offset: 0,
            progress: None,
        }
    }
}

impl UploadOptions {
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn progress(mut self, tx: mpsc::UnboundedSender<UploadProgress>) -> Self {
        self.progress = Some(tx);
        self
    }
}

/// Outcome of a completed drive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReport {
    pub state: UploadState,
    /// Offset the drive started from.
    pub resumed_from: u64,
    /// Content bytes sent by this drive.
    pub bytes_sent: u64,
    /// Requests sent by this drive, including an empty terminal request.
    pub requests: usize,
    /// `ETag` of the new file version, if the appliance returned one.
    pub etag: Option<String>,
}

impl UploadReport {
    /// Final file length.
    pub fn total(&self) -> u64 {
        self.state.committed()
    }
}

/// Chunks and committed-bytes queries are scoped by `Upload-ID` alone; the
/// session's etags were checked when it opened.
fn session_headers(session: &UploadSession) -> Result<HeaderMap, Error> {
    let mut headers = HeaderMap::new();
    headers.insert(UPLOAD_ID, header_value(&session.upload_id)?);
    Ok(headers)
}

fn content_range(range: ContentRange) -> Result<HeaderValue, Error> {
    header_value(&range.to_string())
}

impl Client {
    /// Opens an upload session for file `file_id`.
    ///
    /// `etags` are the caller's last known versions of the file; the
    /// appliance rejects the session with `412` when they are stale. An
    /// empty list opens unconditionally.
    pub async fn open_upload(&self, file_id: &str, etags: &[String]) -> Result<UploadSession, Error> {
        let mut headers = Preconditions::if_match(etags).headers()?;
        headers.insert(CONTENT_RANGE, content_range(ContentRange::Open)?);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

        let response = self
            .call(Method::PUT, Route::FileContent(file_id), &[], headers, None)
            .await?;
        let upload_id = response
            .header(UPLOAD_ID.as_str())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::Parse {
                header: "Upload-ID",
                value: String::new(),
            })?;

        info!(file_id, upload_id, "upload session opened");
        Ok(UploadSession::new(file_id, upload_id, etags.to_vec()))
    }

    /// Asks how many bytes of `session` the appliance already holds.
    pub async fn committed_bytes(&self, session: &UploadSession) -> Result<u64, Error> {
        let mut headers = session_headers(session)?;
        headers.insert(CONTENT_RANGE, content_range(ContentRange::Query)?);
        headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));

        let response = self
            .call(Method::PUT, Route::FileContent(&session.file_id), &[], headers, None)
            .await?;
        let committed = parse_committed(response.header("Range").unwrap_or_default())?;
        debug!(upload_id = %session.upload_id, committed, "committed bytes");
        Ok(committed)
    }

    /// Sends one chunk. `data` must be exactly as long as `range` says; an
    /// [`ContentRange::Empty`] terminal takes no data.
    ///
    /// Resending an identical chunk is safe once [`Client::committed_bytes`]
    /// shows it was not stored.
    pub async fn upload_chunk(
        &self,
        session: &UploadSession,
        range: ContentRange,
        data: Bytes,
    ) -> Result<Unpacked, Error> {
        let expected = match range {
            ContentRange::Partial(r) | ContentRange::Final { range: r, .. } => r.len(),
            ContentRange::Empty { .. } => 0,
            ContentRange::Open | ContentRange::Query => {
                return Err(Error::InvalidRequest(format!(
                    "{range} does not address content"
                )));
            }
        };
        if data.len() as u64 != expected {
            return Err(Error::InvalidRequest(format!(
                "{range} needs {expected} bytes, got {}",
                data.len()
            )));
        }

        let mut headers = session_headers(session)?;
        headers.insert(CONTENT_RANGE, content_range(range)?);
        let body = if data.is_empty() {
            headers.insert(CONTENT_LENGTH, HeaderValue::from_static("0"));
            None
        } else {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));
            Some(data)
        };

        debug!(upload_id = %session.upload_id, %range, "sending chunk");
        self.call(Method::PUT, Route::FileContent(&session.file_id), &[], headers, body)
            .await
    }

    /// Uploads everything `reader` yields into `session`, starting at
    /// `options.offset`, and closes the upload.
    ///
    /// Stops at the first failure; the session stays open on the appliance
    /// and [`Client::resume_upload`] can pick it up.
    pub async fn upload_file<R>(
        &self,
        session: &UploadSession,
        reader: R,
        options: UploadOptions,
    ) -> Result<UploadReport, Error>
    where
        R: AsyncRead + Unpin,
    {
        let mut tracker = UploadTracker::for_session(session);
        if let Some(tx) = options.progress {
            tracker = tracker.with_progress(tx);
        }
        let mut chunks = ChunkReader::with_offset(reader, options.chunk_size, options.offset);

        match self.drive(session, &mut chunks, &mut tracker, options.offset).await {
            Ok(report) => {
                info!(
                    file_id = %session.file_id,
                    total = report.total(),
                    requests = report.requests,
                    "upload completed"
                );
                Ok(report)
            }
            Err(e) => {
                tracker.fail();
                warn!(
                    file_id = %session.file_id,
                    upload_id = %session.upload_id,
                    offset = chunks.offset(),
                    error = %e,
                    "upload failed"
                );
                Err(e)
            }
        }
    }

    /// Continues `session` from whatever the appliance already holds.
    /// `reader` is seeked to that offset; `options.offset` is ignored.
    pub async fn resume_upload<R>(
        &self,
        session: &UploadSession,
        mut reader: R,
        mut options: UploadOptions,
    ) -> Result<UploadReport, Error>
    where
        R: AsyncRead + AsyncSeek + Unpin,
    {
        let committed = self.committed_bytes(session).await?;
        reader.seek(SeekFrom::Start(committed)).await?;
        info!(upload_id = %session.upload_id, committed, "resuming upload");

        options.offset = committed;
        self.upload_file(session, reader, options).await
    }

    async fn drive<R>(
        &self,
        session: &UploadSession,
        chunks: &mut ChunkReader<R>,
        tracker: &mut UploadTracker,
        start: u64,
    ) -> Result<UploadReport, Error>
    where
        R: AsyncRead + Unpin,
    {
        if start > 0 {
            tracker.advance(start)?;
        }
        let mut report = UploadReport {
            state: tracker.state(),
            resumed_from: start,
            bytes_sent: 0,
            requests: 0,
            etag: None,
        };

        loop {
            let Some(chunk) = chunks.next_chunk().await? else {
                // Nothing left to send: zero-length content, or a resumed
                // upload whose bytes are all committed already.
                let total = chunks.offset();
                let response = self
                    .upload_chunk(session, ContentRange::Empty { total }, Bytes::new())
                    .await?;
                report.requests += 1;
                report.etag = response.etag().map(String::from);
                tracker.complete(total)?;
                break;
            };

            let range = chunk.content_range();
            let end = chunk.end_offset();
            let sent = chunk.data.len() as u64;
            let response = self.upload_chunk(session, range, chunk.data).await?;
            report.requests += 1;
            report.bytes_sent += sent;

            if chunk.last {
                report.etag = response.etag().map(String::from);
                tracker.complete(end)?;
                break;
            }
            tracker.advance(end)?;
        }

        report.state = tracker.state();
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aerofs_transfer::ByteRange;

    fn session() -> UploadSession {
        UploadSession::new("f1", "up-1", vec!["\"e1\"".into(), "\"e2\"".into()])
    }

    #[test]
    fn session_headers_carry_only_the_upload_id() {
        let headers = session_headers(&session()).unwrap();
        assert_eq!(headers.get("Upload-ID").unwrap(), "up-1");
        assert!(headers.get(reqwest::header::IF_MATCH).is_none());
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn default_options_use_default_chunk_size() {
        let options = UploadOptions::default();
        assert_eq!(options.chunk_size, DEFAULT_CHUNK_SIZE);
        assert_eq!(options.offset, 0);
        assert!(options.progress.is_none());
    }

    #[tokio::test]
    async fn chunk_length_must_match_range() {
        let client = Client::new(crate::ClientConfig::new("unused.invalid", "t").unwrap()).unwrap();
        let range = ContentRange::Partial(ByteRange::new(0, 9).unwrap());
        let err = client
            .upload_chunk(&session(), range, Bytes::from_static(b"short"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn handshake_forms_are_not_chunks() {
        let client = Client::new(crate::ClientConfig::new("unused.invalid", "t").unwrap()).unwrap();
        for range in [ContentRange::Open, ContentRange::Query] {
            let err = client
                .upload_chunk(&session(), range, Bytes::new())
                .await
                .unwrap_err();
            assert!(matches!(err, Error::InvalidRequest(_)));
        }
    }
}

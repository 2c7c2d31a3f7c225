use std::fmt;

use tokio::sync::mpsc;

use crate::TransferError;

/// An upload session issued by the appliance for one file.
///
/// The appliance decides when a session expires; nothing here tracks it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSession {
    /// Target file identifier.
    pub file_id: String,
    /// Opaque token from the `Upload-ID` response header.
    pub upload_id: String,
    /// Entity tags sent as `If-Match` with every request of the session.
    pub etags: Vec<String>,
}

impl UploadSession {
    pub fn new(file_id: impl Into<String>, upload_id: impl Into<String>, etags: Vec<String>) -> Self {
        Self {
            file_id: file_id.into(),
            upload_id: upload_id.into(),
            etags,
        }
    }
}

/// Lifecycle of a chunked upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    NotStarted,
    SessionOpen,
    /// `committed` bytes are known to be held by the appliance.
    Uploading { committed: u64 },
    /// The terminal chunk was accepted; the file is `total` bytes long.
    Completed { total: u64 },
    Failed,
}

impl UploadState {
    /// Bytes acknowledged so far.
    pub fn committed(&self) -> u64 {
        match self {
            UploadState::Uploading { committed } => *committed,
            UploadState::Completed { total } => *total,
            _ => 0,
        }
    }

    pub fn is_finished(&self) -> bool {
        matches!(self, UploadState::Completed { .. } | UploadState::Failed)
    }
}

impl fmt::Display for UploadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UploadState::NotStarted => f.write_str("not started"),
            UploadState::SessionOpen => f.write_str("session open"),
            UploadState::Uploading { committed } => write!(f, "uploading ({committed} bytes)"),
            UploadState::Completed { total } => write!(f, "completed ({total} bytes)"),
            UploadState::Failed => f.write_str("failed"),
        }
    }
}

/// Snapshot sent to progress listeners on every state change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadProgress {
    pub file_id: String,
    pub upload_id: String,
    pub state: UploadState,
}

/// Enforces legal [`UploadState`] transitions for one upload and publishes
/// each change to an optional progress channel.
pub struct UploadTracker {
    file_id: String,
    upload_id: String,
    state: UploadState,
    progress: Option<mpsc::UnboundedSender<UploadProgress>>,
}

impl UploadTracker {
    pub fn new(file_id: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            upload_id: String::new(),
            state: UploadState::NotStarted,
            progress: None,
        }
    }

    /// Tracker for a session that is already open.
    pub fn for_session(session: &UploadSession) -> Self {
        Self {
            file_id: session.file_id.clone(),
            upload_id: session.upload_id.clone(),
            state: UploadState::SessionOpen,
            progress: None,
        }
    }

    /// Publishes every subsequent transition on `tx`.
    pub fn with_progress(mut self, tx: mpsc::UnboundedSender<UploadProgress>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn state(&self) -> UploadState {
        self.state
    }

    /// `NotStarted` -> `SessionOpen`.
    pub fn session_opened(&mut self, upload_id: &str) -> Result<(), TransferError> {
        if self.state != UploadState::NotStarted {
            return Err(self.invalid("open a session"));
        }
        self.upload_id = upload_id.to_string();
        self.set(UploadState::SessionOpen);
        Ok(())
    }

    /// Records `committed` acknowledged bytes. The count may not go backwards.
    pub fn advance(&mut self, committed: u64) -> Result<(), TransferError> {
        match self.state {
            UploadState::SessionOpen => {}
            UploadState::Uploading { committed: prev } if committed >= prev => {}
            UploadState::Uploading { committed: prev } => {
                return Err(TransferError::InvalidTransition(format!(
                    "committed bytes went backwards from {prev} to {committed}"
                )));
            }
            _ => return Err(self.invalid("advance")),
        }
        self.set(UploadState::Uploading { committed });
        Ok(())
    }

    /// Marks the upload complete at `total` bytes.
    pub fn complete(&mut self, total: u64) -> Result<(), TransferError> {
        match self.state {
            UploadState::SessionOpen => {}
            UploadState::Uploading { committed } if total >= committed => {}
            _ => return Err(self.invalid("complete")),
        }
        self.set(UploadState::Completed { total });
        Ok(())
    }

    /// Moves any unfinished upload to `Failed`. No-op once finished.
    pub fn fail(&mut self) {
        if !self.state.is_finished() {
            self.set(UploadState::Failed);
        }
    }

    fn set(&mut self, state: UploadState) {
        self.state = state;
        if let Some(tx) = &self.progress {
            // A dropped receiver only means nobody is listening.
            let _ = tx.send(UploadProgress {
                file_id: self.file_id.clone(),
                upload_id: self.upload_id.clone(),
                state,
            });
        }
    }

    fn invalid(&self, action: &str) -> TransferError {
        TransferError::InvalidTransition(format!("cannot {action} while {}", self.state))
    }
}

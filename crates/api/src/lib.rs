//! Async client for the AeroFS appliance REST API.
//!
//! [`Client`] wraps one appliance and one bearer token. Every call builds a
//! [`Route`] under `api/v1.3`, sends a single request through the shared
//! transport primitive, and unpacks the response into a typed value tagged
//! with its `ETag`. File content is uploaded in resumable chunks, see
//! [`upload`]. The [`handles`] keep a resource's last `ETag` between calls.

pub mod auth;
pub mod client;
pub mod devices;
pub mod error;
pub mod files;
pub mod folders;
pub mod groups;
pub mod handles;
pub mod routes;
pub mod shares;
pub mod upload;
pub mod users;

#[cfg(test)]
mod test_server;

pub use auth::{AppConfig, AuthClient};
pub use client::{API_PREFIX, Client, ClientConfig, Preconditions, Tagged, Unpacked, unpack};
pub use error::{ApiError, Error, ErrorKind};
pub use files::ContentRequest;
pub use handles::{DeviceHandle, FileHandle, GroupMemberHandle, SFMemberHandle, UserHandle};
pub use routes::Route;
pub use upload::{UploadOptions, UploadReport};

pub use aerofs_transfer::{ContentRange, DEFAULT_CHUNK_SIZE, UploadProgress, UploadSession, UploadState};

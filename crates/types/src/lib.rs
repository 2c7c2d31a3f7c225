//! Data-transfer shapes for the AeroFS appliance REST API.
//!
//! These types mirror the JSON documents the appliance sends and accepts.
//! They carry no behaviour beyond (de)serialisation.

pub mod auth;
pub mod devices;
pub mod files;
pub mod groups;
pub mod requests;
pub mod shares;
pub mod users;

// Re-export primary types for convenience.
pub use auth::AccessToken;
pub use devices::{Device, DeviceStatus};
pub use files::{Children, File, Folder, ParentPath};
pub use groups::{Group, GroupList, GroupMember};
pub use shares::{Permission, SFGroupMember, SFMember, SFPendingMember, SharedFolder};
pub use users::{Invitation, Invitee, User, UserList};

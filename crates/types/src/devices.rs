use serde::{Deserialize, Serialize};

/// A device (desktop client or team server) registered to a user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub os_family: String,
    #[serde(default)]
    pub install_date: String,
}

/// Online status of a device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceStatus {
    pub online: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_seen: String,
}

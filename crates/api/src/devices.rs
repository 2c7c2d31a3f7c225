use aerofs_types::requests::Named;
use aerofs_types::{Device, DeviceStatus};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{Client, Tagged, json_body};
use crate::error::Error;
use crate::routes::Route;

impl Client {
    /// Devices registered to `email`.
    pub async fn list_devices(&self, email: &str) -> Result<Tagged<Vec<Device>>, Error> {
        self.call_json(Method::GET, Route::UserDevices(email), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn get_device(&self, id: &str) -> Result<Tagged<Device>, Error> {
        self.call_json(Method::GET, Route::Device(id), &[], HeaderMap::new(), None)
            .await
    }

    /// Renames device `id`.
    pub async fn update_device(&self, id: &str, name: &str) -> Result<Tagged<Device>, Error> {
        let body = json_body(&Named { name })?;
        self.call_json(Method::PUT, Route::Device(id), &[], HeaderMap::new(), Some(body))
            .await
    }

    pub async fn get_device_status(&self, id: &str) -> Result<Tagged<DeviceStatus>, Error> {
        self.call_json(Method::GET, Route::DeviceStatus(id), &[], HeaderMap::new(), None)
            .await
    }
}

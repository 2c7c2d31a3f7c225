//! Stateful handles over single resources.
//!
//! A handle keeps the last descriptor the appliance returned together with
//! that version's `ETag`. Conditional mutations send the stored tag as
//! `If-Match`, and every successful call replaces descriptor and tag with
//! the response, so the next call is conditional on the version just seen.

use aerofs_types::{Device, DeviceStatus, File, GroupMember, Permission, SFMember, User};

use crate::client::{Client, Tagged};
use crate::error::Error;

fn tags(etag: &Option<String>) -> Vec<String> {
    etag.iter().cloned().collect()
}

/// A file plus its current version.
#[derive(Debug, Clone)]
pub struct FileHandle {
    client: Client,
    desc: File,
    etag: Option<String>,
    fields: Vec<String>,
}

impl FileHandle {
    /// Fetches file `id`. `fields` are the on-demand attributes requested
    /// on every later [`FileHandle::load`].
    pub async fn get(client: &Client, id: &str, fields: &[&str]) -> Result<Self, Error> {
        let tagged = client.get_file_metadata(id, fields).await?;
        Ok(Self {
            client: client.clone(),
            desc: tagged.value,
            etag: tagged.etag,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        })
    }

    pub fn desc(&self) -> &File {
        &self.desc
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Re-reads the metadata.
    pub async fn load(&mut self) -> Result<(), Error> {
        let fields: Vec<&str> = self.fields.iter().map(String::as_str).collect();
        let tagged = self.client.get_file_metadata(&self.desc.id, &fields).await?;
        self.store(tagged);
        Ok(())
    }

    /// Fills in the file's ancestor path.
    pub async fn load_path(&mut self) -> Result<(), Error> {
        let tagged = self.client.get_file_path(&self.desc.id).await?;
        self.desc.path = Some(tagged.value);
        if tagged.etag.is_some() {
            self.etag = tagged.etag;
        }
        Ok(())
    }

    /// Moves and/or renames the file, conditional on the stored version.
    pub async fn move_to(&mut self, parent: &str, name: &str) -> Result<(), Error> {
        let tagged = self
            .client
            .move_file(&self.desc.id, parent, name, &tags(&self.etag))
            .await?;
        self.store(tagged);
        Ok(())
    }

    /// Deletes the file, conditional on the stored version.
    pub async fn delete(self) -> Result<(), Error> {
        self.client.delete_file(&self.desc.id, &tags(&self.etag)).await
    }

    fn store(&mut self, tagged: Tagged<File>) {
        self.desc = tagged.value;
        self.etag = tagged.etag;
    }
}

/// A user account.
#[derive(Debug, Clone)]
pub struct UserHandle {
    client: Client,
    desc: User,
    etag: Option<String>,
}

impl UserHandle {
    pub async fn get(client: &Client, email: &str) -> Result<Self, Error> {
        let tagged = client.get_user(email).await?;
        Ok(Self::from_tagged(client, tagged))
    }

    pub async fn create(client: &Client, email: &str, first_name: &str, last_name: &str) -> Result<Self, Error> {
        let tagged = client.create_user(email, first_name, last_name).await?;
        Ok(Self::from_tagged(client, tagged))
    }

    fn from_tagged(client: &Client, tagged: Tagged<User>) -> Self {
        Self {
            client: client.clone(),
            desc: tagged.value,
            etag: tagged.etag,
        }
    }

    pub fn desc(&self) -> &User {
        &self.desc
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        let tagged = self.client.get_user(&self.desc.email).await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    pub async fn update(&mut self, first_name: &str, last_name: &str) -> Result<(), Error> {
        let tagged = self
            .client
            .update_user(&self.desc.email, first_name, last_name)
            .await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    pub async fn change_password(&self, password: &str) -> Result<(), Error> {
        self.client.change_password(&self.desc.email, password).await
    }

    pub async fn disable_two_factor(&self) -> Result<(), Error> {
        self.client.disable_two_factor(&self.desc.email).await
    }

    pub async fn delete(self) -> Result<(), Error> {
        self.client.delete_user(&self.desc.email).await
    }
}

/// A registered device.
#[derive(Debug, Clone)]
pub struct DeviceHandle {
    client: Client,
    desc: Device,
    etag: Option<String>,
}

impl DeviceHandle {
    pub async fn get(client: &Client, id: &str) -> Result<Self, Error> {
        let tagged = client.get_device(id).await?;
        Ok(Self {
            client: client.clone(),
            desc: tagged.value,
            etag: tagged.etag,
        })
    }

    pub fn desc(&self) -> &Device {
        &self.desc
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        let tagged = self.client.get_device(&self.desc.id).await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    /// Renames the device.
    pub async fn update(&mut self, name: &str) -> Result<(), Error> {
        let tagged = self.client.update_device(&self.desc.id, name).await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    pub async fn status(&self) -> Result<DeviceStatus, Error> {
        Ok(self.client.get_device_status(&self.desc.id).await?.value)
    }
}

/// A member of a group.
#[derive(Debug, Clone)]
pub struct GroupMemberHandle {
    client: Client,
    gid: String,
    desc: GroupMember,
    etag: Option<String>,
}

impl GroupMemberHandle {
    pub async fn get(client: &Client, gid: &str, email: &str) -> Result<Self, Error> {
        let tagged = client.get_group_member(gid, email).await?;
        Ok(Self {
            client: client.clone(),
            gid: gid.to_string(),
            desc: tagged.value,
            etag: tagged.etag,
        })
    }

    pub fn gid(&self) -> &str {
        &self.gid
    }

    pub fn desc(&self) -> &GroupMember {
        &self.desc
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub async fn load(&mut self) -> Result<(), Error> {
        let tagged = self
            .client
            .get_group_member(&self.gid, &self.desc.email)
            .await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    pub async fn remove(self) -> Result<(), Error> {
        self.client
            .remove_group_member(&self.gid, &self.desc.email)
            .await
    }
}

/// A user's membership in a shared folder.
#[derive(Debug, Clone)]
pub struct SFMemberHandle {
    client: Client,
    sid: String,
    desc: SFMember,
    etag: Option<String>,
}

impl SFMemberHandle {
    pub async fn get(client: &Client, sid: &str, email: &str) -> Result<Self, Error> {
        let tagged = client.get_sf_member(sid, email, &[]).await?;
        Ok(Self {
            client: client.clone(),
            sid: sid.to_string(),
            desc: tagged.value,
            etag: tagged.etag,
        })
    }

    pub fn sid(&self) -> &str {
        &self.sid
    }

    pub fn desc(&self) -> &SFMember {
        &self.desc
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    /// Re-reads the membership unless it is unchanged since the stored
    /// version. Returns whether anything was refreshed.
    pub async fn load(&mut self) -> Result<bool, Error> {
        let result = self
            .client
            .get_sf_member(&self.sid, &self.desc.email, &tags(&self.etag))
            .await;
        match result {
            Ok(tagged) => {
                self.desc = tagged.value;
                self.etag = tagged.etag;
                Ok(true)
            }
            Err(e) if e.is_not_modified() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Replaces the member's permissions, conditional on the stored version.
    pub async fn update_permissions(&mut self, permissions: &[Permission]) -> Result<(), Error> {
        let tagged = self
            .client
            .set_sf_member_permissions(&self.sid, &self.desc.email, permissions, &tags(&self.etag))
            .await?;
        self.desc = tagged.value;
        self.etag = tagged.etag;
        Ok(())
    }

    pub async fn remove(self) -> Result<(), Error> {
        self.client
            .remove_sf_member(&self.sid, &self.desc.email, &tags(&self.etag))
            .await
    }
}

//! Folder metadata, listing and sharing.

use aerofs_types::requests::Placement;
use aerofs_types::{Children, Folder, ParentPath};
use reqwest::Method;
use reqwest::header::HeaderMap;

use crate::client::{Client, Preconditions, Tagged, json_body};
use crate::error::Error;
use crate::files::fields_query;
use crate::routes::Route;

impl Client {
    pub async fn get_folder_metadata(&self, id: &str, fields: &[&str]) -> Result<Tagged<Folder>, Error> {
        let query = fields_query(fields);
        self.call_json(Method::GET, Route::Folder(id), &query, HeaderMap::new(), None)
            .await
    }

    pub async fn get_folder_path(&self, id: &str) -> Result<Tagged<ParentPath>, Error> {
        self.call_json(Method::GET, Route::FolderPath(id), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn list_folder_children(&self, id: &str) -> Result<Tagged<Children>, Error> {
        self.call_json(Method::GET, Route::FolderChildren(id), &[], HeaderMap::new(), None)
            .await
    }

    pub async fn create_folder(&self, parent: &str, name: &str) -> Result<Tagged<Folder>, Error> {
        let body = json_body(&Placement { parent, name })?;
        self.call_json(Method::POST, Route::Folders, &[], HeaderMap::new(), Some(body))
            .await
    }

    /// Moves and/or renames a folder, conditional on `etags`.
    pub async fn move_folder(
        &self,
        id: &str,
        parent: &str,
        name: &str,
        etags: &[String],
    ) -> Result<Tagged<Folder>, Error> {
        let body = json_body(&Placement { parent, name })?;
        let headers = Preconditions::if_match(etags).headers()?;
        self.call_json(Method::PUT, Route::Folder(id), &[], headers, Some(body))
            .await
    }

    pub async fn delete_folder(&self, id: &str, etags: &[String]) -> Result<(), Error> {
        let headers = Preconditions::if_match(etags).headers()?;
        self.call(Method::DELETE, Route::Folder(id), &[], headers, None)
            .await?;
        Ok(())
    }

    /// Converts a plain folder into a shared folder.
    pub async fn share_folder(&self, id: &str) -> Result<(), Error> {
        self.call(Method::PUT, Route::FolderShared(id), &[], HeaderMap::new(), None)
            .await?;
        Ok(())
    }
}

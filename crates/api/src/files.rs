//! File metadata and content.
//!
//! Uploading content is handled separately in [`crate::upload`].

use aerofs_types::requests::Placement;
use aerofs_types::{File, ParentPath};
use reqwest::Method;
use reqwest::header::{HeaderMap, IF_NONE_MATCH, IF_RANGE, RANGE};

use crate::client::{Client, Preconditions, Tagged, Unpacked, header_value, json_body};
use crate::error::Error;
use crate::routes::Route;

/// Conditional and partial-content options for [`Client::get_file_content`].
#[derive(Debug, Clone, Default)]
pub struct ContentRequest {
    /// `Range` values, e.g. `bytes=0-1023`.
    pub ranges: Vec<String>,
    /// Entity tag for `If-Range`.
    pub if_range: Option<String>,
    /// Entity tags for `If-None-Match`.
    pub if_none_match: Vec<String>,
}

impl ContentRequest {
    fn headers(&self) -> Result<HeaderMap, Error> {
        let mut headers = HeaderMap::new();
        for range in &self.ranges {
            headers.append(RANGE, header_value(range)?);
        }
        if let Some(tag) = &self.if_range {
            headers.insert(IF_RANGE, header_value(tag)?);
        }
        for tag in &self.if_none_match {
            headers.append(IF_NONE_MATCH, header_value(tag)?);
        }
        Ok(headers)
    }
}

/// Repeated `fields=` parameters selecting on-demand attributes.
pub(crate) fn fields_query(fields: &[&str]) -> Vec<(&'static str, String)> {
    fields.iter().map(|f| ("fields", f.to_string())).collect()
}

impl Client {
    /// Fetches file metadata. `fields` names on-demand attributes such as
    /// `path`.
    pub async fn get_file_metadata(&self, id: &str, fields: &[&str]) -> Result<Tagged<File>, Error> {
        let query = fields_query(fields);
        self.call_json(Method::GET, Route::File(id), &query, HeaderMap::new(), None)
            .await
    }

    pub async fn get_file_path(&self, id: &str) -> Result<Tagged<ParentPath>, Error> {
        self.call_json(Method::GET, Route::FilePath(id), &[], HeaderMap::new(), None)
            .await
    }

    /// Downloads file content. The body is returned raw; a `206` response
    /// carries only the requested ranges.
    pub async fn get_file_content(&self, id: &str, request: &ContentRequest) -> Result<Unpacked, Error> {
        self.call(Method::GET, Route::FileContent(id), &[], request.headers()?, None)
            .await
    }

    pub async fn create_file(&self, parent: &str, name: &str) -> Result<Tagged<File>, Error> {
        let body = json_body(&Placement { parent, name })?;
        self.call_json(Method::POST, Route::Files, &[], HeaderMap::new(), Some(body))
            .await
    }

    /// Moves and/or renames a file, conditional on `etags`.
    pub async fn move_file(
        &self,
        id: &str,
        parent: &str,
        name: &str,
        etags: &[String],
    ) -> Result<Tagged<File>, Error> {
        let body = json_body(&Placement { parent, name })?;
        let headers = Preconditions::if_match(etags).headers()?;
        self.call_json(Method::PUT, Route::File(id), &[], headers, Some(body))
            .await
    }

    /// Deletes a file. The appliance requires at least one current etag.
    pub async fn delete_file(&self, id: &str, etags: &[String]) -> Result<(), Error> {
        if etags.is_empty() {
            return Err(Error::InvalidRequest("delete_file needs at least one etag".into()));
        }
        let headers = Preconditions::if_match(etags).headers()?;
        self.call(Method::DELETE, Route::File(id), &[], headers, None)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{MockServer, Reply};

    #[test]
    fn content_request_headers() {
        let request = ContentRequest {
            ranges: vec!["bytes=0-99".into(), "bytes=200-299".into()],
            if_range: Some("\"v1\"".into()),
            if_none_match: vec!["\"v0\"".into()],
        };
        let headers = request.headers().unwrap();
        assert_eq!(headers.get_all(RANGE).iter().count(), 2);
        assert_eq!(headers.get(IF_RANGE).unwrap(), "\"v1\"");
        assert_eq!(headers.get(IF_NONE_MATCH).unwrap(), "\"v0\"");
    }

    #[test]
    fn fields_repeat_the_key() {
        let query = fields_query(&["path", "children"]);
        assert_eq!(
            query,
            vec![("fields", "path".to_string()), ("fields", "children".to_string())]
        );
    }

    #[tokio::test]
    async fn metadata_asks_for_on_demand_fields() {
        let server = MockServer::start(vec![Reply::json(r#"{"id":"f1","name":"a.txt"}"#).etag("\"v1\"")]).await;
        let file = server
            .client()
            .get_file_metadata("f1", &["path"])
            .await
            .unwrap();
        assert_eq!(file.etag.as_deref(), Some("\"v1\""));

        let req = server.only().await;
        assert_eq!(req.method, "GET");
        assert_eq!(req.path(), "/api/v1.3/files/f1");
        assert_eq!(req.query(), vec![("fields".into(), "path".into())]);
    }

    #[tokio::test]
    async fn content_download_forwards_range_headers() {
        let server = MockServer::start(vec![Reply::json("abc")]).await;
        let request = ContentRequest {
            ranges: vec!["bytes=0-2".into()],
            if_range: Some("\"v1\"".into()),
            if_none_match: Vec::new(),
        };
        let content = server.client().get_file_content("f1", &request).await.unwrap();
        assert_eq!(&content.body[..], b"abc");

        let req = server.only().await;
        assert_eq!(req.path(), "/api/v1.3/files/f1/content");
        assert_eq!(req.header("range"), Some("bytes=0-2"));
        assert_eq!(req.header("if-range"), Some("\"v1\""));
    }

    #[tokio::test]
    async fn create_and_move_send_placement() {
        let server = MockServer::start(vec![
            Reply::json(r#"{"id":"f1","name":"a.txt"}"#),
            Reply::json(r#"{"id":"f1","name":"b.txt","parent":"p2"}"#),
        ])
        .await;
        let client = server.client();
        client.create_file("root", "a.txt").await.unwrap();
        client
            .move_file("f1", "p2", "b.txt", &["\"v1\"".into()])
            .await
            .unwrap();

        let reqs = server.requests().await;
        assert_eq!(reqs[0].method, "POST");
        assert_eq!(reqs[0].path(), "/api/v1.3/files");
        assert_eq!(reqs[0].json(), serde_json::json!({"parent": "root", "name": "a.txt"}));
        assert!(reqs[0].header("if-match").is_none());
        assert_eq!(reqs[1].method, "PUT");
        assert_eq!(reqs[1].path(), "/api/v1.3/files/f1");
        assert_eq!(reqs[1].all("if-match"), vec!["\"v1\""]);
        assert_eq!(reqs[1].json(), serde_json::json!({"parent": "p2", "name": "b.txt"}));
    }

    #[tokio::test]
    async fn delete_file_is_conditional_delete() {
        let server = MockServer::start(vec![Reply::empty(204)]).await;
        server
            .client()
            .delete_file("f1", &["\"v1\"".into()])
            .await
            .unwrap();

        let req = server.only().await;
        assert_eq!(req.method, "DELETE");
        assert_eq!(req.path(), "/api/v1.3/files/f1");
        assert_eq!(req.all("if-match"), vec!["\"v1\""]);
    }

    #[tokio::test]
    async fn delete_file_without_etag_is_rejected_locally() {
        let client = Client::new(crate::ClientConfig::new("unused.invalid", "t").unwrap()).unwrap();
        let err = client.delete_file("f1", &[]).await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
    }
}

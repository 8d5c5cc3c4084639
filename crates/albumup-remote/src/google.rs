use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use albumup_core::error::AlbumupError;
use albumup_core::models::album::{AlbumTitle, RemoteAlbum};

use crate::{AttachResult, NewMediaItem, PhotoLibrary};

/// Page size for album content searches (service maximum).
const ITEM_PAGE_SIZE: u32 = 100;

pub struct GooglePhotosLibrary {
    client: reqwest::Client,
    api_url: url::Url,
    album_page_size: u32,
}

impl GooglePhotosLibrary {
    pub fn new(
        api_url: url::Url,
        access_token: &str,
        album_page_size: u32,
    ) -> Result<Self, AlbumupError> {
        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}")).map_err(|_| {
            AlbumupError::AuthFailed {
                message: "access token contains invalid characters".into(),
            }
        })?;
        headers.insert(header::AUTHORIZATION, bearer);
        headers.insert(header::USER_AGENT, HeaderValue::from_static("albumup/0.1.0"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| AlbumupError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_url,
            album_page_size: album_page_size.clamp(1, 50),
        })
    }

    fn url(&self, path: &str) -> String {
        let base = self.api_url.as_str().trim_end_matches('/');
        format!("{base}{path}")
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, AlbumupError> {
        let resp = req.send().await.map_err(|e| AlbumupError::RemoteUnavailable {
            message: e.to_string(),
        })?;
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    async fn json<T: for<'de> Deserialize<'de>>(
        resp: reqwest::Response,
    ) -> Result<T, AlbumupError> {
        resp.json().await.map_err(|e| AlbumupError::ApiError {
            status: 0,
            message: format!("JSON parse error: {e}"),
        })
    }
}

/// Map a non-success HTTP status to an error kind.
fn status_error(status: u16, body: String) -> AlbumupError {
    match status {
        401 | 403 => AlbumupError::AuthFailed { message: body },
        429 => AlbumupError::QuotaExceeded { message: body },
        500..=599 => AlbumupError::RemoteUnavailable {
            message: format!("server error {status}: {body}"),
        },
        _ => AlbumupError::ApiError {
            status,
            message: body,
        },
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GpAlbum {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    is_writeable: Option<bool>,
    #[serde(default)]
    media_items_count: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GpAlbumPage {
    #[serde(default)]
    albums: Vec<GpAlbum>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct GpMediaItem {
    #[serde(default)]
    filename: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GpMediaPage {
    #[serde(default)]
    media_items: Vec<GpMediaItem>,
    next_page_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GpSearchRequest<'a> {
    album_id: &'a str,
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<&'a str>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GpBatchCreate<'a> {
    album_id: &'a str,
    new_media_items: Vec<GpNewMediaItem<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GpNewMediaItem<'a> {
    description: &'a str,
    simple_media_item: GpSimpleMediaItem<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GpSimpleMediaItem<'a> {
    upload_token: &'a str,
    file_name: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GpBatchCreateResponse {
    #[serde(default)]
    new_media_item_results: Vec<GpItemResult>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GpItemResult {
    upload_token: String,
    status: Option<GpStatus>,
}

#[derive(Deserialize)]
struct GpStatus {
    #[serde(default)]
    code: i32,
    #[serde(default)]
    message: String,
}

impl From<GpAlbum> for RemoteAlbum {
    fn from(a: GpAlbum) -> Self {
        RemoteAlbum {
            id: a.id,
            title: a.title,
            // The service only reports the flag for albums created by this app.
            is_writeable: a.is_writeable.unwrap_or(false),
            media_items_count: a.media_items_count.and_then(|c| c.parse().ok()),
        }
    }
}

impl From<GpItemResult> for AttachResult {
    fn from(r: GpItemResult) -> Self {
        let error = match r.status {
            Some(s) if s.code != 0 => Some(format!("{} (code {})", s.message, s.code)),
            _ => None,
        };
        AttachResult {
            upload_token: r.upload_token,
            error,
        }
    }
}

#[async_trait]
impl PhotoLibrary for GooglePhotosLibrary {
    async fn list_albums(&self) -> Result<Vec<RemoteAlbum>, AlbumupError> {
        let mut all = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut req = self
                .client
                .get(self.url("/albums"))
                .query(&[("pageSize", self.album_page_size.to_string())]);
            if let Some(token) = &page_token {
                req = req.query(&[("pageToken", token)]);
            }
            let page: GpAlbumPage = Self::json(self.send(req).await?).await?;
            all.extend(page.albums.into_iter().map(RemoteAlbum::from));

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        tracing::debug!("listed {} albums", all.len());
        Ok(all)
    }

    async fn create_album(&self, title: &AlbumTitle) -> Result<RemoteAlbum, AlbumupError> {
        let body = serde_json::json!({ "album": { "title": title.as_str() } });
        let resp = self
            .send(self.client.post(self.url("/albums")).json(&body))
            .await?;
        let created: GpAlbum = Self::json(resp).await?;
        Ok(RemoteAlbum {
            is_writeable: true,
            ..RemoteAlbum::from(created)
        })
    }

    async fn list_album_items(&self, album_id: &str) -> Result<HashSet<String>, AlbumupError> {
        let mut names = HashSet::new();
        let mut page_token: Option<String> = None;

        loop {
            let body = GpSearchRequest {
                album_id,
                page_size: ITEM_PAGE_SIZE,
                page_token: page_token.as_deref(),
            };
            let resp = self
                .send(self.client.post(self.url("/mediaItems:search")).json(&body))
                .await?;
            let page: GpMediaPage = Self::json(resp).await?;
            names.extend(page.media_items.into_iter().map(|m| m.filename));

            match page.next_page_token {
                Some(t) if !t.is_empty() => page_token = Some(t),
                _ => break,
            }
        }

        Ok(names)
    }

    async fn upload_bytes(
        &self,
        file_name: &str,
        mime_type: &str,
        content: Vec<u8>,
    ) -> Result<String, AlbumupError> {
        let req = self
            .client
            .post(self.url("/uploads"))
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header("X-Goog-Upload-Content-Type", mime_type)
            .header("X-Goog-Upload-Protocol", "raw")
            .body(content);

        let resp = match self.send(req).await {
            Ok(resp) => resp,
            Err(AlbumupError::ApiError { status: 400, message }) => {
                return Err(AlbumupError::InvalidContent {
                    file_name: file_name.to_string(),
                    message,
                })
            }
            Err(e) => return Err(e),
        };

        let token = resp.text().await.map_err(|e| AlbumupError::RemoteUnavailable {
            message: e.to_string(),
        })?;
        if token.trim().is_empty() {
            return Err(AlbumupError::ApiError {
                status: 0,
                message: format!("empty upload token for {file_name}"),
            });
        }
        Ok(token.trim().to_string())
    }

    async fn attach_items(
        &self,
        album_id: &str,
        items: &[NewMediaItem],
    ) -> Result<Vec<AttachResult>, AlbumupError> {
        let body = GpBatchCreate {
            album_id,
            new_media_items: items
                .iter()
                .map(|item| GpNewMediaItem {
                    description: "",
                    simple_media_item: GpSimpleMediaItem {
                        upload_token: &item.upload_token,
                        file_name: &item.file_name,
                    },
                })
                .collect(),
        };
        let resp = self
            .send(self.client.post(self.url("/mediaItems:batchCreate")).json(&body))
            .await?;
        let created: GpBatchCreateResponse = Self::json(resp).await?;
        Ok(created
            .new_media_item_results
            .into_iter()
            .map(AttachResult::from)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_album_without_writeable_flag_is_read_only() {
        let page: GpAlbumPage = serde_json::from_str(
            r#"{"albums":[
                {"id":"a1","title":"Summer","mediaItemsCount":"12"},
                {"id":"a2","title":"Trip","isWriteable":true}
            ],"nextPageToken":"next"}"#,
        )
        .unwrap();
        let albums: Vec<RemoteAlbum> = page.albums.into_iter().map(RemoteAlbum::from).collect();
        assert!(!albums[0].is_writeable);
        assert_eq!(albums[0].media_items_count, Some(12));
        assert!(albums[1].is_writeable);
        assert_eq!(page.next_page_token.as_deref(), Some("next"));
    }

    #[test]
    fn test_attach_result_status() {
        let resp: GpBatchCreateResponse = serde_json::from_str(
            r#"{"newMediaItemResults":[
                {"uploadToken":"t1","status":{"message":"Success"}},
                {"uploadToken":"t2","status":{"code":3,"message":"Failed: invalid token"}}
            ]}"#,
        )
        .unwrap();
        let results: Vec<AttachResult> = resp
            .new_media_item_results
            .into_iter()
            .map(AttachResult::from)
            .collect();
        assert!(results[0].is_ok());
        assert!(!results[1].is_ok());
        assert_eq!(results[1].upload_token, "t2");
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(401, String::new()),
            AlbumupError::AuthFailed { .. }
        ));
        assert!(matches!(
            status_error(429, String::new()),
            AlbumupError::QuotaExceeded { .. }
        ));
        assert!(matches!(
            status_error(503, String::new()),
            AlbumupError::RemoteUnavailable { .. }
        ));
        assert!(matches!(
            status_error(404, String::new()),
            AlbumupError::ApiError { status: 404, .. }
        ));
    }

    #[test]
    fn test_search_request_omits_missing_token() {
        let body = GpSearchRequest {
            album_id: "a1",
            page_size: ITEM_PAGE_SIZE,
            page_token: None,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"albumId":"a1","pageSize":100}"#);
    }
}

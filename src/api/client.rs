use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use std::io::Read;
use std::path::Path;
use std::time::Duration;

use super::types::{
    ContentsResponse, CreatedFolder, FolderContents, FolderId, InventoriesResponse, Inventory,
    InventoryId, Item, ItemId, MutationAck, RootFolderResponse,
};

/// Timeout for ordinary API calls in seconds
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for uploads, which can carry large asset packages
const UPLOAD_TIMEOUT_SECS: u64 = 600;

/// Error types that can occur while talking to the inventory backend.
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    /// HTTP request failed before a response arrived
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// No token yet, or the server refused the one we sent
    #[error("not authenticated: {0}")]
    Unauthorized(String),

    /// Server answered with a non-success status and a plain-text reason
    #[error("server error ({status}): {message}")]
    Backend { status: u16, message: String },

    /// Server answered 200 but flagged the operation as failed
    #[error("request rejected: {0}")]
    Rejected(String),

    /// Local file system failure while preparing an upload
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Blocking HTTP client for the inventory backend.
///
/// Holds the session token after a successful login and appends it as the
/// `auth` query parameter on every authenticated call. The token is wrapped
/// in `SecretString` so it never shows up in debug output or logs; reading
/// it requires an explicit `.expose_secret()`.
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<SecretString>,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let client = Client::builder()
            .user_agent(concat!("stowage/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base_url(base_url),
            token: None,
        })
    }

    /// Authenticates and stores the session token on success.
    ///
    /// The login endpoint takes the credentials as a two-line plain-text
    /// body and answers with the bearer token as the response body.
    pub fn login(&mut self, username: &str, password: &str) -> Result<(), ApiError> {
        tracing::debug!(username, "Logging in");

        let response = self
            .client
            .post(self.endpoint("/auth/login"))
            .body(credentials_body(username, password))
            .send()?;
        let token = check(response)?.text()?.trim().to_string();

        if token.is_empty() {
            return Err(ApiError::Rejected("login returned an empty token".into()));
        }

        self.token = Some(SecretString::from(token));
        tracing::info!(username, "Login successful");
        Ok(())
    }

    /// Creates an account. Same body framing as `login`; the server answers
    /// 409 when the username is already taken.
    pub fn register(&self, username: &str, password: &str) -> Result<(), ApiError> {
        tracing::debug!(username, "Registering account");

        let response = self
            .client
            .post(self.endpoint("/auth/register"))
            .body(credentials_body(username, password))
            .send()?;
        check(response)?;

        tracing::info!(username, "Account registered");
        Ok(())
    }

    /// Drops the session token. Purely local; the backend has no
    /// server-side session to tear down.
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn inventories(&self) -> Result<Vec<Inventory>, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/api/inventories"))
            .query(&[("auth", self.token()?.expose_secret())])
            .send()?;
        let body: InventoriesResponse = check(response)?.json()?;

        if !body.success {
            return Err(ApiError::Rejected("inventory listing failed".into()));
        }

        let inventories = body.data.unwrap_or_default();
        tracing::debug!(count = inventories.len(), "Fetched inventories");
        Ok(inventories)
    }

    /// Resolves the root folder of an inventory whose listing row arrived
    /// without a usable `rootFolderId`.
    pub fn root_folder(&self, inventory: InventoryId) -> Result<FolderId, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/api/inventory/rootFolder"))
            .query(&[
                ("inventoryId", inventory.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .send()?;
        let body: RootFolderResponse = check(response)?.json()?;

        match body.root_folder_id {
            Some(root) if body.success => Ok(root),
            _ => Err(ApiError::Rejected(format!(
                "inventory {inventory} has no root folder"
            ))),
        }
    }

    /// Fetches subfolders, items and the parent link of one folder in a
    /// single round trip.
    pub fn folder_contents(&self, folder: FolderId) -> Result<FolderContents, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/api/folders/contents"))
            .query(&[
                ("folderId", folder.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .send()?;
        let body: ContentsResponse = check(response)?.json()?;

        if !body.success {
            return Err(ApiError::Rejected(format!(
                "listing folder {folder} failed"
            )));
        }

        let contents = FolderContents {
            folders: body.folders.unwrap_or_default(),
            // Item URLs arrive server-relative; resolve them here so the
            // UI can hand them straight to the system opener.
            items: body
                .items
                .unwrap_or_default()
                .into_iter()
                .map(|mut item| {
                    item.url = self.asset_url(&item);
                    item
                })
                .collect(),
            parent: body.parent,
        };
        tracing::debug!(
            %folder,
            subfolders = contents.folders.len(),
            items = contents.items.len(),
            "Fetched folder contents"
        );
        Ok(contents)
    }

    // The folder mutation uses GET with query parameters. That is the wire
    // contract of the backend, not a choice made here.
    pub fn create_folder(&self, parent: FolderId, name: &str) -> Result<CreatedFolder, ApiError> {
        let response = self
            .client
            .get(self.endpoint("/addFolder"))
            .query(&[
                ("folderName", name.to_string()),
                ("folderId", parent.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .send()?;
        let body: CreatedFolder = check(response)?.json()?;

        if !body.success {
            return Err(ApiError::Rejected(
                body.error.unwrap_or_else(|| "folder creation failed".into()),
            ));
        }

        tracing::info!(name, %parent, "Created folder");
        Ok(body)
    }

    pub fn create_inventory(&self, name: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.endpoint("/addInventory"))
            .query(&[
                ("inventoryName", name.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .send()?;
        let body: MutationAck = check(response)?.json()?;

        if !body.success {
            return Err(ApiError::Rejected(
                body.error
                    .unwrap_or_else(|| "inventory creation failed".into()),
            ));
        }

        tracing::info!(name, "Created inventory");
        Ok(())
    }

    pub fn remove_item(&self, item: ItemId) -> Result<(), ApiError> {
        let response = self
            .client
            .get(self.endpoint("/removeItem"))
            .query(&[
                ("itemId", item.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .send()?;
        let body: MutationAck = check(response)?.json()?;

        if !body.success {
            return Err(ApiError::Rejected(
                body.error.unwrap_or_else(|| "item removal failed".into()),
            ));
        }

        tracing::info!(%item, "Removed item");
        Ok(())
    }

    /// Uploads a file into a folder as a multipart form, streaming it from
    /// disk through a counting reader so the caller can render a progress
    /// bar. `progress` receives `(sent, total)` in bytes.
    pub fn upload<F>(&self, folder: FolderId, path: &Path, progress: F) -> Result<(), ApiError>
    where
        F: FnMut(u64, u64) + Send + 'static,
    {
        let file = std::fs::File::open(path)?;
        let total = file.metadata()?.len();
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());

        tracing::info!(file = %file_name, bytes = total, %folder, "Uploading file");

        let reader = ProgressReader::new(file, total, progress);
        let part = Part::reader_with_length(reader, total).file_name(file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("/upload"))
            .query(&[
                ("folderId", folder.to_string()),
                ("auth", self.token()?.expose_secret().to_string()),
            ])
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .multipart(form)
            .send()?;
        check(response)?;

        tracing::info!(%folder, "Upload complete");
        Ok(())
    }

    /// Absolute URL of an item's asset. Item URLs arrive server-relative.
    pub fn asset_url(&self, item: &Item) -> String {
        format!("{}/{}", self.base_url, item.url.trim_start_matches('/'))
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn token(&self) -> Result<&SecretString, ApiError> {
        self.token
            .as_ref()
            .ok_or_else(|| ApiError::Unauthorized("no session token".to_string()))
    }
}

/// Maps non-success statuses to errors, preserving the server's plain-text
/// reason. 401 gets its own variant so callers can drop back to the login
/// screen instead of showing a generic failure.
fn check(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = response.text().unwrap_or_default().trim().to_string();
    tracing::warn!(status = status.as_u16(), message = %message, "Request failed");

    if status == StatusCode::UNAUTHORIZED {
        Err(ApiError::Unauthorized(message))
    } else {
        Err(ApiError::Backend {
            status: status.as_u16(),
            message,
        })
    }
}

/// The auth endpoints take credentials as a two-line plain-text body.
fn credentials_body(username: &str, password: &str) -> String {
    format!("{username}\n{password}")
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Wraps a reader and reports cumulative byte counts to a callback as the
/// HTTP client drains it.
struct ProgressReader<R, F> {
    inner: R,
    sent: u64,
    total: u64,
    progress: F,
}

impl<R, F> ProgressReader<R, F> {
    fn new(inner: R, total: u64, progress: F) -> Self {
        Self {
            inner,
            sent: 0,
            total,
            progress,
        }
    }
}

impl<R: Read, F: FnMut(u64, u64)> Read for ProgressReader<R, F> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        if n > 0 {
            self.sent += n as u64;
            (self.progress)(self.sent, self.total);
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn base_url_loses_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://stash.example.net/"),
            "https://stash.example.net"
        );
        assert_eq!(
            normalize_base_url("https://stash.example.net"),
            "https://stash.example.net"
        );
    }

    #[test]
    fn endpoint_joins_path() {
        let client = ApiClient::new("https://stash.example.net/").unwrap();
        assert_eq!(
            client.endpoint("/api/inventories"),
            "https://stash.example.net/api/inventories"
        );
    }

    #[test]
    fn asset_url_joins_relative_item_url() {
        let client = ApiClient::new("https://stash.example.net").unwrap();
        let item = Item {
            id: ItemId(7),
            name: "chair".into(),
            url: "assets/chair.brson".into(),
        };
        assert_eq!(
            client.asset_url(&item),
            "https://stash.example.net/assets/chair.brson"
        );
    }

    #[test]
    fn credentials_body_is_two_lines() {
        assert_eq!(credentials_body("neru", "hunter2"), "neru\nhunter2");
    }

    #[test]
    fn calls_without_token_report_unauthorized() {
        let client = ApiClient::new("https://stash.example.net").unwrap();
        match client.inventories() {
            Err(ApiError::Unauthorized(_)) => {}
            other => panic!("expected Unauthorized, got {other:?}"),
        }
    }

    #[test]
    fn progress_reader_reports_cumulative_counts() {
        let data = vec![0u8; 1000];
        let mut seen = Vec::new();
        {
            let mut reader = ProgressReader::new(Cursor::new(&data), 1000, |sent, total| {
                seen.push((sent, total));
            });
            let mut buf = [0u8; 256];
            let mut drained = Vec::new();
            loop {
                let n = reader.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                drained.extend_from_slice(&buf[..n]);
            }
            assert_eq!(drained.len(), 1000);
        }
        assert_eq!(seen.last(), Some(&(1000, 1000)));
        for window in seen.windows(2) {
            assert!(window[0].0 < window[1].0, "counts must be monotonic");
        }
    }
}

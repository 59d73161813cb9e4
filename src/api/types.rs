// Wire types for the inventory backend's JSON API.
//
// Every response carries a `success` flag; list payloads may be absent
// entirely when the server hit a database error, so they deserialize as
// Option and are flattened by the client.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InventoryId(pub i64);

/// Opaque reference to a folder node in the backend's hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderId(pub i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub i64);

impl fmt::Display for InventoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for FolderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: InventoryId,
    pub name: String,
    #[serde(default)]
    pub root_folder_id: Option<FolderId>,
    #[serde(default)]
    pub access_level: String,
}

impl Inventory {
    /// The root folder id, if the listing carried a usable one. The server
    /// sends 0 for inventories whose root folder row is missing; those need
    /// the dedicated rootFolder endpoint.
    pub fn root_folder(&self) -> Option<FolderId> {
        self.root_folder_id.filter(|id| id.0 > 0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Folder {
    pub id: FolderId,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Server-relative asset location, e.g. `assets/<hash>.brson`.
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParentFolder {
    pub id: FolderId,
    pub name: String,
}

/// Flattened contents of one folder: what the browser panes render.
#[derive(Debug, Clone, Default)]
pub struct FolderContents {
    pub folders: Vec<Folder>,
    pub items: Vec<Item>,
    pub parent: Option<ParentFolder>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct InventoriesResponse {
    pub success: bool,
    pub data: Option<Vec<Inventory>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RootFolderResponse {
    pub success: bool,
    #[serde(default)]
    pub root_folder_id: Option<FolderId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentsResponse {
    pub success: bool,
    pub folders: Option<Vec<Folder>>,
    pub items: Option<Vec<Item>>,
    #[serde(default)]
    pub parent: Option<ParentFolder>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedFolder {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub folder_id: Option<FolderId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub parent_id: Option<FolderId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MutationAck {
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_inventory_listing() {
        let body = r#"{
            "success": true,
            "data": [
                {"id": 3, "name": "Avatars", "rootFolderId": 17, "accessLevel": "owner"},
                {"id": 4, "name": "Shared", "rootFolderId": 0, "accessLevel": "viewer"}
            ]
        }"#;
        let parsed: InventoriesResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        let data = parsed.data.unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data[0].id, InventoryId(3));
        assert_eq!(data[0].root_folder(), Some(FolderId(17)));
        assert_eq!(data[0].access_level, "owner");
        // rootFolderId of 0 means "ask the rootFolder endpoint"
        assert_eq!(data[1].root_folder(), None);
    }

    #[test]
    fn parses_failed_listing_with_null_data() {
        let body = r#"{"success": false, "data": null}"#;
        let parsed: InventoriesResponse = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert!(parsed.data.is_none());
    }

    #[test]
    fn parses_folder_contents_with_parent() {
        let body = r#"{
            "success": true,
            "folders": [{"id": 8, "name": "Textures"}],
            "items": [{"id": 101, "name": "chair", "url": "assets/chair.brson"}],
            "parent": {"id": 2, "name": "Root"}
        }"#;
        let parsed: ContentsResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.folders.as_ref().unwrap()[0].id, FolderId(8));
        assert_eq!(parsed.items.as_ref().unwrap()[0].id, ItemId(101));
        assert_eq!(parsed.parent.unwrap().name, "Root");
    }

    #[test]
    fn parses_root_folder_contents_without_parent() {
        let body = r#"{"success": true, "folders": null, "items": null}"#;
        let parsed: ContentsResponse = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert!(parsed.parent.is_none());
        assert!(parsed.folders.is_none());
    }

    #[test]
    fn parses_created_folder_ack() {
        let body = r#"{"success": true, "folderId": 42, "name": "props", "parentId": 8}"#;
        let parsed: CreatedFolder = serde_json::from_str(body).unwrap();
        assert!(parsed.success);
        assert_eq!(parsed.folder_id, Some(FolderId(42)));
        assert_eq!(parsed.parent_id, Some(FolderId(8)));
        assert!(parsed.error.is_none());
    }

    #[test]
    fn parses_mutation_error_ack() {
        let body = r#"{"success": false, "error": "folderName parameter is missing"}"#;
        let parsed: MutationAck = serde_json::from_str(body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.as_deref(), Some("folderName parameter is missing"));
    }
}

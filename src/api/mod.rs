mod client;
mod types;

pub use client::{ApiClient, ApiError};
pub use types::{
    CreatedFolder, Folder, FolderContents, FolderId, Inventory, InventoryId, Item, ItemId,
    ParentFolder,
};

use crate::api::{
    ApiClient, ApiError, CreatedFolder, FolderContents, FolderId, Inventory, InventoryId, ItemId,
};
use std::path::PathBuf;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread;

pub enum IoCommand {
    Login {
        username: String,
        password: String,
    },
    Register {
        username: String,
        password: String,
    },
    Logout,
    LoadInventories,
    ResolveRootFolder {
        inventory: InventoryId,
    },
    /// `seq` tags the load so the UI can discard responses that resolve
    /// after a newer navigation already started.
    LoadFolder {
        folder: FolderId,
        seq: u64,
    },
    CreateFolder {
        parent: FolderId,
        name: String,
    },
    CreateInventory {
        name: String,
    },
    DeleteItem {
        item: ItemId,
    },
    Upload {
        folder: FolderId,
        path: PathBuf,
    },
}

pub enum IoEvent {
    LoggedIn {
        username: String,
    },
    LoginFailed(String),
    Registered(Result<(), String>),
    LoggedOut,
    InventoriesLoaded(Result<Vec<Inventory>, String>),
    RootFolderResolved {
        inventory: InventoryId,
        result: Result<FolderId, String>,
    },
    FolderLoaded {
        folder: FolderId,
        seq: u64,
        result: Result<FolderContents, String>,
    },
    FolderCreated(Result<CreatedFolder, String>),
    InventoryCreated(Result<(), String>),
    ItemDeleted(Result<ItemId, String>),
    UploadProgress {
        sent: u64,
        total: u64,
    },
    UploadFinished(Result<(), String>),
    /// The backend answered 401 mid-session; the UI drops back to login.
    SessionExpired(String),
}

/// Spawns the network worker thread.
///
/// The worker owns the API client (and with it the session token),
/// processes commands one at a time and answers with events, requesting a
/// repaint after each one so results show up without user input.
pub fn spawn_worker(
    ctx: eframe::egui::Context,
    mut client: ApiClient,
) -> (Sender<IoCommand>, Receiver<IoEvent>) {
    let (cmd_tx, cmd_rx) = channel::<IoCommand>();
    let (res_tx, res_rx) = channel::<IoEvent>();

    thread::spawn(move || {
        while let Ok(cmd) = cmd_rx.recv() {
            match cmd {
                IoCommand::Login { username, password } => {
                    let event = match client.login(&username, &password) {
                        Ok(()) => IoEvent::LoggedIn { username },
                        Err(err) => IoEvent::LoginFailed(err.to_string()),
                    };
                    let _ = res_tx.send(event);
                }
                IoCommand::Register { username, password } => {
                    let result = client.register(&username, &password).map_err(|e| e.to_string());
                    let _ = res_tx.send(IoEvent::Registered(result));
                }
                IoCommand::Logout => {
                    client.clear_token();
                    let _ = res_tx.send(IoEvent::LoggedOut);
                }
                IoCommand::LoadInventories => {
                    let event = relay(
                        client.inventories(),
                        IoEvent::InventoriesLoaded,
                    );
                    let _ = res_tx.send(event);
                }
                IoCommand::ResolveRootFolder { inventory } => {
                    let event = relay(client.root_folder(inventory), |result| {
                        IoEvent::RootFolderResolved { inventory, result }
                    });
                    let _ = res_tx.send(event);
                }
                IoCommand::LoadFolder { folder, seq } => {
                    let event = relay(client.folder_contents(folder), |result| {
                        IoEvent::FolderLoaded {
                            folder,
                            seq,
                            result,
                        }
                    });
                    let _ = res_tx.send(event);
                }
                IoCommand::CreateFolder { parent, name } => {
                    let event = relay(
                        client.create_folder(parent, &name),
                        IoEvent::FolderCreated,
                    );
                    let _ = res_tx.send(event);
                }
                IoCommand::CreateInventory { name } => {
                    let event = relay(
                        client.create_inventory(&name),
                        IoEvent::InventoryCreated,
                    );
                    let _ = res_tx.send(event);
                }
                IoCommand::DeleteItem { item } => {
                    let event = relay(
                        client.remove_item(item).map(|()| item),
                        IoEvent::ItemDeleted,
                    );
                    let _ = res_tx.send(event);
                }
                IoCommand::Upload { folder, path } => {
                    let progress_tx = res_tx.clone();
                    let progress_ctx = ctx.clone();
                    let event = relay(
                        client.upload(folder, &path, move |sent, total| {
                            let _ = progress_tx.send(IoEvent::UploadProgress { sent, total });
                            progress_ctx.request_repaint();
                        }),
                        IoEvent::UploadFinished,
                    );
                    let _ = res_tx.send(event);
                }
            }
            ctx.request_repaint();
        }
    });

    (cmd_tx, res_rx)
}

/// Folds an API result into an event, routing 401s to `SessionExpired`
/// regardless of which call hit them.
fn relay<T>(
    result: Result<T, ApiError>,
    wrap: impl FnOnce(Result<T, String>) -> IoEvent,
) -> IoEvent {
    match result {
        Ok(value) => wrap(Ok(value)),
        Err(ApiError::Unauthorized(message)) => IoEvent::SessionExpired(message),
        Err(err) => wrap(Err(err.to_string())),
    }
}

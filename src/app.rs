use crate::api::{ApiClient, Folder, FolderId, Inventory, InventoryId, Item, ParentFolder};
use crate::config::Config;
use crate::io::{spawn_worker, IoCommand, IoEvent};
use crate::state::{
    AuthForm, AuthNotice, AuthTab, LoadSequencer, NavigationState, SessionState, StatusState,
};
use eframe::egui;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

#[derive(Clone)]
pub enum Modal {
    None,
    Upload,
    NewFolder,
    NewInventory,
    ConfirmDelete(Item),
}

pub struct Stowage {
    pub config: Config,

    // Session
    pub session: SessionState,
    pub auth: AuthForm,

    // Navigation
    pub nav: NavigationState,
    pub loads: LoadSequencer,

    // Remote data
    pub inventories: Vec<Inventory>,
    pub active_inventory: Option<InventoryId>,
    pub folders: Vec<Folder>,
    pub items: Vec<Item>,
    pub parent: Option<ParentFolder>,
    /// Display names seen so far, so back/forward can label folders the
    /// current response doesn't describe.
    pub folder_names: HashMap<FolderId, String>,

    // Loading states
    pub loading: bool,
    pub inventories_loading: bool,
    pub pending_mutation: bool,

    // Modals & input buffers
    pub modal: Modal,
    pub folder_name_input: String,
    pub inventory_name_input: String,
    pub upload_path_input: String,
    pub staged_upload: Option<PathBuf>,
    pub upload_progress: Option<(u64, u64)>,
    pub uploading: bool,

    // UI State
    pub status: StatusState,

    cmd_tx: Sender<IoCommand>,
    res_rx: Receiver<IoEvent>,
}

impl Stowage {
    pub fn new(cc: &eframe::CreationContext<'_>, config: Config, client: ApiClient) -> Self {
        let (cmd_tx, res_rx) = spawn_worker(cc.egui_ctx.clone(), client);
        Self::with_channels(config, cmd_tx, res_rx)
    }

    fn with_channels(
        config: Config,
        cmd_tx: Sender<IoCommand>,
        res_rx: Receiver<IoEvent>,
    ) -> Self {
        Self {
            config,
            session: SessionState::new(),
            auth: AuthForm::new(),
            nav: NavigationState::new(),
            loads: LoadSequencer::new(),
            inventories: Vec::new(),
            active_inventory: None,
            folders: Vec::new(),
            items: Vec::new(),
            parent: None,
            folder_names: HashMap::new(),
            loading: false,
            inventories_loading: false,
            pending_mutation: false,
            modal: Modal::None,
            folder_name_input: String::new(),
            inventory_name_input: String::new(),
            upload_path_input: String::new(),
            staged_upload: None,
            upload_progress: None,
            uploading: false,
            status: StatusState::new(),
            cmd_tx,
            res_rx,
        }
    }

    fn send(&self, cmd: IoCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            tracing::error!("Worker thread is gone, command dropped");
        }
    }

    // --- Session ---

    pub(crate) fn submit_login(&mut self) {
        let username = self.auth.username.trim().to_string();
        if username.is_empty() || self.auth.password.is_empty() {
            self.auth.notice = Some(AuthNotice::Error(
                "Username and password are required".to_string(),
            ));
            return;
        }

        self.auth.busy = true;
        self.auth.notice = None;
        self.send(IoCommand::Login {
            username,
            password: self.auth.password.clone(),
        });
    }

    pub(crate) fn submit_register(&mut self) {
        let username = self.auth.username.trim().to_string();
        if username.is_empty() || self.auth.password.is_empty() {
            self.auth.notice = Some(AuthNotice::Error(
                "Username and password are required".to_string(),
            ));
            return;
        }
        if self.auth.password != self.auth.confirm {
            self.auth.notice = Some(AuthNotice::Error("Passwords do not match".to_string()));
            return;
        }

        self.auth.busy = true;
        self.auth.notice = None;
        self.send(IoCommand::Register {
            username,
            password: self.auth.password.clone(),
        });
    }

    pub(crate) fn logout(&mut self) {
        self.send(IoCommand::Logout);
    }

    fn sign_out_locally(&mut self) {
        self.session.end();
        self.auth = AuthForm::new();
        self.reset_browser();
    }

    fn reset_browser(&mut self) {
        self.nav = NavigationState::new();
        // A fresh sequencer tags nothing as current, so late responses
        // from the previous session fall on the floor.
        self.loads = LoadSequencer::new();
        self.inventories.clear();
        self.active_inventory = None;
        self.folders.clear();
        self.items.clear();
        self.parent = None;
        self.folder_names.clear();
        self.loading = false;
        self.inventories_loading = false;
        self.pending_mutation = false;
        self.modal = Modal::None;
        self.folder_name_input.clear();
        self.inventory_name_input.clear();
        self.upload_path_input.clear();
        self.staged_upload = None;
        self.upload_progress = None;
        self.uploading = false;
    }

    // --- Navigation ---

    pub(crate) fn request_inventories(&mut self) {
        self.inventories_loading = true;
        self.send(IoCommand::LoadInventories);
    }

    pub(crate) fn enter_inventory(&mut self, inventory: &Inventory) {
        self.active_inventory = Some(inventory.id);
        match inventory.root_folder() {
            Some(root) => {
                self.folder_names.insert(root, inventory.name.clone());
                self.open_folder(root);
            }
            None => {
                self.send(IoCommand::ResolveRootFolder {
                    inventory: inventory.id,
                });
            }
        }
    }

    /// Fresh navigation: records history, then loads. A click on the
    /// already-active folder changes nothing and issues no load.
    pub(crate) fn open_folder(&mut self, folder: FolderId) {
        if self.nav.visit(folder) {
            self.request_contents(folder);
        }
    }

    pub(crate) fn go_back(&mut self) {
        if let Some(folder) = self.nav.back() {
            self.request_contents(folder);
        }
    }

    pub(crate) fn go_forward(&mut self) {
        if let Some(folder) = self.nav.forward() {
            self.request_contents(folder);
        }
    }

    pub(crate) fn go_up(&mut self) {
        if let Some(parent) = self.parent.clone() {
            self.open_folder(parent.id);
        }
    }

    pub(crate) fn refresh(&mut self) {
        if let Some(folder) = self.nav.current() {
            self.request_contents(folder);
        }
    }

    /// Replay-mode load: history is left alone.
    fn request_contents(&mut self, folder: FolderId) {
        let seq = self.loads.begin();
        self.loading = true;
        tracing::debug!(%folder, seq, "Requesting folder contents");
        self.send(IoCommand::LoadFolder { folder, seq });
    }

    pub(crate) fn folder_label(&self, folder: FolderId) -> String {
        self.folder_names
            .get(&folder)
            .cloned()
            .unwrap_or_else(|| format!("Folder {folder}"))
    }

    // --- Items ---

    pub(crate) fn open_item(&mut self, item: &Item) {
        tracing::debug!(item = %item.id, url = %item.url, "Opening asset");
        if let Err(err) = open::that(&item.url) {
            self.status.set_error(format!("Could not open asset: {err}"));
        }
    }

    // --- Modals ---

    pub(crate) fn close_modal(&mut self) {
        self.modal = Modal::None;
        self.folder_name_input.clear();
        self.inventory_name_input.clear();
        if !self.uploading {
            self.upload_path_input.clear();
            self.staged_upload = None;
            self.upload_progress = None;
        }
    }

    pub(crate) fn submit_new_folder(&mut self) {
        let name = self.folder_name_input.trim().to_string();
        if name.is_empty() {
            self.status.set_error("Please enter a folder name".to_string());
            return;
        }
        let Some(parent) = self.nav.current() else {
            return;
        };

        self.pending_mutation = true;
        self.send(IoCommand::CreateFolder { parent, name });
    }

    pub(crate) fn submit_new_inventory(&mut self) {
        let name = self.inventory_name_input.trim().to_string();
        if name.is_empty() {
            self.status
                .set_error("Please enter an inventory name".to_string());
            return;
        }

        self.pending_mutation = true;
        self.send(IoCommand::CreateInventory { name });
    }

    pub(crate) fn confirm_delete(&mut self, item: &Item) {
        self.pending_mutation = true;
        self.send(IoCommand::DeleteItem { item: item.id });
    }

    pub(crate) fn stage_upload(&mut self, path: PathBuf) {
        if path.as_os_str().is_empty() {
            return;
        }
        if !path.is_file() {
            self.status
                .set_error(format!("Not a file: {}", path.display()));
            return;
        }
        self.upload_path_input = path.display().to_string();
        self.staged_upload = Some(path);
    }

    pub(crate) fn submit_upload(&mut self) {
        let Some(path) = self.staged_upload.clone() else {
            return;
        };
        let Some(folder) = self.nav.current() else {
            return;
        };

        self.uploading = true;
        self.upload_progress = Some((0, 0));
        self.send(IoCommand::Upload { folder, path });
    }

    pub(crate) fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        if let Some(path) = dropped.into_iter().find_map(|file| file.path) {
            if self.uploading {
                return;
            }
            self.stage_upload(path);
            if self.staged_upload.is_some() {
                self.modal = Modal::Upload;
            }
        }
    }

    // --- Worker events ---

    fn drain_io(&mut self) {
        while let Ok(event) = self.res_rx.try_recv() {
            self.apply_event(event);
        }
    }

    fn apply_event(&mut self, event: IoEvent) {
        match event {
            IoEvent::LoggedIn { username } => {
                self.auth.busy = false;
                self.auth.clear_secrets();
                self.session.begin(username);
                self.request_inventories();
            }
            IoEvent::LoginFailed(message) => {
                self.auth.busy = false;
                self.auth.notice = Some(AuthNotice::Error(message));
            }
            IoEvent::Registered(Ok(())) => {
                self.auth.busy = false;
                self.auth.clear_secrets();
                self.auth.tab = AuthTab::Login;
                self.auth.notice = Some(AuthNotice::Info(
                    "Registration successful! You can now log in.".to_string(),
                ));
            }
            IoEvent::Registered(Err(message)) => {
                self.auth.busy = false;
                self.auth.notice = Some(AuthNotice::Error(message));
            }
            IoEvent::LoggedOut => {
                self.sign_out_locally();
            }
            IoEvent::InventoriesLoaded(Ok(inventories)) => {
                self.inventories_loading = false;
                for inventory in &inventories {
                    if let Some(root) = inventory.root_folder() {
                        self.folder_names.insert(root, inventory.name.clone());
                    }
                }
                self.inventories = inventories;
            }
            IoEvent::InventoriesLoaded(Err(message)) => {
                self.inventories_loading = false;
                self.status
                    .set_error(format!("Failed to load inventories: {message}"));
            }
            IoEvent::RootFolderResolved { inventory, result } => match result {
                Ok(root) => {
                    if let Some(entry) = self.inventories.iter_mut().find(|i| i.id == inventory) {
                        entry.root_folder_id = Some(root);
                        self.folder_names.insert(root, entry.name.clone());
                    }
                    if self.active_inventory == Some(inventory) {
                        self.open_folder(root);
                    }
                }
                Err(message) => {
                    self.status
                        .set_error(format!("Failed to open inventory: {message}"));
                }
            },
            IoEvent::FolderLoaded {
                folder,
                seq,
                result,
            } => {
                if !self.loads.is_current(seq) {
                    tracing::debug!(%folder, seq, "Discarding stale folder load");
                    return;
                }
                self.loading = false;
                match result {
                    Ok(contents) => {
                        for subfolder in &contents.folders {
                            self.folder_names
                                .insert(subfolder.id, subfolder.name.clone());
                        }
                        if let Some(parent) = &contents.parent {
                            self.folder_names.insert(parent.id, parent.name.clone());
                        }
                        self.folders = contents.folders;
                        self.items = contents.items;
                        self.parent = contents.parent;
                    }
                    // Navigation state stays where the user put it; only
                    // the pane content is in doubt.
                    Err(message) => {
                        self.status
                            .set_error(format!("Failed to load folder: {message}"));
                    }
                }
            }
            IoEvent::FolderCreated(Ok(created)) => {
                self.pending_mutation = false;
                if let (Some(id), Some(name)) = (created.folder_id, created.name.clone()) {
                    self.folder_names.insert(id, name);
                }
                self.status.set_info(format!(
                    "Created folder {}",
                    created.name.as_deref().unwrap_or("")
                ));
                self.close_modal();
                self.refresh();
            }
            IoEvent::FolderCreated(Err(message)) => {
                self.pending_mutation = false;
                self.status
                    .set_error(format!("Failed to create folder: {message}"));
            }
            IoEvent::InventoryCreated(Ok(())) => {
                self.pending_mutation = false;
                self.status.set_info("Inventory created".to_string());
                self.close_modal();
                self.request_inventories();
            }
            IoEvent::InventoryCreated(Err(message)) => {
                self.pending_mutation = false;
                self.status
                    .set_error(format!("Failed to create inventory: {message}"));
            }
            IoEvent::ItemDeleted(Ok(item)) => {
                self.pending_mutation = false;
                tracing::debug!(%item, "Item removed");
                self.status.set_info("Item removed".to_string());
                self.close_modal();
                self.refresh();
            }
            IoEvent::ItemDeleted(Err(message)) => {
                self.pending_mutation = false;
                self.status
                    .set_error(format!("Failed to delete item: {message}"));
            }
            IoEvent::UploadProgress { sent, total } => {
                self.upload_progress = Some((sent, total));
            }
            IoEvent::UploadFinished(Ok(())) => {
                self.uploading = false;
                self.upload_progress = None;
                self.staged_upload = None;
                self.upload_path_input.clear();
                self.status.set_info("File uploaded successfully".to_string());
                self.close_modal();
                self.refresh();
            }
            IoEvent::UploadFinished(Err(message)) => {
                self.uploading = false;
                self.upload_progress = None;
                self.status.set_error(format!("Upload failed: {message}"));
            }
            IoEvent::SessionExpired(message) => {
                tracing::info!(message = %message, "Session expired");
                // No Logout command here: the worker's stale token is
                // overwritten by the next login, and a LoggedOut event
                // would reset the auth form and eat the notice below.
                self.sign_out_locally();
                self.auth.notice = Some(AuthNotice::Error(if message.is_empty() {
                    "Session expired, please sign in again".to_string()
                } else {
                    format!("Session expired: {message}")
                }));
            }
        }
    }
}

impl eframe::App for Stowage {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.status
            .clear_expired_messages(self.config.ui.message_timeout_secs);
        self.drain_io();

        if !self.session.signed_in() {
            self.render_auth(ctx);
            return;
        }

        self.handle_dropped_files(ctx);
        self.render_top_bar(ctx);
        self.render_status_bar(ctx);
        self.render_sidebar(ctx);
        self.render_items(ctx);
        self.render_modals(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FolderContents;
    use std::sync::mpsc::channel;

    fn test_app() -> Stowage {
        let (cmd_tx, _cmd_rx) = channel();
        let (_res_tx, res_rx) = channel();
        let mut app = Stowage::with_channels(Config::default(), cmd_tx, res_rx);
        app.session.begin("neru".to_string());
        app
    }

    fn contents(folders: Vec<(i64, &str)>, items: Vec<(i64, &str)>) -> FolderContents {
        FolderContents {
            folders: folders
                .into_iter()
                .map(|(id, name)| Folder {
                    id: FolderId(id),
                    name: name.to_string(),
                })
                .collect(),
            items: items
                .into_iter()
                .map(|(id, name)| Item {
                    id: crate::api::ItemId(id),
                    name: name.to_string(),
                    url: format!("assets/{id}.brson"),
                })
                .collect(),
            parent: None,
        }
    }

    #[test]
    fn stale_folder_loads_are_discarded() {
        let mut app = test_app();
        app.open_folder(FolderId(1));
        let slow = 1; // seq issued for folder 1
        app.open_folder(FolderId(2));
        let fast = 2;

        app.apply_event(IoEvent::FolderLoaded {
            folder: FolderId(2),
            seq: fast,
            result: Ok(contents(vec![], vec![(9, "newer")])),
        });
        // The older response resolves afterwards and must not overwrite.
        app.apply_event(IoEvent::FolderLoaded {
            folder: FolderId(1),
            seq: slow,
            result: Ok(contents(vec![], vec![(3, "older")])),
        });

        assert_eq!(app.items.len(), 1);
        assert_eq!(app.items[0].name, "newer");
        assert!(!app.loading);
    }

    #[test]
    fn failed_load_leaves_navigation_alone() {
        let mut app = test_app();
        app.open_folder(FolderId(1));
        app.open_folder(FolderId(2));

        app.apply_event(IoEvent::FolderLoaded {
            folder: FolderId(2),
            seq: 2,
            result: Err("boom".to_string()),
        });

        assert_eq!(app.nav.current(), Some(FolderId(2)));
        assert!(app.nav.can_go_back());
        assert!(app.status.error_message.is_some());
    }

    #[test]
    fn folder_load_records_display_names() {
        let mut app = test_app();
        app.open_folder(FolderId(1));

        app.apply_event(IoEvent::FolderLoaded {
            folder: FolderId(1),
            seq: 1,
            result: Ok(contents(vec![(5, "Textures")], vec![])),
        });

        assert_eq!(app.folder_label(FolderId(5)), "Textures");
        assert_eq!(app.folder_label(FolderId(99)), "Folder 99");
    }

    #[test]
    fn session_expiry_returns_to_login() {
        let mut app = test_app();
        app.open_folder(FolderId(1));

        app.apply_event(IoEvent::SessionExpired("Auth token invalid".to_string()));

        assert!(!app.session.signed_in());
        assert_eq!(app.nav.current(), None);
        assert!(matches!(app.auth.notice, Some(AuthNotice::Error(_))));
    }

    #[test]
    fn revisiting_active_folder_issues_no_load() {
        let mut app = test_app();
        app.open_folder(FolderId(1));
        app.apply_event(IoEvent::FolderLoaded {
            folder: FolderId(1),
            seq: 1,
            result: Ok(contents(vec![], vec![])),
        });
        assert!(!app.loading);

        // Clicking the folder that is already active must not flip the
        // pane back into its loading state.
        app.open_folder(FolderId(1));
        assert!(!app.loading);
    }
}

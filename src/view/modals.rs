// Modal rendering (Upload, New Folder, New Inventory, Delete confirm)

use crate::api::Item;
use crate::app::{Modal, Stowage};
use crate::style;
use eframe::egui;
use std::path::PathBuf;

impl Stowage {
    pub(crate) fn render_modals(&mut self, ctx: &egui::Context) {
        let modal = self.modal.clone();
        match modal {
            Modal::None => {}
            Modal::Upload => self.render_upload_modal(ctx),
            Modal::NewFolder => self.render_new_folder_modal(ctx),
            Modal::NewInventory => self.render_new_inventory_modal(ctx),
            Modal::ConfirmDelete(item) => self.render_delete_modal(ctx, &item),
        }
    }

    fn render_upload_modal(&mut self, ctx: &egui::Context) {
        egui::Window::new("Upload Item")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(style::modal_width(ctx))
            .show(ctx, |ui| {
                ui.label("Drop a file anywhere in the window, or enter a path:");
                ui.horizontal(|ui| {
                    ui.add(
                        egui::TextEdit::singleline(&mut self.upload_path_input)
                            .hint_text("/path/to/asset.resonitepackage")
                            .desired_width(ui.available_width() - 60.0),
                    );
                    if ui.button("Stage").clicked() {
                        let path = PathBuf::from(self.upload_path_input.trim());
                        self.stage_upload(path);
                    }
                });

                if let Some(path) = self.staged_upload.clone() {
                    let name = path
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.display().to_string());
                    let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
                    ui.add_space(4.0);
                    ui.label(
                        egui::RichText::new(format!(
                            "{} ({})",
                            name,
                            bytesize::ByteSize::b(size)
                        ))
                        .strong(),
                    );
                }

                if let Some((sent, total)) = self.upload_progress {
                    let fraction = if total > 0 {
                        sent as f32 / total as f32
                    } else {
                        0.0
                    };
                    ui.add_space(4.0);
                    ui.add(egui::ProgressBar::new(fraction).show_percentage());
                }

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let ready = self.staged_upload.is_some()
                        && !self.uploading
                        && self.nav.current().is_some();
                    if ui
                        .add_enabled(ready, egui::Button::new("Upload"))
                        .clicked()
                    {
                        self.submit_upload();
                    }
                    if ui
                        .add_enabled(!self.uploading, egui::Button::new("Cancel"))
                        .clicked()
                    {
                        self.close_modal();
                    }
                });
            });
    }

    fn render_new_folder_modal(&mut self, ctx: &egui::Context) {
        egui::Window::new("New Folder")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(style::modal_width(ctx))
            .show(ctx, |ui| {
                ui.label(format!(
                    "Create a folder inside {}",
                    self.nav
                        .current()
                        .map(|folder| self.folder_label(folder))
                        .unwrap_or_else(|| "?".to_string())
                ));
                ui.add(
                    egui::TextEdit::singleline(&mut self.folder_name_input)
                        .hint_text("Folder name")
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let ready = !self.pending_mutation
                        && !self.folder_name_input.trim().is_empty()
                        && self.nav.current().is_some();
                    if ui
                        .add_enabled(ready, egui::Button::new("Create"))
                        .clicked()
                    {
                        self.submit_new_folder();
                    }
                    if ui.button("Cancel").clicked() {
                        self.close_modal();
                    }
                });
            });
    }

    fn render_new_inventory_modal(&mut self, ctx: &egui::Context) {
        egui::Window::new("New Inventory")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(style::modal_width(ctx))
            .show(ctx, |ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut self.inventory_name_input)
                        .hint_text("Inventory name")
                        .desired_width(f32::INFINITY),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    let ready =
                        !self.pending_mutation && !self.inventory_name_input.trim().is_empty();
                    if ui
                        .add_enabled(ready, egui::Button::new("Create"))
                        .clicked()
                    {
                        self.submit_new_inventory();
                    }
                    if ui.button("Cancel").clicked() {
                        self.close_modal();
                    }
                });
            });
    }

    fn render_delete_modal(&mut self, ctx: &egui::Context, item: &Item) {
        egui::Window::new("Confirm Deletion")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .default_width(style::modal_width(ctx))
            .show(ctx, |ui| {
                ui.label(format!("Delete \"{}\"?", item.name));
                ui.label(
                    egui::RichText::new("The item and its asset are removed from the server.")
                        .weak(),
                );

                ui.add_space(8.0);
                ui.horizontal(|ui| {
                    if ui
                        .add_enabled(
                            !self.pending_mutation,
                            egui::Button::new(
                                egui::RichText::new("Delete").color(style::ERROR_COLOR),
                            ),
                        )
                        .clicked()
                    {
                        self.confirm_delete(item);
                    }
                    if ui.button("Cancel").clicked() {
                        self.close_modal();
                    }
                });
            });
    }
}

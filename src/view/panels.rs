// Panel rendering for the browser screen: top bar, sidebar trees,
// item table, status bar.

use crate::api::{FolderId, Inventory};
use crate::app::{Modal, Stowage};
use crate::style;
use eframe::egui;

impl Stowage {
    pub(crate) fn render_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                // Back/forward affordances come straight from the history
                // predicates, re-read every frame.
                if ui
                    .add_enabled(self.nav.can_go_back(), egui::Button::new("⬅"))
                    .on_hover_text("Back")
                    .clicked()
                {
                    self.go_back();
                }
                if ui
                    .add_enabled(self.nav.can_go_forward(), egui::Button::new("➡"))
                    .on_hover_text("Forward")
                    .clicked()
                {
                    self.go_forward();
                }
                if ui
                    .add_enabled(self.parent.is_some(), egui::Button::new("⬆"))
                    .on_hover_text("Parent folder")
                    .clicked()
                {
                    self.go_up();
                }
                if ui
                    .add_enabled(self.nav.current().is_some(), egui::Button::new("⟳"))
                    .on_hover_text("Refresh")
                    .clicked()
                {
                    self.refresh();
                }

                ui.separator();
                self.render_breadcrumb(ui);

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Log Out").clicked() {
                        self.logout();
                    }
                    if let Some(username) = self.session.username.clone() {
                        ui.label(egui::RichText::new(username).strong());
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn render_breadcrumb(&mut self, ui: &mut egui::Ui) {
        if let Some(parent) = self.parent.clone() {
            // Breadcrumb clicks are fresh navigation, same as folder tiles.
            if ui.link(parent.name).clicked() {
                self.open_folder(parent.id);
            }
            ui.label("/");
        }
        match self.nav.current() {
            Some(current) => {
                ui.label(egui::RichText::new(self.folder_label(current)).strong());
            }
            None => {
                ui.label(egui::RichText::new("No folder selected").weak());
            }
        }
    }

    pub(crate) fn render_sidebar(&mut self, ctx: &egui::Context) {
        egui::SidePanel::left("sidebar")
            .resizable(true)
            .default_width(style::SIDEBAR_DEFAULT)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("sidebar_scroll")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.add_space(4.0);
                        self.render_inventory_tree(ui);
                        ui.add_space(12.0);
                        self.render_folder_tree(ui);
                    });
            });
    }

    fn render_inventory_tree(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Inventories");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .small_button("✚")
                    .on_hover_text("New inventory")
                    .clicked()
                {
                    self.modal = Modal::NewInventory;
                }
            });
        });
        ui.separator();

        if self.inventories_loading {
            ui.add(egui::Spinner::new());
            return;
        }
        if self.inventories.is_empty() {
            ui.label(egui::RichText::new("No inventories found").weak());
            return;
        }

        let mut clicked: Option<Inventory> = None;
        for inventory in &self.inventories {
            let is_active = self.active_inventory == Some(inventory.id);
            let response = ui
                .selectable_label(is_active, format!("📦 {}", inventory.name))
                .on_hover_text(format!("Access: {}", inventory.access_level));
            if response.clicked() {
                clicked = Some(inventory.clone());
            }
        }
        if let Some(inventory) = clicked {
            self.enter_inventory(&inventory);
        }
    }

    fn render_folder_tree(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Folders");
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                if ui
                    .add_enabled(self.nav.current().is_some(), egui::Button::new("✚").small())
                    .on_hover_text("New folder")
                    .clicked()
                {
                    self.modal = Modal::NewFolder;
                }
            });
        });
        ui.separator();

        if self.nav.current().is_none() {
            ui.label(egui::RichText::new("Select an inventory").weak());
            return;
        }
        if self.folders.is_empty() && !self.loading {
            ui.label(egui::RichText::new("No subfolders").weak());
            return;
        }

        let mut clicked: Option<FolderId> = None;
        for folder in &self.folders {
            let response = style::truncated_label_with_sense(
                ui,
                format!("📁 {}", folder.name),
                egui::Sense::click(),
            );
            if response.clicked() {
                clicked = Some(folder.id);
            }
        }
        if let Some(folder) = clicked {
            self.open_folder(folder);
        }
    }

    pub(crate) fn render_items(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if self.nav.current().is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label(
                        egui::RichText::new("Pick an inventory to browse its folders and items")
                            .weak(),
                    );
                });
                return;
            }

            ui.horizontal(|ui| {
                ui.heading("Items");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("⬆ Upload").clicked() {
                        self.modal = Modal::Upload;
                    }
                });
            });
            ui.separator();

            if self.loading {
                ui.centered_and_justified(|ui| {
                    ui.add(egui::Spinner::new());
                });
                return;
            }
            if self.items.is_empty() {
                ui.centered_and_justified(|ui| {
                    ui.label(egui::RichText::new("This folder has no items").weak());
                });
                return;
            }

            self.render_item_table(ui);
        });
    }

    fn render_item_table(&mut self, ui: &mut egui::Ui) {
        use egui_extras::{Column, TableBuilder};

        let mut open_request = None;
        let mut delete_request = None;

        egui::ScrollArea::vertical()
            .id_salt("items_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TableBuilder::new(ui)
                    .striped(true)
                    .resizable(true)
                    .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
                    .column(Column::auto().at_least(style::ICON_COL_WIDTH))
                    .column(Column::remainder().clip(true))
                    .column(Column::auto().at_least(120.0))
                    .header(style::HEADER_HEIGHT, |mut header| {
                        header.col(|ui| {
                            ui.label("");
                        });
                        header.col(|ui| {
                            ui.label("Name");
                        });
                        header.col(|ui| {
                            ui.label("");
                        });
                    })
                    .body(|body| {
                        body.rows(style::ROW_HEIGHT, self.items.len(), |mut row| {
                            let item = &self.items[row.index()];

                            row.col(|ui| {
                                ui.label("📄");
                            });
                            row.col(|ui| {
                                style::truncated_label(ui, &item.name);
                            });
                            row.col(|ui| {
                                if ui
                                    .small_button("Open")
                                    .on_hover_text(&item.url)
                                    .clicked()
                                {
                                    open_request = Some(item.clone());
                                }
                                if ui
                                    .small_button("🗑")
                                    .on_hover_text("Delete item")
                                    .clicked()
                                {
                                    delete_request = Some(item.clone());
                                }
                            });
                        });
                    });
            });

        if let Some(item) = open_request {
            self.open_item(&item);
        }
        if let Some(item) = delete_request {
            self.modal = Modal::ConfirmDelete(item);
        }
    }

    pub(crate) fn render_status_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(format!(
                    "{} folders | {} items",
                    self.folders.len(),
                    self.items.len()
                ));
                if let Some((message, _)) = &self.status.error_message {
                    ui.separator();
                    ui.colored_label(style::ERROR_COLOR, message);
                } else if let Some((message, _)) = &self.status.info_message {
                    ui.separator();
                    ui.colored_label(style::SUCCESS_COLOR, message);
                }
            });
        });
    }
}

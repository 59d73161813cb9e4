// Login / register card shown before a session exists

use crate::app::Stowage;
use crate::state::{AuthNotice, AuthTab};
use crate::style;
use eframe::egui;

impl Stowage {
    pub(crate) fn render_auth(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            ui.add_space(ui.available_height() * 0.18);

            ui.vertical_centered(|ui| {
                ui.heading("Stowage");
                ui.label(egui::RichText::new(self.config.server.base_url.clone()).weak());
                ui.add_space(16.0);

                ui.set_max_width(style::AUTH_CARD_WIDTH);
                ui.group(|ui| {
                    ui.horizontal(|ui| {
                        if ui
                            .selectable_label(self.auth.tab == AuthTab::Login, "Sign In")
                            .clicked()
                        {
                            self.auth.switch_tab(AuthTab::Login);
                        }
                        if ui
                            .selectable_label(self.auth.tab == AuthTab::Register, "Register")
                            .clicked()
                        {
                            self.auth.switch_tab(AuthTab::Register);
                        }
                    });
                    ui.separator();

                    ui.add(
                        egui::TextEdit::singleline(&mut self.auth.username)
                            .hint_text("Username")
                            .desired_width(f32::INFINITY),
                    );
                    ui.add(
                        egui::TextEdit::singleline(&mut self.auth.password)
                            .password(true)
                            .hint_text("Password")
                            .desired_width(f32::INFINITY),
                    );
                    if self.auth.tab == AuthTab::Register {
                        ui.add(
                            egui::TextEdit::singleline(&mut self.auth.confirm)
                                .password(true)
                                .hint_text("Confirm password")
                                .desired_width(f32::INFINITY),
                        );
                    }

                    if let Some(notice) = &self.auth.notice {
                        ui.add_space(4.0);
                        match notice {
                            AuthNotice::Info(text) => {
                                ui.colored_label(style::SUCCESS_COLOR, text);
                            }
                            AuthNotice::Error(text) => {
                                ui.colored_label(style::ERROR_COLOR, text);
                            }
                        }
                    }

                    ui.add_space(8.0);

                    let label = match self.auth.tab {
                        AuthTab::Login => "Sign In",
                        AuthTab::Register => "Create Account",
                    };
                    let submit = ui
                        .add_enabled(!self.auth.busy, egui::Button::new(label))
                        .clicked()
                        || (!self.auth.busy && ui.input(|i| i.key_pressed(egui::Key::Enter)));

                    if self.auth.busy {
                        ui.add(egui::Spinner::new());
                    }

                    if submit {
                        match self.auth.tab {
                            AuthTab::Login => self.submit_login(),
                            AuthTab::Register => self.submit_register(),
                        }
                    }
                });
            });
        });
    }
}

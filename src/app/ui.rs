use super::{AppPhase, DocReportApp};
use crate::utils::format_size;
use eframe::egui::{self, Color32, RichText, Stroke};
use rfd::FileDialog;
use std::path::PathBuf;

const ACCENT: Color32 = Color32::from_rgb(66, 133, 244);
const ERROR_RED: Color32 = Color32::from_rgb(220, 50, 50);
const NOTICE_AMBER: Color32 = Color32::from_rgb(225, 170, 60);

const PICKER_FILTER_DOCUMENTS: &[&str] = &["pdf"];
const PICKER_FILTER_IMAGES: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

impl DocReportApp {
    pub fn render(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|f| f.path.clone())
                .collect()
        });
        if !dropped.is_empty() {
            self.stage_paths(dropped);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.add_space(20.0);
                ui.vertical_centered(|ui| {
                    ui.heading("Document Report Builder");
                    ui.add_space(5.0);
                    ui.label(
                        RichText::new("Upload documents, extract their text, get a structured report")
                            .color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                });
                ui.add_space(20.0);

                match self.phase.clone() {
                    AppPhase::Succeeded { report } => self.render_results(ui, &report),
                    _ => self.render_intake(ui, ctx),
                }

                ui.add_space(20.0);
            });
        });
    }

    fn render_intake(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let is_running = self.phase.is_running();

        ui.add_enabled_ui(!is_running, |ui| {
            ui.group(|ui| {
                ui.horizontal(|ui| {
                    ui.label("API endpoint");
                    ui.add_space(4.0);
                    ui.add(
                        egui::TextEdit::singleline(&mut self.base_url)
                            .desired_width(ui.available_width())
                            .hint_text("https://api.example.com"),
                    );
                });
            });

            ui.add_space(15.0);
            self.render_drop_zone(ui, ctx);
            ui.add_space(10.0);
            self.render_file_list(ui);
        });

        ui.add_space(15.0);

        ui.vertical_centered(|ui| {
            let can_run = !self.files.is_empty() && !is_running;
            ui.add_enabled_ui(can_run, |ui| {
                let button =
                    egui::Button::new("🚀 Generate Report").min_size(egui::vec2(200.0, 40.0));
                if ui.add(button).clicked() {
                    self.start_run();
                }
            });
        });

        if is_running {
            ui.add_space(15.0);
            ui.group(|ui| {
                ui.label(format!("⏳ {}", self.phase.status_text()));
                let progress_bar = egui::ProgressBar::new(self.phase.progress())
                    .show_percentage()
                    .animate(true)
                    .fill(ACCENT);
                ui.add(progress_bar);
            });
        }

        let error = match &self.phase {
            AppPhase::Failed { error } => Some(error.clone()),
            _ => self.intake_error.clone(),
        };
        if let Some(error) = error {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                ui.colored_label(ERROR_RED, error);
            });
        }

        if !self.notices.is_empty() {
            ui.add_space(10.0);
            for notice in &self.notices {
                ui.colored_label(NOTICE_AMBER, format!("⚠ {}", notice));
            }
        }
    }

    fn render_drop_zone(&mut self, ui: &mut egui::Ui, ctx: &egui::Context) {
        let drag_hover = ctx.input(|i| !i.raw.hovered_files.is_empty());

        let frame = egui::Frame::none()
            .fill(if drag_hover {
                ui.visuals().selection.bg_fill.gamma_multiply(0.3)
            } else {
                ui.style().visuals.extreme_bg_color
            })
            .stroke(Stroke::new(
                1.0,
                if drag_hover {
                    ACCENT
                } else {
                    ui.visuals().weak_text_color()
                },
            ))
            .inner_margin(20.0);

        frame.show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.vertical_centered(|ui| {
                ui.label(if drag_hover {
                    "Release to add files"
                } else {
                    "Drag & drop PDF or image files here"
                });
                ui.add_space(8.0);
                if ui.button("📁 Select Files").clicked() {
                    if let Some(paths) = FileDialog::new()
                        .add_filter("Documents", PICKER_FILTER_DOCUMENTS)
                        .add_filter("Images", PICKER_FILTER_IMAGES)
                        .pick_files()
                    {
                        self.stage_paths(paths);
                    }
                }
            });
        });
    }

    fn render_file_list(&mut self, ui: &mut egui::Ui) {
        if self.files.is_empty() {
            return;
        }

        let mut remove_index = None;
        ui.group(|ui| {
            ui.set_width(ui.available_width());
            for (idx, file) in self.files.iter().enumerate() {
                ui.horizontal(|ui| {
                    ui.label("📄");
                    ui.label(&file.name);
                    ui.label(
                        RichText::new(format_size(file.size))
                            .color(ui.visuals().weak_text_color()),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.small_button("✖").clicked() {
                            remove_index = Some(idx);
                        }
                    });
                });
            }
        });
        if let Some(idx) = remove_index {
            self.remove_file(idx);
        }
    }

    fn render_results(&mut self, ui: &mut egui::Ui, report: &str) {
        ui.group(|ui| {
            ui.label(RichText::new("Report").strong());
            ui.add_space(8.0);
            egui::ScrollArea::vertical()
                .max_height(360.0)
                .show(ui, |ui| {
                    // Read-only buffer keeps the text selectable.
                    let mut shown = report;
                    ui.add(
                        egui::TextEdit::multiline(&mut shown)
                            .font(egui::TextStyle::Monospace)
                            .desired_width(ui.available_width()),
                    );
                });
        });

        ui.add_space(15.0);
        ui.vertical_centered(|ui| {
            ui.horizontal(|ui| {
                let half = (ui.available_width() - 220.0).max(0.0) / 2.0;
                ui.add_space(half);
                if ui.button("💾 Download Report").clicked() {
                    self.save_report(report);
                }
                ui.add_space(5.0);
                if ui.button("🔄 Start Over").clicked() {
                    self.reset();
                }
            });
        });

        if !self.notices.is_empty() {
            ui.add_space(10.0);
            ui.vertical_centered(|ui| {
                for notice in &self.notices {
                    ui.label(
                        RichText::new(notice).color(ui.visuals().text_color().gamma_multiply(0.7)),
                    );
                }
            });
        }
    }
}

mod state;
mod ui;

use crate::pipeline::{
    is_supported_document, stage_batch, PipelineError, PipelineEvent, PipelineRunner, RunPhase,
    StagedFile,
};
use crate::utils::save_report_dialog;
use eframe::egui;
pub use state::AppPhase;
use std::path::PathBuf;
use std::sync::mpsc as std_mpsc;
use std::sync::mpsc::Receiver;

#[derive(Default)]
pub struct DocReportApp {
    base_url: String,
    files: Vec<StagedFile>,
    phase: AppPhase,
    intake_error: Option<String>,
    notices: Vec<String>,
    event_receiver: Option<Receiver<PipelineEvent>>,
}

impl DocReportApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, base_url: String) -> Self {
        println!("Initializing Document Report Builder");
        Self {
            base_url,
            ..Default::default()
        }
    }

    /// Validates and appends a batch of candidate files. Dropped files with
    /// unsupported extensions are skipped with a notice; the picker is
    /// already filtered so this mainly guards the drop path.
    pub fn stage_paths(&mut self, paths: Vec<PathBuf>) {
        if self.phase.is_running() {
            return;
        }
        self.intake_error = None;
        self.notices.clear();

        let (supported, skipped): (Vec<_>, Vec<_>) =
            paths.into_iter().partition(|p| is_supported_document(p));
        for path in &skipped {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string());
            self.notices
                .push(format!("\"{}\" skipped (unsupported file type)", name));
        }

        if supported.is_empty() {
            return;
        }

        match stage_batch(&supported) {
            Ok(outcome) => {
                println!("Staged {} file(s)", outcome.accepted.len());
                self.files.extend(outcome.accepted);
                self.notices.extend(outcome.warnings);
                // A fresh batch clears a stale failure banner.
                if matches!(self.phase, AppPhase::Failed { .. }) {
                    self.phase = AppPhase::Idle;
                }
            }
            Err(e) => {
                eprintln!("Intake rejected: {}", e);
                self.intake_error = Some(e.to_string());
            }
        }
    }

    pub fn remove_file(&mut self, index: usize) {
        if self.phase.is_running() || index >= self.files.len() {
            return;
        }
        self.files.remove(index);
    }

    pub fn reset(&mut self) {
        println!("Resetting application state");
        self.files.clear();
        self.phase = AppPhase::Idle;
        self.intake_error = None;
        self.notices.clear();
        self.event_receiver = None;
    }

    pub fn start_run(&mut self) {
        if self.phase.is_running() {
            return;
        }
        // Every run starts clean: a leftover failure banner must not mask a
        // fresh precondition error.
        if matches!(self.phase, AppPhase::Failed { .. }) {
            self.phase = AppPhase::Idle;
        }
        self.intake_error = None;
        self.notices.clear();

        if self.files.is_empty() {
            self.intake_error = Some("Please upload at least one file".to_string());
            return;
        }
        if self.base_url.trim().is_empty() {
            self.intake_error = Some(PipelineError::MissingEndpoint.to_string());
            return;
        }

        println!("Starting pipeline for {} file(s)", self.files.len());

        let files = self.files.clone();
        let base_url = self.base_url.clone();
        let (sender, receiver) = std_mpsc::channel();
        self.event_receiver = Some(receiver);
        self.phase = AppPhase::Running(RunPhase::ExtractingText {
            current: 0,
            total: files.len(),
        });

        std::thread::spawn(move || {
            let rt = tokio::runtime::Runtime::new().unwrap();
            rt.block_on(async {
                let result = match PipelineRunner::new(base_url) {
                    Ok(runner) => runner.run(&files, &sender).await,
                    Err(e) => Err(e),
                };
                // Always sent, on success and on every failure path, so the
                // UI is guaranteed to leave the running state.
                let _ = sender.send(PipelineEvent::Finished(result));
            });
        });
    }

    fn save_report(&mut self, report: &str) {
        match save_report_dialog(report) {
            Ok(Some(path)) => {
                println!("Report saved to {}", path.display());
                self.notices.push(format!("Saved to {}", path.display()));
            }
            Ok(None) => {}
            Err(e) => {
                eprintln!("Failed to save report: {}", e);
                self.notices.push(format!("Failed to save report: {}", e));
            }
        }
    }

    pub fn update_state(&mut self, ctx: &egui::Context) {
        if let Some(receiver) = &self.event_receiver {
            let mut had_updates = false;
            let mut finished = false;

            while let Ok(event) = receiver.try_recv() {
                had_updates = true;
                match event {
                    PipelineEvent::Phase(phase) => {
                        self.phase = AppPhase::Running(phase);
                    }
                    PipelineEvent::Finished(Ok(report)) => {
                        println!("Pipeline completed, report is {} bytes", report.len());
                        self.phase = AppPhase::Succeeded { report };
                        finished = true;
                    }
                    PipelineEvent::Finished(Err(e)) => {
                        eprintln!("Pipeline failed: {}", e);
                        self.phase = AppPhase::Failed {
                            error: e.to_string(),
                        };
                        finished = true;
                    }
                }
            }

            if finished {
                self.event_receiver = None;
            }
            if had_updates {
                ctx.request_repaint();
            }
        }

        if self.phase.is_running() {
            ctx.request_repaint();
        }
    }
}

impl eframe::App for DocReportApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.update_state(ctx);
        self.render(ctx);
    }
}

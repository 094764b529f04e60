mod app;
mod pipeline;
mod utils;

use app::DocReportApp;
use eframe::CreationContext;

fn main() {
    let _ = dotenvy::dotenv();
    let base_url = std::env::var("DOCREPORT_API_BASE").unwrap_or_default();

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([640.0, 720.0])
            .with_min_inner_size([480.0, 560.0]),
        ..Default::default()
    };

    if let Err(e) = eframe::run_native(
        "Document Report Builder",
        options,
        Box::new(move |cc: &CreationContext| Box::new(DocReportApp::new(cc, base_url))),
    ) {
        eprintln!("Failed to start UI: {}", e);
    }
}

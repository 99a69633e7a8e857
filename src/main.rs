//! REST Statistics Visualization Tool
//!
//! A GUI application for aggregating and charting record collections served
//! by a REST backend.

use eframe::egui;
use std::sync::{Arc, Mutex};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use reststats::app::{App, AppWrapper};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Initialize the Tokio runtime
    let rt = Runtime::new().unwrap();
    rt.block_on(async {
        let options = eframe::NativeOptions {
            viewport: egui::ViewportBuilder::default()
                .with_inner_size([1200.0, 800.0])
                .with_min_inner_size([800.0, 600.0])
                .with_title("REST Statistics"),
            ..Default::default()
        };

        if let Err(e) = eframe::run_native(
            "REST Statistics",
            options,
            Box::new(|cc| {
                let fonts = egui::FontDefinitions::default();
                cc.egui_ctx.set_fonts(fonts);

                let app: Arc<Mutex<App>> = Arc::new(Mutex::new(App::default()));
                Ok(Box::new(AppWrapper { app }) as Box<dyn eframe::App>)
            }),
        ) {
            tracing::error!(error = %e, "error running application");
        }
    });
}

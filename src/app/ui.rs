use egui::{ComboBox, Context};
use std::sync::{Arc, Mutex};

use super::state::App;
use super::Report;
use crate::aggregate::aggregate;
use crate::fetch::{fetch_pair, RestClient};
use crate::plotting::{render_chart_async, RenderBackend};
use crate::types::{ChartKind, MissingValuePolicy};

/// Draw the main application UI
pub fn draw_ui(app: &mut App, ctx: &Context, app_arc: Arc<Mutex<App>>) {
    egui::SidePanel::left("side_panel").show(ctx, |ui| {
        ui.heading("Report Options");
        ui.separator();

        ui.label("Backend URL:");
        ui.text_edit_singleline(&mut app.base_url);

        if ui.button("Fetch Reports").clicked() && !app.is_loading {
            start_refresh(app, app_arc.clone(), ctx.clone());
        }

        ui.separator();

        // Report selection buttons
        for report in Report::ALL {
            if ui.button(report.title()).clicked() && app.selected_report != report {
                app.selected_report = report;
                handle_selection_change(app, app_arc.clone(), ctx.clone());
            }
        }

        ui.separator();

        // Chart type buttons
        for kind in ChartKind::ALL {
            if ui.button(format!("{} Chart", kind.label())).clicked() {
                app.chart_kind = kind;
                app.update_needed = true;
            }
        }

        ui.separator();

        ui.label("Renderer:");
        let prev_backend = app.backend;
        ComboBox::new("backend_selector", "")
            .selected_text(app.backend.label())
            .show_ui(ui, |ui| {
                for backend in RenderBackend::ALL {
                    ui.selectable_value(&mut app.backend, backend, backend.label());
                }
            });
        if prev_backend != app.backend {
            app.update_needed = true;
        }

        ui.label("Missing values:");
        let prev_policy = app.missing_value_policy;
        ComboBox::new("policy_selector", "")
            .selected_text(app.missing_value_policy.label())
            .show_ui(ui, |ui| {
                for policy in MissingValuePolicy::ALL {
                    ui.selectable_value(&mut app.missing_value_policy, policy, policy.label());
                }
            });
        if prev_policy != app.missing_value_policy {
            handle_selection_change(app, app_arc.clone(), ctx.clone());
        }
    });

    egui::CentralPanel::default().show(ctx, |ui| {
        ui.heading("REST Statistics");
        ui.separator();
        ui.label(app.selected_report.title());

        if app.is_loading {
            ui.label("Fetching... Please wait.");
            ui.spinner();
        }

        if let Some(aggregation) = &app.aggregation {
            ui.label(format!("Groups: {}", aggregation.len()));
            ui.label(format!("Total: {}", format_value(aggregation.total())));
        }

        ui.separator();
        if let Some(error) = &app.error_message {
            // A failed fetch suppresses the chart entirely
            ui.colored_label(egui::Color32::RED, format!("Error: {error}"));
        } else if let Some(texture) = &app.chart_texture {
            let response = ui.add(egui::Image::new(texture).sense(egui::Sense::hover()));

            // Resolve pointer hovers against the hit regions of this render
            // pass; the tooltip lives and dies with the current chart
            let tooltip = response.hover_pos().and_then(|pos| {
                let rendered = app.rendered.as_ref()?;
                let local = pos - response.rect.min;
                let sx = rendered.width as f32 / response.rect.width();
                let sy = rendered.height as f32 / response.rect.height();
                let region = rendered.region_at(local.x * sx, local.y * sy)?;
                Some(format!("{}: {}", region.label, format_value(region.value)))
            });
            if let Some(text) = tooltip {
                response.on_hover_text(text);
            }
        }
    });

    // Re-render when the aggregation or chart selection changed
    if app.update_needed && !app.is_rendering {
        app.update_needed = false;
        if let Some(aggregation) = app.aggregation.clone() {
            app.is_rendering = true;
            let backend = app.backend;
            let kind = app.chart_kind;
            let title = app.selected_report.title().to_string();
            let app_clone = app_arc.clone();
            let ctx = ctx.clone();

            tokio::spawn(async move {
                let result = render_chart_async(backend, aggregation, kind, title).await;
                let mut app = app_clone.lock().unwrap();
                app.is_rendering = false;
                match result {
                    Ok(rendered) => {
                        app.rendered = Some(rendered);
                        app.texture_needed = true;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "chart rendering failed");
                    }
                }
                ctx.request_repaint();
            });
        }
    }

    if app.texture_needed {
        load_chart_texture(app, ctx);
        app.texture_needed = false;
    }
}

/// Kick off a fetch-and-aggregate cycle for the current selection.
fn start_refresh(app: &mut App, app_arc: Arc<Mutex<App>>, ctx: Context) {
    let client = RestClient::new(app.base_url.clone());
    let report = app.selected_report;
    let policy = app.missing_value_policy;
    let generation = Arc::clone(&app.generation);
    let ticket = generation.next();

    app.is_loading = true;
    app.error_message = None;

    tokio::spawn(async move {
        let outcome = fetch_pair(
            client.fetch_records(report.primary_path()),
            Some(client.fetch_records(report.secondary_path())),
        )
        .await;

        let mut app = app_arc.lock().unwrap();
        if !generation.is_current(ticket) {
            tracing::debug!(ticket, "dropping response from a superseded fetch cycle");
            return;
        }
        app.is_loading = false;

        match outcome {
            Ok((primary, secondary)) => {
                let aggregation = aggregate(&primary, &secondary, &report.query(), policy);
                app.update_with_aggregation(aggregation);
            }
            Err(e) => {
                tracing::debug!(error = ?e, "fetch cycle failed");
                app.set_fetch_error();
            }
        }
        ctx.request_repaint();
    });
}

fn handle_selection_change(app: &mut App, app_arc: Arc<Mutex<App>>, ctx: Context) {
    if let Some(cached) = app.get_cached_aggregation() {
        // Use cached aggregation
        app.update_with_aggregation(cached);
    } else {
        start_refresh(app, app_arc, ctx);
    }
}

fn load_chart_texture(app: &mut App, ctx: &Context) {
    let Some(rendered) = &app.rendered else {
        return;
    };
    match image::load_from_memory(&rendered.png) {
        Ok(image) => {
            let size = [image.width() as usize, image.height() as usize];
            let pixels = image.to_rgba8();
            let pixels = pixels.as_flat_samples();
            let texture = ctx.load_texture(
                "chart_texture",
                egui::ColorImage::from_rgba_unmultiplied(size, pixels.as_slice()),
                egui::TextureOptions::LINEAR,
            );
            app.chart_texture = Some(texture);
        }
        Err(e) => tracing::error!(error = %e, "failed to decode chart image"),
    }
}

/// Render a total for display: integral values without a fractional part.
fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

use eframe::App as EApp;
use egui::TextureHandle;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::fetch::FetchGeneration;
use crate::plotting::{RenderBackend, RenderedChart};
use crate::types::{Aggregation, ChartKind, ChartQuery, MissingValuePolicy};

/// Base URL of the demo CRUD backend.
pub const DEFAULT_BASE_URL: &str = "https://crud-backend-lfj2.onrender.com";

/// User-visible message shown when a fetch cycle fails.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data.";

/// The two report presets the console offers.
///
/// Each names a primary collection to count, a secondary collection that
/// supplies labels, and the field selectors joining them.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum Report {
    ApplicationsPerOrganization,
    UsersPerApplication,
}

impl Report {
    pub const ALL: [Report; 2] = [
        Report::ApplicationsPerOrganization,
        Report::UsersPerApplication,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Report::ApplicationsPerOrganization => "Applications per Organization",
            Report::UsersPerApplication => "Users per Application",
        }
    }

    /// Path of the collection being counted.
    pub fn primary_path(&self) -> &'static str {
        match self {
            Report::ApplicationsPerOrganization => "app",
            Report::UsersPerApplication => "users",
        }
    }

    /// Path of the collection supplying display labels.
    pub fn secondary_path(&self) -> &'static str {
        match self {
            Report::ApplicationsPerOrganization => "org",
            Report::UsersPerApplication => "app",
        }
    }

    /// Field selectors for this report. The value field is absent in the
    /// backing data, so every record counts per the missing-value policy.
    pub fn query(&self) -> ChartQuery {
        match self {
            Report::ApplicationsPerOrganization => ChartQuery::new("orgId", "1", Some("orgName")),
            Report::UsersPerApplication => ChartQuery::new("appId", "1", Some("appName")),
        }
    }
}

/// A key used for caching aggregations per backend URL, report, and policy.
#[derive(Clone, Hash, Eq, PartialEq)]
pub struct CacheKey {
    pub base_url: String,
    pub report: Report,
    pub policy: MissingValuePolicy,
}

/// Main application state
#[derive(Clone)]
pub struct App {
    pub base_url: String,
    pub selected_report: Report,
    pub chart_kind: ChartKind,
    pub backend: RenderBackend,
    pub missing_value_policy: MissingValuePolicy,
    pub aggregation: Option<Aggregation>,
    pub rendered: Option<RenderedChart>,
    pub chart_texture: Option<TextureHandle>,
    pub aggregation_cache: HashMap<CacheKey, Aggregation>,
    pub generation: Arc<FetchGeneration>,
    pub update_needed: bool,
    pub texture_needed: bool,
    pub is_loading: bool,
    pub is_rendering: bool,
    pub error_message: Option<String>,
}

impl App {
    pub fn cache_key(&self) -> CacheKey {
        CacheKey {
            base_url: self.base_url.clone(),
            report: self.selected_report,
            policy: self.missing_value_policy,
        }
    }

    /// Update the app state with a freshly computed aggregation
    pub fn update_with_aggregation(&mut self, aggregation: Aggregation) {
        self.aggregation_cache
            .insert(self.cache_key(), aggregation.clone());
        self.aggregation = Some(aggregation);
        self.error_message = None;
        self.update_needed = true;
    }

    /// Record a failed fetch cycle. The error suppresses chart rendering
    /// entirely; no partial chart survives.
    pub fn set_fetch_error(&mut self) {
        self.error_message = Some(FETCH_ERROR_MESSAGE.to_string());
        self.aggregation = None;
        self.rendered = None;
        self.chart_texture = None;
        self.update_needed = false;
    }

    /// Get a cached aggregation for the current selection
    pub fn get_cached_aggregation(&self) -> Option<Aggregation> {
        self.aggregation_cache.get(&self.cache_key()).cloned()
    }
}

impl Default for App {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            selected_report: Report::ApplicationsPerOrganization,
            chart_kind: ChartKind::Pie,
            backend: RenderBackend::Echarts,
            missing_value_policy: MissingValuePolicy::default(),
            aggregation: None,
            rendered: None,
            chart_texture: None,
            aggregation_cache: HashMap::new(),
            generation: Arc::new(FetchGeneration::new()),
            update_needed: false,
            texture_needed: false,
            is_loading: false,
            is_rendering: false,
            error_message: None,
        }
    }
}

/// Thread-safe wrapper around App for use with eframe
pub struct AppWrapper {
    pub app: Arc<Mutex<App>>,
}

impl EApp for AppWrapper {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Ok(mut app) = self.app.lock() {
            super::ui::draw_ui(&mut app, ctx, Arc::clone(&self.app));
        } else {
            tracing::error!("failed to acquire app lock in update");
        }
    }
}

//! Chart rendering.
//!
//! Two interchangeable backends implement [`ChartRenderer`] over the same
//! [`Aggregation`] input: [`EchartsRenderer`] describes the chart
//! declaratively and lets the charting engine lay it out, while
//! [`PlottersRenderer`] draws scales, ticks, and series by hand and reports
//! per-element hit regions so the UI can show hover tooltips.
//!
//! Every render draws into a fresh buffer and returns a fresh hit-region set,
//! so redrawing with identical inputs is indistinguishable from a single
//! draw. Rendered charts are cached with a 5-minute expiration.

use lru::LruCache;
use once_cell::sync::Lazy;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Mutex as TokioMutex;

use crate::types::{Aggregation, ChartKind};

pub mod chart;
pub mod echarts;
pub mod styles;

pub use chart::PlottersRenderer;
pub use echarts::EchartsRenderer;


/// Which rendering backend to draw with.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq)]
pub enum RenderBackend {
    Echarts,
    Plotters,
}

impl RenderBackend {
    pub const ALL: [RenderBackend; 2] = [RenderBackend::Echarts, RenderBackend::Plotters];

    pub fn label(&self) -> &'static str {
        match self {
            RenderBackend::Echarts => "ECharts",
            RenderBackend::Plotters => "Plotters",
        }
    }
}

#[derive(Debug, Error)]
pub enum PlotError {
    #[error("drawing failed: {0}")]
    Draw(String),
    #[error("chart rasterization failed: {0}")]
    Raster(String),
    #[error("failed to encode chart image")]
    Encode(#[from] image::ImageError),
    #[error("render task failed")]
    Join(#[from] tokio::task::JoinError),
}

/// A hoverable element of a rendered chart, in image pixel coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct HitRegion {
    pub shape: HitShape,
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HitShape {
    Rect {
        x0: f32,
        y0: f32,
        x1: f32,
        y1: f32,
    },
    Circle {
        cx: f32,
        cy: f32,
        r: f32,
    },
    /// A pie wedge. Angles are in radians, measured clockwise from 12
    /// o'clock in screen coordinates.
    Wedge {
        cx: f32,
        cy: f32,
        radius: f32,
        start_angle: f32,
        end_angle: f32,
    },
}

impl HitShape {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        match *self {
            HitShape::Rect { x0, y0, x1, y1 } => x >= x0 && x <= x1 && y >= y0 && y <= y1,
            HitShape::Circle { cx, cy, r } => {
                let (dx, dy) = (x - cx, y - cy);
                dx * dx + dy * dy <= r * r
            }
            HitShape::Wedge {
                cx,
                cy,
                radius,
                start_angle,
                end_angle,
            } => {
                let (dx, dy) = (x - cx, y - cy);
                if dx * dx + dy * dy > radius * radius {
                    return false;
                }
                // atan2 measured from 12 o'clock, clockwise, into [0, 2pi)
                let mut angle = dx.atan2(-dy);
                if angle < 0.0 {
                    angle += std::f32::consts::TAU;
                }
                angle >= start_angle && angle < end_angle
            }
        }
    }
}

/// The outcome of one render pass: encoded PNG pixels plus the hover
/// geometry that was valid for exactly this pass.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedChart {
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
    pub hit_regions: Vec<HitRegion>,
}

impl RenderedChart {
    /// Topmost hit region under the given image pixel, if any.
    pub fn region_at(&self, x: f32, y: f32) -> Option<&HitRegion> {
        self.hit_regions.iter().rev().find(|r| r.shape.contains(x, y))
    }
}

/// Common rendering capability both backends provide.
pub trait ChartRenderer {
    fn render(
        &self,
        aggregation: &Aggregation,
        kind: ChartKind,
        title: &str,
    ) -> Result<RenderedChart, PlotError>;
}

/// Render with the selected backend.
pub fn render_chart(
    backend: RenderBackend,
    aggregation: &Aggregation,
    kind: ChartKind,
    title: &str,
) -> Result<RenderedChart, PlotError> {
    match backend {
        RenderBackend::Echarts => EchartsRenderer::default().render(aggregation, kind, title),
        RenderBackend::Plotters => PlottersRenderer::default().render(aggregation, kind, title),
    }
}

// Global plot cache with a 5-minute expiration
static PLOT_CACHE: Lazy<Arc<TokioMutex<LruCache<PlotCacheKey, (RenderedChart, Instant)>>>> =
    Lazy::new(|| Arc::new(TokioMutex::new(LruCache::new(NonZeroUsize::new(10).unwrap()))));

const PLOT_CACHE_TTL: Duration = Duration::from_secs(300);

#[derive(Hash, Eq, PartialEq)]
struct PlotCacheKey {
    backend: RenderBackend,
    kind: ChartKind,
    title: String,
    data_hash: u64,
}

impl PlotCacheKey {
    fn new(backend: RenderBackend, aggregation: &Aggregation, kind: ChartKind, title: &str) -> Self {
        Self {
            backend,
            kind,
            title: title.to_string(),
            data_hash: aggregation.data_hash(),
        }
    }
}

/// Render with the selected backend off the UI thread, reusing a cached
/// rendering when the same chart was drawn recently.
pub async fn render_chart_async(
    backend: RenderBackend,
    aggregation: Aggregation,
    kind: ChartKind,
    title: String,
) -> Result<RenderedChart, PlotError> {
    let cache_key = PlotCacheKey::new(backend, &aggregation, kind, &title);

    if let Some((rendered, timestamp)) = PLOT_CACHE.lock().await.get(&cache_key) {
        if timestamp.elapsed() < PLOT_CACHE_TTL {
            return Ok(rendered.clone());
        }
    }

    let rendered =
        tokio::task::spawn_blocking(move || render_chart(backend, &aggregation, kind, &title))
            .await??;

    PLOT_CACHE
        .lock()
        .await
        .put(cache_key, (rendered.clone(), Instant::now()));

    Ok(rendered)
}

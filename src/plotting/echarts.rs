//! Declarative backend: the chart is described as an ECharts option tree and
//! handed to `charming`, whose SSR renderer lays out axes, legends, and
//! tooltips on its own.

use charming::{
    component::{Axis, Legend, Title},
    element::{
        AxisPointer, AxisPointerType, AxisType, ItemStyle, LineStyle, Orient, Symbol, Tooltip,
        Trigger,
    },
    renderer::ImageFormat,
    series::{Bar, Line, Pie},
    Chart, ImageRenderer,
};

use crate::types::{Aggregation, ChartKind};

use super::styles::{TEAL_LINE, TEAL_SERIES};
use super::{ChartRenderer, PlotError, RenderedChart};

/// Renderer backed by the declarative charting engine.
///
/// Hover tooltips and legends live inside the engine's own option model, so
/// no hit regions are reported; the engine is configured to show
/// `label: value` on hover and to keep the value axis on integer ticks.
pub struct EchartsRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for EchartsRenderer {
    fn default() -> Self {
        Self {
            width: 900,
            height: 600,
        }
    }
}

impl ChartRenderer for EchartsRenderer {
    fn render(
        &self,
        aggregation: &Aggregation,
        kind: ChartKind,
        title: &str,
    ) -> Result<RenderedChart, PlotError> {
        let chart = build_chart(aggregation, kind, title);

        let mut renderer = ImageRenderer::new(self.width, self.height);
        let png = renderer
            .render_format(ImageFormat::Png, &chart)
            .map_err(|e| PlotError::Raster(format!("{e:?}")))?;

        Ok(RenderedChart {
            width: self.width,
            height: self.height,
            png,
            hit_regions: Vec::new(),
        })
    }
}

/// Build the ECharts option tree for one aggregation.
pub fn build_chart(aggregation: &Aggregation, kind: ChartKind, title: &str) -> Chart {
    let chart = Chart::new().title(Title::new().text(title).left("center"));

    match kind {
        ChartKind::Pie => {
            let data: Vec<(f64, &str)> = aggregation
                .entries()
                .iter()
                .map(|(label, value)| (*value, label.as_str()))
                .collect();

            chart
                .tooltip(
                    Tooltip::new()
                        .trigger(Trigger::Item)
                        .formatter("{a} <br/>{b}: {c}"),
                )
                .legend(Legend::new().orient(Orient::Vertical).left("left"))
                .series(Pie::new().name("Data").data(data))
        }
        ChartKind::Bar | ChartKind::Line => {
            let labels: Vec<String> = aggregation.labels().map(str::to_string).collect();
            let values: Vec<f64> = aggregation.values().collect();

            let chart = chart
                .tooltip(
                    Tooltip::new()
                        .trigger(Trigger::Axis)
                        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
                )
                .x_axis(Axis::new().type_(AxisType::Category).data(labels))
                // Integer-only value axis: the engine may coarsen the tick
                // interval but never go below 1
                .y_axis(Axis::new().type_(AxisType::Value).name("Count").min_interval(1.0));

            match kind {
                ChartKind::Bar => chart.series(
                    Bar::new()
                        .name("Data")
                        .data(values)
                        .item_style(ItemStyle::new().color(TEAL_SERIES)),
                ),
                _ => chart.series(
                    Line::new()
                        .name("Data")
                        .data(values)
                        .smooth(true)
                        .symbol(Symbol::Circle)
                        .symbol_size(8)
                        .line_style(LineStyle::new().color(TEAL_LINE)),
                ),
            }
        }
    }
}

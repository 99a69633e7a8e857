//! Low-level backend: manual scales, axes, ticks, and hover geometry on top
//! of `plotters`.

use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::types::{Aggregation, ChartKind};

use super::styles::{ChartStyle, ChartTheme, CATEGORY10, STEEL_BLUE};
use super::{ChartRenderer, HitRegion, HitShape, PlotError, RenderedChart};

// Helper function to wrap drawing errors
fn draw_err<E: std::fmt::Display>(e: E) -> PlotError {
    PlotError::Draw(e.to_string())
}

/// Renderer that draws every chart element by hand.
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
    pub theme: ChartTheme,
    pub style: ChartStyle,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            theme: ChartTheme::default(),
            style: ChartStyle::default(),
        }
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(
        &self,
        aggregation: &Aggregation,
        kind: ChartKind,
        title: &str,
    ) -> Result<RenderedChart, PlotError> {
        let mut buffer = vec![0u8; (self.width * self.height * 3) as usize];

        let hit_regions = {
            let root =
                BitMapBackend::with_buffer(&mut buffer, (self.width, self.height)).into_drawing_area();
            root.fill(&self.theme.background_color).map_err(draw_err)?;

            let title_style = ("sans-serif", self.style.title_font_size)
                .into_font()
                .color(&self.theme.text_color);
            let chart_area = root.titled(title, title_style).map_err(draw_err)?;

            let regions = match kind {
                ChartKind::Pie => self.draw_pie(&chart_area, aggregation)?,
                ChartKind::Bar | ChartKind::Line => {
                    self.draw_cartesian(&chart_area, aggregation, kind)?
                }
            };

            root.present().map_err(draw_err)?;
            regions
        };

        let image = image::RgbImage::from_raw(self.width, self.height, buffer)
            .ok_or_else(|| PlotError::Raster("pixel buffer size mismatch".to_string()))?;
        let mut png = Vec::new();
        image.write_to(&mut std::io::Cursor::new(&mut png), image::ImageFormat::Png)?;

        Ok(RenderedChart {
            width: self.width,
            height: self.height,
            png,
            hit_regions,
        })
    }
}

/// Values are plotted rounded to the nearest integer, like the console this
/// renderer replaces did.
fn rounded_entries(aggregation: &Aggregation) -> Vec<(String, f64)> {
    aggregation
        .entries()
        .iter()
        .map(|(label, value)| (label.clone(), value.round()))
        .collect()
}

impl PlottersRenderer {
    /// Draw a bar or line chart with a category x-axis and an integer-only
    /// linear y-axis starting at 0.
    ///
    /// Bar charts pick an integer tick step (never finer than 1); line
    /// charts enumerate every integer from 0 to the maximum observed total.
    fn draw_cartesian(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        aggregation: &Aggregation,
        kind: ChartKind,
    ) -> Result<Vec<HitRegion>, PlotError> {
        let entries = rounded_entries(aggregation);
        let n = entries.len().max(1);
        let max = entries.iter().map(|(_, v)| *v).fold(0.0, f64::max).max(1.0);

        let mut chart = ChartBuilder::on(root)
            .margin(self.style.margin)
            .set_all_label_area_size(self.style.label_area_size)
            .build_cartesian_2d(0f64..n as f64, 0f64..max)
            .map_err(draw_err)?;

        let y_label_count = match kind {
            // Every integer from 0 to the maximum, as consecutive ticks
            ChartKind::Line => max as usize + 1,
            // Integer ticks with a step of at least 1
            _ => (max as usize + 1).min(11),
        };

        let labels: Vec<String> = entries.iter().map(|(label, _)| label.clone()).collect();
        let x_label_formatter = move |x: &f64| {
            let idx = x.round() as usize;
            if (x - idx as f64).abs() < 1e-6 {
                labels.get(idx).cloned().unwrap_or_default()
            } else {
                String::new()
            }
        };

        let label_font = ("sans-serif", self.style.font_size)
            .into_font()
            .color(&self.theme.text_color);

        chart
            .configure_mesh()
            .light_line_style(TRANSPARENT)
            .bold_line_style(self.theme.grid_color)
            .axis_style(self.theme.axis_color)
            .y_desc("Count")
            .x_labels(n + 1)
            .y_labels(y_label_count)
            .y_label_formatter(&|y| format!("{:.0}", y))
            .x_label_formatter(&x_label_formatter)
            .label_style(label_font)
            .draw()
            .map_err(draw_err)?;

        draw_integer_grid(&mut chart, n as f64, max, y_label_count, &self.theme)?;

        if aggregation.is_empty() {
            return Ok(Vec::new());
        }

        match kind {
            ChartKind::Bar => self.draw_bars(&mut chart, &entries),
            _ => self.draw_line(&mut chart, &entries),
        }
    }

    fn draw_bars(
        &self,
        chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        entries: &[(String, f64)],
    ) -> Result<Vec<HitRegion>, PlotError> {
        chart
            .draw_series(entries.iter().enumerate().map(|(i, (_, value))| {
                let x0 = i as f64 + 0.1;
                let x1 = i as f64 + 0.9;
                Rectangle::new([(x0, 0.0), (x1, *value)], STEEL_BLUE.mix(0.9).filled())
            }))
            .map_err(draw_err)?;

        let mut regions = Vec::with_capacity(entries.len());
        for (i, (label, value)) in entries.iter().enumerate() {
            let (x0, y_top) = chart.backend_coord(&(i as f64 + 0.1, *value));
            let (x1, y_bottom) = chart.backend_coord(&(i as f64 + 0.9, 0.0));
            regions.push(HitRegion {
                shape: HitShape::Rect {
                    x0: x0 as f32,
                    y0: y_top as f32,
                    x1: x1 as f32,
                    y1: y_bottom as f32,
                },
                label: label.clone(),
                value: *value,
            });
        }
        Ok(regions)
    }

    fn draw_line(
        &self,
        chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
        entries: &[(String, f64)],
    ) -> Result<Vec<HitRegion>, PlotError> {
        // Points sit at category centers, connected by straight segments
        let points: Vec<(f64, f64)> = entries
            .iter()
            .enumerate()
            .map(|(i, (_, value))| (i as f64 + 0.5, *value))
            .collect();

        chart
            .draw_series(LineSeries::new(
                points.clone(),
                STEEL_BLUE.stroke_width(self.style.line_width),
            ))
            .map_err(draw_err)?;

        chart
            .draw_series(points.iter().map(|&(x, y)| {
                Circle::new((x, y), self.style.marker_radius, STEEL_BLUE.filled())
            }))
            .map_err(draw_err)?;

        let mut regions = Vec::with_capacity(entries.len());
        for ((label, value), &(x, y)) in entries.iter().zip(&points) {
            let (cx, cy) = chart.backend_coord(&(x, y));
            regions.push(HitRegion {
                shape: HitShape::Circle {
                    cx: cx as f32,
                    cy: cy as f32,
                    r: (self.style.marker_radius + 2) as f32,
                },
                label: label.clone(),
                value: *value,
            });
        }
        Ok(regions)
    }

    /// Draw a pie chart: one wedge per bucket, sized by its share of the
    /// total, with a vertical legend in the top-left corner.
    fn draw_pie(
        &self,
        root: &DrawingArea<BitMapBackend, Shift>,
        aggregation: &Aggregation,
    ) -> Result<Vec<HitRegion>, PlotError> {
        let entries = rounded_entries(aggregation);
        let total: f64 = entries.iter().map(|(_, v)| *v).sum();

        let (w, h) = root.dim_in_pixel();
        let (x_range, y_range) = root.get_pixel_range();
        let (base_x, base_y) = (x_range.start, y_range.start);
        let cx = w as i32 / 2;
        let cy = h as i32 / 2;
        let radius = (w.min(h) as f64) / 2.0 - 40.0;

        let mut regions = Vec::with_capacity(entries.len());
        if total > 0.0 {
            // Wedges run clockwise from 12 o'clock
            let mut angle = 0.0f64;
            for (idx, (label, value)) in entries.iter().enumerate() {
                if *value <= 0.0 {
                    continue;
                }
                let sweep = value / total * std::f64::consts::TAU;
                let color = CATEGORY10[idx % CATEGORY10.len()];

                let steps = ((sweep / 0.02).ceil() as usize).max(2);
                let mut points = Vec::with_capacity(steps + 2);
                points.push((cx, cy));
                for step in 0..=steps {
                    let a = angle + sweep * step as f64 / steps as f64;
                    points.push((
                        cx + (radius * a.sin()).round() as i32,
                        cy - (radius * a.cos()).round() as i32,
                    ));
                }

                root.draw(&Polygon::new(points.clone(), color.filled()))
                    .map_err(draw_err)?;
                // White wedge border
                let mut outline = points;
                outline.push((cx, cy));
                root.draw(&PathElement::new(outline, WHITE.stroke_width(2)))
                    .map_err(draw_err)?;

                regions.push(HitRegion {
                    shape: HitShape::Wedge {
                        cx: (base_x + cx) as f32,
                        cy: (base_y + cy) as f32,
                        radius: radius as f32,
                        start_angle: angle as f32,
                        end_angle: (angle + sweep) as f32,
                    },
                    label: label.clone(),
                    value: *value,
                });
                angle += sweep;
            }
        }

        // Vertical legend listing every bucket, matched or not
        let legend_font = ("sans-serif", self.style.font_size)
            .into_font()
            .color(&self.theme.text_color);
        for (idx, (label, _)) in entries.iter().enumerate() {
            let y = 10 + idx as i32 * 20;
            let color = CATEGORY10[idx % CATEGORY10.len()];
            root.draw(&Rectangle::new([(8, y), (22, y + 12)], color.filled()))
                .map_err(draw_err)?;
            root.draw(&Text::new(label.clone(), (28, y), legend_font.clone()))
                .map_err(draw_err)?;
        }

        Ok(regions)
    }
}

/// Horizontal grid lines at integer intervals, matching the tick layout.
fn draw_integer_grid(
    chart: &mut ChartContext<BitMapBackend, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    x_max: f64,
    y_max: f64,
    label_count: usize,
    theme: &ChartTheme,
) -> Result<(), PlotError> {
    let step = (y_max / (label_count.saturating_sub(1)).max(1) as f64)
        .ceil()
        .max(1.0);
    let grid_style = ShapeStyle::from(&theme.grid_color).stroke_width(1);

    let mut y = 0.0;
    while y <= y_max {
        chart
            .draw_series(std::iter::once(PathElement::new(
                vec![(0.0, y), (x_max, y)],
                grid_style,
            )))
            .map_err(draw_err)?;
        y += step;
    }
    Ok(())
}

//! Static Chart Renderer
//! Draws the bubble chart into a PNG snapshot.
//!
//! Same encoding as the interactive figure:
//! - x: internet usage %, y: paper demand per capita
//! - every country as a faint blue bubble
//! - the selected country as a red bubble with a dark red border

use crate::charts::plotter::{bubble_size, BASE_OPACITY, TITLE, X_LABEL, Y_LABEL};
use crate::data::{Record, Table};
use image::{ImageFormat, RgbImage};
use plotters::prelude::*;
use std::io::Cursor;
use std::ops::Range;
use thiserror::Error;

pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 700;

// Bubble radius bounds in pixels
const MIN_RADIUS: f64 = 2.0;
const MAX_RADIUS: f64 = 60.0;

const DARK_RED: RGBColor = RGBColor(139, 0, 0);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Data not loaded or empty")]
    NoData,
    #[error("Failed to draw chart: {0}")]
    Draw(String),
    #[error("Failed to encode PNG: {0}")]
    Encode(#[from] image::ImageError),
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render the chart as PNG bytes.
    pub fn render_png(
        table: Option<&Table>,
        selected: Option<&str>,
        width: u32,
        height: u32,
    ) -> Result<Vec<u8>, RenderError> {
        let table = table.filter(|t| !t.is_empty()).ok_or(RenderError::NoData)?;
        let highlight = selected.filter(|s| !s.is_empty()).and_then(|s| table.find(s));

        let mut buf = vec![0u8; width as usize * height as usize * 3];
        Self::draw(&mut buf, (width, height), table.records(), highlight)
            .map_err(|e| RenderError::Draw(e.to_string()))?;

        let img = RgbImage::from_raw(width, height, buf)
            .ok_or_else(|| RenderError::Draw("pixel buffer size mismatch".to_string()))?;
        let mut png = Cursor::new(Vec::new());
        img.write_to(&mut png, ImageFormat::Png)?;
        Ok(png.into_inner())
    }

    fn draw(
        buf: &mut [u8],
        size: (u32, u32),
        records: &[Record],
        highlight: Option<&Record>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let root = BitMapBackend::with_buffer(buf, size).into_drawing_area();
        root.fill(&WHITE)?;

        let (x_range, y_range) = Self::axis_ranges(records);
        let mut chart = ChartBuilder::on(&root)
            .caption(TITLE, ("sans-serif", 22))
            .margin(20)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x_range, y_range)?;

        chart
            .configure_mesh()
            .x_desc(X_LABEL)
            .y_desc(Y_LABEL)
            .draw()?;

        chart.draw_series(records.iter().map(|r| {
            Circle::new(
                (r.internet_usage_pct, r.demand_per_capita),
                Self::radius(r.population),
                BLUE.mix(BASE_OPACITY).filled(),
            )
        }))?;

        if let Some(r) = highlight {
            let center = (r.internet_usage_pct, r.demand_per_capita);
            let radius = Self::radius(r.population);
            chart.draw_series([
                Circle::new(center, radius, RED.filled()),
                Circle::new(center, radius, DARK_RED.stroke_width(2)),
            ])?;
        }

        root.present()?;
        Ok(())
    }

    /// Pixel radius for a country; the figure's marker size is a diameter.
    fn radius(population: f64) -> u32 {
        (bubble_size(population) / 2.0)
            .clamp(MIN_RADIUS, MAX_RADIUS)
            .round() as u32
    }

    fn axis_ranges(records: &[Record]) -> (Range<f64>, Range<f64>) {
        let span = |values: Vec<f64>| {
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if !min.is_finite() {
                return 0.0..100.0;
            }
            let pad = ((max - min) * 0.1).max(1.0);
            (min - pad)..(max + pad)
        };

        (
            span(records.iter().map(|r| r.internet_usage_pct).collect()),
            span(records.iter().map(|r| r.demand_per_capita).collect()),
        )
    }
}

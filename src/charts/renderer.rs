//! Static Chart Renderer
//! Draws the report's frequency tables and cross-tabs as PNG images.
//!
//! Layout per analysis:
//! 1. Bar chart or pie chart of a frequency table, title on top
//! 2. Annotated heatmap per cross-tab: row labels left, column labels below,
//!    each cell carrying its count

use crate::report::{ChartKind, SurveyReport};
use crate::stats::{CrossTab, FrequencyTable};
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const FONT: &str = "sans-serif";

const CHART_SIZE: (u32, u32) = (1000, 650);
const PIE_SIZE: (u32, u32) = (900, 700);
const HEATMAP_SIZE: (u32, u32) = (1100, 700);

pub const PALETTE: [RGBColor; 10] = [
    RGBColor(135, 206, 235), // Sky blue
    RGBColor(144, 238, 144), // Light green
    RGBColor(240, 128, 128), // Light coral
    RGBColor(255, 215, 0),   // Gold
    RGBColor(238, 130, 238), // Violet
    RGBColor(255, 165, 0),   // Orange
    RGBColor(128, 0, 128),   // Purple
    RGBColor(165, 42, 42),   // Brown
    RGBColor(255, 192, 203), // Pink
    RGBColor(0, 128, 128),   // Teal
];

// Heatmap ramp (yellow → orange → red)
const HEAT_LOW: RGBColor = RGBColor(255, 255, 204);
const HEAT_MID: RGBColor = RGBColor(253, 141, 60);
const HEAT_HIGH: RGBColor = RGBColor(189, 0, 38);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to create chart directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to draw {path}: {message}")]
    Drawing { path: PathBuf, message: String },
}

fn drawing_error<E: std::fmt::Display>(path: &Path) -> impl FnOnce(E) -> ChartError {
    let path = path.to_path_buf();
    move |e| ChartError::Drawing {
        path,
        message: e.to_string(),
    }
}

fn lerp(a: RGBColor, b: RGBColor, t: f64) -> RGBColor {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
}

/// Heat colour for an intensity in `[0, 1]`.
pub fn heat_color(intensity: f64) -> RGBColor {
    let t = intensity.clamp(0.0, 1.0);
    if t < 0.5 {
        lerp(HEAT_LOW, HEAT_MID, t * 2.0)
    } else {
        lerp(HEAT_MID, HEAT_HIGH, (t - 0.5) * 2.0)
    }
}

/// File name of a chart, numbered so a directory listing follows the report.
pub fn chart_file_name(index: usize, key: &str) -> String {
    format!("{:02}_{}.png", index + 1, key)
}

pub struct StaticChartRenderer;

impl StaticChartRenderer {
    /// Render every analysis and cross-tab of the report into `out_dir`.
    pub fn render_all(report: &SurveyReport, out_dir: &Path) -> Result<Vec<PathBuf>, ChartError> {
        fs::create_dir_all(out_dir).map_err(|source| ChartError::Io {
            path: out_dir.to_path_buf(),
            source,
        })?;

        let mut written = Vec::new();
        for (i, analysis) in report.analyses.iter().enumerate() {
            let path = out_dir.join(chart_file_name(i, analysis.key));
            match analysis.chart {
                ChartKind::Bar => Self::draw_bar_chart(
                    &path,
                    analysis.title,
                    &analysis.frequency,
                    PALETTE[i % PALETTE.len()],
                )?,
                ChartKind::Pie => Self::draw_pie_chart(&path, analysis.title, &analysis.frequency)?,
            }
            written.push(path);
        }

        let offset = report.analyses.len();
        for (i, crosstab) in report.crosstabs.iter().enumerate() {
            let path = out_dir.join(chart_file_name(offset + i, crosstab.key));
            Self::draw_heatmap(&path, crosstab.title, &crosstab.table)?;
            written.push(path);
        }

        info!(dir = %out_dir.display(), charts = written.len(), "Charts written");
        Ok(written)
    }

    /// Vertical bars, one per answer, count printed above each bar.
    pub fn draw_bar_chart(
        path: &Path,
        title: &str,
        freq: &FrequencyTable,
        color: RGBColor,
    ) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error(path))?;

        let labels = freq.labels();
        let counts = freq.counts();
        let n = labels.len().max(1) as u32;
        let y_max = (freq.max_count() as u32).max(1);
        let y_top = y_max + (y_max / 10).max(1);

        let mut chart = ChartBuilder::on(&root)
            .caption(title, (FONT, 26))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(50)
            .build_cartesian_2d((0u32..n).into_segmented(), 0u32..y_top)
            .map_err(drawing_error(path))?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(BLACK.mix(0.1))
            .x_labels(labels.len())
            .x_label_style((FONT, 12))
            .x_label_formatter(&|v: &SegmentValue<u32>| match v {
                SegmentValue::CenterOf(i) => labels.get(*i as usize).cloned().unwrap_or_default(),
                _ => String::new(),
            })
            .y_desc("Respondents")
            .axis_desc_style((FONT, 15))
            .draw()
            .map_err(drawing_error(path))?;

        chart
            .draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(12)
                    .data(counts.iter().enumerate().map(|(i, &c)| (i as u32, c as u32))),
            )
            .map_err(drawing_error(path))?;

        chart
            .draw_series(counts.iter().enumerate().map(|(i, &c)| {
                Text::new(
                    c.to_string(),
                    (SegmentValue::CenterOf(i as u32), c as u32),
                    (FONT, 14).into_font(),
                )
            }))
            .map_err(drawing_error(path))?;

        root.present().map_err(drawing_error(path))?;
        Ok(())
    }

    /// Pie with one slice per answer, percentage printed inside each slice.
    pub fn draw_pie_chart(path: &Path, title: &str, freq: &FrequencyTable) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, PIE_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error(path))?;
        let area = root.titled(title, (FONT, 26)).map_err(drawing_error(path))?;

        let (w, h) = area.dim_in_pixel();
        let center = ((w / 2) as i32, (h / 2) as i32);

        if freq.is_empty() {
            area.draw(&Text::new(
                "No responses",
                center,
                (FONT, 20)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Center)),
            ))
            .map_err(drawing_error(path))?;
        } else {
            let radius = w.min(h) as f64 * 0.33;
            let sizes: Vec<f64> = freq.counts().iter().map(|&c| c as f64).collect();
            let colors: Vec<RGBColor> = (0..sizes.len())
                .map(|i| PALETTE[i % PALETTE.len()])
                .collect();
            let labels = freq.labels();

            let mut pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
            pie.start_angle(-90.0);
            pie.label_style((FONT, 16).into_font().color(&BLACK));
            pie.percentages((FONT, 14).into_font().color(&BLACK));
            area.draw(&pie).map_err(drawing_error(path))?;
        }

        root.present().map_err(drawing_error(path))?;
        Ok(())
    }

    /// Grid of cells shaded by count, counts annotated in each cell.
    pub fn draw_heatmap(path: &Path, title: &str, table: &CrossTab) -> Result<(), ChartError> {
        let root = BitMapBackend::new(path, HEATMAP_SIZE).into_drawing_area();
        root.fill(&WHITE).map_err(drawing_error(path))?;
        let area = root.titled(title, (FONT, 26)).map_err(drawing_error(path))?;

        let (w, h) = area.dim_in_pixel();
        let (left, top, right, bottom) = (260i32, 20i32, 30i32, 60i32);
        let n_rows = table.row_labels().len().max(1) as i32;
        let n_cols = table.col_labels().len().max(1) as i32;
        let cell_w = ((w as i32 - left - right) / n_cols).max(1);
        let cell_h = ((h as i32 - top - bottom) / n_rows).max(1);
        let max = table.max_count().max(1) as f64;

        for (i, row) in table.dense().iter().enumerate() {
            let y0 = top + i as i32 * cell_h;
            for (j, &count) in row.iter().enumerate() {
                let x0 = left + j as i32 * cell_w;
                let intensity = count as f64 / max;
                let corners = [(x0, y0), (x0 + cell_w, y0 + cell_h)];

                area.draw(&Rectangle::new(corners, heat_color(intensity).filled()))
                    .map_err(drawing_error(path))?;
                area.draw(&Rectangle::new(corners, WHITE.stroke_width(2)))
                    .map_err(drawing_error(path))?;

                let text_color = if intensity > 0.6 { WHITE } else { BLACK };
                area.draw(&Text::new(
                    count.to_string(),
                    (x0 + cell_w / 2, y0 + cell_h / 2),
                    (FONT, 18).into_font().color(&text_color)
                        .pos(Pos::new(HPos::Center, VPos::Center)),
                ))
                .map_err(drawing_error(path))?;
            }
        }

        for (i, label) in table.row_labels().iter().enumerate() {
            area.draw(&Text::new(
                label.to_string(),
                (left - 10, top + i as i32 * cell_h + cell_h / 2),
                (FONT, 14)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Right, VPos::Center)),
            ))
            .map_err(drawing_error(path))?;
        }

        let label_y = top + n_rows * cell_h + 15;
        for (j, label) in table.col_labels().iter().enumerate() {
            area.draw(&Text::new(
                label.to_string(),
                (left + j as i32 * cell_w + cell_w / 2, label_y),
                (FONT, 14)
                    .into_font()
                    .color(&BLACK)
                    .pos(Pos::new(HPos::Center, VPos::Top)),
            ))
            .map_err(drawing_error(path))?;
        }

        root.present().map_err(drawing_error(path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(c: RGBColor) -> (u8, u8, u8) {
        (c.0, c.1, c.2)
    }

    #[test]
    fn test_heat_color_ramp() {
        assert_eq!(rgb(heat_color(0.0)), rgb(HEAT_LOW));
        assert_eq!(rgb(heat_color(0.5)), rgb(HEAT_MID));
        assert_eq!(rgb(heat_color(1.0)), rgb(HEAT_HIGH));
        assert_eq!(rgb(heat_color(3.0)), rgb(HEAT_HIGH));
        assert_eq!(rgb(heat_color(0.25)), (254, 198, 132));
    }

    #[test]
    fn test_chart_file_names_follow_report_order() {
        assert_eq!(chart_file_name(0, "consumption"), "01_consumption.png");
        assert_eq!(
            chart_file_name(12, "importance_vs_frequency"),
            "13_importance_vs_frequency.png"
        );
    }
}

//! Chart files via Plotters.
//!
//! The backend is picked from the file extension: `.svg` uses the SVG backend,
//! `.png` the bitmap backend. Both share one drawing routine.
//!
//! Fonts: Plotters is built without its font-kit/ttf features. PNG charts go
//! through [`TextlessBackend`], which skips text calls, and carry axes, mesh,
//! and series only. SVG output keeps captions and labels.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters_backend::{BackendColor, BackendCoord, BackendStyle, BackendTextStyle, DrawingErrorKind};

use crate::domain::{CurveGrid, DataPoint, InterpMethod};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1000, 640);

const PALETTE: [RGBColor; 4] = [
    RGBColor(31, 119, 180),
    RGBColor(214, 39, 40),
    RGBColor(44, 160, 44),
    RGBColor(148, 103, 189),
];

/// Output format implied by the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Png,
    Svg,
}

impl ChartKind {
    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => Ok(ChartKind::Png),
            Some("svg") => Ok(ChartKind::Svg),
            _ => Err(AppError::new(
                2,
                format!("Unsupported chart format '{}' (use .png or .svg).", path.display()),
            )),
        }
    }
}

/// A named line series.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

/// Everything needed to draw one chart.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Observations, drawn as markers on top of the lines.
    pub scatter: Vec<(f64, f64)>,
    pub scatter_label: String,
    pub lines: Vec<ChartSeries>,
}

impl ChartSpec {
    /// Samples plus the dense Lagrange and spline curves.
    pub fn interpolation(samples: &[DataPoint], grid: &CurveGrid) -> Self {
        Self {
            title: "Lagrange vs cubic spline interpolation".to_string(),
            x_label: "Energy (MeV)".to_string(),
            y_label: "Cross section (mb)".to_string(),
            scatter: samples.iter().map(|p| (p.x, p.y)).collect(),
            scatter_label: "Measured".to_string(),
            lines: InterpMethod::ALL
                .iter()
                .map(|&m| ChartSeries {
                    label: m.display_name().to_string(),
                    points: grid.series(m),
                })
                .collect(),
        }
    }

    /// Observations plus one fitted model curve.
    pub fn model_fit(title: &str, observed: &[DataPoint], fitted: Vec<(f64, f64)>) -> Self {
        Self {
            title: title.to_string(),
            x_label: "Time (h)".to_string(),
            y_label: "Enzyme activity".to_string(),
            scatter: observed.iter().map(|p| (p.x, p.y)).collect(),
            scatter_label: "Observed".to_string(),
            lines: vec![ChartSeries {
                label: "Fit".to_string(),
                points: fitted,
            }],
        }
    }

    fn bounds(&self) -> Option<([f64; 2], [f64; 2])> {
        let all = self
            .scatter
            .iter()
            .chain(self.lines.iter().flat_map(|s| s.points.iter()))
            .filter(|(x, y)| x.is_finite() && y.is_finite());

        let mut x = [f64::INFINITY, f64::NEG_INFINITY];
        let mut y = [f64::INFINITY, f64::NEG_INFINITY];
        for &(px, py) in all {
            x = [x[0].min(px), x[1].max(px)];
            y = [y[0].min(py), y[1].max(py)];
        }
        if !(x[0].is_finite() && y[0].is_finite()) {
            return None;
        }
        Some((pad(x, 0.02), pad(y, 0.05)))
    }
}

/// Draw `spec` to `path` (PNG or SVG by extension).
pub fn write_chart(path: &Path, spec: &ChartSpec) -> Result<(), AppError> {
    let kind = ChartKind::from_path(path)?;
    let (x_range, y_range) = spec
        .bounds()
        .ok_or_else(|| AppError::new(3, "Nothing finite to chart."))?;

    let result = match kind {
        ChartKind::Png => {
            let root = TextlessBackend::new(BitMapBackend::new(path, CHART_SIZE)).into_drawing_area();
            draw_chart(root, spec, x_range, y_range).map_err(|e| e.to_string())
        }
        ChartKind::Svg => {
            let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
            draw_chart(root, spec, x_range, y_range).map_err(|e| e.to_string())
        }
    };
    result.map_err(|e| AppError::new(4, format!("Failed to draw chart '{}': {e}", path.display())))?;

    log::info!("wrote chart to '{}'", path.display());
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    x_range: [f64; 2],
    y_range: [f64; 2],
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, ("sans-serif", 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range[0]..x_range[1], y_range[0]..y_range[1])?;

    chart
        .configure_mesh()
        .x_desc(spec.x_label.as_str())
        .y_desc(spec.y_label.as_str())
        .draw()?;

    for (i, series) in spec.lines.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        chart
            .draw_series(LineSeries::new(series.points.iter().copied(), Color::stroke_width(&color, 2)))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], Color::stroke_width(&color, 2)));
    }

    chart
        .draw_series(spec.scatter.iter().map(|&p| Circle::new(p, 5, BLACK.filled())))?
        .label(spec.scatter_label.as_str())
        .legend(|(x, y)| Circle::new((x + 10, y), 5, BLACK.filled()));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Delegates all drawing except text, which is dropped.
pub struct TextlessBackend<DB> {
    inner: DB,
}

impl<DB> TextlessBackend<DB> {
    pub fn new(inner: DB) -> Self {
        Self { inner }
    }
}

impl<DB: DrawingBackend> DrawingBackend for TextlessBackend<DB> {
    type ErrorType = DB::ErrorType;

    fn get_size(&self) -> (u32, u32) {
        self.inner.get_size()
    }

    fn ensure_prepared(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.ensure_prepared()
    }

    fn present(&mut self) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.present()
    }

    fn draw_pixel(&mut self, point: BackendCoord, color: BackendColor) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_pixel(point, color)
    }

    fn draw_line<S: BackendStyle>(
        &mut self,
        from: BackendCoord,
        to: BackendCoord,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_line(from, to, style)
    }

    fn draw_rect<S: BackendStyle>(
        &mut self,
        upper_left: BackendCoord,
        bottom_right: BackendCoord,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_rect(upper_left, bottom_right, style, fill)
    }

    fn draw_path<S: BackendStyle, I: IntoIterator<Item = BackendCoord>>(
        &mut self,
        path: I,
        style: &S,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_path(path, style)
    }

    fn draw_circle<S: BackendStyle>(
        &mut self,
        center: BackendCoord,
        radius: u32,
        style: &S,
        fill: bool,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        self.inner.draw_circle(center, radius, style, fill)
    }

    fn draw_text<TStyle: BackendTextStyle>(
        &mut self,
        _text: &str,
        _style: &TStyle,
        _pos: BackendCoord,
    ) -> Result<(), DrawingErrorKind<Self::ErrorType>> {
        Ok(())
    }

    fn estimate_text_size<TStyle: BackendTextStyle>(
        &self,
        text: &str,
        style: &TStyle,
    ) -> Result<(u32, u32), DrawingErrorKind<Self::ErrorType>> {
        self.inner.estimate_text_size(text, style)
    }
}

fn pad(range: [f64; 2], frac: f64) -> [f64; 2] {
    let span = range[1] - range[0];
    let pad = if span > 0.0 { span * frac } else { range[0].abs().max(1.0) * 0.5 };
    [range[0] - pad, range[1] + pad]
}

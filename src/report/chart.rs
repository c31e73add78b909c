use crate::analyze::Ranking;
use crate::config::{CHART_TITLE, CHART_X_LABEL, CHART_Y_LABEL};
use crate::model::{Error, Result};
use image::{ImageFormat, RgbaImage};
use resvg::{tiny_skia, usvg};
use std::borrow::Cow;
use std::f64::consts::FRAC_1_SQRT_2;

// 10x6 inches at 100 dpi.
pub const DEFAULT_WIDTH: u32 = 1000;
pub const DEFAULT_HEIGHT: u32 = 600;

const BAR_COLOR: &str = "#87CEEB";
const AXIS_COLOR: &str = "#000000";
/// Shipped with the binary so labels render the same on every host.
const FONT_DATA: &[u8] = include_bytes!("../../assets/fonts/DejaVuSans.ttf");
const FONT_FAMILY: &str = "DejaVu Sans";

const TICK_FONT_SIZE: f64 = 10.0;
const LABEL_FONT_SIZE: f64 = 12.0;
const TITLE_FONT_SIZE: f64 = 14.0;
/// Rough advance of one glyph relative to the font size.
const GLYPH_WIDTH: f64 = 0.6;
const MAX_LABEL_CHARS: usize = 40;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 20.0;
const MARGIN_TOP: f64 = 40.0;
const MIN_MARGIN_BOTTOM: f64 = 60.0;
const LABEL_PADDING: f64 = 8.0;
const BAR_FILL: f64 = 0.8;
const TARGET_TICKS: u64 = 5;
const TICK_LENGTH: f64 = 4.0;

pub trait ChartReport {
    fn chart_create(&self, path: &str) -> Result<()>;
}

impl ChartReport for Ranking {
    fn chart_create(&self, path: &str) -> Result<()> {
        let bars = self.iter().map(|r| (r.name.as_str(), r.total)).collect();
        BarChart::new(CHART_TITLE, CHART_X_LABEL, CHART_Y_LABEL)
            .with_bars(bars)
            .save_png(path)
    }
}

/// A vertical bar chart with one category label per bar.
#[derive(Debug, Clone)]
pub struct BarChart<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
    pub y_label: &'a str,
    pub bars: Vec<(&'a str, u64)>,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bar<'a> {
    pub label: &'a str,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq)]
struct PlotArea {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

// New
impl<'a> BarChart<'a> {
    pub fn new(title: &'a str, x_label: &'a str, y_label: &'a str) -> Self {
        Self {
            title,
            x_label,
            y_label,
            bars: vec![],
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }

    pub fn with_bars(mut self, bars: Vec<(&'a str, u64)>) -> Self {
        self.bars = bars;
        self
    }
}

// Layout
impl<'a> BarChart<'a> {
    /// Upper bound and tick step of the value axis.
    pub fn value_axis(&self) -> (u64, u64) {
        nice_axis(self.bars.iter().map(|(_, v)| *v).max().unwrap_or(0))
    }

    /// Horizontal and vertical reach of the longest category label, which
    /// runs down-left at 45 degrees from its tick.
    fn label_extent(&self) -> f64 {
        let longest = self
            .bars
            .iter()
            .map(|(label, _)| label.chars().count().min(MAX_LABEL_CHARS))
            .max()
            .unwrap_or(0) as f64;
        longest * GLYPH_WIDTH * TICK_FONT_SIZE * FRAC_1_SQRT_2
    }

    /// Shrinks the plot until every category label fits on the canvas.
    fn plot_area(&self) -> PlotArea {
        let (width, height) = (self.width as f64, self.height as f64);
        let extent = self.label_extent();

        let margin_bottom = (extent + TICK_LENGTH + TICK_FONT_SIZE + 2.0 * LABEL_FONT_SIZE + 16.0)
            .clamp(MIN_MARGIN_BOTTOM, height / 2.0);

        // The first label hangs left of its bar centre, which sits half a slot
        // into the plot.
        let margin_left = if self.bars.is_empty() {
            MARGIN_LEFT
        } else {
            let half_slot = 1.0 / (2.0 * self.bars.len() as f64);
            ((extent + LABEL_PADDING - (width - MARGIN_RIGHT) * half_slot) / (1.0 - half_slot))
                .max(MARGIN_LEFT)
        };

        PlotArea {
            x: margin_left,
            y: MARGIN_TOP,
            width: (width - margin_left - MARGIN_RIGHT).max(0.0),
            height: (height - MARGIN_TOP - margin_bottom).max(0.0),
        }
    }

    pub fn layout(&self) -> Vec<Bar<'a>> {
        if self.bars.is_empty() {
            return vec![];
        }
        let area = self.plot_area();
        let (top, _) = self.value_axis();
        let slot = area.width / self.bars.len() as f64;
        self.bars
            .iter()
            .enumerate()
            .map(|(i, &(label, value))| {
                let height = area.height * (value as f64 / top as f64);
                Bar {
                    label,
                    x: area.x + slot * i as f64 + slot * (1.0 - BAR_FILL) / 2.0,
                    y: area.bottom() - height,
                    width: slot * BAR_FILL,
                    height,
                }
            })
            .collect()
    }
}

// Render
impl<'a> BarChart<'a> {
    pub fn to_svg(&self) -> String {
        let area = self.plot_area();
        let (top, step) = self.value_axis();
        let mut lines = vec![
            format!(
                r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{FONT_FAMILY}">"#,
                w = self.width,
                h = self.height,
            ),
            r##"<rect width="100%" height="100%" fill="#ffffff"/>"##.to_string(),
            format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="{TITLE_FONT_SIZE}" text-anchor="middle">{}</text>"#,
                self.width as f64 / 2.0,
                MARGIN_TOP / 2.0 + TITLE_FONT_SIZE / 2.0,
                escape(self.title),
            ),
        ];

        for bar in self.layout() {
            let cx = bar.x + bar.width / 2.0;
            let cy = area.bottom() + TICK_LENGTH + TICK_FONT_SIZE;
            lines.push(format!(
                r#"<rect class="bar" x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{BAR_COLOR}"/>"#,
                bar.x, bar.y, bar.width, bar.height,
            ));
            lines.push(format!(
                r#"<line x1="{cx:.1}" y1="{:.1}" x2="{cx:.1}" y2="{:.1}" stroke="{AXIS_COLOR}"/>"#,
                area.bottom(),
                area.bottom() + TICK_LENGTH,
            ));
            lines.push(format!(
                r#"<text class="category" x="{cx:.1}" y="{cy:.1}" font-size="{TICK_FONT_SIZE}" text-anchor="end" transform="rotate(-45 {cx:.1} {cy:.1})">{}</text>"#,
                escape(&shorten(bar.label)),
            ));
        }

        let mut value = 0;
        while value <= top {
            let y = area.bottom() - area.height * (value as f64 / top as f64);
            lines.push(format!(
                r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="{AXIS_COLOR}"/>"#,
                area.x - TICK_LENGTH,
                area.x,
            ));
            lines.push(format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="{TICK_FONT_SIZE}" text-anchor="end">{value}</text>"#,
                area.x - TICK_LENGTH - 2.0,
                y + TICK_FONT_SIZE / 3.0,
            ));
            value = match value.checked_add(step) {
                Some(next) => next,
                None => break,
            };
        }

        let (lx, ly) = (LABEL_FONT_SIZE * 1.5, area.y + area.height / 2.0);
        lines.extend([
            format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="none" stroke="{AXIS_COLOR}"/>"#,
                area.x, area.y, area.width, area.height,
            ),
            format!(
                r#"<text x="{:.1}" y="{:.1}" font-size="{LABEL_FONT_SIZE}" text-anchor="middle">{}</text>"#,
                area.x + area.width / 2.0,
                self.height as f64 - LABEL_FONT_SIZE / 2.0,
                escape(self.x_label),
            ),
            format!(
                r#"<text x="{lx:.1}" y="{ly:.1}" font-size="{LABEL_FONT_SIZE}" text-anchor="middle" transform="rotate(-90 {lx:.1} {ly:.1})">{}</text>"#,
                escape(self.y_label),
            ),
            "</svg>\n".to_string(),
        ]);
        lines.join("\n")
    }

    pub fn render(&self) -> Result<tiny_skia::Pixmap> {
        let mut options = usvg::Options::default();
        options.font_family = FONT_FAMILY.to_string();
        options.fontdb_mut().load_font_data(FONT_DATA.to_vec());
        if options.fontdb.is_empty() {
            return Err(Error::Render("no font available for chart labels".to_string()));
        }
        let tree = usvg::Tree::from_str(&self.to_svg(), &options)
            .map_err(|e| Error::Render(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(self.width, self.height).ok_or_else(|| {
            Error::Render(format!("invalid canvas size {}x{}", self.width, self.height))
        })?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        Ok(pixmap)
    }

    /// Rasterizes the chart and writes it as PNG, replacing any existing file.
    pub fn save_png(&self, path: &str) -> Result<()> {
        let pixmap = self.render()?;
        // The background is opaque, so premultiplied and straight alpha agree.
        let image = RgbaImage::from_raw(self.width, self.height, pixmap.take())
            .ok_or_else(|| Error::Render("pixmap does not match canvas size".to_string()))?;
        image
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| Error::Write {
                path: path.to_string(),
                source,
            })
    }
}

/// Picks a 1/2/5 x 10^k step giving about `TARGET_TICKS` ticks, and the
/// smallest multiple of it covering `max`.
fn nice_axis(max: u64) -> (u64, u64) {
    if max == 0 {
        return (1, 1);
    }
    let raw = max.div_ceil(TARGET_TICKS);
    let magnitude = 10u64.pow(raw.ilog10());
    let step = [1u64, 2, 5, 10]
        .into_iter()
        .map(|m| m.saturating_mul(magnitude))
        .find(|s| *s >= raw)
        .unwrap_or(raw);
    (max.div_ceil(step).saturating_mul(step), step)
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Cuts labels longer than `MAX_LABEL_CHARS`, marking the cut with an ellipsis.
fn shorten(label: &str) -> Cow<'_, str> {
    if label.chars().count() <= MAX_LABEL_CHARS {
        return Cow::Borrowed(label);
    }
    let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
    short.push('…');
    Cow::Owned(short)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::RepoTotal;

    fn chart<'a>(bars: Vec<(&'a str, u64)>) -> BarChart<'a> {
        BarChart::new("Title", "X", "Y").with_bars(bars)
    }

    #[test]
    fn test_nice_axis() {
        assert_eq!(nice_axis(0), (1, 1));
        assert_eq!(nice_axis(1), (1, 1));
        assert_eq!(nice_axis(7), (8, 2));
        assert_eq!(nice_axis(10), (10, 2));
        assert_eq!(nice_axis(123), (150, 50));
        assert_eq!(nice_axis(48_210), (50_000, 10_000));
    }

    #[test]
    fn test_layout_heights_follow_values() {
        let bars = chart(vec![("a", 10), ("b", 5), ("c", 0)]).layout();
        assert_eq!(bars.len(), 3);
        assert!(bars[0].height > 0.0);
        assert!((bars[1].height * 2.0 - bars[0].height).abs() < 1e-9);
        assert_eq!(bars[2].height, 0.0);
        // All bars stand on the same baseline.
        let baseline = bars[0].y + bars[0].height;
        assert!(bars.iter().all(|b| (b.y + b.height - baseline).abs() < 1e-9));
        assert!(bars.windows(2).all(|w| w[0].x + w[0].width < w[1].x));
    }

    #[test]
    fn test_layout_empty() {
        assert!(chart(vec![]).layout().is_empty());
    }

    #[test]
    fn test_svg_contains_bars_and_labels() {
        let svg = chart(vec![("serde", 40), ("tokio", 25)]).to_svg();
        assert_eq!(svg.matches(r#"class="bar""#).count(), 2);
        assert!(svg.contains(">serde</text>"));
        assert!(svg.contains(">tokio</text>"));
        assert!(svg.contains(">Title</text>"));
        assert!(svg.contains("rotate(-45"));
        assert!(svg.contains(BAR_COLOR));
    }

    #[test]
    fn test_svg_escapes_labels() {
        let svg = chart(vec![("a<b>&\"c\"", 1)]).to_svg();
        assert!(svg.contains("a&lt;b&gt;&amp;&quot;c&quot;"));
    }

    #[test]
    fn test_svg_is_repeatable() {
        let bars = vec![("x", 3), ("y", 2), ("z", 1)];
        assert_eq!(chart(bars.clone()).to_svg(), chart(bars).to_svg());
    }

    #[test]
    fn test_long_labels_are_shortened() {
        let long = "owner.".to_string() + &"x".repeat(100);
        let svg = chart(vec![(long.as_str(), 1)]).to_svg();
        assert!(!svg.contains(&long));
        let shortened = shorten(&long);
        assert_eq!(shortened.chars().count(), MAX_LABEL_CHARS);
        assert!(shortened.ends_with('…'));
        assert!(svg.contains(&format!(">{shortened}</text>")));
        assert_eq!(shorten("serde"), "serde");
    }

    #[test]
    fn test_long_labels_fit_on_canvas() {
        let names: Vec<String> = (0..20).map(|i| format!("{i:02}-{}", "y".repeat(90))).collect();
        let chart = chart(names.iter().map(|n| (n.as_str(), 10)).collect());
        let area = chart.plot_area();
        let extent = chart.label_extent();
        let bars = chart.layout();

        // Leftmost label stays right of the canvas edge.
        let first_centre = bars[0].x + bars[0].width / 2.0;
        assert!(first_centre - extent >= 0.0);
        // Labels end above the x axis title.
        let label_end = area.bottom() + TICK_LENGTH + TICK_FONT_SIZE + extent;
        assert!(label_end <= chart.height as f64 - 2.0 * LABEL_FONT_SIZE);
        assert!(area.width > 0.0 && area.height > 0.0);
    }

    #[test]
    fn test_short_labels_keep_default_margins() {
        let area = chart(vec![("a", 1), ("b", 2)]).plot_area();
        assert_eq!(area.x, MARGIN_LEFT);
        assert_eq!(area.width, DEFAULT_WIDTH as f64 - MARGIN_LEFT - MARGIN_RIGHT);
    }

    #[test]
    fn test_render_draws_category_labels() {
        let chart = chart(vec![("serde_derive", 5)]);
        let area = chart.plot_area();
        let pixmap = chart.render().unwrap();

        // Below the x axis ticks, right of the y axis and above the x axis title.
        let rows = (area.bottom() + TICK_LENGTH + 2.0) as u32..(chart.height - 2 * LABEL_FONT_SIZE as u32);
        let cols = (area.x + 1.0) as u32..chart.width;
        let data = pixmap.data();
        let ink = rows
            .flat_map(|y| cols.clone().map(move |x| (x, y)))
            .filter(|(x, y)| data[((y * chart.width + x) * 4) as usize] < 128)
            .count();
        assert!(ink > 0, "category label left no ink");
    }

    #[test]
    fn test_render_draws_title() {
        let pixmap = chart(vec![]).render().unwrap();
        let data = pixmap.data();
        let ink = (0..MARGIN_TOP as u32)
            .flat_map(|y| (0..DEFAULT_WIDTH).map(move |x| (x, y)))
            .filter(|(x, y)| data[((y * DEFAULT_WIDTH + x) * 4) as usize] < 128)
            .count();
        assert!(ink > 0, "title left no ink");
    }

    #[test]
    fn test_save_png_writes_image() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        let path = path.to_str().unwrap();
        chart(vec![("alpha", 12), ("beta", 3)]).save_png(path).unwrap();

        let bytes = std::fs::read(path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));
        let decoded = image::load_from_memory_with_format(&bytes, ImageFormat::Png).unwrap();
        assert_eq!(decoded.width(), DEFAULT_WIDTH);
        assert_eq!(decoded.height(), DEFAULT_HEIGHT);
    }

    #[test]
    fn test_save_png_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.png");
        std::fs::write(&path, b"stale").unwrap();
        chart(vec![]).save_png(path.to_str().unwrap()).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"\x89PNG"));
    }

    #[test]
    fn test_chart_create_from_ranking() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("macro_counts.png");
        let ranking = vec![RepoTotal::new("A", 10), RepoTotal::new("B", 4)];
        ranking.chart_create(path.to_str().unwrap()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_png_unwritable_destination() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("chart.png");
        let err = chart(vec![("a", 1)]).save_png(path.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Write { .. }));
    }
}

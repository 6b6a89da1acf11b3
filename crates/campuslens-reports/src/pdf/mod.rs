//! Native PDF rendering on A4 pages with the built-in Helvetica faces.
//!
//! [`PdfCanvas`] is a small flow layout: a cursor moves down the page,
//! [`PdfCanvas::ensure_space`] starts a new page when a block would not
//! fit, and [`PdfCanvas::finish`] stamps `Page i of n` on every page.
//! Coordinates passed to the canvas are millimetres from the top-left
//! corner; the conversion to PDF's bottom-left origin happens here.

mod achievements;
mod student;

pub use achievements::{AchievementPdfOptions, achievements_pdf};
pub use student::student_reports_pdf;

use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference,
    PdfLayerReference, Point, Polygon, Rgb,
};

use crate::error::Result;

pub(crate) const PAGE_WIDTH: f32 = 210.0;
pub(crate) const PAGE_HEIGHT: f32 = 297.0;
pub(crate) const MARGIN: f32 = 18.0;
pub(crate) const CONTENT_WIDTH: f32 = PAGE_WIDTH - 2.0 * MARGIN;
const FOOTER_SPACE: f32 = 20.0;

const PT_TO_MM: f32 = 0.3528;
/// Mean Helvetica glyph width relative to the font size.
const AVG_GLYPH_WIDTH: f32 = 0.52;

pub(crate) const BLACK: u32 = 0x000000;
pub(crate) const WHITE: u32 = 0xFFFFFF;
pub(crate) const ACCENT: u32 = 0x4568DC;
pub(crate) const MUTED: u32 = 0x777777;
pub(crate) const STRIPE: u32 = 0xF5F5F5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FontStyle {
    Regular,
    Bold,
    Italic,
}

pub(crate) fn color(hex: u32) -> Color {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    Color::Rgb(Rgb::new(channel(16), channel(8), channel(0), None))
}

/// Parses `#rrggbb`, falling back to black.
pub(crate) fn hex_color(value: &str) -> u32 {
    u32::from_str_radix(value.trim_start_matches('#'), 16).unwrap_or(BLACK)
}

pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * AVG_GLYPH_WIDTH * PT_TO_MM
}

/// Shortens `text` with an ellipsis so it fits in `width` millimetres.
pub(crate) fn fit(text: &str, width: f32, size: f32) -> String {
    if text_width(text, size) <= width {
        return text.to_string();
    }
    let max_chars = (width / (size * AVG_GLYPH_WIDTH * PT_TO_MM)) as usize;
    let keep = max_chars.saturating_sub(3);
    let mut out: String = text.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// Greedy word wrap to lines no wider than `width` millimetres.
pub(crate) fn wrap(text: &str, width: f32, size: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(&candidate, size) <= width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines.into_iter().map(|l| fit(&l, width, size)).collect()
}

pub(crate) struct PdfCanvas {
    doc: PdfDocumentReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
    layers: Vec<PdfLayerReference>,
    cursor: f32,
}

impl PdfCanvas {
    pub(crate) fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let italic = doc.add_builtin_font(BuiltinFont::HelveticaOblique)?;
        let first = doc.get_page(page).get_layer(layer);

        Ok(Self {
            doc,
            regular,
            bold,
            italic,
            layers: vec![first],
            cursor: MARGIN,
        })
    }

    pub(crate) fn page_count(&self) -> usize {
        self.layers.len()
    }

    pub(crate) fn cursor(&self) -> f32 {
        self.cursor
    }

    pub(crate) fn advance(&mut self, mm: f32) {
        self.cursor += mm;
    }

    pub(crate) fn new_page(&mut self) {
        let (page, layer) = self.doc.add_page(
            Mm(PAGE_WIDTH),
            Mm(PAGE_HEIGHT),
            format!("Layer {}", self.layers.len() + 1),
        );
        self.layers.push(self.doc.get_page(page).get_layer(layer));
        self.cursor = MARGIN;
    }

    /// Starts a new page unless `height` millimetres still fit above the
    /// footer. Returns whether a page was added.
    pub(crate) fn ensure_space(&mut self, height: f32) -> bool {
        if self.cursor + height > PAGE_HEIGHT - FOOTER_SPACE {
            self.new_page();
            true
        } else {
            false
        }
    }

    fn layer(&self) -> &PdfLayerReference {
        // `new` always pushes the first page
        &self.layers[self.layers.len() - 1]
    }

    fn font(&self, style: FontStyle) -> &IndirectFontRef {
        match style {
            FontStyle::Regular => &self.regular,
            FontStyle::Bold => &self.bold,
            FontStyle::Italic => &self.italic,
        }
    }

    /// Draws text with its baseline `y` millimetres from the top.
    pub(crate) fn text_at(&self, text: &str, x: f32, y: f32, size: f32, style: FontStyle, rgb: u32) {
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.use_text(text, size, Mm(x), Mm(PAGE_HEIGHT - y), self.font(style));
    }

    /// Draws text on the cursor baseline.
    pub(crate) fn text(&self, text: &str, x: f32, size: f32, style: FontStyle) {
        self.text_at(text, x, self.cursor, size, style, BLACK);
    }

    pub(crate) fn centered(&self, text: &str, size: f32, style: FontStyle, rgb: u32) {
        let x = (PAGE_WIDTH - text_width(text, size)) / 2.0;
        self.text_at(text, x.max(MARGIN), self.cursor, size, style, rgb);
    }

    /// Fills a rectangle whose top-left corner is `(x, y)` from the top.
    pub(crate) fn fill_rect(&self, x: f32, y: f32, width: f32, height: f32, rgb: u32) {
        let top = PAGE_HEIGHT - y;
        let bottom = top - height;
        let ring = vec![
            (Point::new(Mm(x), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(bottom)), false),
            (Point::new(Mm(x + width), Mm(top)), false),
            (Point::new(Mm(x), Mm(top)), false),
        ];
        let layer = self.layer();
        layer.set_fill_color(color(rgb));
        layer.add_polygon(Polygon {
            rings: vec![ring],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        });
    }

    /// Thin full-width line under the cursor.
    pub(crate) fn rule(&self, rgb: u32) {
        self.fill_rect(MARGIN, self.cursor, CONTENT_WIDTH, 0.4, rgb);
    }

    /// Stamps page numbers and serializes the document.
    pub(crate) fn finish(self) -> Result<Vec<u8>> {
        let total = self.layers.len();
        for (index, layer) in self.layers.iter().enumerate() {
            let label = format!("Page {} of {}", index + 1, total);
            let x = (PAGE_WIDTH - text_width(&label, 9.0)) / 2.0;
            layer.set_fill_color(color(MUTED));
            layer.use_text(label, 9.0, Mm(x), Mm(10.0), &self.regular);
        }
        Ok(self.doc.save_to_bytes()?)
    }
}

/// A column of a PDF table, positioned from the left margin.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PdfColumn {
    pub title: &'static str,
    pub width: f32,
}

pub(crate) struct PdfCell {
    pub text: String,
    pub style: FontStyle,
    pub color: u32,
}

impl PdfCell {
    pub(crate) fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Regular,
            color: BLACK,
        }
    }

    pub(crate) fn colored(text: impl Into<String>, color: u32) -> Self {
        Self {
            text: text.into(),
            style: FontStyle::Bold,
            color,
        }
    }
}

const ROW_HEIGHT: f32 = 7.0;
const CELL_PAD: f32 = 2.0;

/// Striped table that repeats its header after every page break.
pub(crate) struct PdfTable {
    columns: Vec<PdfColumn>,
    font_size: f32,
    rows_drawn: usize,
}

impl PdfTable {
    pub(crate) fn new(columns: &[PdfColumn], font_size: f32) -> Self {
        Self {
            columns: columns.to_vec(),
            font_size,
            rows_drawn: 0,
        }
    }

    pub(crate) fn header(&self, canvas: &mut PdfCanvas) {
        canvas.ensure_space(ROW_HEIGHT * 2.0);
        canvas.fill_rect(MARGIN, canvas.cursor(), CONTENT_WIDTH, ROW_HEIGHT, ACCENT);
        let baseline = canvas.cursor() + ROW_HEIGHT - CELL_PAD;
        let mut x = MARGIN;
        for column in &self.columns {
            let title = fit(column.title, column.width - CELL_PAD * 2.0, self.font_size);
            canvas.text_at(&title, x + CELL_PAD, baseline, self.font_size, FontStyle::Bold, WHITE);
            x += column.width;
        }
        canvas.advance(ROW_HEIGHT);
    }

    /// Draws one row plus optional wrapped detail lines spanning the table.
    pub(crate) fn row(&mut self, canvas: &mut PdfCanvas, cells: &[PdfCell], detail: Option<&str>) {
        let detail_size = self.font_size - 1.0;
        let detail_lines = detail
            .map(|d| wrap(d, CONTENT_WIDTH - CELL_PAD * 4.0, detail_size))
            .unwrap_or_default();
        let line_height = detail_size * PT_TO_MM * 1.5;
        let height = ROW_HEIGHT + detail_lines.len() as f32 * line_height;

        if canvas.ensure_space(height) {
            self.header(canvas);
        }

        if self.rows_drawn % 2 == 1 {
            canvas.fill_rect(MARGIN, canvas.cursor(), CONTENT_WIDTH, height, STRIPE);
        }

        let baseline = canvas.cursor() + ROW_HEIGHT - CELL_PAD;
        let mut x = MARGIN;
        for (column, cell) in self.columns.iter().zip(cells) {
            let text = fit(&cell.text, column.width - CELL_PAD * 2.0, self.font_size);
            canvas.text_at(&text, x + CELL_PAD, baseline, self.font_size, cell.style, cell.color);
            x += column.width;
        }

        let mut y = baseline;
        for line in &detail_lines {
            y += line_height;
            canvas.text_at(line, MARGIN + CELL_PAD * 2.0, y, detail_size, FontStyle::Italic, MUTED);
        }

        canvas.advance(height);
        self.rows_drawn += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_truncates_long_text() {
        let short = fit("CS101", 40.0, 10.0);
        assert_eq!(short, "CS101");

        let long = fit(&"x".repeat(200), 20.0, 10.0);
        assert!(long.ends_with("..."));
        assert!(text_width(&long, 10.0) <= 20.0);
    }

    #[test]
    fn wrap_splits_on_words() {
        let lines = wrap("one two three four five six seven eight nine ten", 20.0, 10.0);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, 10.0) <= 20.0));
        assert_eq!(lines.join(" "), "one two three four five six seven eight nine ten");
    }

    #[test]
    fn hex_colors_parse() {
        assert_eq!(hex_color("#4caf50"), 0x4CAF50);
        assert_eq!(hex_color("nope"), BLACK);
    }

    #[test]
    fn canvas_breaks_pages_when_full() {
        let mut canvas = PdfCanvas::new("test").unwrap();
        assert_eq!(canvas.page_count(), 1);
        assert!(!canvas.ensure_space(10.0));

        canvas.advance(PAGE_HEIGHT);
        assert!(canvas.ensure_space(10.0));
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(canvas.cursor(), MARGIN);

        let bytes = canvas.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn table_repeats_header_on_new_pages() {
        let mut canvas = PdfCanvas::new("table").unwrap();
        let mut table = PdfTable::new(
            &[
                PdfColumn { title: "A", width: 60.0 },
                PdfColumn { title: "B", width: 114.0 },
            ],
            10.0,
        );
        table.header(&mut canvas);
        for i in 0..100 {
            table.row(&mut canvas, &[PdfCell::plain(i.to_string()), PdfCell::plain("row")], None);
        }
        assert!(canvas.page_count() >= 3);
    }
}

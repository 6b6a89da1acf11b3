use chrono::NaiveDate;

use campuslens_models::{Achievement, TimeRange};

use super::{
    ACCENT, BLACK, CONTENT_WIDTH, FontStyle, MARGIN, MUTED, PdfCanvas, PdfCell, PdfColumn,
    PdfTable, STRIPE, fit,
};
use crate::achievements::{category_stats, format_date};
use crate::error::Result;

const PALETTE: [u32; 7] = [
    0x4568DC, 0xB06AB3, 0x4CAF50, 0xFF9800, 0xF44336, 0x2196F3, 0x9C27B0,
];

const COLUMNS: [PdfColumn; 4] = [
    PdfColumn { title: "Student", width: 48.0 },
    PdfColumn { title: "Achievement", width: 62.0 },
    PdfColumn { title: "Category", width: 36.0 },
    PdfColumn { title: "Date", width: 28.0 },
];

#[derive(Debug, Clone)]
pub struct AchievementPdfOptions<'a> {
    pub time_range: TimeRange,
    pub categories: &'a [String],
    pub include_details: bool,
    pub include_charts: bool,
    pub generated_on: NaiveDate,
}

pub fn achievements_pdf(
    achievements: &[Achievement],
    options: &AchievementPdfOptions<'_>,
) -> Result<Vec<u8>> {
    layout(achievements, options)?.finish()
}

fn layout(achievements: &[Achievement], options: &AchievementPdfOptions<'_>) -> Result<PdfCanvas> {
    let mut canvas = PdfCanvas::new("Achievement Report")?;

    canvas.advance(10.0);
    canvas.centered("Achievement Report", 24.0, FontStyle::Bold, BLACK);
    canvas.advance(9.0);
    canvas.centered(
        &format!("Generated on: {}", options.generated_on.format("%d/%m/%Y")),
        11.0,
        FontStyle::Regular,
        MUTED,
    );
    canvas.advance(10.0);

    let box_top = canvas.cursor();
    canvas.fill_rect(MARGIN, box_top, CONTENT_WIDTH, 24.0, STRIPE);
    canvas.text_at("Filter Criteria:", MARGIN + 4.0, box_top + 7.0, 13.0, FontStyle::Bold, BLACK);
    canvas.text_at(
        &format!("Time Range: {}", options.time_range.label()),
        MARGIN + 4.0,
        box_top + 14.0,
        11.0,
        FontStyle::Regular,
        BLACK,
    );
    let categories = if options.categories.is_empty() {
        "All".to_string()
    } else {
        options.categories.join(", ")
    };
    canvas.text_at(
        &fit(&format!("Categories: {categories}"), CONTENT_WIDTH - 8.0, 11.0),
        MARGIN + 4.0,
        box_top + 20.0,
        11.0,
        FontStyle::Regular,
        BLACK,
    );
    canvas.advance(30.0);

    let stats = category_stats(achievements);
    if options.include_charts && !stats.is_empty() {
        canvas.ensure_space(20.0 + stats.len() as f32 * 9.0);
        canvas.advance(6.0);
        canvas.text_at("Category Distribution", MARGIN, canvas.cursor(), 15.0, FontStyle::Bold, ACCENT);
        canvas.advance(6.0);

        let label_width = 45.0;
        let bar_space = CONTENT_WIDTH - label_width - 30.0;
        for (i, stat) in stats.iter().enumerate() {
            canvas.ensure_space(9.0);
            let top = canvas.cursor();
            canvas.text_at(
                &fit(&stat.category, label_width - 2.0, 10.0),
                MARGIN,
                top + 5.0,
                10.0,
                FontStyle::Regular,
                BLACK,
            );
            let bar_width = (bar_space * stat.percentage as f32 / 100.0).max(0.5);
            canvas.fill_rect(MARGIN + label_width, top + 1.0, bar_width, 5.0, PALETTE[i % PALETTE.len()]);
            canvas.text_at(
                &format!("{} ({}%)", stat.count, stat.percentage),
                MARGIN + label_width + bar_width + 3.0,
                top + 5.0,
                10.0,
                FontStyle::Regular,
                BLACK,
            );
            canvas.advance(8.0);
        }
        canvas.advance(4.0);
    }

    canvas.ensure_space(30.0);
    canvas.advance(8.0);
    canvas.text_at("Achievement List", MARGIN, canvas.cursor(), 15.0, FontStyle::Bold, ACCENT);
    canvas.advance(4.0);

    if achievements.is_empty() {
        canvas.advance(6.0);
        canvas.text("No achievements match the selected filters.", MARGIN, 10.0, FontStyle::Italic);
        return Ok(canvas);
    }

    let mut table = PdfTable::new(&COLUMNS, 9.0);
    table.header(&mut canvas);
    for a in achievements {
        let detail = options
            .include_details
            .then(|| {
                let mut parts = Vec::new();
                if let Some(d) = a.description.as_deref().filter(|d| !d.trim().is_empty()) {
                    parts.push(format!("Description: {d}"));
                }
                parts.push(format!("Scope: {}", a.scope));
                parts.join("  |  ")
            });
        table.row(
            &mut canvas,
            &[
                PdfCell::plain(a.student_name.clone().unwrap_or_else(|| a.registration_number.clone())),
                PdfCell::plain(a.title.clone()),
                PdfCell::plain(a.category.clone()),
                PdfCell::plain(format_date(a.achievement_date)),
            ],
            detail.as_deref(),
        );
    }

    Ok(canvas)
}

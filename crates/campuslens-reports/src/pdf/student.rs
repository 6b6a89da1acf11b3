use chrono::NaiveDate;

use campuslens_models::{ReportKind, SemesterPerformanceReport};

use super::{
    ACCENT, CONTENT_WIDTH, FontStyle, MARGIN, MUTED, PdfCanvas, PdfCell, PdfColumn, PdfTable,
    STRIPE, hex_color, wrap,
};
use crate::error::{ReportError, Result};
use crate::grading::letter_grade;

const SEMESTER_COLUMNS: [PdfColumn; 4] = [
    PdfColumn { title: "Semester", width: 40.0 },
    PdfColumn { title: "SGPA", width: 40.0 },
    PdfColumn { title: "Credits Earned", width: 47.0 },
    PdfColumn { title: "Total Credits", width: 47.0 },
];

const COURSE_COLUMNS: [PdfColumn; 6] = [
    PdfColumn { title: "Sem", width: 14.0 },
    PdfColumn { title: "Code", width: 24.0 },
    PdfColumn { title: "Course Name", width: 76.0 },
    PdfColumn { title: "Credits", width: 18.0 },
    PdfColumn { title: "Grade Points", width: 26.0 },
    PdfColumn { title: "Grade", width: 16.0 },
];

const BACKLOG_COLUMNS: [PdfColumn; 4] = [
    PdfColumn { title: "Code", width: 30.0 },
    PdfColumn { title: "Course Name", width: 90.0 },
    PdfColumn { title: "Semester", width: 27.0 },
    PdfColumn { title: "Grade Points", width: 27.0 },
];

/// Renders one or more student reports into a single PDF, each starting
/// on a fresh page.
pub fn student_reports_pdf(
    reports: &[SemesterPerformanceReport],
    kind: ReportKind,
    generated_on: NaiveDate,
) -> Result<Vec<u8>> {
    layout(reports, kind, generated_on)?.finish()
}

fn layout(
    reports: &[SemesterPerformanceReport],
    kind: ReportKind,
    generated_on: NaiveDate,
) -> Result<PdfCanvas> {
    if reports.is_empty() {
        return Err(ReportError::Empty);
    }

    let mut canvas = PdfCanvas::new(kind.title())?;
    for (index, report) in reports.iter().enumerate() {
        if index > 0 {
            canvas.new_page();
        }
        draw_report(&mut canvas, report, kind, generated_on);
    }
    Ok(canvas)
}

fn section_title(canvas: &mut PdfCanvas, title: &str) {
    canvas.ensure_space(20.0);
    canvas.advance(8.0);
    canvas.text_at(title, MARGIN, canvas.cursor(), 13.0, FontStyle::Bold, ACCENT);
    canvas.advance(4.0);
}

fn draw_report(
    canvas: &mut PdfCanvas,
    report: &SemesterPerformanceReport,
    kind: ReportKind,
    generated_on: NaiveDate,
) {
    let student = &report.student;

    canvas.advance(6.0);
    canvas.centered("CampusLens", 20.0, FontStyle::Bold, ACCENT);
    canvas.advance(8.0);
    canvas.centered(kind.title(), 14.0, FontStyle::Bold, super::BLACK);
    canvas.advance(6.0);
    canvas.centered(
        &format!("Generated on {}", generated_on.format("%d/%m/%Y")),
        9.0,
        FontStyle::Regular,
        MUTED,
    );
    canvas.advance(3.0);
    canvas.rule(ACCENT);
    canvas.advance(4.0);

    let info_top = canvas.cursor();
    canvas.fill_rect(MARGIN, info_top, CONTENT_WIDTH, 30.0, STRIPE);
    let rows = [
        ("Name", student.name.clone()),
        ("Registration Number", student.registration_number.clone()),
        ("Branch", student.branch.clone()),
        ("Current Semester", student.current_semester.to_string()),
        ("Email", student.email.clone().unwrap_or_else(|| "-".to_string())),
    ];
    for (i, (label, value)) in rows.iter().enumerate() {
        let y = info_top + 6.0 + i as f32 * 5.5;
        canvas.text_at(label, MARGIN + 4.0, y, 10.0, FontStyle::Bold, super::BLACK);
        canvas.text_at(value, MARGIN + 52.0, y, 10.0, FontStyle::Regular, super::BLACK);
    }
    canvas.advance(34.0);

    let summary = [
        ("CGPA", format!("{:.2}", report.cgpa)),
        ("Status", report.status.label().to_string()),
        (
            "Credits Earned",
            format!("{} / {}", report.earned_credits, report.total_credits),
        ),
        ("Backlogs", report.failed_subjects.len().to_string()),
    ];
    let box_width = CONTENT_WIDTH / summary.len() as f32;
    for (i, (label, value)) in summary.iter().enumerate() {
        let x = MARGIN + i as f32 * box_width;
        canvas.text_at(value, x + 4.0, canvas.cursor() + 5.0, 14.0, FontStyle::Bold, ACCENT);
        canvas.text_at(label, x + 4.0, canvas.cursor() + 10.0, 9.0, FontStyle::Regular, MUTED);
    }
    canvas.advance(12.0);

    section_title(canvas, "Academic Performance");
    if report.sgpa_by_semester.is_empty() {
        canvas.advance(6.0);
        canvas.text("No grades recorded yet.", MARGIN, 10.0, FontStyle::Italic);
    } else {
        let mut table = PdfTable::new(&SEMESTER_COLUMNS, 10.0);
        table.header(canvas);
        for s in &report.sgpa_by_semester {
            table.row(
                canvas,
                &[
                    PdfCell::plain(s.semester.to_string()),
                    PdfCell::plain(format!("{:.2}", s.sgpa)),
                    PdfCell::plain(s.earned_credits.to_string()),
                    PdfCell::plain(s.total_credits.to_string()),
                ],
                None,
            );
        }
    }

    if !report.semester_grades.is_empty() {
        section_title(canvas, "Course Details");
        let mut table = PdfTable::new(&COURSE_COLUMNS, 9.0);
        table.header(canvas);
        for g in &report.semester_grades {
            let letter = letter_grade(g.grade_points);
            table.row(
                canvas,
                &[
                    PdfCell::plain(g.semester.to_string()),
                    PdfCell::plain(g.course_code.clone()),
                    PdfCell::plain(g.course_name.clone()),
                    PdfCell::plain(g.credits.to_string()),
                    PdfCell::plain(format!("{:.1}", g.grade_points)),
                    PdfCell::colored(letter.letter, hex_color(letter.color)),
                ],
                None,
            );
        }
    }

    if !report.failed_subjects.is_empty() {
        section_title(canvas, "Backlogs");
        let mut table = PdfTable::new(&BACKLOG_COLUMNS, 9.0);
        table.header(canvas);
        for g in &report.failed_subjects {
            table.row(
                canvas,
                &[
                    PdfCell::plain(g.course_code.clone()),
                    PdfCell::plain(g.course_name.clone()),
                    PdfCell::plain(g.semester.to_string()),
                    PdfCell::plain(format!("{:.1}", g.grade_points)),
                ],
                None,
            );
        }
    }

    if !report.recommendations.is_empty() {
        section_title(canvas, "Recommendations");
        for line in &report.recommendations {
            for (i, wrapped) in wrap(line, CONTENT_WIDTH - 8.0, 10.0).iter().enumerate() {
                canvas.ensure_space(6.0);
                canvas.advance(5.5);
                let bullet = if i == 0 { "-" } else { "" };
                canvas.text(bullet, MARGIN + 2.0, 10.0, FontStyle::Regular);
                canvas.text(wrapped, MARGIN + 6.0, 10.0, FontStyle::Regular);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::build_performance_report;
    use crate::grading::fixtures::{grade, report, student};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, 20).unwrap()
    }

    #[test]
    fn empty_batch_is_an_error() {
        assert!(matches!(
            student_reports_pdf(&[], ReportKind::Semester, today()),
            Err(ReportError::Empty)
        ));
    }

    #[test]
    fn renders_a_single_report() {
        let bytes =
            student_reports_pdf(&[report("21A91A0501", "Asha Rao")], ReportKind::Semester, today())
                .unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn each_student_starts_a_new_page() {
        let reports = vec![report("A1", "First"), report("B2", "Second"), report("C3", "Third")];
        let canvas = layout(&reports, ReportKind::Backlog, today()).unwrap();
        assert_eq!(canvas.page_count(), 3);
    }

    #[test]
    fn long_course_lists_overflow_onto_more_pages() {
        let grades = (0..80)
            .map(|i| grade(&format!("C{i:03}"), i / 10 + 1, 3, 7.5))
            .collect();
        let report = build_performance_report(student("A1", "Many Courses"), grades);
        let canvas = layout(&[report], ReportKind::Subject, today()).unwrap();
        assert!(canvas.page_count() > 1);
    }
}

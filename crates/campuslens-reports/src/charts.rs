//! Inline SVG charts embedded in the HTML report.

use campuslens_models::{GradeDetail, SemesterSgpa};

use crate::grading::grade_distribution;

const PADDING: f64 = 50.0;
const AXIS_COLOR: &str = "#333";
const GRID_COLOR: &str = "#e0e0e0";
const LINE_COLOR: &str = "#4568dc";

/// Trims trailing zeros so coordinates stay short.
fn num(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}

fn axes(svg: &mut String, width: f64, height: f64) {
    svg.push_str(&format!(
        r#"<line x1="{p}" y1="{p}" x2="{p}" y2="{b}" stroke="{AXIS_COLOR}" stroke-width="2" />"#,
        p = num(PADDING),
        b = num(height - PADDING),
    ));
    svg.push_str(&format!(
        r#"<line x1="{p}" y1="{b}" x2="{r}" y2="{b}" stroke="{AXIS_COLOR}" stroke-width="2" />"#,
        p = num(PADDING),
        b = num(height - PADDING),
        r = num(width - PADDING),
    ));
}

fn y_tick(svg: &mut String, width: f64, y: f64, label: impl std::fmt::Display) {
    svg.push_str(&format!(
        r#"<text x="{lx}" y="{y}" text-anchor="end" alignment-baseline="middle" font-size="12">{label}</text>"#,
        lx = num(PADDING - 10.0),
        y = num(y),
    ));
    svg.push_str(&format!(
        r#"<line x1="{p}" y1="{y}" x2="{r}" y2="{y}" stroke="{GRID_COLOR}" stroke-width="1" />"#,
        p = num(PADDING),
        y = num(y),
        r = num(width - PADDING),
    ));
}

fn titles(svg: &mut String, width: f64, height: f64, title: &str, y_label: &str) {
    svg.push_str(&format!(
        r#"<text x="{cx}" y="25" text-anchor="middle" font-size="16" font-weight="bold">{title}</text>"#,
        cx = num(width / 2.0),
    ));
    let lx = num(PADDING - 35.0);
    let cy = num(height / 2.0);
    svg.push_str(&format!(
        r#"<text x="{lx}" y="{cy}" text-anchor="middle" font-size="14" transform="rotate(-90 {lx} {cy})">{y_label}</text>"#,
    ));
}

/// SGPA per semester as a line chart on a fixed 0-10 axis.
/// Returns an empty string when there is nothing to plot.
pub fn sgpa_line_chart(sgpa: &[SemesterSgpa]) -> String {
    if sgpa.is_empty() {
        return String::new();
    }

    let mut data = sgpa.to_vec();
    data.sort_by_key(|s| s.semester);

    let (width, height) = (800.0, 400.0);
    let chart_width = width - PADDING * 2.0;
    let chart_height = height - PADDING * 2.0;
    let x_step = chart_width / (data.len().saturating_sub(1).max(1)) as f64;
    let y_scale = chart_height / 10.0;

    let point = |i: usize, value: f64| (PADDING + i as f64 * x_step, height - PADDING - value * y_scale);

    let mut svg = format!(
        r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><rect width="{w}" height="{h}" fill="white" />"#,
        w = num(width),
        h = num(height),
    );

    axes(&mut svg, width, height);
    for tick in (0..=10).step_by(2) {
        y_tick(&mut svg, width, height - PADDING - f64::from(tick) * y_scale, tick);
    }

    for (i, s) in data.iter().enumerate() {
        let (x, _) = point(i, s.sgpa);
        svg.push_str(&format!(
            r#"<text x="{x}" y="{y}" text-anchor="middle" font-size="12">Sem {sem}</text>"#,
            x = num(x),
            y = num(height - PADDING + 20.0),
            sem = s.semester,
        ));
    }

    let points: Vec<String> = data
        .iter()
        .enumerate()
        .map(|(i, s)| {
            let (x, y) = point(i, s.sgpa);
            format!("{},{}", num(x), num(y))
        })
        .collect();
    svg.push_str(&format!(
        r#"<polyline points="{}" fill="none" stroke="{LINE_COLOR}" stroke-width="3" />"#,
        points.join(" ")
    ));

    for (i, s) in data.iter().enumerate() {
        let (x, y) = point(i, s.sgpa);
        svg.push_str(&format!(
            r#"<circle cx="{x}" cy="{y}" r="5" fill="{LINE_COLOR}" /><text x="{x}" y="{ly}" text-anchor="middle" font-size="12" fill="{LINE_COLOR}" font-weight="bold">{v}</text>"#,
            x = num(x),
            y = num(y),
            ly = num(y - 15.0),
            v = s.sgpa,
        ));
    }

    titles(&mut svg, width, height, "SGPA Performance Across Semesters", "SGPA");
    svg.push_str(&format!(
        r#"<text x="{cx}" y="{y}" text-anchor="middle" font-size="14">Semester</text></svg>"#,
        cx = num(width / 2.0),
        y = num(height - 10.0),
    ));
    svg
}

/// Number of courses per letter grade as a bar chart.
pub fn grade_distribution_chart(grades: &[GradeDetail]) -> String {
    let counts = grade_distribution(grades);

    let (width, height) = (500.0, 400.0);
    let chart_width = width - PADDING * 2.0;
    let chart_height = height - PADDING * 2.0;
    let slot = chart_width / counts.len() as f64;
    let bar_width = slot * 0.7;
    let bar_spacing = slot * 0.3;

    let max_count = counts.iter().map(|(_, n)| *n).max().unwrap_or(0);
    let y_scale = chart_height / max_count.max(1) as f64;

    let mut svg = format!(
        r#"<svg width="{w}" height="{h}" xmlns="http://www.w3.org/2000/svg"><rect width="{w}" height="{h}" fill="white" />"#,
        w = num(width),
        h = num(height),
    );

    axes(&mut svg, width, height);
    let y_step = max_count.div_ceil(5).max(1);
    for tick in (0..=max_count).step_by(y_step) {
        y_tick(&mut svg, width, height - PADDING - tick as f64 * y_scale, tick);
    }

    for (i, (letter, count)) in counts.iter().enumerate() {
        let x = PADDING + i as f64 * (bar_width + bar_spacing);
        let bar_height = *count as f64 * y_scale;
        let y = height - PADDING - bar_height;
        let cx = num(x + bar_width / 2.0);
        svg.push_str(&format!(
            r#"<rect x="{x}" y="{y}" width="{bw}" height="{bh}" fill="{color}" /><text x="{cx}" y="{ly}" text-anchor="middle" font-size="12">{count}</text><text x="{cx}" y="{by}" text-anchor="middle" font-size="12">{label}</text>"#,
            x = num(x),
            y = num(y),
            bw = num(bar_width),
            bh = num(bar_height),
            color = letter.color,
            ly = num(y - 10.0),
            by = num(height - PADDING + 20.0),
            label = letter.letter,
        ));
    }

    titles(&mut svg, width, height, "Grade Distribution", "Number of Courses");
    svg.push_str("</svg>");
    svg
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::fixtures::grade;
    use crate::grading::sgpa_by_semester;

    #[test]
    fn numbers_are_trimmed() {
        assert_eq!(num(50.0), "50");
        assert_eq!(num(283.3333), "283.33");
        assert_eq!(num(8.5), "8.5");
    }

    #[test]
    fn empty_sgpa_renders_nothing() {
        assert_eq!(sgpa_line_chart(&[]), "");
    }

    #[test]
    fn line_chart_plots_each_semester() {
        let grades = vec![
            grade("CS101", 1, 4, 8.0),
            grade("CS201", 2, 4, 9.0),
            grade("CS301", 3, 4, 7.0),
        ];
        let svg = sgpa_line_chart(&sgpa_by_semester(&grades));

        assert!(svg.starts_with(r#"<svg width="800" height="400""#));
        assert!(svg.contains("SGPA Performance Across Semesters"));
        assert_eq!(svg.matches("<circle").count(), 3);
        assert!(svg.contains(">Sem 3</text>"));
        // first point: x = 50, y = 400 - 50 - 8 * 30
        assert!(svg.contains(r#"points="50,110 400,80 750,140""#));
        assert!(svg.ends_with("</svg>"));
    }

    #[test]
    fn single_semester_sits_on_the_y_axis() {
        let svg = sgpa_line_chart(&sgpa_by_semester(&[grade("CS101", 1, 4, 10.0)]));
        assert!(svg.contains(r#"points="50,50""#));
    }

    #[test]
    fn bar_chart_has_seven_bars() {
        let grades = vec![
            grade("A", 1, 3, 9.5),
            grade("B", 1, 3, 9.1),
            grade("C", 1, 3, 2.0),
        ];
        let svg = grade_distribution_chart(&grades);

        assert!(svg.starts_with(r#"<svg width="500" height="400""#));
        assert_eq!(svg.matches(r#"<rect x="#).count(), 7);
        assert!(svg.contains(r##"fill="#4caf50""##));
        assert!(svg.contains("Number of Courses"));
    }

    #[test]
    fn bar_chart_survives_no_grades() {
        let svg = grade_distribution_chart(&[]);
        assert!(svg.contains("Grade Distribution"));
        assert_eq!(svg.matches(r#"height="0""#).count(), 7);
    }
}

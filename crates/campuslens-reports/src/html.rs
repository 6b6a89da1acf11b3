//! HTML documents: the student report and the sample certificate.

use chrono::NaiveDate;

use campuslens_models::{DummyCertificateRequest, ReportKind, SemesterPerformanceReport};

use crate::charts::{grade_distribution_chart, sgpa_line_chart};
use crate::grading::letter_grade;

/// Escapes text for use in element content and quoted attributes.
pub fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

const REPORT_STYLE: &str = "body{font-family:Helvetica,Arial,sans-serif;color:#222;margin:32px}\
.header{text-align:center;border-bottom:3px solid #4568dc;padding-bottom:12px;margin-bottom:20px}\
.header h1{margin:0;color:#4568dc;font-size:24px}.header h2{margin:6px 0 0;font-size:18px}\
.header .generated{color:#777;font-size:12px}\
.student-info{background:#f5f7ff;border-radius:6px;padding:12px 16px;margin-bottom:16px}\
.student-info td{padding:2px 12px 2px 0}\
.summary{display:flex;gap:16px;margin-bottom:16px}\
.summary div{flex:1;border:1px solid #e0e0e0;border-radius:6px;padding:8px;text-align:center}\
.summary strong{display:block;font-size:20px;color:#4568dc}\
table.data{width:100%;border-collapse:collapse;margin-bottom:16px;font-size:13px}\
table.data th{background:#4568dc;color:#fff;padding:6px;text-align:left}\
table.data td{padding:6px;border-bottom:1px solid #e0e0e0}\
table.data tr:nth-child(even) td{background:#f5f5f5}\
.grade{display:inline-block;min-width:28px;padding:2px 6px;border-radius:4px;color:#fff;text-align:center;font-weight:bold}\
.charts svg{display:block;margin:12px auto;max-width:100%}\
.recommendations li{margin-bottom:4px}\
.footer{margin-top:24px;text-align:center;color:#999;font-size:11px}";

fn info_row(html: &mut String, label: &str, value: Option<&str>) {
    html.push_str(&format!(
        "<tr><td><strong>{}</strong></td><td>{}</td></tr>",
        label,
        escape(value.unwrap_or("-"))
    ));
}

/// One student's report as a fragment, without `<html>` or `<body>`.
pub fn student_report_section(
    report: &SemesterPerformanceReport,
    kind: ReportKind,
    include_charts: bool,
    generated_on: NaiveDate,
) -> String {
    let student = &report.student;
    let mut html = String::new();

    html.push_str(&format!(
        "<div class=\"header\"><h1>CampusLens</h1><h2>{}</h2><div class=\"generated\">Generated on {}</div></div>",
        kind.title(),
        generated_on.format("%d/%m/%Y")
    ));

    html.push_str("<div class=\"student-info\"><h3>Student Information</h3><table>");
    info_row(&mut html, "Name", Some(&student.name));
    info_row(&mut html, "Registration Number", Some(&student.registration_number));
    info_row(&mut html, "Branch", Some(&student.branch));
    info_row(
        &mut html,
        "Current Semester",
        Some(&student.current_semester.to_string()),
    );
    info_row(&mut html, "Email", student.email.as_deref());
    html.push_str("</table></div>");

    html.push_str(&format!(
        "<div class=\"summary\"><div><strong>{:.2}</strong>CGPA</div><div><strong>{}</strong>Status</div><div><strong>{} / {}</strong>Credits Earned</div><div><strong>{}</strong>Backlogs</div></div>",
        report.cgpa,
        report.status.label(),
        report.earned_credits,
        report.total_credits,
        report.failed_subjects.len()
    ));

    html.push_str("<h3>Academic Performance</h3>");
    if report.sgpa_by_semester.is_empty() {
        html.push_str("<p>No grades recorded yet.</p>");
    } else {
        html.push_str("<table class=\"data\"><thead><tr><th>Semester</th><th>SGPA</th><th>Credits Earned</th><th>Total Credits</th></tr></thead><tbody>");
        for s in &report.sgpa_by_semester {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{:.2}</td><td>{}</td><td>{}</td></tr>",
                s.semester, s.sgpa, s.earned_credits, s.total_credits
            ));
        }
        html.push_str("</tbody></table>");
    }

    if !report.semester_grades.is_empty() {
        html.push_str("<h3>Course Details</h3><table class=\"data\"><thead><tr><th>Semester</th><th>Course Code</th><th>Course Name</th><th>Credits</th><th>Grade Points</th><th>Grade</th></tr></thead><tbody>");
        for g in &report.semester_grades {
            let letter = letter_grade(g.grade_points);
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td><td><span class=\"grade\" style=\"background:{}\">{}</span></td></tr>",
                g.semester,
                escape(&g.course_code),
                escape(&g.course_name),
                g.credits,
                g.grade_points,
                letter.color,
                letter.letter
            ));
        }
        html.push_str("</tbody></table>");
    }

    if !report.failed_subjects.is_empty() {
        html.push_str("<h3>Backlogs</h3><table class=\"data\"><thead><tr><th>Course Code</th><th>Course Name</th><th>Semester</th><th>Grade Points</th></tr></thead><tbody>");
        for g in &report.failed_subjects {
            html.push_str(&format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{:.1}</td></tr>",
                escape(&g.course_code),
                escape(&g.course_name),
                g.semester,
                g.grade_points
            ));
        }
        html.push_str("</tbody></table>");
    }

    if include_charts && !report.semester_grades.is_empty() {
        html.push_str("<div class=\"charts\"><h3>Charts</h3>");
        html.push_str(&sgpa_line_chart(&report.sgpa_by_semester));
        html.push_str(&grade_distribution_chart(&report.semester_grades));
        html.push_str("</div>");
    }

    if !report.recommendations.is_empty() {
        html.push_str("<h3>Recommendations</h3><ul class=\"recommendations\">");
        for line in &report.recommendations {
            html.push_str(&format!("<li>{}</li>", escape(line)));
        }
        html.push_str("</ul>");
    }

    html.push_str("<div class=\"footer\">This is a system generated report.</div>");
    html
}

fn document(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{}</title><style>{}</style></head><body>{}</body></html>",
        escape(title),
        REPORT_STYLE,
        body
    )
}

pub fn student_report(
    report: &SemesterPerformanceReport,
    kind: ReportKind,
    include_charts: bool,
    generated_on: NaiveDate,
) -> String {
    let title = format!("{} - {}", kind.title(), report.student.registration_number);
    document(
        &title,
        &student_report_section(report, kind, include_charts, generated_on),
    )
}

/// Several student reports in one document, one per printed page.
pub fn combined_report(
    reports: &[SemesterPerformanceReport],
    kind: ReportKind,
    include_charts: bool,
    generated_on: NaiveDate,
) -> String {
    let body: String = reports
        .iter()
        .map(|report| {
            format!(
                "<div style=\"page-break-after: always;\">{}</div>",
                student_report_section(report, kind, include_charts, generated_on)
            )
        })
        .collect();
    document("Batch Report", &body)
}

/// Printable sample certificate. Every caller supplied value is escaped.
pub fn dummy_certificate(request: &DummyCertificateRequest) -> String {
    let optional = |label: &str, value: Option<&String>| {
        value
            .filter(|v| !v.trim().is_empty())
            .map(|v| format!("<p class=\"meta\"><strong>{}:</strong> {}</p>", label, escape(v)))
            .unwrap_or_default()
    };

    let logo = request
        .logo_url
        .as_ref()
        .filter(|v| !v.trim().is_empty())
        .map(|url| format!("<img class=\"logo\" src=\"{}\" alt=\"logo\" />", escape(url)))
        .unwrap_or_default();

    let validation_url = escape(request.validation_url());

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Certificate - {title}</title><style>\
body{{font-family:Georgia,serif;background:#f0f0f0;margin:0;padding:40px}}\
.certificate{{background:#fff;max-width:900px;margin:0 auto;padding:60px;border:12px double #4568dc;text-align:center}}\
.logo{{max-height:80px;margin-bottom:20px}}\
h1{{font-size:40px;color:#4568dc;margin:0 0 10px}}\
.recipient{{font-size:32px;font-weight:bold;margin:20px 0;border-bottom:2px solid #b06ab3;display:inline-block;padding:0 40px 6px}}\
.course{{font-size:24px;font-style:italic;margin:10px 0 30px}}\
.meta{{margin:6px 0;color:#444}}\
.validation{{margin-top:30px;font-size:12px;color:#777}}\
</style></head><body><div class=\"certificate\">{logo}\
<h1>Certificate of Completion</h1><p>This is to certify that</p>\
<div class=\"recipient\">{student}</div><p>has successfully completed</p>\
<div class=\"course\">{title}</div>\
<p class=\"meta\"><strong>Issued by:</strong> {issuer}</p>{issue}{expiry}{credential}\
<div class=\"validation\">Verify at <a href=\"{url}\">{url}</a></div></div></body></html>",
        title = escape(&request.certification_title),
        logo = logo,
        student = escape(&request.student_name),
        issuer = escape(&request.issuer),
        issue = optional("Issue Date", request.issue_date.as_ref()),
        expiry = optional("Expiry Date", request.expiry_date.as_ref()),
        credential = optional("Credential ID", request.credential_id.as_ref()),
        url = validation_url,
    )
}

/// Output formats served by the download endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Pdf,
    Xlsx,
    Csv,
    Zip,
}

impl DocumentFormat {
    pub fn content_type(&self) -> &'static str {
        match self {
            DocumentFormat::Html => "text/html; charset=utf-8",
            DocumentFormat::Pdf => "application/pdf",
            DocumentFormat::Xlsx => {
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
            }
            DocumentFormat::Csv => "text/csv; charset=utf-8",
            DocumentFormat::Zip => "application/zip",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            DocumentFormat::Html => "html",
            DocumentFormat::Pdf => "pdf",
            DocumentFormat::Xlsx => "xlsx",
            DocumentFormat::Csv => "csv",
            DocumentFormat::Zip => "zip",
        }
    }

    /// `Content-Disposition` value for a download named `{stem}.{ext}`.
    pub fn attachment(&self, stem: &str) -> String {
        format!("attachment; filename=\"{}.{}\"", stem, self.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attachment_header_uses_extension() {
        assert_eq!(
            DocumentFormat::Pdf.attachment("semester_report_21A91A0501"),
            "attachment; filename=\"semester_report_21A91A0501.pdf\""
        );
        assert_eq!(DocumentFormat::Csv.content_type(), "text/csv; charset=utf-8");
    }
}

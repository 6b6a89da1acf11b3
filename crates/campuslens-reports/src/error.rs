#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("PDF rendering failed: {0}")]
    Pdf(String),

    #[error("Excel rendering failed: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    #[error("CSV writing failed: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Zip archive failed: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Nothing to render")]
    Empty,

    #[error("At most {max} columns can be exported, got {count}")]
    TooManyColumns { count: usize, max: usize },
}

impl From<printpdf::Error> for ReportError {
    fn from(e: printpdf::Error) -> Self {
        ReportError::Pdf(format!("{e:?}"))
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;

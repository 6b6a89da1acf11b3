use std::io::{Cursor, Write};

use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ReportError, Result};

/// Bundles `(file name, contents)` pairs into an in-memory zip.
pub fn zip_files(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    if files.is_empty() {
        return Err(ReportError::Empty);
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, contents) in files {
        zip.start_file(name.as_str(), options)?;
        zip.write_all(contents)?;
    }

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn archives_every_file() {
        let files = vec![
            ("A1.pdf".to_string(), b"%PDF-first".to_vec()),
            ("B2.pdf".to_string(), b"%PDF-second".to_vec()),
        ];
        let bytes = zip_files(&files).unwrap();

        let mut archive = ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("B2.pdf")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "%PDF-second");
    }

    #[test]
    fn empty_archive_is_an_error() {
        assert!(matches!(zip_files(&[]), Err(ReportError::Empty)));
    }
}

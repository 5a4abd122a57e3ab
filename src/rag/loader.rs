use std::fs;
use std::path::Path;

use super::RagError;

/// Read a source document as plain text. PDFs go through text
/// extraction; Markdown and plain text are read as-is.
pub fn load_document(path: &Path) -> Result<String, RagError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => pdf_extract::extract_text(path).map_err(|e| RagError::DocumentRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        "md" | "txt" => fs::read_to_string(path).map_err(|e| RagError::DocumentRead {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }),
        _ => Err(RagError::UnsupportedDocument(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn markdown_is_read_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.md");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "# Title\n\nBody text.").unwrap();

        let text = load_document(&path).unwrap();
        assert!(text.contains("# Title"));
        assert!(text.contains("Body text."));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_document(Path::new("slides.pptx")).unwrap_err();
        assert!(matches!(err, RagError::UnsupportedDocument(_)));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_document(Path::new("/nonexistent/doc.txt")).unwrap_err();
        assert!(matches!(err, RagError::DocumentRead { .. }));
    }
}

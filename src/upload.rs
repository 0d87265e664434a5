//! Local file uploads for audio, file and image codes.

use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::UploadError;
use crate::kind::ContentKind;
use crate::objecturl::ObjectUrlStore;

/// Document extensions accepted for `file` codes.
const DOCUMENT_EXTENSIONS: [&str; 5] = ["pdf", "doc", "docx", "xls", "xlsx"];

/// Audio MIME types accepted for `audio` codes.
const AUDIO_MIME_TYPES: [&str; 2] = ["audio/mp3", "audio/mpeg"];

/// Whether a file with `path` and guessed `mime` passes the accept filter of `kind`.
pub fn accepts(kind: ContentKind, path: &Path, mime: &mime_guess::Mime) -> bool {
    match kind {
        ContentKind::Audio => AUDIO_MIME_TYPES.contains(&mime.essence_str()),
        ContentKind::Image => mime.type_() == mime_guess::mime::IMAGE,
        ContentKind::File => path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| DOCUMENT_EXTENSIONS.iter().any(|d| d.eq_ignore_ascii_case(ext))),
        _ => false,
    }
}

/// Reads `path` into `store` and returns the object URL to use as the
/// record's file reference.
pub fn upload_file(store: &ObjectUrlStore, kind: ContentKind, path: impl AsRef<Path>) -> Result<String, UploadError> {
    let path = path.as_ref();
    if !kind.is_file_reference() {
        return Err(UploadError::NotAccepted { kind });
    }

    let mime = mime_guess::from_path(path).first_or_octet_stream();
    if !accepts(kind, path, &mime) {
        return Err(UploadError::Rejected {
            path: path.to_path_buf(),
            mime: mime.to_string(),
            kind,
        });
    }

    let bytes = fs::read(path).map_err(|source| UploadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let url = store.create(bytes, mime.essence_str());
    debug!(path = %path.display(), %url, %mime, "uploaded file");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents).unwrap();
        path
    }

    #[test]
    fn test_upload_registers_object_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "report.pdf", b"%PDF-1.4");
        let store = ObjectUrlStore::new();

        let url = upload_file(&store, ContentKind::File, &path).unwrap();
        let blob = store.resolve(&url).unwrap();
        assert_eq!(blob.bytes, b"%PDF-1.4");
        assert_eq!(blob.mime, "application/pdf");
    }

    #[test]
    fn test_accept_filters() {
        let mp3 = mime_guess::from_ext("mp3").first_or_octet_stream();
        let png = mime_guess::from_ext("png").first_or_octet_stream();
        assert!(accepts(ContentKind::Audio, Path::new("a.mp3"), &mp3));
        assert!(!accepts(ContentKind::Audio, Path::new("a.png"), &png));
        assert!(accepts(ContentKind::Image, Path::new("a.png"), &png));
        assert!(!accepts(ContentKind::Image, Path::new("a.mp3"), &mp3));
        assert!(accepts(ContentKind::File, Path::new("Budget.XLSX"), &png));
        assert!(!accepts(ContentKind::File, Path::new("a.png"), &png));
    }

    #[test]
    fn test_rejections() {
        let dir = tempfile::tempdir().unwrap();
        let path = temp_file(&dir, "notes.txt", b"hello");
        let store = ObjectUrlStore::new();

        assert!(matches!(
            upload_file(&store, ContentKind::Image, &path),
            Err(UploadError::Rejected { .. })
        ));
        assert!(matches!(
            upload_file(&store, ContentKind::Url, &path),
            Err(UploadError::NotAccepted { .. })
        ));
        assert!(matches!(
            upload_file(&store, ContentKind::File, dir.path().join("missing.pdf")),
            Err(UploadError::Read { .. })
        ));
        assert!(store.is_empty());
    }
}

use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::{ApiError, Result};
use crate::youtube::YoutubeAPI;

/// A video or channel whose metadata has been fetched.
///
/// Metadata is fetched once by `fetch` and never refreshed. Everything else
/// (comments, playlists) is fetched anew each time a document is built.
pub trait Resource<'a>: Sized {
    type Metadata;
    type Document: Serialize;

    /// Filename used by `save` when none is given
    const DEFAULT_FILENAME: &'static str;

    /// Look up `id`, failing if it does not exist
    fn fetch(api: &'a YoutubeAPI, id: &str) -> Result<Self>;

    fn id(&self) -> &str;

    fn metadata(&self) -> &Self::Metadata;

    /// Fetch the child collections and combine them with the metadata
    fn document(&self) -> Result<Self::Document>;

    /// Build the document and write it as JSON, replacing any existing file.
    /// Returns the path written to.
    fn save(&self, filename: Option<&Path>) -> Result<PathBuf> {
        let path = filename
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_FILENAME));
        let doc = self.document()?;
        write_json(&path, &doc)?;
        info!("Saved {} to {}", self.id(), path.display());
        Ok(path)
    }
}

/// Serialise `doc` as 4-space indented JSON, leaving non-ASCII text unescaped
pub fn to_json_string<T: Serialize>(doc: &T) -> serde_json::Result<String> {
    let mut buf = Vec::new();
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, fmt);
    doc.serialize(&mut ser)?;
    // serde_json only emits valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Write `doc` to `path`. Nothing is written if serialisation fails.
pub fn write_json<T: Serialize>(path: &Path, doc: &T) -> Result<()> {
    let wrap = |source: std::io::Error| ApiError::Write {
        path: path.to_path_buf(),
        source,
    };

    let text = to_json_string(doc).map_err(|source| ApiError::Encode { source })?;
    std::fs::write(path, text).map_err(wrap)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    #[derive(Serialize)]
    struct Doc {
        title: String,
        tags: Vec<String>,
        count: u64,
    }

    fn doc() -> Doc {
        Doc {
            title: "Café ☕ 日本語".into(),
            tags: vec!["a".into()],
            count: 3,
        }
    }

    #[test]
    fn test_indent_and_unicode() -> serde_json::Result<()> {
        let text = to_json_string(&doc())?;
        assert_eq!(
            text,
            "{\n    \"title\": \"Café ☕ 日本語\",\n    \"tags\": [\n        \"a\"\n    ],\n    \"count\": 3\n}"
        );
        Ok(())
    }

    #[test]
    fn test_write_overwrites() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "a much longer previous file that must not survive at all").unwrap();

        write_json(&path, &doc())?;
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, to_json_string(&doc()).unwrap());
        Ok(())
    }

    #[test]
    fn test_unencodable_doc() {
        // JSON object keys must be strings
        let mut doc = std::collections::BTreeMap::new();
        doc.insert(vec![1u8], 1u8);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let err = write_json(&path, &doc).unwrap_err();
        assert!(matches!(err, ApiError::Encode { .. }), "{:?}", err);
        assert_eq!(err.kind(), ErrorKind::Output);
        assert!(!path.exists());
    }

    #[test]
    fn test_write_to_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("out.json");
        let err = write_json(&path, &doc()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Output);
    }
}

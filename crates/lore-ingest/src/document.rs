//! Document discovery and loading
//!
//! Recursively scans the configured source directory for supported file
//! types. PDF is recognized but not extracted: loading one yields an
//! explicit placeholder string so the document is visible in the index
//! rather than silently dropped.

use lore_core::{LoreError, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Supported document types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Markdown,
    PlainText,
    Json,
    Python,
    Pdf,
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "md" | "markdown" => Self::Markdown,
            "txt" => Self::PlainText,
            "json" => Self::Json,
            "py" => Self::Python,
            "pdf" => Self::Pdf,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from path
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Self::Unknown)
    }

    /// Whether ingestion picks this type up at all
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Whether the file content is read as text
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::Markdown | Self::PlainText | Self::Json | Self::Python
        )
    }
}

impl std::fmt::Display for FileType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Markdown => write!(f, "markdown"),
            Self::PlainText => write!(f, "text"),
            Self::Json => write!(f, "json"),
            Self::Python => write!(f, "python"),
            Self::Pdf => write!(f, "pdf"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Recursively discover supported documents under `root`.
///
/// Hidden files and directories are skipped. The result is sorted so
/// ingestion runs are deterministic.
pub fn discover_documents(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e.path()))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| FileType::from_path(p).is_supported())
        .collect();

    paths.sort();
    paths
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.') && n.len() > 1)
        .unwrap_or(false)
}

/// Load a document's text content.
///
/// Text-like files are read whole. PDFs return a placeholder: text
/// extraction is an unimplemented limitation, not an error.
pub fn load_document(path: &Path) -> Result<String> {
    match FileType::from_path(path) {
        FileType::Pdf => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(format!(
                "[PDF document: {name}. Text extraction is not supported; \
                 convert the file to Markdown or plain text to make its \
                 content searchable.]"
            ))
        }
        _ => std::fs::read_to_string(path).map_err(|e| LoreError::DocumentRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

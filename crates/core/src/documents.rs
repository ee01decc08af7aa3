use crate::{DocumentError, DocumentInput};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const TEXT_EXTENSIONS: [&str; 3] = ["txt", "md", "markdown"];

pub fn discover_text_files(folder: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();

    for entry in WalkDir::new(folder)
        .into_iter()
        .filter_map(|item| item.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let is_text = entry
            .path()
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                TEXT_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });

        if is_text {
            files.push(entry.path().to_path_buf());
        }
    }

    files.sort_unstable();
    files
}

/// Reads one file as a document titled after its file stem. The `doc_id` is
/// derived from the canonical path so re-ingesting the same file correlates.
pub fn load_document(path: &Path) -> Result<DocumentInput, DocumentError> {
    let title = path
        .file_stem()
        .and_then(|name| name.to_str())
        .ok_or_else(|| DocumentError::MissingFileName(path.display().to_string()))?;

    let text = fs::read_to_string(path)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(DocumentError::EmptyDocument(path.display().to_string()));
    }

    Ok(DocumentInput::new(title, text).with_doc_id(generate_document_id(path)))
}

pub struct SkippedDocument {
    pub path: PathBuf,
    pub reason: String,
}

pub struct DocumentBatch {
    pub documents: Vec<DocumentInput>,
    pub skipped_files: Vec<SkippedDocument>,
}

pub fn load_folder_documents(folder: &Path) -> Result<DocumentBatch, DocumentError> {
    let files = discover_text_files(folder);

    if files.is_empty() {
        return Err(DocumentError::InvalidArgument(format!(
            "no text or markdown files found in {}",
            folder.display()
        )));
    }

    let mut documents = Vec::new();
    let mut skipped_files = Vec::new();

    for path in files {
        match load_document(&path) {
            Ok(document) => documents.push(document),
            Err(error) => skipped_files.push(SkippedDocument {
                path,
                reason: error.to_string(),
            }),
        }
    }

    Ok(DocumentBatch {
        documents,
        skipped_files,
    })
}

/// Hashes the canonical path, so `docs/a.md` and `./docs/a.md` share an id.
/// Paths that cannot be canonicalized are hashed as given.
pub fn generate_document_id(path: &Path) -> String {
    let path = fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    let mut hasher = Sha256::new();
    hasher.update(path.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    format!("doc-{}", &digest[..16])
}

//! Research paper loading: discover, parse and chunk every PDF in a folder.

use crate::chunker::{ChunkConfig, Chunker};
use crate::error::{IngestError, IngestResult};
use crate::parsers::{DocumentParser, PdfParser};
use ricewise_config::DocumentsConfig;
use ricewise_core::DocumentChunk;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Find every PDF under `folder`, recursively, in a stable order.
///
/// Hidden files are skipped. Fails when the folder is missing or holds no PDF.
pub fn discover_pdfs(folder: &Path) -> IngestResult<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(IngestError::FolderNotFound(folder.to_path_buf()));
    }

    let parser = PdfParser::new();
    let mut files = Vec::new();

    for entry in WalkDir::new(folder).follow_links(true) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name.starts_with('.') {
            continue;
        }
        let supported = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| parser.supports(e))
            .unwrap_or(false);
        if supported {
            files.push(entry.into_path());
        }
    }

    if files.is_empty() {
        return Err(IngestError::NoDocuments(folder.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

/// Turns a folder of PDFs into index-ready chunks.
pub struct DocumentLoader {
    parser: Box<dyn DocumentParser>,
    chunker: Chunker,
}

impl DocumentLoader {
    /// Create a loader with the given chunker.
    pub fn new(chunker: Chunker) -> Self {
        Self {
            parser: Box::new(PdfParser::new()),
            chunker,
        }
    }

    /// Create a loader from document settings.
    pub fn from_config(config: &DocumentsConfig) -> Self {
        Self::new(Chunker::new(ChunkConfig::from_documents_config(config)))
    }

    /// Load and chunk every PDF under `folder`.
    ///
    /// Files that cannot be parsed or contain no text are skipped with a
    /// warning; the call fails only if nothing usable remains.
    pub fn load_folder(&self, folder: &Path) -> IngestResult<Vec<DocumentChunk>> {
        let files = discover_pdfs(folder)?;
        info!(
            "Found {} PDF files: {:?}",
            files.len(),
            files
                .iter()
                .filter_map(|p| p.file_name())
                .collect::<Vec<_>>()
        );

        let mut chunks = Vec::new();
        for path in &files {
            match self.load_file(path) {
                Ok(file_chunks) if file_chunks.is_empty() => {
                    warn!("No extractable text in {}, skipping", path.display());
                }
                Ok(file_chunks) => {
                    debug!("{} produced {} chunks", path.display(), file_chunks.len());
                    chunks.extend(file_chunks);
                }
                Err(e) => warn!("Skipping {}: {}", path.display(), e),
            }
        }

        if chunks.is_empty() {
            return Err(IngestError::NoText(folder.to_path_buf()));
        }

        info!("Split {} documents into {} chunks", files.len(), chunks.len());
        Ok(chunks)
    }

    /// Load and chunk a single PDF.
    pub fn load_file(&self, path: &Path) -> IngestResult<Vec<DocumentChunk>> {
        let doc = self.parser.parse(path)?;
        if !doc.has_text() {
            return Ok(vec![]);
        }

        let source = path.to_string_lossy();
        let chunks = doc
            .pages
            .iter()
            .enumerate()
            .flat_map(|(page, text)| self.chunker.chunk_page(&source, page as u32, text))
            .collect();
        Ok(chunks)
    }
}

//! Reference corpus: an ordered, id-unique set of documents, and a loader
//! that builds one from a directory of `.txt` files.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::input::decode_text;
use crate::types::{Document, DocumentId};

/// Documents keep insertion order; that order is the order of the report.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    documents: Vec<Document>,
    ids: HashSet<DocumentId>,
}

impl Corpus {
    pub fn new() -> Self { Self::default() }

    pub fn insert(&mut self, document: Document) -> Result<()> {
        if !self.ids.insert(document.id.clone()) {
            return Err(Error::DuplicateDocument(document.id));
        }
        self.documents.push(document);
        Ok(())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut corpus = Self::new();
        for (id, text) in pairs { corpus.insert(Document::new(id, text))?; }
        Ok(corpus)
    }

    pub fn len(&self) -> usize { self.documents.len() }

    pub fn is_empty(&self) -> bool { self.documents.is_empty() }

    pub fn documents(&self) -> &[Document] { &self.documents }

    pub fn iter(&self) -> std::slice::Iter<'_, Document> { self.documents.iter() }

    pub fn get(&self, id: &str) -> Option<&Document> { self.documents.iter().find(|d| d.id == id) }

    /// Drop references that are blank or identical to the candidate (after
    /// trimming). Returns the removed ids in corpus order.
    pub fn retain_distinct_from(&mut self, candidate: &str) -> Vec<DocumentId> {
        let candidate = candidate.trim();
        let mut removed = Vec::new();
        self.documents.retain(|d| {
            let text = d.text.trim();
            let keep = !text.is_empty() && text != candidate;
            if !keep { removed.push(d.id.clone()); }
            keep
        });
        for id in &removed { self.ids.remove(id); }
        removed
    }
}

impl From<BTreeMap<String, String>> for Corpus {
    fn from(map: BTreeMap<String, String>) -> Self {
        let ids = map.keys().cloned().collect();
        let documents = map.into_iter().map(|(id, text)| Document { id, text }).collect();
        Self { documents, ids }
    }
}

impl From<HashMap<String, String>> for Corpus {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect::<BTreeMap<_, _>>().into()
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Document;
    type IntoIter = std::slice::Iter<'a, Document>;
    fn into_iter(self) -> Self::IntoIter { self.documents.iter() }
}

/// Result of loading a directory: the corpus plus ids of files that were
/// loaded as empty documents because they looked binary.
#[derive(Debug, Default)]
pub struct LoadedCorpus {
    pub corpus: Corpus,
    pub malformed: Vec<DocumentId>,
}

const TEXT_EXTENSION: &str = "txt";

#[derive(Debug, Clone, Default)]
pub struct CorpusLoader;

impl CorpusLoader {
    pub fn new() -> Self { Self }

    pub fn load_directory(&self, data_dir: &Path) -> Result<LoadedCorpus> {
        self.load_files(data_dir, self.list_files(data_dir)?)
    }

    pub fn load_directory_limited(&self, data_dir: &Path, limit: usize) -> Result<LoadedCorpus> {
        let mut files = self.list_files(data_dir)?;
        if files.len() > limit {
            files.truncate(limit);
            info!(limit, "limited corpus to first files");
        }
        self.load_files(data_dir, files)
    }

    fn load_files(&self, data_dir: &Path, files: Vec<PathBuf>) -> Result<LoadedCorpus> {
        if files.is_empty() {
            info!(dir = %data_dir.display(), "no reference files found");
            return Ok(LoadedCorpus::default());
        }
        let mut loaded = LoadedCorpus::default();
        for file_path in &files {
            let doc_id = document_id(file_path, data_dir);
            let text = match decode_text(fs::read(file_path)?) {
                Ok(text) => text,
                Err(e) => {
                    warn!(source = %doc_id, error = %e, "scoring reference as empty");
                    loaded.malformed.push(doc_id.clone());
                    String::new()
                }
            };
            loaded.corpus.insert(Document::new(doc_id, text))?;
        }
        info!(documents = loaded.corpus.len(), dir = %data_dir.display(), "loaded reference corpus");
        Ok(loaded)
    }

    fn list_files(&self, root: &Path) -> Result<Vec<PathBuf>> {
        if !root.is_dir() {
            return Err(Error::NotFound(format!("corpus directory {}", root.display())));
        }
        let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some(TEXT_EXTENSION))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();
        Ok(files)
    }
}

/// Path relative to the corpus root, `/`-separated, so ids are stable across
/// platforms and unique across subdirectories.
fn document_id(file_path: &Path, data_dir: &Path) -> DocumentId {
    let relative = file_path.strip_prefix(data_dir).unwrap_or(file_path);
    relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

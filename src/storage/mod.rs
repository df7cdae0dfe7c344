//!
//! designboard storage module
//! ---------------------------
//! In-memory store for the file tree. Records are kept flat, keyed by id, each
//! with an optional parent link; the nested view is derived on demand by
//! `tree::assemble_tree`.
//!
//! Key responsibilities:
//! - Id allocation and parent validation on create.
//! - Name/content updates that never touch `kind` or `parent_id`.
//! - Cascading delete of folder descendants, children before parents.
//! - Protection of the reserved root record.
//!
//! The public API centers around the `FileStore` type, which is usually wrapped in a
//! thread-safe `SharedFileStore` (`Arc<RwLock<FileStore>>`) by the server.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

pub mod seed;
pub mod tree;
pub mod types;

pub use tree::assemble_tree;
pub use types::{FileKind, FilePatch, FileRecord, NewFile, TreeNode, MAX_DEPTH, ROOT_ID};

/// Flat collection of file records.
///
/// `order` holds ids in insertion order so that listings (and therefore child
/// ordering in the assembled tree) are stable across calls.
#[derive(Debug, Clone)]
pub struct FileStore {
    records: HashMap<String, FileRecord>,
    order: Vec<String>,
}

impl Default for FileStore {
    fn default() -> Self { Self::new() }
}

impl FileStore {
    /// Create a store holding only the root record.
    pub fn new() -> Self {
        let mut s = Self { records: HashMap::new(), order: Vec::new() };
        s.insert(FileRecord {
            id: ROOT_ID.to_string(),
            name: ROOT_ID.to_string(),
            kind: FileKind::Folder,
            parent_id: None,
            content: None,
        });
        s
    }

    /// Create a store populated with the default sample project.
    pub fn with_seed() -> Self {
        let mut s = Self::new();
        for rec in seed::default_records() {
            s.insert(rec);
        }
        s
    }

    fn insert(&mut self, rec: FileRecord) {
        if self.records.insert(rec.id.clone(), rec.clone()).is_none() {
            self.order.push(rec.id);
        }
    }

    pub fn len(&self) -> usize { self.records.len() }

    pub fn is_empty(&self) -> bool { self.records.is_empty() }

    /// Every record including the root, in insertion order.
    pub fn list_all(&self) -> Vec<FileRecord> {
        self.order.iter().filter_map(|id| self.records.get(id)).cloned().collect()
    }

    pub fn get(&self, id: &str) -> StoreResult<FileRecord> {
        self.records.get(id).cloned().ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    pub fn create(&mut self, new: NewFile) -> StoreResult<FileRecord> {
        if new.name.is_empty() {
            return Err(StoreError::Validation("name must not be empty".into()));
        }
        // An empty parent id means top level, same as null.
        let parent_id = new.parent_id.filter(|p| !p.is_empty());
        if let Some(pid) = parent_id.as_deref() {
            if pid != ROOT_ID {
                let parent = self.records.get(pid)
                    .ok_or_else(|| StoreError::InvalidParent(format!("Parent folder not found: {}", pid)))?;
                if !parent.kind.is_folder() {
                    return Err(StoreError::InvalidParent(format!("Parent must be a folder: {}", pid)));
                }
                if self.depth_of(pid) >= MAX_DEPTH {
                    return Err(StoreError::Validation(format!("nesting deeper than {} levels is not allowed", MAX_DEPTH)));
                }
            }
        }

        let content = match new.kind {
            FileKind::File => new.content,
            FileKind::Folder => None,
        };
        let rec = FileRecord {
            id: Uuid::new_v4().to_string(),
            name: new.name,
            kind: new.kind,
            parent_id,
            content,
        };
        self.insert(rec.clone());
        info!(target: "designboard::storage", "create: id='{}' name='{}' kind={} parent={:?}", rec.id, rec.name, rec.kind.as_str(), rec.parent_id);
        Ok(rec)
    }

    pub fn update(&mut self, id: &str, patch: FilePatch) -> StoreResult<FileRecord> {
        if let Some(name) = patch.name.as_deref() {
            if name.is_empty() {
                return Err(StoreError::Validation("name must not be empty".into()));
            }
        }
        let rec = self.records.get_mut(id).ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        if patch.is_empty() {
            return Ok(rec.clone());
        }
        if let Some(name) = patch.name {
            rec.name = name;
        }
        if let Some(content) = patch.content {
            // Folders never carry content.
            if !rec.kind.is_folder() {
                rec.content = Some(content);
            }
        }
        info!(target: "designboard::storage", "update: id='{}' name='{}'", rec.id, rec.name);
        Ok(rec.clone())
    }

    /// Delete a record; folders take all of their descendants with them.
    /// Returns `Ok(false)` when `id` is not present.
    pub fn delete(&mut self, id: &str) -> StoreResult<bool> {
        if id == ROOT_ID {
            return Err(StoreError::ProtectedRecord(id.to_string()));
        }
        let Some(target) = self.records.get(id) else { return Ok(false); };

        let doomed = if target.kind.is_folder() { self.descendants_post_order(id) } else { Vec::new() };
        debug!(target: "designboard::storage", "delete: id='{}' cascading to {} descendant(s)", id, doomed.len());
        for d in doomed.iter() {
            self.records.remove(d);
        }
        self.records.remove(id);
        self.order.retain(|k| self.records.contains_key(k));
        info!(target: "designboard::storage", "delete: id='{}' removed={}", id, doomed.len() + 1);
        Ok(true)
    }

    /// Ids of every descendant of `id`, each listed before its own parent.
    fn descendants_post_order(&self, id: &str) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        // (folder id, children already expanded)
        let mut stack: Vec<(String, bool)> = self.children_of(id).into_iter().map(|c| (c, false)).collect();
        while let Some((cur, expanded)) = stack.pop() {
            if expanded {
                out.push(cur);
                continue;
            }
            let kids = self.children_of(&cur);
            stack.push((cur, true));
            stack.extend(kids.into_iter().map(|c| (c, false)));
        }
        out
    }

    /// Depth of an existing record: 1 for top level. Stops counting past `MAX_DEPTH`.
    fn depth_of(&self, id: &str) -> usize {
        let mut depth = 0;
        let mut cur = Some(id);
        while let Some(c) = cur {
            if c == ROOT_ID || depth > MAX_DEPTH {
                break;
            }
            depth += 1;
            cur = self.records.get(c).and_then(|r| r.parent_id.as_deref());
        }
        depth
    }

    fn children_of(&self, id: &str) -> Vec<String> {
        self.order.iter()
            .filter(|k| self.records.get(*k).and_then(|r| r.parent_id.as_deref()) == Some(id))
            .cloned()
            .collect()
    }
}

/// Thread-safe handle shared between request handlers.
/// Mutations hold the write lock for their whole duration.
#[derive(Clone, Default)]
pub struct SharedFileStore(pub Arc<RwLock<FileStore>>);

impl SharedFileStore {
    pub fn new(store: FileStore) -> Self { Self(Arc::new(RwLock::new(store))) }

    pub fn list_all(&self) -> Vec<FileRecord> { self.0.read().list_all() }

    pub fn tree(&self) -> Vec<TreeNode> {
        let flat = self.list_all();
        assemble_tree(&flat)
    }

    pub fn get(&self, id: &str) -> StoreResult<FileRecord> { self.0.read().get(id) }

    pub fn create(&self, new: NewFile) -> StoreResult<FileRecord> { self.0.write().create(new) }

    pub fn update(&self, id: &str, patch: FilePatch) -> StoreResult<FileRecord> { self.0.write().update(id, patch) }

    pub fn delete(&self, id: &str) -> StoreResult<bool> { self.0.write().delete(id) }

    pub fn len(&self) -> usize { self.0.read().len() }

    pub fn is_empty(&self) -> bool { self.0.read().is_empty() }
}

//! Inventory store: single source of truth for the tool document
//!
//! The store owns one on-disk JSON document. It is loaded lazily on first
//! use (concurrent first callers all await the same load), cached in memory,
//! and rewritten in full after every mutation before the call returns.

pub mod lifecycle;
pub mod search;

use crate::error::{Result, ToolsmithError};
use crate::types::{InventoryDocument, MemoryLevel, ToolId, ToolMetadata, ToolRecord};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::{OnceCell, RwLock};
use tracing::{debug, info};

/// Input for crafting a new tool record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTool {
    /// Human-supplied label (required, must not be blank)
    pub name: String,

    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque payload, stored verbatim and never executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Optional structured metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ToolMetadata>,
}

/// Persistent inventory of tool records backed by one JSON file
///
/// An explicitly constructed, explicitly owned object: multiple stores can
/// coexist in one process as long as they point at different paths. Nothing
/// guards against two processes sharing one path; single writer per file is
/// assumed.
pub struct InventoryStore {
    path: PathBuf,
    doc: OnceCell<RwLock<InventoryDocument>>,
}

impl InventoryStore {
    /// Create a store for the document at `path`
    ///
    /// No I/O happens here; the file is read (or created) on first use.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            doc: OnceCell::new(),
        }
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the document exactly once, fanning concurrent callers into the
    /// same in-flight load. A failed load leaves the cell empty so the next
    /// call retries.
    pub(crate) async fn ensure_loaded(&self) -> Result<&RwLock<InventoryDocument>> {
        self.doc
            .get_or_try_init(|| async {
                let doc = self.load_or_create().await?;
                Ok(RwLock::new(doc))
            })
            .await
    }

    async fn load_or_create(&self) -> Result<InventoryDocument> {
        match fs::read_to_string(&self.path).await {
            Ok(raw) => {
                let doc: InventoryDocument = serde_json::from_str(&raw).map_err(|e| {
                    ToolsmithError::MalformedDocument(format!("{}: {}", self.path.display(), e))
                })?;
                debug!(
                    "Loaded inventory with {} tools from {}",
                    doc.tools.len(),
                    self.path.display()
                );
                Ok(doc)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                // First open: synthesize an empty document and persist it so
                // subsequent opens see a consistent file.
                let doc = InventoryDocument::empty();
                self.write_document(&doc).await?;
                info!("Created new inventory at {}", self.path.display());
                Ok(doc)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Advance the document clock and overwrite the backing file
    pub(crate) async fn persist(&self, doc: &mut InventoryDocument) -> Result<()> {
        doc.updated_at = Utc::now();
        self.write_document(doc).await
    }

    async fn write_document(&self, doc: &InventoryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }
        let json = serde_json::to_string_pretty(doc)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    /// All records in insertion order
    pub async fn list(&self) -> Result<Vec<ToolRecord>> {
        let lock = self.ensure_loaded().await?;
        let doc = lock.read().await;
        Ok(doc.tools.clone())
    }

    /// Number of records currently held
    pub async fn count(&self) -> Result<usize> {
        let lock = self.ensure_loaded().await?;
        let doc = lock.read().await;
        Ok(doc.tools.len())
    }

    /// The record with the given id, or `ToolNotFound`
    pub async fn get(&self, id: &str) -> Result<ToolRecord> {
        let lock = self.ensure_loaded().await?;
        let doc = lock.read().await;
        doc.tools
            .iter()
            .find(|t| t.id.to_string() == id)
            .cloned()
            .ok_or_else(|| ToolsmithError::ToolNotFound(id.to_string()))
    }

    /// Craft a new record and persist it
    ///
    /// Stamps both timestamps to now, starts at `usage_count = 0` and
    /// `short_term`, and appends to the tool sequence.
    pub async fn create(&self, new: NewTool) -> Result<ToolRecord> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ToolsmithError::Validation(
                "tool name must not be empty".to_string(),
            ));
        }

        let lock = self.ensure_loaded().await?;
        let mut doc = lock.write().await;

        let now = Utc::now();
        let record = ToolRecord {
            id: ToolId::new(),
            name: name.to_string(),
            description: new.description,
            code: new.code,
            created_at: now,
            updated_at: now,
            last_used_at: None,
            usage_count: 0,
            memory_level: MemoryLevel::ShortTerm,
            metadata: new.metadata,
        };
        doc.tools.push(record.clone());
        self.persist(&mut doc).await?;

        info!("Crafted tool '{}' ({})", record.name, record.id);
        Ok(record)
    }

    /// Remove the record with the given id
    ///
    /// Returns whether a removal occurred; a missing id is an idempotent
    /// no-op, not an error. Persists only when something was removed.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        let lock = self.ensure_loaded().await?;
        let mut doc = lock.write().await;

        let before = doc.tools.len();
        doc.tools.retain(|t| t.id.to_string() != id);
        if doc.tools.len() == before {
            return Ok(false);
        }
        self.persist(&mut doc).await?;

        info!("Deleted tool {}", id);
        Ok(true)
    }
}

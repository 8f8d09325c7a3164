//! Core data types for the Toolsmith inventory
//!
//! This module defines the persisted shapes: tool records, their metadata,
//! the retention levels, and the inventory document that aggregates them.
//! All of them serialize with camelCase field names, matching the on-disk
//! document format.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for tool records
///
/// Wraps a UUID to provide type safety and prevent mixing tool IDs with
/// other identifiers. Generated randomly at creation and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ToolId(pub Uuid);

impl ToolId {
    /// Create a new random tool ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a tool ID from a string
    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ToolId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ToolId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Retention tier of a tool record
///
/// Advanced one step at a time by the usage-driven promotion rule, never
/// demoted by it. `Archived` is part of the state space but no promotion
/// produces it; only an explicit level override can put a record there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemoryLevel {
    /// Fresh records start here
    ShortTerm,

    /// Reached at 5 recorded usages
    MediumTerm,

    /// Reached at 25 recorded usages
    LongTerm,

    /// Reserved tier, set only by explicit override
    Archived,
}

impl MemoryLevel {
    /// Ranking bonus this tier contributes to search scores
    pub fn rank_bonus(&self) -> f64 {
        match self {
            MemoryLevel::MediumTerm => 0.3,
            MemoryLevel::LongTerm => 0.6,
            _ => 0.0,
        }
    }
}

impl std::fmt::Display for MemoryLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            MemoryLevel::ShortTerm => "short_term",
            MemoryLevel::MediumTerm => "medium_term",
            MemoryLevel::LongTerm => "long_term",
            MemoryLevel::Archived => "archived",
        };
        write!(f, "{}", name)
    }
}

/// Optional structured metadata attached when a tool is crafted
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolMetadata {
    /// Categorization tags, fed into search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,

    /// Problem statement the tool was crafted for, fed into search
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,

    /// Name of the agent that crafted the tool
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_by_agent: Option<String>,
}

/// One crafted tool held in the inventory
///
/// The inventory records metadata and usage statistics only. `code` is an
/// opaque payload stored verbatim; nothing in this system interprets or
/// executes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolRecord {
    // === Identity ===
    /// Unique identifier, immutable, never reused after deletion
    pub id: ToolId,

    /// Human-supplied label, not required to be unique
    pub name: String,

    // === Content ===
    /// Free-text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Opaque payload, never executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    // === Timestamps ===
    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Advances on every mutation to this record
    pub updated_at: DateTime<Utc>,

    /// Set only by usage recording
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_used_at: Option<DateTime<Utc>>,

    // === Lifecycle ===
    /// Recorded usages, monotonically non-decreasing
    pub usage_count: u32,

    /// Current retention tier
    pub memory_level: MemoryLevel,

    /// Optional structured metadata
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ToolMetadata>,
}

/// The persisted aggregate: all tool records plus document bookkeeping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDocument {
    /// Tool records in insertion order, ids unique
    pub tools: Vec<ToolRecord>,

    /// Schema marker, fixed at [`InventoryDocument::VERSION`]
    pub version: u32,

    /// Set once, at document creation
    pub created_at: DateTime<Utc>,

    /// Advances on every persisted write
    pub updated_at: DateTime<Utc>,
}

impl InventoryDocument {
    /// Current document schema version
    pub const VERSION: u32 = 1;

    /// Create an empty document stamped with the current time
    pub fn empty() -> Self {
        let now = Utc::now();
        Self {
            tools: Vec::new(),
            version: Self::VERSION,
            created_at: now,
            updated_at: now,
        }
    }
}

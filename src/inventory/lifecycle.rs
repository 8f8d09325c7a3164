//! Usage tracking and memory-level promotion
//!
//! Layered on the store: each usage event increments the counter, stamps
//! `last_used_at`, and evaluates the promotion rule once against the new
//! count. A record climbs at most one level per event and is never demoted
//! here.

use super::InventoryStore;
use crate::error::{Result, ToolsmithError};
use crate::types::{MemoryLevel, ToolRecord};
use chrono::Utc;
use tracing::{debug, info};

/// Usage count at which a short-term record becomes medium-term
pub const MEDIUM_TERM_THRESHOLD: u32 = 5;

/// Usage count at which a medium-term record becomes long-term
pub const LONG_TERM_THRESHOLD: u32 = 25;

/// Next level per the promotion rule, if the new count crosses a threshold
///
/// Evaluated once per usage event; no cascade. A record parked above a
/// threshold by an explicit override still advances one step at a time.
fn promoted(level: MemoryLevel, usage_count: u32) -> Option<MemoryLevel> {
    match level {
        MemoryLevel::ShortTerm if usage_count >= MEDIUM_TERM_THRESHOLD => {
            Some(MemoryLevel::MediumTerm)
        }
        MemoryLevel::MediumTerm if usage_count >= LONG_TERM_THRESHOLD => {
            Some(MemoryLevel::LongTerm)
        }
        _ => None,
    }
}

impl InventoryStore {
    /// Record one usage of a tool
    ///
    /// Increments `usage_count`, sets `last_used_at`, applies the promotion
    /// rule to the new count, persists, and returns the updated record.
    /// Fails with `ToolNotFound` for an unknown id.
    pub async fn record_usage(&self, id: &str) -> Result<ToolRecord> {
        let lock = self.ensure_loaded().await?;
        let mut doc = lock.write().await;

        let tool = doc
            .tools
            .iter_mut()
            .find(|t| t.id.to_string() == id)
            .ok_or_else(|| ToolsmithError::ToolNotFound(id.to_string()))?;

        let now = Utc::now();
        tool.usage_count += 1;
        tool.last_used_at = Some(now);
        if let Some(next) = promoted(tool.memory_level, tool.usage_count) {
            info!(
                "Tool '{}' promoted to {} after {} usages",
                tool.name, next, tool.usage_count
            );
            tool.memory_level = next;
        }
        tool.updated_at = now;

        let record = tool.clone();
        self.persist(&mut doc).await?;
        Ok(record)
    }

    /// Administrative override of a record's memory level
    ///
    /// Assigns exactly the given level with no forward-only check; this is
    /// the escape hatch that can demote or archive. Fails with
    /// `ToolNotFound` for an unknown id.
    pub async fn set_memory_level(&self, id: &str, level: MemoryLevel) -> Result<ToolRecord> {
        let lock = self.ensure_loaded().await?;
        let mut doc = lock.write().await;

        let tool = doc
            .tools
            .iter_mut()
            .find(|t| t.id.to_string() == id)
            .ok_or_else(|| ToolsmithError::ToolNotFound(id.to_string()))?;

        debug!("Setting tool '{}' memory level to {}", tool.name, level);
        tool.memory_level = level;
        tool.updated_at = Utc::now();

        let record = tool.clone();
        self.persist(&mut doc).await?;
        Ok(record)
    }
}

//! Substring ranking over the inventory
//!
//! Scoring is intentionally simple: each record's name, description, tags,
//! and problem statement are flattened into one lowercase haystack, the
//! whole query as a phrase is worth 2 points, each whitespace-separated
//! token is worth 1, and records that earned any text score get a small
//! bonus for being medium- or long-term. Records that match nothing are
//! excluded no matter their level.

use super::InventoryStore;
use crate::error::Result;
use crate::types::ToolRecord;

/// Results returned when the caller does not pass a limit
pub const DEFAULT_SEARCH_LIMIT: usize = 10;

const PHRASE_WEIGHT: f64 = 2.0;
const TOKEN_WEIGHT: f64 = 1.0;

fn haystack(tool: &ToolRecord) -> String {
    let mut parts: Vec<&str> = vec![
        tool.name.as_str(),
        tool.description.as_deref().unwrap_or(""),
    ];
    if let Some(meta) = &tool.metadata {
        if let Some(tags) = &meta.tags {
            parts.extend(tags.iter().map(String::as_str));
        }
        parts.push(meta.problem.as_deref().unwrap_or(""));
    } else {
        parts.push("");
    }
    parts.join(" ").to_lowercase()
}

fn score(tool: &ToolRecord, query: &str) -> f64 {
    let hay = haystack(tool);
    let mut text_score = 0.0;
    if hay.contains(query) {
        text_score += PHRASE_WEIGHT;
    }
    for token in query.split_whitespace() {
        if hay.contains(token) {
            text_score += TOKEN_WEIGHT;
        }
    }
    if text_score > 0.0 {
        text_score + tool.memory_level.rank_bonus()
    } else {
        0.0
    }
}

/// Rank records against a query, best first, dropping non-matches
pub fn rank(tools: &[ToolRecord], query: &str, limit: usize) -> Vec<ToolRecord> {
    let query = query.to_lowercase();
    let mut scored: Vec<(f64, &ToolRecord)> = tools
        .iter()
        .filter_map(|tool| {
            let s = score(tool, &query);
            (s > 0.0).then_some((s, tool))
        })
        .collect();
    // Stable sort keeps insertion order among equal scores
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(limit);
    scored.into_iter().map(|(_, tool)| tool.clone()).collect()
}

impl InventoryStore {
    /// Search the inventory, returning up to `limit` records (default 10)
    pub async fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<ToolRecord>> {
        let lock = self.ensure_loaded().await?;
        let doc = lock.read().await;
        Ok(rank(
            &doc.tools,
            query,
            limit.unwrap_or(DEFAULT_SEARCH_LIMIT),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{MemoryLevel, ToolMetadata};
    use chrono::Utc;

    fn tool(name: &str, description: Option<&str>, level: MemoryLevel) -> ToolRecord {
        let now = Utc::now();
        ToolRecord {
            id: crate::types::ToolId::new(),
            name: name.to_string(),
            description: description.map(String::from),
            code: None,
            created_at: now,
            updated_at: now,
            last_used_at: None,
            usage_count: 0,
            memory_level: level,
            metadata: None,
        }
    }

    #[test]
    fn test_phrase_and_token_scores_stack() {
        let tools = vec![
            tool(
                "csv-parser",
                Some("Parses CSV files"),
                MemoryLevel::ShortTerm,
            ),
            tool(
                "json-formatter",
                Some("Formats JSON"),
                MemoryLevel::ShortTerm,
            ),
        ];

        let results = rank(&tools, "csv", 10);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "csv-parser");
    }

    #[test]
    fn test_non_matching_record_excluded_despite_level() {
        let tools = vec![tool(
            "csv-parser",
            Some("Parses CSV files"),
            MemoryLevel::LongTerm,
        )];

        assert!(rank(&tools, "spreadsheet", 10).is_empty());
    }

    #[test]
    fn test_level_bonus_breaks_text_ties() {
        let tools = vec![
            tool("csv-reader", None, MemoryLevel::ShortTerm),
            tool("csv-writer", None, MemoryLevel::LongTerm),
            tool("csv-splitter", None, MemoryLevel::MediumTerm),
        ];

        let results = rank(&tools, "csv", 10);
        let names: Vec<&str> = results.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["csv-writer", "csv-splitter", "csv-reader"]);
    }

    #[test]
    fn test_query_is_case_insensitive() {
        let tools = vec![tool("CSV-Parser", None, MemoryLevel::ShortTerm)];
        assert_eq!(rank(&tools, "Csv-PARSER", 10).len(), 1);
    }

    #[test]
    fn test_tags_and_problem_are_searched() {
        let now = Utc::now();
        let tools = vec![ToolRecord {
            id: crate::types::ToolId::new(),
            name: "helper".to_string(),
            description: None,
            code: None,
            created_at: now,
            updated_at: now,
            last_used_at: None,
            usage_count: 0,
            memory_level: MemoryLevel::ShortTerm,
            metadata: Some(ToolMetadata {
                tags: Some(vec!["scraping".to_string()]),
                problem: Some("extract tables from web pages".to_string()),
                created_by_agent: None,
            }),
        }];

        assert_eq!(rank(&tools, "scraping", 10).len(), 1);
        assert_eq!(rank(&tools, "tables", 10).len(), 1);
    }

    #[test]
    fn test_multi_token_query_rewards_each_hit() {
        let tools = vec![
            tool("csv-parser", Some("Parses CSV files"), MemoryLevel::ShortTerm),
            tool("file-watcher", Some("Watches files"), MemoryLevel::ShortTerm),
        ];

        // "csv files" as a phrase matches only the first record, but the
        // "files" token matches both; the phrase hit must rank first.
        let results = rank(&tools, "csv files", 10);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].name, "csv-parser");
    }

    #[test]
    fn test_limit_truncates_results() {
        let tools: Vec<ToolRecord> = (0..8)
            .map(|i| tool(&format!("csv-tool-{i}"), None, MemoryLevel::ShortTerm))
            .collect();

        assert_eq!(rank(&tools, "csv", 3).len(), 3);
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let tools = vec![
            tool("alpha", None, MemoryLevel::ShortTerm),
            tool("beta", None, MemoryLevel::ShortTerm),
        ];

        // The empty phrase is a substring of every haystack
        assert_eq!(rank(&tools, "", 10).len(), 2);
    }
}

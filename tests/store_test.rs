//! Integration tests for the inventory store
//!
//! Covers load/persist semantics, record lifecycle, promotion thresholds,
//! and ranking search against a real backing file.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tempfile::TempDir;
use toolsmith_core::inventory::search::rank;
use toolsmith_core::{
    InventoryDocument, InventoryStore, MemoryLevel, NewTool, ToolMetadata, ToolsmithError,
};

fn create_test_store() -> (InventoryStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let store = InventoryStore::new(temp_dir.path().join("inventory.json"));
    (store, temp_dir)
}

fn new_tool(name: &str) -> NewTool {
    NewTool {
        name: name.to_string(),
        description: None,
        code: None,
        metadata: None,
    }
}

#[tokio::test]
async fn test_missing_file_created_on_first_use() {
    let (store, _temp) = create_test_store();

    assert!(!store.path().exists());
    assert!(store.list().await.unwrap().is_empty());
    assert!(store.path().exists());

    // The synthesized file is a valid, empty, version-1 document
    let raw = std::fs::read_to_string(store.path()).unwrap();
    let doc: InventoryDocument = serde_json::from_str(&raw).unwrap();
    assert!(doc.tools.is_empty());
    assert_eq!(doc.version, 1);
}

#[tokio::test]
async fn test_reopen_sees_same_empty_document() {
    let (store, temp) = create_test_store();
    store.list().await.unwrap();

    let reopened = InventoryStore::new(temp.path().join("inventory.json"));
    assert_eq!(reopened.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_create_assigns_defaults() {
    let (store, _temp) = create_test_store();

    let tool = store.create(new_tool("csv-parser")).await.unwrap();

    assert_eq!(tool.name, "csv-parser");
    assert_eq!(tool.usage_count, 0);
    assert_eq!(tool.memory_level, MemoryLevel::ShortTerm);
    assert_eq!(tool.created_at, tool.updated_at);
    assert!(tool.last_used_at.is_none());
}

#[tokio::test]
async fn test_create_rejects_blank_names() {
    let (store, _temp) = create_test_store();

    for name in ["", "   ", "\t\n"] {
        match store.create(new_tool(name)).await {
            Err(ToolsmithError::Validation(msg)) => {
                assert!(msg.contains("name"), "Error should mention name field");
            }
            other => panic!("Expected Validation error for {name:?}, got: {other:?}"),
        }
    }

    assert_eq!(store.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_created_ids_are_unique() {
    let (store, _temp) = create_test_store();

    let mut ids = HashSet::new();
    for i in 0..50 {
        let tool = store.create(new_tool(&format!("tool-{i}"))).await.unwrap();
        assert!(ids.insert(tool.id), "Duplicate id: {}", tool.id);
    }
}

#[tokio::test]
async fn test_list_preserves_insertion_order() {
    let (store, _temp) = create_test_store();

    store.create(new_tool("alpha")).await.unwrap();
    store.create(new_tool("beta")).await.unwrap();
    store.create(new_tool("gamma")).await.unwrap();

    let names: Vec<String> = store
        .list()
        .await
        .unwrap()
        .into_iter()
        .map(|t| t.name)
        .collect();
    assert_eq!(names, vec!["alpha", "beta", "gamma"]);
}

#[tokio::test]
async fn test_usage_counts_and_promotion_thresholds() {
    let (store, _temp) = create_test_store();
    let id = store.create(new_tool("grep-logs")).await.unwrap().id.to_string();

    for expected_count in 1..=4 {
        let tool = store.record_usage(&id).await.unwrap();
        assert_eq!(tool.usage_count, expected_count);
        assert_eq!(tool.memory_level, MemoryLevel::ShortTerm);
        assert!(tool.last_used_at.is_some());
    }

    // Fifth usage crosses the first threshold
    let tool = store.record_usage(&id).await.unwrap();
    assert_eq!(tool.usage_count, 5);
    assert_eq!(tool.memory_level, MemoryLevel::MediumTerm);

    for expected_count in 6..=24 {
        let tool = store.record_usage(&id).await.unwrap();
        assert_eq!(tool.usage_count, expected_count);
        assert_eq!(tool.memory_level, MemoryLevel::MediumTerm);
    }

    // Twenty-fifth usage crosses the second
    let tool = store.record_usage(&id).await.unwrap();
    assert_eq!(tool.usage_count, 25);
    assert_eq!(tool.memory_level, MemoryLevel::LongTerm);

    let tool = store.record_usage(&id).await.unwrap();
    assert_eq!(tool.memory_level, MemoryLevel::LongTerm);
}

#[tokio::test]
async fn test_record_usage_unknown_id() {
    let (store, _temp) = create_test_store();

    match store.record_usage("no-such-id").await {
        Err(ToolsmithError::ToolNotFound(id)) => assert_eq!(id, "no-such-id"),
        other => panic!("Expected ToolNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_level_override_demotes_and_promotion_reapplies() {
    let (store, _temp) = create_test_store();
    let id = store.create(new_tool("fetch-page")).await.unwrap().id.to_string();

    for _ in 0..6 {
        store.record_usage(&id).await.unwrap();
    }
    assert_eq!(
        store.get(&id).await.unwrap().memory_level,
        MemoryLevel::MediumTerm
    );

    // The override is unvalidated: it can demote
    let tool = store
        .set_memory_level(&id, MemoryLevel::ShortTerm)
        .await
        .unwrap();
    assert_eq!(tool.memory_level, MemoryLevel::ShortTerm);

    // Next usage re-evaluates against the count and climbs one step only
    let tool = store.record_usage(&id).await.unwrap();
    assert_eq!(tool.usage_count, 7);
    assert_eq!(tool.memory_level, MemoryLevel::MediumTerm);
}

#[tokio::test]
async fn test_archived_is_reachable_only_by_override() {
    let (store, _temp) = create_test_store();
    let id = store.create(new_tool("old-helper")).await.unwrap().id.to_string();

    let tool = store
        .set_memory_level(&id, MemoryLevel::Archived)
        .await
        .unwrap();
    assert_eq!(tool.memory_level, MemoryLevel::Archived);

    // Usage does not pull a record out of archived
    let tool = store.record_usage(&id).await.unwrap();
    assert_eq!(tool.memory_level, MemoryLevel::Archived);
}

#[tokio::test]
async fn test_delete_then_get() {
    let (store, _temp) = create_test_store();
    let id = store.create(new_tool("one-shot")).await.unwrap().id.to_string();

    assert!(store.delete(&id).await.unwrap());

    match store.get(&id).await {
        Err(ToolsmithError::ToolNotFound(_)) => {}
        other => panic!("Expected ToolNotFound after delete, got: {other:?}"),
    }

    // Second delete is an idempotent no-op
    assert!(!store.delete(&id).await.unwrap());
}

#[tokio::test]
async fn test_delete_unknown_id_returns_false() {
    let (store, _temp) = create_test_store();
    store.create(new_tool("keeper")).await.unwrap();

    assert!(!store.delete("garbage").await.unwrap());
    assert_eq!(store.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_search_exactness() {
    let (store, _temp) = create_test_store();

    store
        .create(NewTool {
            name: "CSV parser".to_string(),
            description: None,
            code: None,
            metadata: Some(ToolMetadata {
                tags: Some(vec!["csv".to_string(), "parsing".to_string()]),
                problem: None,
                created_by_agent: None,
            }),
        })
        .await
        .unwrap();
    store
        .create(NewTool {
            name: "JSON formatter".to_string(),
            description: None,
            code: None,
            metadata: Some(ToolMetadata {
                tags: Some(vec!["json".to_string()]),
                problem: None,
                created_by_agent: None,
            }),
        })
        .await
        .unwrap();

    let hits = store.search("csv", None).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "CSV parser");

    // Each record matches one token of "parser json", so both come back
    let hits = store.search("parser json", None).await.unwrap();
    assert_eq!(hits.len(), 2);
}

#[tokio::test]
async fn test_search_zero_score_exclusion() {
    let (store, _temp) = create_test_store();

    let id = store.create(new_tool("csv-parser")).await.unwrap().id.to_string();
    store
        .set_memory_level(&id, MemoryLevel::LongTerm)
        .await
        .unwrap();

    // Level bonus alone must not surface a record the query never matched
    assert!(store.search("spreadsheet", None).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_round_trip_persistence() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("inventory.json");

    let written = {
        let store = InventoryStore::new(&path);
        let tool = store
            .create(NewTool {
                name: "scrape-tables".to_string(),
                description: Some("Extract tables from web pages".to_string()),
                code: Some("export function scrape() {}".to_string()),
                metadata: Some(ToolMetadata {
                    tags: Some(vec!["scraping".to_string(), "html".to_string()]),
                    problem: Some("tables buried in markup".to_string()),
                    created_by_agent: Some("planner".to_string()),
                }),
            })
            .await
            .unwrap();
        store.record_usage(&tool.id.to_string()).await.unwrap()
    };

    let reopened = InventoryStore::new(&path);
    let read_back = reopened.get(&written.id.to_string()).await.unwrap();
    assert_eq!(read_back, written);
    assert_eq!(reopened.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_document_updated_at_covers_record_updates() {
    let (store, _temp) = create_test_store();
    let tool = store.create(new_tool("watcher")).await.unwrap();
    let tool = store.record_usage(&tool.id.to_string()).await.unwrap();

    let raw = std::fs::read_to_string(store.path()).unwrap();
    let doc: InventoryDocument = serde_json::from_str(&raw).unwrap();
    assert!(doc.updated_at >= tool.updated_at);
}

#[tokio::test]
async fn test_malformed_document_is_surfaced() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("inventory.json");
    std::fs::write(&path, "{ this is not valid json }").unwrap();

    let store = InventoryStore::new(&path);
    match store.list().await {
        Err(ToolsmithError::MalformedDocument(msg)) => {
            assert!(msg.contains("inventory.json"));
        }
        other => panic!("Expected MalformedDocument, got: {other:?}"),
    }

    // No auto-repair: the broken file is left in place
    let raw = std::fs::read_to_string(&path).unwrap();
    assert_eq!(raw, "{ this is not valid json }");
}

#[tokio::test]
async fn test_concurrent_first_access_single_init() {
    let temp = TempDir::new().unwrap();
    let store = Arc::new(InventoryStore::new(temp.path().join("inventory.json")));

    let mut handles = Vec::new();
    for _ in 0..8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move { store.list().await }));
    }

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_empty());
    }

    // The fanned-out load produced one consistent document
    store.create(new_tool("late-arrival")).await.unwrap();
    assert_eq!(store.count().await.unwrap(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_rank_respects_limit_and_matches(
        names in proptest::collection::vec("[a-z]{3,8}", 1..12),
        query in "[a-z]{1,4}",
        limit in 1usize..6,
    ) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let tools = rt.block_on(async {
            let (store, _temp) = create_test_store();
            for name in &names {
                store.create(new_tool(name)).await.unwrap();
            }
            store.list().await.unwrap()
        });

        let results = rank(&tools, &query, limit);
        prop_assert!(results.len() <= limit);
        for tool in &results {
            prop_assert!(tool.name.to_lowercase().contains(&query));
        }
        // Nothing that matches is dropped below the limit
        let matching = tools
            .iter()
            .filter(|t| t.name.to_lowercase().contains(&query))
            .count();
        prop_assert_eq!(results.len(), matching.min(limit));
    }

    #[test]
    fn prop_usage_count_equals_calls(calls in 0u32..40) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let (store, _temp) = create_test_store();
            let id = store.create(new_tool("counted")).await.unwrap().id.to_string();

            for _ in 0..calls {
                store.record_usage(&id).await.unwrap();
            }

            let tool = store.get(&id).await.unwrap();
            assert_eq!(tool.usage_count, calls);

            let expected_level = if calls >= 25 {
                MemoryLevel::LongTerm
            } else if calls >= 5 {
                MemoryLevel::MediumTerm
            } else {
                MemoryLevel::ShortTerm
            };
            assert_eq!(tool.memory_level, expected_level);
        });
    }
}

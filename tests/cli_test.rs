#[path = "common/mod.rs"]
mod common;

use common::{FolioTest, posts, templates};
use folio::types::ItemId;

// ============================================================================
// browse
// ============================================================================

#[test]
fn test_browse_first_page() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["browse", "posts.json"]);
    assert!(output.contains("Showing 1 to 7 of 16 entries"));
    assert!(output.contains("Post 01"));
    assert!(output.contains("Post 07"));
    assert!(!output.contains("Post 08"));
}

#[test]
fn test_browse_last_page_is_partial() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["browse", "posts.json", "--page", "3"]);
    assert!(output.contains("Showing 15 to 16 of 16 entries"));
    assert!(output.contains("Post 16"));
    assert!(!output.contains("Post 14"));
}

#[test]
fn test_browse_status_filter_json() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["browse", "posts.json", "--status", "draft", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["total_count"], 8);
    assert_eq!(json["page"], 1);
    assert_eq!(json["filters"]["status"], "draft");
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 7);
    assert!(items.iter().all(|item| item["status"] == "draft"));
    assert_eq!(json["share_paths"][0], "/blogs/post-2");
}

#[test]
fn test_browse_sort_descending() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["browse", "posts.json", "--sort", "views", "--desc", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["items"][0]["id"], 16);
    assert_eq!(json["sort"]["field"], "views");
    assert_eq!(json["sort"]["direction"], "desc");
}

#[test]
fn test_browse_scrolls_templates() {
    let folio = FolioTest::new();
    folio.write_fixture("templates.json", &templates(12));

    let output = folio.run_success(&[
        "browse",
        "templates.json",
        "--kind",
        "templates",
        "--scroll",
        "3",
        "--json",
    ]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["loaded_count"], 12);
    assert_eq!(json["has_more"], false);
    assert_eq!(json["items"].as_array().unwrap().len(), 12);
}

#[test]
fn test_browse_config_file_page_size() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));
    folio.write_config("page_size: 10\n");

    let output = folio.run_success(&["browse", "posts.json"]);
    assert!(output.contains("Showing 1 to 10 of 16 entries"));
}

#[test]
fn test_browse_empty_collection() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &[]);

    let output = folio.run_success(&["browse", "posts.json"]);
    assert!(output.contains("No posts found"));
    assert!(output.contains("Showing 0 to 0 of 0 entries"));
}

#[test]
fn test_browse_invalid_status() {
    let folio = FolioTest::new();
    let stderr = folio.run_failure(&["browse", "posts.json", "--status", "archived"]);
    assert!(stderr.contains("Invalid status"));
}

#[test]
fn test_browse_missing_fixture() {
    let folio = FolioTest::new();
    let stderr = folio.run_failure(&["browse", "missing.json"]);
    assert!(stderr.contains("IO error"));
}

// ============================================================================
// tags
// ============================================================================

#[test]
fn test_tags_counts_loaded_window() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["tags", "posts.json"]);
    assert!(output.contains("#Wedding (2)"));
    assert!(output.contains("#Party (1)"));
}

#[test]
fn test_tags_json_marks_active_tag() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["tags", "posts.json", "--tag", "wedding", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["windowed"], true);
    let tags = json["tags"].as_array().unwrap();
    let wedding = tags.iter().find(|t| t["id"] == "wedding").unwrap();
    assert_eq!(wedding["active"], true);
    assert_eq!(wedding["count"], 5);
}

#[test]
fn test_tags_none() {
    let folio = FolioTest::new();
    folio.write_fixture("templates.json", &templates(4));

    let output = folio.run_success(&["tags", "templates.json", "--kind", "templates"]);
    assert!(output.contains("No tags found"));
}

// ============================================================================
// delete
// ============================================================================

#[test]
fn test_delete_with_yes_writes_fixture() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    folio.run_success(&["delete", "posts.json", "5", "--yes"]);

    let remaining = folio.read_fixture("posts.json");
    assert_eq!(remaining.len(), 15);
    assert!(remaining.iter().all(|item| item.id != ItemId::new(5)));
}

#[test]
fn test_delete_without_confirmation_cancels() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(16));

    let output = folio.run_success(&["delete", "posts.json", "5"]);
    assert!(output.contains("Delete 'Post 05'?"));
    assert!(output.contains("Cancelled."));
    assert_eq!(folio.read_fixture("posts.json").len(), 16);
}

#[test]
fn test_delete_unknown_item() {
    let folio = FolioTest::new();
    folio.write_fixture("posts.json", &posts(3));

    let stderr = folio.run_failure(&["delete", "posts.json", "99", "--yes"]);
    assert!(stderr.contains("item '99' not found"));
    assert_eq!(folio.read_fixture("posts.json").len(), 3);
}

// ============================================================================
// config
// ============================================================================

#[test]
fn test_config_show_preset() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["config", "show"]);
    assert!(output.contains("Configuration:"));
    assert!(output.contains("not found"));
    assert!(output.contains("page_size: 7"));
}

#[test]
fn test_config_show_json_for_kind() {
    let folio = FolioTest::new();

    let output = folio.run_success(&["config", "show", "--kind", "leads", "--json"]);
    let json: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(json["config"]["kind"], "leads");
    assert_eq!(json["config"]["filter_mode"], "client");
    assert_eq!(json["config_file_exists"], false);
}

#[test]
fn test_config_show_rejects_invalid_file() {
    let folio = FolioTest::new();
    folio.write_config("page_size: 9\n");

    let stderr = folio.run_failure(&["config", "show"]);
    assert!(stderr.contains("page size 9"));
}

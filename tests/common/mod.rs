#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

use folio::types::{FacetTag, Item, ItemStatus};
use tempfile::TempDir;

/// Runs the folio binary inside an isolated temp directory.
pub struct FolioTest {
    pub temp_dir: TempDir,
    binary_path: &'static str,
}

impl FolioTest {
    pub fn new() -> Self {
        FolioTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            binary_path: env!("CARGO_BIN_EXE_folio"),
        }
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(self.binary_path)
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("FOLIO_CONFIG")
            .env_remove("FOLIO_LOG")
            .output()
            .expect("Failed to execute folio command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn write_fixture(&self, name: &str, items: &[Item]) -> PathBuf {
        let path = self.path(name);
        let json = serde_json::to_string_pretty(items).expect("Failed to serialize fixture");
        fs::write(&path, json).expect("Failed to write fixture");
        path
    }

    pub fn read_fixture(&self, name: &str) -> Vec<Item> {
        let content = fs::read_to_string(self.path(name)).expect("Failed to read fixture");
        serde_json::from_str(&content).expect("Failed to parse fixture")
    }

    pub fn write_config(&self, content: &str) {
        let dir = self.temp_dir.path().join(".folio");
        fs::create_dir_all(&dir).expect("Failed to create .folio directory");
        fs::write(dir.join("config.yaml"), content).expect("Failed to write config file");
    }
}

/// Blog post `n`: even ids are drafts, every third is tagged wedding,
/// every fifth party.
pub fn post(n: u64) -> Item {
    let status = if n % 2 == 0 {
        ItemStatus::Draft
    } else {
        ItemStatus::Published
    };
    let mut item = Item::new(n)
        .with_status(status)
        .with_field("title", format!("Post {n:02}"))
        .with_field("url_title", format!("post-{n}"))
        .with_field("views", n * 3);
    if n % 3 == 0 {
        item = item.with_tag(FacetTag::new("wedding", "Wedding"));
    }
    if n % 5 == 0 {
        item = item.with_tag(FacetTag::new("party", "Party"));
    }
    item
}

pub fn posts(count: u64) -> Vec<Item> {
    (1..=count).map(post).collect()
}

/// Template `n`: odd ids are free, even ids paid.
pub fn template(n: u64) -> Item {
    let status = if n % 2 == 0 {
        ItemStatus::Paid
    } else {
        ItemStatus::Free
    };
    Item::new(n)
        .with_status(status)
        .with_field("name", format!("Template {n:02}"))
        .with_field("price", if n % 2 == 0 { 25u64 } else { 0u64 })
}

pub fn templates(count: u64) -> Vec<Item> {
    (1..=count).map(template).collect()
}

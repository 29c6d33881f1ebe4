//! View configuration.
//!
//! Each collection kind has a preset. A YAML file at `.folio/config.yaml`
//! (or the path in `FOLIO_CONFIG`) picks the kind and overrides individual
//! settings:
//!
//! ```yaml
//! kind: leads
//! page_size: 10
//! search_match: fuzzy
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::enum_display_fromstr;
use crate::error::{FolioError, Result};
use crate::query::{FilterMode, SearchMatch, SortMode, SortSpec};
use crate::types::FOLIO_DIR;
use crate::view::LoadMode;

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "FOLIO_CONFIG";

pub const DEFAULT_PAGE_SIZE_CHOICES: [usize; 4] = [5, 7, 10, 20];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionKind {
    #[default]
    Blog,
    Leads,
    Templates,
}

enum_display_fromstr!(
    CollectionKind,
    FolioError::InvalidMode,
    {
        Blog => "blog",
        Leads => "leads",
        Templates => "templates",
    }
);

/// Effective settings for one collection view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    pub kind: CollectionKind,
    pub mode: LoadMode,
    pub page_size: usize,
    pub page_size_choices: Vec<usize>,
    pub initial_batch: usize,
    pub batch_size: usize,
    /// Distance from the bottom, in pixels, at which the next batch loads.
    pub scroll_threshold: u32,
    pub filter_mode: FilterMode,
    pub sort_mode: SortMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search_fields: Vec<String>,
    pub search_match: SearchMatch,
    pub max_page_links: usize,
    pub fetch_timeout_secs: u64,
    pub clock_interval_secs: u64,
    /// Fields shown as table columns, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<String>,
    pub share_prefix: String,
    pub empty_text: String,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self::preset(CollectionKind::default())
    }
}

impl ViewConfig {
    /// Built-in settings for `kind`.
    pub fn preset(kind: CollectionKind) -> Self {
        let base = Self {
            kind,
            mode: LoadMode::Paged,
            page_size: 7,
            page_size_choices: DEFAULT_PAGE_SIZE_CHOICES.to_vec(),
            initial_batch: 6,
            batch_size: 6,
            scroll_threshold: 100,
            filter_mode: FilterMode::Server,
            sort_mode: SortMode::Server,
            default_sort: None,
            search_fields: Vec::new(),
            search_match: SearchMatch::Substring,
            max_page_links: 5,
            fetch_timeout_secs: 30,
            clock_interval_secs: 60,
            columns: Vec::new(),
            share_prefix: String::new(),
            empty_text: String::new(),
        };

        match kind {
            CollectionKind::Blog => Self {
                default_sort: Some(SortSpec::desc("date")),
                columns: strings(&["title", "date", "views"]),
                share_prefix: "/blogs".to_string(),
                empty_text: "No posts found".to_string(),
                ..base
            },
            CollectionKind::Leads => Self {
                filter_mode: FilterMode::Client,
                sort_mode: SortMode::Client,
                default_sort: Some(SortSpec::desc("wedding_date")),
                search_fields: strings(&["user_name", "wedding_location", "email"]),
                columns: strings(&["user_name", "email", "wedding_location", "wedding_date"]),
                share_prefix: "/leads".to_string(),
                empty_text: "No Lead Available".to_string(),
                ..base
            },
            CollectionKind::Templates => Self {
                mode: LoadMode::InfiniteScroll,
                filter_mode: FilterMode::Client,
                columns: strings(&["name", "price"]),
                share_prefix: "/templates".to_string(),
                empty_text: "No templates found".to_string(),
                ..base
            },
        }
    }

    /// Default config file location under the working directory.
    pub fn config_path() -> PathBuf {
        match env::var(CONFIG_ENV) {
            Ok(path) if !path.is_empty() => PathBuf::from(path),
            _ => PathBuf::from(FOLIO_DIR).join("config.yaml"),
        }
    }

    /// Load from the default location. A missing file yields the preset.
    pub fn load(kind: Option<CollectionKind>) -> Result<Self> {
        Self::load_from(&Self::config_path(), kind)
    }

    /// Load from `path`. `kind` wins over the file's own `kind` when given.
    pub fn load_from(path: &Path, kind: Option<CollectionKind>) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using preset");
            return Ok(Self::preset(kind.unwrap_or_default()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            FolioError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let file: ConfigFile = serde_yaml_ng::from_str(&content)?;
        let config = file.resolve(kind);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size_choices.is_empty() || self.page_size_choices.contains(&0) {
            return Err(FolioError::Config(
                "page_size_choices must list at least one non-zero size".to_string(),
            ));
        }
        if !self.page_size_choices.contains(&self.page_size) {
            return Err(FolioError::InvalidPageSize(self.page_size));
        }
        if self.initial_batch == 0 || self.batch_size == 0 {
            return Err(FolioError::Config(
                "initial_batch and batch_size must be greater than zero".to_string(),
            ));
        }
        if self.max_page_links == 0 {
            return Err(FolioError::Config(
                "max_page_links must be greater than zero".to_string(),
            ));
        }
        if self.fetch_timeout_secs == 0 || self.clock_interval_secs == 0 {
            return Err(FolioError::Config(
                "fetch_timeout_secs and clock_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn clock_interval(&self) -> Duration {
        Duration::from_secs(self.clock_interval_secs)
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// On-disk shape: a kind plus optional overrides of its preset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub kind: Option<CollectionKind>,
    #[serde(default)]
    pub mode: Option<LoadMode>,
    #[serde(default)]
    pub page_size: Option<usize>,
    #[serde(default)]
    pub page_size_choices: Option<Vec<usize>>,
    #[serde(default)]
    pub initial_batch: Option<usize>,
    #[serde(default)]
    pub batch_size: Option<usize>,
    #[serde(default)]
    pub scroll_threshold: Option<u32>,
    #[serde(default)]
    pub filter_mode: Option<FilterMode>,
    #[serde(default)]
    pub sort_mode: Option<SortMode>,
    #[serde(default)]
    pub default_sort: Option<SortSpec>,
    #[serde(default)]
    pub search_fields: Option<Vec<String>>,
    #[serde(default)]
    pub search_match: Option<SearchMatch>,
    #[serde(default)]
    pub max_page_links: Option<usize>,
    #[serde(default)]
    pub fetch_timeout_secs: Option<u64>,
    #[serde(default)]
    pub clock_interval_secs: Option<u64>,
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub share_prefix: Option<String>,
    #[serde(default)]
    pub empty_text: Option<String>,
}

impl ConfigFile {
    pub fn resolve(self, kind: Option<CollectionKind>) -> ViewConfig {
        let mut config = ViewConfig::preset(kind.or(self.kind).unwrap_or_default());

        macro_rules! apply {
            ($file:ident => $target:ident: $($field:ident),+ $(,)?) => {
                $(if let Some(value) = $file.$field {
                    $target.$field = value;
                })+
            };
        }

        let file = self;
        apply!(file => config:
            mode,
            page_size,
            page_size_choices,
            initial_batch,
            batch_size,
            scroll_threshold,
            filter_mode,
            sort_mode,
            search_fields,
            search_match,
            max_page_links,
            fetch_timeout_secs,
            clock_interval_secs,
            columns,
            share_prefix,
            empty_text,
        );
        if file.default_sort.is_some() {
            config.default_sort = file.default_sort;
        }
        config
    }
}

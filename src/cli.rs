use std::path::PathBuf;
use std::str::FromStr;

use clap::{Parser, Subcommand};

use crate::config::CollectionKind;
use crate::types::ItemStatus;

const VALID_KINDS: &[&str] = &["blog", "leads", "templates"];
const VALID_STATUSES: &[&str] = &["published", "draft", "free", "paid"];

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Filterable, paginated views over collections")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by commands that open a view over a fixture.
#[derive(clap::Args, Debug, Clone)]
pub struct ViewArgs {
    /// JSON fixture holding the collection
    pub fixture: PathBuf,

    /// Collection kind: blog, leads, templates (default: from config)
    #[arg(short, long, value_parser = parse_kind)]
    pub kind: Option<CollectionKind>,

    /// Status filter: published, draft, free, paid
    #[arg(short, long, value_parser = parse_status)]
    pub status: Option<ItemStatus>,

    /// Tag id to filter by
    #[arg(short, long)]
    pub tag: Option<String>,

    /// Free-text search
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show one page (or scrolled window) of a collection
    #[command(visible_alias = "b")]
    Browse {
        #[command(flatten)]
        view: ViewArgs,

        /// Field to sort by
        #[arg(long)]
        sort: Option<String>,

        /// Sort descending
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Page to show (paged collections)
        #[arg(short, long, value_parser = parse_positive)]
        page: Option<usize>,

        /// Page size, must be one of the configured choices
        #[arg(long, value_parser = parse_positive)]
        page_size: Option<usize>,

        /// Number of times to scroll to the bottom (scrolling collections)
        #[arg(long, default_value = "0")]
        scroll: usize,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List facet tags of the loaded window with their counts
    Tags {
        #[command(flatten)]
        view: ViewArgs,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an item after confirmation and write the fixture back
    Delete {
        /// JSON fixture holding the collection
        fixture: PathBuf,

        /// Item id
        #[arg(value_parser = parse_positive_u64)]
        id: u64,

        /// Collection kind: blog, leads, templates
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CollectionKind>,

        /// Confirm without prompting
        #[arg(short, long)]
        yes: bool,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Collection kind to resolve
        #[arg(short, long, value_parser = parse_kind)]
        kind: Option<CollectionKind>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_with_validation<T, F>(
    s: &str,
    parser: F,
    field_name: &str,
    valid_values: &[&str],
) -> Result<T, String>
where
    F: FnOnce(&str) -> Result<T, String>,
{
    parser(s).map_err(|_| {
        format!(
            "Invalid {}. Must be one of: {}",
            field_name,
            valid_values.join(", ")
        )
    })
}

fn parse_kind(s: &str) -> Result<CollectionKind, String> {
    parse_with_validation(
        s,
        |v| CollectionKind::from_str(v).map_err(|_| String::new()),
        "kind",
        VALID_KINDS,
    )
}

fn parse_status(s: &str) -> Result<ItemStatus, String> {
    parse_with_validation(
        s,
        |v| ItemStatus::from_str(v).map_err(|_| String::new()),
        "status",
        VALID_STATUSES,
    )
}

fn parse_positive(s: &str) -> Result<usize, String> {
    match s.trim().parse::<usize>() {
        Ok(0) => Err("Value must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a positive number")),
    }
}

fn parse_positive_u64(s: &str) -> Result<u64, String> {
    match s.trim().parse::<u64>() {
        Ok(0) => Err("ID must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{s}' is not a valid item id")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind_case_insensitive() {
        assert_eq!(parse_kind("Leads"), Ok(CollectionKind::Leads));
        let err = parse_kind("nope").unwrap_err();
        assert!(err.contains("blog, leads, templates"));
    }

    #[test]
    fn test_parse_status() {
        assert_eq!(parse_status("DRAFT"), Ok(ItemStatus::Draft));
        assert!(parse_status("archived").is_err());
    }

    #[test]
    fn test_parse_positive_rejects_zero() {
        assert!(parse_positive("0").is_err());
        assert_eq!(parse_positive("7"), Ok(7));
        assert!(parse_positive_u64("x").is_err());
    }

    #[test]
    fn test_cli_parses_browse() {
        let cli = Cli::try_parse_from([
            "folio", "browse", "posts.json", "--status", "draft", "--sort", "title", "--desc",
            "--page", "2",
        ])
        .unwrap();
        match cli.command {
            Commands::Browse {
                view, sort, desc, page, ..
            } => {
                assert_eq!(view.status, Some(ItemStatus::Draft));
                assert_eq!(sort.as_deref(), Some("title"));
                assert!(desc);
                assert_eq!(page, Some(2));
            }
            _ => panic!("expected browse"),
        }
    }

    #[test]
    fn test_desc_requires_sort() {
        assert!(Cli::try_parse_from(["folio", "browse", "posts.json", "--desc"]).is_err());
    }
}

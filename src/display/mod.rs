//! Terminal rendering of a computed `ViewModel`.

use owo_colors::OwoColorize;
use tabled::builder::Builder;
use tabled::settings::Style;

use crate::source::CollectionStats;
use crate::types::{Item, ItemStatus, TagId};
use crate::view::{ListState, PaginationViewModel, TagUsage, Toast, ToastLevel, ViewModel};

pub fn format_status_colored(status: ItemStatus) -> String {
    let badge = format!("[{status}]");
    match status {
        ItemStatus::Published => badge.green().to_string(),
        ItemStatus::Draft => badge.yellow().to_string(),
        ItemStatus::Free => badge.cyan().to_string(),
        ItemStatus::Paid => badge.magenta().to_string(),
    }
}

/// Value of `column` for one row. `id` and `status` are built-in columns.
pub fn format_cell(item: &Item, column: &str) -> String {
    match column {
        "id" => item.id.to_string(),
        "status" => item.status.map(|s| s.to_string()).unwrap_or_default(),
        _ => item
            .field(column)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string()),
    }
}

/// Items as a rounded table with an id and status column ahead of `columns`.
pub fn render_table(columns: &[String], items: &[Item]) -> String {
    let mut builder = Builder::default();

    let mut header = vec!["ID".to_string(), "Status".to_string()];
    header.extend(columns.iter().map(|c| column_title(c)));
    builder.push_record(header);

    for item in items {
        let mut row = vec![format_cell(item, "id"), format_cell(item, "status")];
        row.extend(columns.iter().map(|c| format_cell(item, c)));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    table.to_string()
}

/// `wedding_location` -> `Wedding Location`
fn column_title(column: &str) -> String {
    column
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn format_pagination(pagination: &PaginationViewModel) -> String {
    let mut out = pagination.range_text();

    if let Some(current) = pagination.page {
        let links: Vec<String> = pagination
            .page_numbers
            .iter()
            .map(|&n| {
                if n == current {
                    format!("[{n}]").bold().to_string()
                } else {
                    n.to_string()
                }
            })
            .collect();
        if !links.is_empty() {
            let prev = if pagination.has_previous() { "<" } else { " " };
            let next = if pagination.has_next() { ">" } else { " " };
            out.push_str(&format!("   {prev} {} {next}", links.join(" ")));
        }
    } else if pagination.has_more {
        out.push_str(&format!("   {}", "scroll for more".dimmed()));
    }

    out
}

/// One line of facet tags, the active tag highlighted.
pub fn format_tags(tags: &[TagUsage], active: Option<&TagId>, windowed: bool) -> String {
    if tags.is_empty() {
        return "No tags found".to_string();
    }

    let rendered: Vec<String> = tags
        .iter()
        .map(|usage| {
            let label = format!("#{} ({})", usage.tag.name, usage.count);
            if active == Some(&usage.tag.id) {
                label.cyan().bold().to_string()
            } else {
                label
            }
        })
        .collect();

    let mut out = rendered.join("  ");
    if windowed {
        out.push_str(&format!("  {}", "(counts cover loaded items)".dimmed()));
    }
    out
}

pub fn format_notice(toast: &Toast) -> String {
    match toast.level {
        ToastLevel::Info => toast.message.green().to_string(),
        ToastLevel::Warning => toast.message.yellow().to_string(),
        ToastLevel::Error => toast.message.red().to_string(),
    }
}

pub fn format_stats(stats: &CollectionStats) -> String {
    let mut parts = vec![format!("{} total", stats.total)];
    for (status, count) in &stats.by_status {
        parts.push(format!("{count} {status}"));
    }
    if stats.total_views > 0 {
        parts.push(format!("{} views", stats.total_views));
    }
    parts.join(", ")
}

/// The whole view: notice, table or empty text, pagination footer, tags.
pub fn render_view(model: &ViewModel, columns: &[String]) -> String {
    let mut out = String::new();

    if let Some(stats) = &model.stats {
        out.push_str(&format!("{}\n", format_stats(stats).dimmed()));
    }
    if let Some(notice) = &model.notice {
        out.push_str(&format!("{}\n", format_notice(notice)));
    }

    match model.list_state {
        ListState::Loading => out.push_str("Loading...\n"),
        ListState::Failed => {
            let message = model
                .error
                .as_ref()
                .map(|e| e.message.as_str())
                .unwrap_or("Failed to load");
            out.push_str(&format!("{}\n", message.red()));
        }
        ListState::Empty => out.push_str(&format!("{}\n", model.empty_text)),
        ListState::Ready => {
            out.push_str(&render_table(columns, &model.items));
            out.push('\n');
        }
    }

    out.push_str(&format_pagination(&model.pagination));
    out.push('\n');
    out.push_str(&format_tags(
        &model.tags,
        model.filters.tag.as_ref(),
        model.tags_windowed,
    ));
    out.push('\n');

    if let Some(prompt) = &model.confirmation_message {
        out.push_str(&format!("{}\n", prompt.yellow()));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FacetTag;
    use crate::view::LoadMode;

    fn paged(page: usize, total_pages: usize) -> PaginationViewModel {
        PaginationViewModel {
            mode: LoadMode::Paged,
            page: Some(page),
            page_size: Some(7),
            total_pages,
            page_numbers: (1..=total_pages).collect(),
            total_count: 16,
            loaded_count: None,
            has_more: page < total_pages,
            range: (8, 14),
        }
    }

    #[test]
    fn test_column_title() {
        assert_eq!(column_title("wedding_location"), "Wedding Location");
        assert_eq!(column_title("title"), "Title");
    }

    #[test]
    fn test_format_cell_missing_field() {
        let item = Item::new(3).with_field("title", "Venues");
        assert_eq!(format_cell(&item, "title"), "Venues");
        assert_eq!(format_cell(&item, "views"), "-");
        assert_eq!(format_cell(&item, "id"), "3");
        assert_eq!(format_cell(&item, "status"), "");
    }

    #[test]
    fn test_render_table_has_headers_and_rows() {
        let items = vec![
            Item::new(1).with_field("title", "First"),
            Item::new(2).with_field("title", "Second"),
        ];
        let table = render_table(&["title".to_string()], &items);
        assert!(table.contains("Title"));
        assert!(table.contains("First"));
        assert!(table.contains("Second"));
    }

    #[test]
    fn test_pagination_footer() {
        let footer = format_pagination(&paged(2, 3));
        assert!(footer.starts_with("Showing 8 to 14 of 16 entries"));
        assert!(footer.contains('<'));
        assert!(footer.contains('>'));
        assert!(footer.contains("[2]"));
    }

    #[test]
    fn test_empty_tags() {
        assert_eq!(format_tags(&[], None, true), "No tags found");
    }

    #[test]
    fn test_tags_line() {
        let tags = vec![
            TagUsage {
                tag: FacetTag::new("t1", "wedding"),
                count: 3,
            },
            TagUsage {
                tag: FacetTag::new("t2", "party"),
                count: 1,
            },
        ];
        let line = format_tags(&tags, None, false);
        assert_eq!(line, "#wedding (3)  #party (1)");
    }
}

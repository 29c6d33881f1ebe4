use owo_colors::OwoColorize;
use serde_json::json;

use super::{apply, apply_filters, ensure_loaded, open_fixture, print_json};
use crate::cli::ViewArgs;
use crate::display::render_view;
use crate::error::Result;
use crate::query::SortSpec;
use crate::view::{ScrollMetrics, ViewAction, share_path};

/// Options for the browse command
pub struct BrowseOptions {
    pub view: ViewArgs,
    pub sort: Option<String>,
    pub desc: bool,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub scroll: usize,
    pub json: bool,
}

/// Scroll position at the very bottom of the loaded content.
const AT_BOTTOM: ScrollMetrics = ScrollMetrics {
    scroll_top: 1000.0,
    viewport_height: 500.0,
    content_height: 1500.0,
};

/// Show one window of a collection
pub async fn cmd_browse(options: BrowseOptions) -> Result<()> {
    let mut session = open_fixture(&options.view.fixture, options.view.kind).await?;
    apply_filters(&mut session, &options.view).await?;

    if let Some(field) = options.sort {
        let spec = if options.desc {
            SortSpec::desc(field)
        } else {
            SortSpec::asc(field)
        };
        apply(&mut session, ViewAction::SetSort(spec)).await?;
    }
    if let Some(size) = options.page_size {
        apply(&mut session, ViewAction::SetPageSize(size)).await?;
    }
    if let Some(page) = options.page {
        apply(&mut session, ViewAction::RequestPage(page)).await?;
    }
    for _ in 0..options.scroll {
        session.scroll(&AT_BOTTOM);
        session.run_until_idle().await;
    }

    ensure_loaded(&session)?;
    let model = session.view_model();
    let config = session.view().config();

    if options.json {
        let p = &model.pagination;
        let share_paths: Vec<String> = model
            .items
            .iter()
            .map(|item| share_path(&config.share_prefix, item))
            .collect();
        print_json(&json!({
            "kind": config.kind.to_string(),
            "items": model.items,
            "share_paths": share_paths,
            "total_count": p.total_count,
            "page": p.page,
            "page_size": p.page_size,
            "total_pages": p.total_pages,
            "loaded_count": p.loaded_count,
            "has_more": p.has_more,
            "range": [p.range.0, p.range.1],
            "filters": {
                "status": model.filters.status.map(|s| s.to_string()),
                "tag": model.filters.tag.as_ref().map(|t| t.to_string()),
                "search": model.filters.search,
            },
            "sort": model.sort.as_ref().map(|s| json!({
                "field": s.field,
                "direction": s.direction.to_string(),
            })),
        }))?;
    } else {
        println!(
            "{} {}",
            config.kind.to_string().cyan().bold(),
            session.clock().current().dimmed()
        );
        print!("{}", render_view(&model, &config.columns));
    }

    session.deactivate();
    Ok(())
}

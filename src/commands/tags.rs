use serde_json::json;

use super::{apply_filters, ensure_loaded, open_fixture, print_json};
use crate::cli::ViewArgs;
use crate::display::format_tags;
use crate::error::Result;

/// List the facet tags of the loaded window
pub async fn cmd_tags(view: ViewArgs, json: bool) -> Result<()> {
    let mut session = open_fixture(&view.fixture, view.kind).await?;
    apply_filters(&mut session, &view).await?;
    ensure_loaded(&session)?;

    let model = session.view_model();
    if json {
        let tags: Vec<serde_json::Value> = model
            .tags
            .iter()
            .map(|usage| {
                json!({
                    "id": usage.tag.id.as_str(),
                    "name": usage.tag.name,
                    "count": usage.count,
                    "active": model.filters.tag.as_ref() == Some(&usage.tag.id),
                })
            })
            .collect();
        print_json(&json!({
            "tags": tags,
            "windowed": model.tags_windowed,
        }))?;
    } else {
        println!(
            "{}",
            format_tags(&model.tags, model.filters.tag.as_ref(), model.tags_windowed)
        );
    }

    session.deactivate();
    Ok(())
}

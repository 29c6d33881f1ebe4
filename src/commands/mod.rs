mod browse;
mod config;
mod delete;
pub mod interactive;
mod tags;

pub use browse::{BrowseOptions, cmd_browse};
pub use config::cmd_config_show;
pub use delete::cmd_delete;
pub use tags::cmd_tags;

use std::path::Path;
use std::sync::Arc;

use crate::cli::ViewArgs;
use crate::config::{CollectionKind, ViewConfig};
use crate::error::{FolioError, Result};
use crate::session::ViewSession;
use crate::source::MemorySource;
use crate::types::TagId;
use crate::view::ViewAction;

/// Print a JSON value to stdout with pretty formatting
pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Open an active session over a fixture file and wait for the first load.
pub async fn open_fixture(
    fixture: &Path,
    kind: Option<CollectionKind>,
) -> Result<ViewSession<MemorySource>> {
    let config = ViewConfig::load(kind)?;
    let source = Arc::new(MemorySource::from_json_file(fixture)?);
    let mut session = ViewSession::new(config, source)?;
    session.activate();
    session.run_until_idle().await;
    Ok(session)
}

/// Dispatch one intent and settle everything it starts.
pub async fn apply(session: &mut ViewSession<MemorySource>, action: ViewAction) -> Result<()> {
    session.dispatch(action)?;
    session.run_until_idle().await;
    Ok(())
}

/// Apply the filter flags shared by the view commands.
pub async fn apply_filters(session: &mut ViewSession<MemorySource>, args: &ViewArgs) -> Result<()> {
    if let Some(status) = args.status {
        apply(session, ViewAction::SetStatus(Some(status))).await?;
    }
    if let Some(tag) = &args.tag {
        apply(session, ViewAction::ToggleTag(TagId::new(tag.as_str()))).await?;
    }
    if let Some(search) = &args.search {
        apply(session, ViewAction::SetSearch(search.clone())).await?;
    }
    Ok(())
}

/// Turn a failed list load into an error for the exit code.
pub fn ensure_loaded(session: &ViewSession<MemorySource>) -> Result<()> {
    let model = session.view_model();
    if model.is_failed() {
        let message = model
            .error
            .map(|e| e.message)
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(FolioError::FetchFailure(message));
    }
    Ok(())
}

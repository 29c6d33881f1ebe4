use std::path::Path;

use owo_colors::OwoColorize;
use tracing::info;

use super::interactive::confirm;
use super::{apply, open_fixture};
use crate::config::CollectionKind;
use crate::error::{ErrorKind, FolioError, Result};
use crate::types::ItemId;
use crate::view::ViewAction;

/// Delete an item through the confirmation flow, then save the fixture
pub async fn cmd_delete(
    fixture: &Path,
    id: u64,
    kind: Option<CollectionKind>,
    yes: bool,
) -> Result<()> {
    let id = ItemId::new(id);
    let mut session = open_fixture(fixture, kind).await?;

    apply(&mut session, ViewAction::RequestDelete(id)).await?;
    let prompt = session
        .view_model()
        .confirmation_message
        .unwrap_or_else(|| format!("Delete #{id}?"));

    let confirmed = yes || confirm(&prompt)?;
    if !confirmed {
        apply(&mut session, ViewAction::CancelDelete).await?;
        println!("Cancelled.");
        session.deactivate();
        return Ok(());
    }

    apply(&mut session, ViewAction::ConfirmDelete).await?;
    let model = session.view_model();
    session.deactivate();

    match model.error {
        Some(error) if error.kind == ErrorKind::NotFound => Err(FolioError::NotFound(id)),
        Some(error) => Err(FolioError::MutationFailure(error.message)),
        None => {
            session.source().save_json_file(fixture)?;
            info!(%id, path = %fixture.display(), "fixture saved");
            if let Some(notice) = model.notice {
                println!("{}", notice.message.green());
            }
            Ok(())
        }
    }
}

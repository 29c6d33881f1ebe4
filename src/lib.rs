pub mod macros;

pub mod cli;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod query;
pub mod session;
pub mod source;
pub mod types;
pub mod view;

pub use config::{CollectionKind, ViewConfig};
pub use error::{ErrorKind, FolioError, Result};
pub use query::{FetchRequest, FilterMode, Filters, SortDirection, SortMode, SortSpec};
pub use session::{ClockTicker, ViewSession};
pub use source::{CollectionSource, CollectionStats, MemorySource, PageResult};
pub use types::{FacetTag, FieldValue, Item, ItemDraft, ItemId, ItemStatus, TagId};
pub use view::{
    CollectionView, Completion, Effect, ViewAction, ViewModel, compute_view_model, share_path,
};

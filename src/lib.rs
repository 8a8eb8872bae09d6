pub mod client;
pub mod columns;
pub mod dialog;
pub mod error;
pub mod export;
pub mod filter;
pub mod pagination;
pub mod record;
pub mod resource;
pub mod schema;
pub mod view;

pub use client::{CollectionClient, HttpCollectionClient};
pub use columns::ColumnVisibility;
pub use dialog::{DialogController, DialogMode, DialogPhase, SubmitTicket};
pub use error::{FieldErrors, Result, TabulaError};
pub use filter::FilterState;
pub use pagination::PageState;
pub use record::{FieldMap, FieldValue, Record, RecordId};
pub use resource::{ResourceConfig, ResourceConfigBuilder};
pub use schema::{ColumnSpec, FieldKind, FieldSchema, SelectOption};
pub use view::{ListView, LoadState};

//! List view orchestrator.
//!
//! Composes the client, filter engine, pagination, column visibility, and
//! dialog controller into one page's worth of state. Derivation order per
//! render is fixed: collection -> filter -> pagination slice -> column
//! projection, so page counts always reflect filtered results.
//!
//! The local collection changes only after the server confirms a write:
//! create appends the server-returned record, update replaces the
//! matching-id record in place, delete removes on success. Failures leave
//! the collection untouched and surface through the dialog or the load
//! state. Each view owns its state outright; nothing is shared between
//! views of different resources.

use crate::client::CollectionClient;
use crate::columns::ColumnVisibility;
use crate::dialog::{DialogController, DialogMode, SubmitTicket};
use crate::error::{Result, TabulaError};
use crate::export;
use crate::filter::FilterState;
use crate::pagination::PageState;
use crate::record::{FieldValue, Record, RecordId};
use crate::resource::ResourceConfig;
use crate::schema::ColumnSpec;

/// Collection fetch lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Loading,
    Ready,
    /// Failed; retry is manual via [`ListView::load`].
    Error(String),
}

pub struct ListView<C> {
    config: ResourceConfig,
    client: C,
    load_state: LoadState,
    records: Vec<Record>,
    filter: FilterState,
    pagination: PageState,
    columns: ColumnVisibility,
    dialog: DialogController,
}

impl<C: CollectionClient> ListView<C> {
    /// A freshly mounted view is `Loading` until [`ListView::load`] runs.
    pub fn new(config: ResourceConfig, client: C) -> Self {
        let columns = ColumnVisibility::new(config.columns());
        Self {
            config,
            client,
            load_state: LoadState::Loading,
            records: Vec::new(),
            filter: FilterState::new(),
            pagination: PageState::default(),
            columns,
            dialog: DialogController::new(),
        }
    }

    pub fn with_page_size(mut self, items_per_page: usize) -> Self {
        self.pagination = PageState::new(items_per_page);
        self
    }

    pub fn config(&self) -> &ResourceConfig {
        &self.config
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn dialog(&self) -> &DialogController {
        &self.dialog
    }

    pub fn page_state(&self) -> PageState {
        self.pagination
    }

    /// Fetch the collection. Also serves as the manual retry after an
    /// error and the manual resync after a suspected stale view.
    pub async fn load(&mut self) {
        self.load_state = LoadState::Loading;
        match self.client.list().await {
            Ok(records) => {
                self.records = records;
                self.load_state = LoadState::Ready;
                self.pagination.clamp(self.filtered().len());
            }
            Err(e) => {
                tracing::warn!(resource = %self.config.name(), error = %e, "list fetch failed");
                self.load_state = LoadState::Error(e.to_string());
            }
        }
    }

    // --- derivation pipeline ---

    /// Records passing the current filter, in collection order.
    pub fn filtered(&self) -> Vec<&Record> {
        self.filter.apply(&self.records, self.config.searchable())
    }

    /// The current page of the filtered collection.
    pub fn visible_records(&self) -> Vec<&Record> {
        let filtered = self.filtered();
        self.pagination.slice(&filtered).to_vec()
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages(self.filtered().len())
    }

    /// Visible column headers, in declaration order.
    pub fn header(&self) -> Vec<&ColumnSpec> {
        self.columns.visible_columns().collect()
    }

    /// One record projected through the visible columns.
    pub fn project(&self, record: &Record) -> Vec<String> {
        self.columns
            .visible_columns()
            .map(|c| self.config.display_value(record, &c.key))
            .collect()
    }

    /// The fully derived page: filtered, sliced, projected.
    pub fn rows(&self) -> Vec<Vec<String>> {
        self.visible_records()
            .into_iter()
            .map(|r| self.project(r))
            .collect()
    }

    // --- filter / pagination / column controls ---

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.filter.set_query(query);
        self.pagination.clamp(self.filtered().len());
    }

    pub fn set_filter(&mut self, key: impl Into<String>, value: FieldValue) {
        self.filter.set_filter(key, value);
        self.pagination.clamp(self.filtered().len());
    }

    pub fn clear_filters(&mut self) {
        self.filter.clear();
    }

    pub fn filter_state(&self) -> &FilterState {
        &self.filter
    }

    pub fn set_page(&mut self, n: usize) {
        let total = self.filtered().len();
        self.pagination.set_page(n, total);
    }

    pub fn set_page_size(&mut self, items_per_page: usize) {
        self.pagination.set_page_size(items_per_page);
    }

    pub fn toggle_column(&mut self, key: &str) {
        self.columns.toggle(key);
    }

    pub fn column_visibility(&self) -> &ColumnVisibility {
        &self.columns
    }

    // --- row actions and dialog ---

    pub fn open_create(&mut self) {
        self.dialog.open_create(&self.config);
    }

    pub fn open_edit(&mut self, id: &RecordId) -> Result<()> {
        let record = self
            .records
            .iter()
            .find(|r| &r.id == id)
            .cloned()
            .ok_or_else(|| TabulaError::RecordNotFound(id.to_string()))?;
        self.dialog.open_edit(&self.config, &record);
        Ok(())
    }

    pub fn change_field(&mut self, name: &str, value: FieldValue) {
        self.dialog.change_field(&self.config, name, value);
    }

    pub fn close_dialog(&mut self) {
        self.dialog.close();
    }

    /// Validate, run the remote call, and reconcile.
    ///
    /// Validation failures make no network call and leave the per-field
    /// messages on the dialog. Remote failures reopen the dialog with a
    /// form-level message. Either way the error is also returned so the
    /// caller can surface it (e.g. as a toast).
    pub async fn submit_dialog(&mut self) -> Result<()> {
        let ticket = self.dialog.begin_submit(&self.config)?;
        let result = match ticket.mode {
            DialogMode::Create => self.client.create(&ticket.fields).await,
            DialogMode::Edit => match ticket.id.clone() {
                Some(id) => self.client.update(&id, &ticket.fields).await,
                None => Err(TabulaError::DialogState(
                    "edit submission without a target id",
                )),
            },
        };
        match result {
            Ok(record) => {
                self.apply_submit(&ticket, record);
                Ok(())
            }
            Err(e) => {
                self.dialog.submit_failed(&ticket, &e);
                Err(e)
            }
        }
    }

    /// Reconcile a confirmed write into the local collection. Discards the
    /// result when the ticket went stale (dialog closed meanwhile).
    fn apply_submit(&mut self, ticket: &SubmitTicket, record: Record) {
        if !self.dialog.submit_succeeded(ticket) {
            return;
        }
        match ticket.mode {
            DialogMode::Create => {
                self.records.push(record);
            }
            DialogMode::Edit => {
                match self.records.iter_mut().find(|r| r.id == record.id) {
                    Some(existing) => *existing = record,
                    None => {
                        // The row vanished under us (deleted elsewhere);
                        // a manual reload resyncs.
                        tracing::warn!(
                            resource = %self.config.name(),
                            id = %record.id,
                            "updated record no longer present locally"
                        );
                    }
                }
            }
        }
        self.pagination.clamp(self.filtered().len());
    }

    /// Delete a record. The local collection changes only on server
    /// success, after which the current page is re-clamped.
    pub async fn delete(&mut self, id: &RecordId) -> Result<()> {
        self.client.remove(id).await?;
        self.records.retain(|r| &r.id != id);
        self.pagination.clamp(self.filtered().len());
        Ok(())
    }

    /// Serialize the current filtered projection to CSV. Column order and
    /// inclusion follow the same visibility model the table renders from.
    pub fn export_csv(&self) -> Result<Vec<u8>> {
        export::write_csv(&self.config, &self.columns, &self.filtered())
    }
}

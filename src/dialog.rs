//! CRUD dialog/form state machine.
//!
//! One controller covers both create and edit:
//!
//! ```text
//! Closed -> Open(Create) -> Submitting(Create) -> Closed
//! Closed -> Open(Edit)   -> Submitting(Edit)   -> Closed
//!                           Submitting(_)      -> Open(_)   on failure
//! ```
//!
//! The dialog never silently closes on failure: validation failures attach
//! per-field messages, transport and server failures attach a single
//! form-level message, and the form keeps its in-progress values either way.
//!
//! Submission is split into two phases so an event-driven caller can run
//! the network call wherever it likes: [`DialogController::begin_submit`]
//! validates and hands out a [`SubmitTicket`], and the eventual result is
//! applied with [`DialogController::submit_succeeded`] or
//! [`DialogController::submit_failed`]. Each ticket carries a generation
//! stamp; closing or reopening the dialog bumps the generation, so a
//! response that arrives after its dialog went away is recognized as stale
//! and discarded rather than applied to unrelated state.

use crate::error::{FieldErrors, Result, TabulaError};
use crate::record::{FieldMap, FieldValue, Record, RecordId};
use crate::resource::ResourceConfig;
use crate::schema::FieldKind;

/// Whether the dialog is creating a new record or editing an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogMode {
    Create,
    Edit,
}

/// Dialog lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DialogPhase {
    #[default]
    Closed,
    Open(DialogMode),
    Submitting(DialogMode),
}

/// Handle for one in-flight submission.
#[derive(Debug, Clone)]
pub struct SubmitTicket {
    generation: u64,
    pub mode: DialogMode,
    /// Target id in edit mode; `None` for create.
    pub id: Option<RecordId>,
    /// Form values captured at submit time.
    pub fields: FieldMap,
}

#[derive(Debug, Clone, Default)]
pub struct DialogController {
    phase: DialogPhase,
    form: FieldMap,
    editing_id: Option<RecordId>,
    field_errors: FieldErrors,
    form_error: Option<String>,
    generation: u64,
}

impl DialogController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DialogPhase {
        self.phase
    }

    pub fn mode(&self) -> Option<DialogMode> {
        match self.phase {
            DialogPhase::Closed => None,
            DialogPhase::Open(mode) | DialogPhase::Submitting(mode) => Some(mode),
        }
    }

    pub fn is_open(&self) -> bool {
        self.phase != DialogPhase::Closed
    }

    pub fn is_submitting(&self) -> bool {
        matches!(self.phase, DialogPhase::Submitting(_))
    }

    /// Open in create mode, seeding the form from field defaults.
    pub fn open_create(&mut self, config: &ResourceConfig) {
        self.generation += 1;
        self.phase = DialogPhase::Open(DialogMode::Create);
        self.editing_id = None;
        self.form = config
            .fields()
            .iter()
            .map(|f| (f.name.clone(), f.default_value()))
            .collect();
        self.clear_errors();
    }

    /// Open in edit mode, seeding the form from the record's current
    /// values (falling back to field defaults for fields the record lacks).
    pub fn open_edit(&mut self, config: &ResourceConfig, record: &Record) {
        self.generation += 1;
        self.phase = DialogPhase::Open(DialogMode::Edit);
        self.editing_id = Some(record.id.clone());
        self.form = config
            .fields()
            .iter()
            .map(|f| {
                let value = record.get(&f.name).cloned().unwrap_or_else(|| f.default_value());
                (f.name.clone(), value)
            })
            .collect();
        self.clear_errors();
    }

    /// Update one in-progress form value. Checkbox values are coerced to
    /// booleans (a null stands for unchecked); select and radio store the
    /// option's value string, never the whole option. Ignored while a
    /// submission is in flight or the dialog is closed.
    pub fn change_field(&mut self, config: &ResourceConfig, name: &str, value: FieldValue) {
        if !matches!(self.phase, DialogPhase::Open(_)) {
            return;
        }
        let Some(schema) = config.field(name) else {
            return;
        };
        let value = match schema.kind {
            FieldKind::Checkbox => FieldValue::Bool(value.as_bool().unwrap_or(false)),
            _ => value,
        };
        self.form.insert(name.to_string(), value);
        // A fresh value clears that field's stale error.
        self.field_errors.remove(name);
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        self.form.get(name)
    }

    pub fn form(&self) -> &FieldMap {
        &self.form
    }

    pub fn field_error(&self, name: &str) -> Option<&str> {
        self.field_errors.get(name)
    }

    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    pub fn form_error(&self) -> Option<&str> {
        self.form_error.as_deref()
    }

    /// Validate and move to `Submitting`.
    ///
    /// On validation failure the dialog stays open with per-field messages
    /// attached and no ticket is issued, so no network call can happen.
    /// Rejects reentry while a submission is already in flight.
    pub fn begin_submit(&mut self, config: &ResourceConfig) -> Result<SubmitTicket> {
        let mode = match self.phase {
            DialogPhase::Open(mode) => mode,
            DialogPhase::Submitting(_) => {
                return Err(TabulaError::DialogState("a submission is already in flight"));
            }
            DialogPhase::Closed => {
                return Err(TabulaError::DialogState("no dialog is open"));
            }
        };

        let mut errors = FieldErrors::new();
        for schema in config.fields() {
            let value = self.form.get(&schema.name).cloned().unwrap_or_default();
            if let Some(message) = schema.validate(&value) {
                errors.insert(schema.name.clone(), message);
            }
        }
        if !errors.is_empty() {
            self.field_errors = errors.clone();
            return Err(TabulaError::Validation(errors));
        }

        self.clear_errors();
        self.phase = DialogPhase::Submitting(mode);
        Ok(SubmitTicket {
            generation: self.generation,
            mode,
            id: self.editing_id.clone(),
            fields: self.form.clone(),
        })
    }

    /// Apply a successful submission result. Returns `false` when the
    /// ticket is stale (the dialog was closed or reopened meanwhile), in
    /// which case nothing changes and the caller must discard the result.
    pub fn submit_succeeded(&mut self, ticket: &SubmitTicket) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(mode = ?ticket.mode, "discarding stale submission result");
            return false;
        }
        self.generation += 1;
        self.phase = DialogPhase::Closed;
        self.editing_id = None;
        self.form.clear();
        self.clear_errors();
        true
    }

    /// Apply a failed submission result. The dialog reopens in its prior
    /// mode with the error attached; stale tickets are discarded.
    pub fn submit_failed(&mut self, ticket: &SubmitTicket, error: &TabulaError) -> bool {
        if ticket.generation != self.generation {
            tracing::debug!(mode = ?ticket.mode, "discarding stale submission failure");
            return false;
        }
        self.phase = DialogPhase::Open(ticket.mode);
        match error {
            TabulaError::Validation(errors) => self.field_errors = errors.clone(),
            other => self.form_error = Some(other.to_string()),
        }
        true
    }

    /// Close without submitting. Any in-flight submission becomes stale.
    pub fn close(&mut self) {
        self.generation += 1;
        self.phase = DialogPhase::Closed;
        self.editing_id = None;
        self.form.clear();
        self.clear_errors();
    }

    fn clear_errors(&mut self) {
        self.field_errors = FieldErrors::new();
        self.form_error = None;
    }
}

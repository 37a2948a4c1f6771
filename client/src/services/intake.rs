//! Field intake: form editing and field creation

use shared::{Field, FieldAttributes, FieldForm, FieldId};

use super::state::{Completed, ResultSlot, SubmissionState, Ticket};
use crate::error::ClientResult;
use crate::external::ApiClient;

/// A create request ready to be sent
#[derive(Debug)]
pub struct PendingField {
    ticket: Ticket<u64>,
    attributes: FieldAttributes,
}

impl PendingField {
    pub fn ticket(&self) -> &Ticket<u64> {
        &self.ticket
    }

    pub fn attributes(&self) -> &FieldAttributes {
        &self.attributes
    }

    pub async fn send(self, api: &ApiClient) -> Completed<u64, Field> {
        let outcome = api.create_field(&self.attributes).await;
        Completed {
            ticket: self.ticket,
            outcome,
        }
    }
}

/// Owns one field form and the result of submitting it
///
/// Results are keyed by form revision, so an edit made while a request is
/// outstanding discards that request's result. The request itself still
/// counts as outstanding until it is applied.
#[derive(Debug, Default)]
pub struct FieldIntake {
    form: FieldForm,
    revision: u64,
    slot: ResultSlot<u64, Field>,
    outstanding: Option<Ticket<u64>>,
}

impl FieldIntake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_form(form: FieldForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &FieldForm {
        &self.form
    }

    /// Change the form; any previous outcome is cleared
    pub fn edit(&mut self, change: impl FnOnce(&mut FieldForm)) {
        change(&mut self.form);
        self.revision += 1;
        self.slot.reset();
    }

    pub fn state(&self) -> &SubmissionState<Field> {
        self.slot.state()
    }

    /// Whether the submit trigger should be enabled
    pub fn can_submit(&self) -> bool {
        self.outstanding.is_none()
    }

    /// Id of the field created from the current form, if any
    pub fn created_id(&self) -> Option<&FieldId> {
        self.slot.state().result().map(|field| &field.id)
    }

    /// Validate the form and start a submission
    ///
    /// Returns `Ok(None)` while a previous submission is outstanding. A
    /// validation failure leaves the form untouched for correction.
    pub fn prepare(&mut self) -> ClientResult<Option<PendingField>> {
        if let Some(outstanding) = &self.outstanding {
            tracing::warn!(
                revision = self.revision,
                outstanding = *outstanding.key(),
                "Field submission already in flight"
            );
            return Ok(None);
        }

        let attributes = match self.form.parse() {
            Ok(attributes) => attributes,
            Err(e) => {
                tracing::debug!(field = e.field, "Field form rejected: {}", e.message);
                self.slot.fail(self.revision, e.clone().into());
                return Err(e.into());
            }
        };

        let ticket = self.slot.begin(self.revision);
        self.outstanding = Some(ticket.clone());
        Ok(Some(PendingField { ticket, attributes }))
    }

    /// Record a finished request; it no longer blocks submission even when
    /// its result is discarded
    pub fn apply(&mut self, completed: Completed<u64, Field>) -> bool {
        if self.outstanding.as_ref() == Some(&completed.ticket) {
            self.outstanding = None;
        }
        self.slot.apply(completed)
    }

    /// Validate, create the field and record the outcome
    pub async fn submit(&mut self, api: &ApiClient) -> ClientResult<Option<Field>> {
        let Some(pending) = self.prepare()? else {
            return Ok(None);
        };

        let completed = pending.send(api).await;
        let outcome = completed.outcome.clone();
        self.apply(completed);
        outcome.map(Some)
    }
}

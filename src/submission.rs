// Submission Handler
// Turns the current form into exactly one insert. No retry, no batching, no
// idempotency key: a resubmit after a timed-out success can duplicate a row.
// Required fields are not re-checked here.

use crate::config::TableNames;
use crate::form::{BookingForm, ContactForm, Dialog, Form, FormState};
use crate::gateway::{DataGateway, GatewayError};
use crate::notify::{Notification, Notifier};
use crate::wizard::BookingWizard;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

pub const PENDING_STATUS: &str = "pending";

#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionOutcome {
    Submitted,
    /// The form was kept as typed so the user can resubmit.
    Failed(GatewayError),
}

impl SubmissionOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmissionOutcome::Submitted)
    }
}

/// Reference selected on the page, merged into the booking at submit time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingContext {
    pub package_id: Option<String>,
    pub destination_id: Option<String>,
}

impl BookingContext {
    pub fn package(id: impl Into<String>) -> Self {
        Self {
            package_id: Some(id.into()),
            destination_id: None,
        }
    }

    pub fn destination(id: impl Into<String>) -> Self {
        Self {
            package_id: None,
            destination_id: Some(id.into()),
        }
    }
}

struct Messages {
    success_title: &'static str,
    success_body: &'static str,
    failure_title: &'static str,
    failure_body: &'static str,
}

const BOOKING_MESSAGES: Messages = Messages {
    success_title: "Booking Submitted!",
    success_body: "We'll confirm your booking within 24 hours.",
    failure_title: "Error",
    failure_body: "Failed to submit booking.",
};

const CONTACT_MESSAGES: Messages = Messages {
    success_title: "Message Sent!",
    success_body: "We'll get back to you within 24 hours to discuss your travel plans.",
    failure_title: "Error",
    failure_body: "Failed to send message. Please try again.",
};

pub struct SubmissionHandler {
    gateway: Arc<dyn DataGateway>,
    notifier: Arc<dyn Notifier>,
    tables: TableNames,
}

impl SubmissionHandler {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        notifier: Arc<dyn Notifier>,
        tables: TableNames,
    ) -> Self {
        Self {
            gateway,
            notifier,
            tables,
        }
    }

    /// Landing-page booking dialog. Success resets the form and closes the dialog.
    pub async fn submit_booking(
        &self,
        dialog: &mut Dialog<BookingForm>,
        context: BookingContext,
    ) -> SubmissionOutcome {
        let mut record = dialog.form.current().clone();
        if context.package_id.is_some() {
            record.package_id = context.package_id;
        }
        if context.destination_id.is_some() {
            record.destination_id = context.destination_id;
        }

        let outcome = self
            .insert_row(&self.tables.bookings, to_row(&record), &BOOKING_MESSAGES)
            .await;
        if outcome.is_submitted() {
            dialog.close();
        }
        outcome
    }

    /// Contact / enquiry form. Success resets the form.
    pub async fn submit_contact(&self, form: &mut FormState<ContactForm>) -> SubmissionOutcome {
        let outcome = self
            .insert_row(
                &self.tables.contact_submissions,
                to_row(form.current()),
                &CONTACT_MESSAGES,
            )
            .await;
        if outcome.is_submitted() {
            form.reset();
        }
        outcome
    }

    /// Final step of the package wizard: one pending booking with its total.
    pub async fn submit_package_booking(&self, wizard: &mut BookingWizard) -> SubmissionOutcome {
        let row = to_row(wizard.form.current()).and_then(|row| {
            let Value::Object(mut fields) = row else {
                return Err(GatewayError::Decode("booking is not a record".to_string()));
            };
            fields.insert("package_id".to_string(), Value::from(wizard.package().id.clone()));
            fields.insert(
                "user_id".to_string(),
                wizard.user_id().map_or(Value::Null, Value::from),
            );
            fields.insert("total_amount".to_string(), Value::from(wizard.total_amount()));
            fields.insert("status".to_string(), Value::from(PENDING_STATUS));
            Ok(Value::Object(fields))
        });

        let result = match row {
            Ok(row) => self.gateway.insert(&self.tables.bookings, row).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(package = %wizard.package().id, "package booking submitted");
                self.notifier.notify(Notification::success(
                    "Booking Submitted!",
                    "We'll contact you within 24 hours to confirm your booking details.",
                ));
                wizard.close();
                SubmissionOutcome::Submitted
            }
            Err(err) => {
                warn!(package = %wizard.package().id, error = %err, "package booking failed");
                self.notifier
                    .notify(Notification::error("Booking Failed", err.to_string()));
                SubmissionOutcome::Failed(err)
            }
        }
    }

    async fn insert_row(
        &self,
        table: &str,
        row: Result<Value, GatewayError>,
        messages: &Messages,
    ) -> SubmissionOutcome {
        let result = match row {
            Ok(row) => self.gateway.insert(table, row).await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!(table, "submission stored");
                self.notifier.notify(Notification::success(
                    messages.success_title,
                    messages.success_body,
                ));
                SubmissionOutcome::Submitted
            }
            Err(err) => {
                // Every cause collapses into one generic message for the user.
                warn!(table, error = %err, "submission failed");
                self.notifier.notify(Notification::error(
                    messages.failure_title,
                    messages.failure_body,
                ));
                SubmissionOutcome::Failed(err)
            }
        }
    }
}

fn to_row<F: Form>(form: &F) -> Result<Value, GatewayError> {
    serde_json::to_value(form).map_err(|e| GatewayError::Decode(e.to_string()))
}

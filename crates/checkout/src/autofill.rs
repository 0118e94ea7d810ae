//! Best-effort address prefill from the postal code.

use tokio::sync::Mutex;

use crate::field::Field;
use crate::form::CheckoutForm;
use crate::postal::PostalLookup;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AutofillOutcome {
    /// The postal code does not hold 8 digits yet.
    Skipped,
    /// The service does not know the postal code.
    NotFound,
    /// The lookup failed; the form is left as is.
    Failed,
    /// A newer lookup started, or the postal code changed, while this one was in flight.
    Stale,
    /// Fields that were written.
    Applied(Vec<Field>),
}

/// Resolve the form's postal code and prefill the address fields.
///
/// The form lock is released while the lookup is in flight, so the shopper can
/// keep typing. Failures never surface as errors.
pub async fn autofill_address(form: &Mutex<CheckoutForm>, lookup: &dyn PostalLookup) -> AutofillOutcome {
    let Some(ticket) = form.lock().await.begin_postal_lookup() else {
        return AutofillOutcome::Skipped;
    };

    match lookup.lookup(ticket.postal_code()).await {
        Ok(Some(address)) => {
            let outcome = form.lock().await.apply_postal_lookup(&ticket, &address);
            tracing::debug!(postal_code = ticket.postal_code(), ?outcome, "postal lookup resolved");
            outcome
        }
        Ok(None) => {
            tracing::info!(postal_code = ticket.postal_code(), "postal code not found");
            AutofillOutcome::NotFound
        }
        Err(err) => {
            tracing::warn!(postal_code = ticket.postal_code(), error = %err, "postal lookup failed");
            AutofillOutcome::Failed
        }
    }
}

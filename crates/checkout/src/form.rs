//! Checkout form state.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::autofill::AutofillOutcome;
use crate::error::CheckoutError;
use crate::field::Field;
use crate::format::{format_expiry, format_postal_code, postal_code_digits};
use crate::postal::Address;
use crate::validation::{FieldError, ValidationReport, validate_field};

/// Values, inline errors and per-field edit revisions.
///
/// Every write bumps the field's revision. A postal lookup records the
/// revisions it started from so its result can only fill fields nobody touched
/// in the meantime.
#[derive(Debug, Clone)]
pub struct CheckoutForm {
    values: BTreeMap<Field, String>,
    revisions: BTreeMap<Field, u64>,
    errors: BTreeMap<Field, FieldError>,
    lookup_sequence: u64,
}

/// Snapshot taken when a postal lookup starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTicket {
    sequence: u64,
    postal_code: String,
    postal_revision: u64,
    baseline: [(Field, u64); 4],
}

impl LookupTicket {
    /// The 8 postal code digits to resolve.
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingAddress {
    pub postal_code: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub neighborhood: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
}

/// Card data kept after submission. The full number and CVV are not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentDetails {
    pub card_last_four: String,
    pub expiry: String,
}

/// A fully valid form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSubmission {
    pub full_name: String,
    pub email: String,
    pub shipping: ShippingAddress,
    pub payment: PaymentDetails,
}

impl CheckoutForm {
    /// Empty form with the country preset and locked.
    pub fn new(country: impl Into<String>) -> Self {
        let mut values: BTreeMap<Field, String> = Field::ALL.iter().map(|f| (*f, String::new())).collect();
        values.insert(Field::Country, country.into());

        Self {
            values,
            revisions: Field::ALL.iter().map(|f| (*f, 0)).collect(),
            errors: BTreeMap::new(),
            lookup_sequence: 0,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or_default()
    }

    pub fn revision(&self, field: Field) -> u64 {
        self.revisions.get(&field).copied().unwrap_or_default()
    }

    /// Inline error currently shown for `field`.
    pub fn error(&self, field: Field) -> Option<FieldError> {
        self.errors.get(&field).copied()
    }

    pub fn errors(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.errors.iter().map(|(f, e)| (*f, *e))
    }

    /// Store user input, applying the postal code and expiry masks.
    ///
    /// A field already showing an error is re-checked so the message clears as
    /// soon as the input becomes valid.
    pub fn set_value(&mut self, field: Field, input: &str) -> Result<(), FieldError> {
        if !field.is_editable() {
            return Err(FieldError::ReadOnly);
        }

        let value = match field {
            Field::PostalCode => format_postal_code(input),
            Field::Expiry => format_expiry(input),
            _ => input.to_string(),
        };
        self.write(field, value);

        if self.errors.contains_key(&field) {
            let _ = self.check(field);
        }
        Ok(())
    }

    /// Validate `field` when it loses focus.
    pub fn blur(&mut self, field: Field) -> Result<(), FieldError> {
        self.check(field)
    }

    /// Validate every field, recording inline errors.
    pub fn validate_all(&mut self) -> ValidationReport {
        let mut report = ValidationReport::default();
        for field in Field::ALL {
            if let Err(error) = self.check(field) {
                report.insert(field, error);
            }
        }
        report
    }

    /// Validate everything and, if all rules pass, produce the submission.
    pub fn submit(&mut self) -> Result<CheckoutSubmission, CheckoutError> {
        let report = self.validate_all();
        if !report.is_empty() {
            tracing::debug!(invalid = %report, "checkout submission rejected");
            return Err(CheckoutError::Invalid(report));
        }

        let card = self.value(Field::CardNumber).trim();
        let skip = card.chars().count().saturating_sub(4);
        let card_last_four: String = card.chars().skip(skip).collect();

        Ok(CheckoutSubmission {
            full_name: self.trimmed(Field::FullName),
            email: self.trimmed(Field::Email),
            shipping: ShippingAddress {
                postal_code: self.trimmed(Field::PostalCode),
                street: self.trimmed(Field::Street),
                number: self.trimmed(Field::Number),
                complement: self.optional(Field::Complement),
                neighborhood: self.optional(Field::Neighborhood),
                city: self.trimmed(Field::City),
                state: self.trimmed(Field::State),
                country: self.trimmed(Field::Country),
            },
            payment: PaymentDetails {
                card_last_four,
                expiry: self.trimmed(Field::Expiry),
            },
        })
    }

    /// Start a postal lookup if the postal code holds exactly 8 digits.
    ///
    /// Starting a lookup supersedes any lookup still in flight.
    pub fn begin_postal_lookup(&mut self) -> Option<LookupTicket> {
        let digits = postal_code_digits(self.value(Field::PostalCode));
        if digits.len() != 8 {
            return None;
        }

        self.lookup_sequence += 1;
        Some(LookupTicket {
            sequence: self.lookup_sequence,
            postal_code: digits,
            postal_revision: self.revision(Field::PostalCode),
            baseline: Field::AUTOFILL.map(|f| (f, self.revision(f))),
        })
    }

    /// Fill address fields from a resolved lookup.
    ///
    /// Nothing is written if a newer lookup was started or the postal code was
    /// edited since `ticket` was issued. Fields edited since then keep the
    /// user's value, and empty parts of `address` are not written.
    pub fn apply_postal_lookup(&mut self, ticket: &LookupTicket, address: &Address) -> AutofillOutcome {
        if ticket.sequence != self.lookup_sequence || ticket.postal_revision != self.revision(Field::PostalCode) {
            tracing::debug!(postal_code = %ticket.postal_code, "discarding stale postal lookup");
            return AutofillOutcome::Stale;
        }

        let mut filled = Vec::new();
        for (field, baseline) in ticket.baseline {
            let value = match field {
                Field::Street => &address.street,
                Field::Neighborhood => &address.neighborhood,
                Field::City => &address.city,
                Field::State => &address.state,
                _ => continue,
            };
            if value.is_empty() || self.revision(field) != baseline {
                continue;
            }
            self.write(field, value.clone());
            self.errors.remove(&field);
            filled.push(field);
        }

        AutofillOutcome::Applied(filled)
    }

    fn write(&mut self, field: Field, value: String) {
        self.values.insert(field, value);
        *self.revisions.entry(field).or_default() += 1;
    }

    fn check(&mut self, field: Field) -> Result<(), FieldError> {
        let result = validate_field(field, self.value(field));
        match result {
            Ok(()) => self.errors.remove(&field),
            Err(error) => self.errors.insert(field, error),
        };
        result
    }

    fn trimmed(&self, field: Field) -> String {
        self.value(field).trim().to_string()
    }

    fn optional(&self, field: Field) -> Option<String> {
        let value = self.trimmed(field);
        (!value.is_empty()).then_some(value)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn filled_form() -> CheckoutForm {
        let mut form = CheckoutForm::new("Brasil");
        for (field, value) in [
            (Field::FullName, "Ana Souza"),
            (Field::Email, "ana@example.com"),
            (Field::PostalCode, "01310100"),
            (Field::Street, "Avenida Paulista"),
            (Field::Number, "1000"),
            (Field::City, "São Paulo"),
            (Field::State, "SP"),
            (Field::CardNumber, "4111111111111111"),
            (Field::Expiry, "0130"),
            (Field::Cvv, "123"),
        ] {
            form.set_value(field, value).unwrap();
        }
        form
    }

    fn paulista() -> Address {
        Address {
            street: "Avenida Paulista".to_string(),
            neighborhood: "Bela Vista".to_string(),
            city: "São Paulo".to_string(),
            state: "SP".to_string(),
        }
    }

    #[test]
    fn country_is_preset_and_read_only() {
        let mut form = CheckoutForm::new("Brasil");
        assert_eq!(form.value(Field::Country), "Brasil");
        assert_eq!(form.set_value(Field::Country, "Portugal"), Err(FieldError::ReadOnly));
        assert_eq!(form.value(Field::Country), "Brasil");
    }

    #[test]
    fn masks_are_applied_on_input() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "01310100").unwrap();
        form.set_value(Field::Expiry, "1225").unwrap();
        assert_eq!(form.value(Field::PostalCode), "01310-100");
        assert_eq!(form.value(Field::Expiry), "12/25");
    }

    #[test]
    fn blur_records_and_clears_inline_errors() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::CardNumber, "411111111111111").unwrap();
        assert_eq!(form.blur(Field::CardNumber), Err(FieldError::InvalidCardNumber));
        assert_eq!(form.error(Field::CardNumber), Some(FieldError::InvalidCardNumber));

        form.set_value(Field::CardNumber, "4111111111111111").unwrap();
        assert_eq!(form.error(Field::CardNumber), None);
    }

    #[test]
    fn untouched_fields_have_no_error_until_validated() {
        let mut form = CheckoutForm::new("Brasil");
        assert_eq!(form.errors().count(), 0);
        let report = form.validate_all();
        assert_eq!(report.get(Field::FullName), Some(FieldError::Required));
        assert_eq!(report.get(Field::Complement), None);
        assert_eq!(form.error(Field::Cvv), Some(FieldError::Required));
    }

    #[test]
    fn submit_reports_every_invalid_field() {
        let mut form = filled_form();
        form.set_value(Field::Expiry, "1325").unwrap();
        form.set_value(Field::Cvv, "12").unwrap();

        let err = form.submit().unwrap_err();
        let report = err.report().unwrap();
        assert_eq!(report.len(), 2);
        assert_eq!(report.get(Field::Expiry), Some(FieldError::InvalidExpiry));
        assert_eq!(report.get(Field::Cvv), Some(FieldError::InvalidCvv));
    }

    #[test]
    fn valid_form_submits_without_full_card_number() {
        let mut form = filled_form();
        form.set_value(Field::Complement, "  ").unwrap();

        let submission = form.submit().unwrap();
        assert_eq!(submission.full_name, "Ana Souza");
        assert_eq!(submission.shipping.postal_code, "01310-100");
        assert_eq!(submission.shipping.complement, None);
        assert_eq!(submission.shipping.country, "Brasil");
        assert_eq!(submission.payment.card_last_four, "1111");
        assert_eq!(submission.payment.expiry, "01/30");
    }

    #[test]
    fn non_ascii_card_digits_block_submission() {
        let mut form = filled_form();
        form.set_value(Field::CardNumber, "१२३४५६७८९०१२३४५६").unwrap();

        let err = form.submit().unwrap_err();
        assert_eq!(err.report().unwrap().get(Field::CardNumber), Some(FieldError::InvalidCardNumber));
    }

    #[test]
    fn lookup_needs_eight_digits() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "0131010").unwrap();
        assert!(form.begin_postal_lookup().is_none());

        form.set_value(Field::PostalCode, "01310100").unwrap();
        let ticket = form.begin_postal_lookup().unwrap();
        assert_eq!(ticket.postal_code(), "01310100");
    }

    #[test]
    fn lookup_fills_untouched_address_fields() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "01310-100").unwrap();
        let ticket = form.begin_postal_lookup().unwrap();

        let outcome = form.apply_postal_lookup(&ticket, &paulista());
        assert_eq!(
            outcome,
            AutofillOutcome::Applied(vec![Field::Street, Field::Neighborhood, Field::City, Field::State])
        );
        assert_eq!(form.value(Field::City), "São Paulo");
        assert_eq!(form.value(Field::Neighborhood), "Bela Vista");
    }

    #[test]
    fn lookup_keeps_fields_edited_while_in_flight() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "01310-100").unwrap();
        let ticket = form.begin_postal_lookup().unwrap();
        form.set_value(Field::Street, "Rua Augusta").unwrap();

        let outcome = form.apply_postal_lookup(&ticket, &paulista());
        assert_eq!(
            outcome,
            AutofillOutcome::Applied(vec![Field::Neighborhood, Field::City, Field::State])
        );
        assert_eq!(form.value(Field::Street), "Rua Augusta");
    }

    #[test]
    fn superseded_lookup_is_discarded() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "01310-100").unwrap();
        let first = form.begin_postal_lookup().unwrap();
        form.set_value(Field::PostalCode, "20040-020").unwrap();
        let second = form.begin_postal_lookup().unwrap();

        assert_eq!(form.apply_postal_lookup(&first, &paulista()), AutofillOutcome::Stale);
        assert_eq!(form.value(Field::Street), "");

        let rio = Address {
            street: "Avenida Rio Branco".to_string(),
            city: "Rio de Janeiro".to_string(),
            state: "RJ".to_string(),
            ..Address::default()
        };
        assert_eq!(
            form.apply_postal_lookup(&second, &rio),
            AutofillOutcome::Applied(vec![Field::Street, Field::City, Field::State])
        );
        assert_eq!(form.value(Field::State), "RJ");
    }

    #[test]
    fn postal_code_edit_invalidates_ticket() {
        let mut form = CheckoutForm::new("Brasil");
        form.set_value(Field::PostalCode, "01310-100").unwrap();
        let ticket = form.begin_postal_lookup().unwrap();
        form.set_value(Field::PostalCode, "01310-10").unwrap();

        assert_eq!(form.apply_postal_lookup(&ticket, &paulista()), AutofillOutcome::Stale);
    }
}

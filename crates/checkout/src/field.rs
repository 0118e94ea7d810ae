use serde::{Deserialize, Serialize};

/// Every input on the checkout form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FullName,
    Email,
    PostalCode,
    Street,
    Number,
    Complement,
    Neighborhood,
    City,
    State,
    Country,
    CardNumber,
    Expiry,
    Cvv,
}

impl Field {
    /// All fields, in display order.
    pub const ALL: [Field; 13] = [
        Field::FullName,
        Field::Email,
        Field::PostalCode,
        Field::Street,
        Field::Number,
        Field::Complement,
        Field::Neighborhood,
        Field::City,
        Field::State,
        Field::Country,
        Field::CardNumber,
        Field::Expiry,
        Field::Cvv,
    ];

    /// Fields a successful postal lookup may prefill.
    pub const AUTOFILL: [Field; 4] = [Field::Street, Field::Neighborhood, Field::City, Field::State];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::Email => "email",
            Field::PostalCode => "postal_code",
            Field::Street => "street",
            Field::Number => "number",
            Field::Complement => "complement",
            Field::Neighborhood => "neighborhood",
            Field::City => "city",
            Field::State => "state",
            Field::Country => "country",
            Field::CardNumber => "card_number",
            Field::Expiry => "expiry",
            Field::Cvv => "cvv",
        }
    }

    pub fn is_required(&self) -> bool {
        !matches!(self, Field::Complement | Field::Neighborhood | Field::Country)
    }

    /// The country is fixed when the form is created.
    pub fn is_editable(&self) -> bool {
        !matches!(self, Field::Country)
    }
}

impl core::fmt::Display for Field {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

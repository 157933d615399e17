// validation.rs

use std::fmt;

use serde_json::{Map, Value};

use crate::models::{ProductParams, UserParams};

pub const BLANK_MESSAGE: &str = "must be given please";
pub const NOT_A_NUMBER: &str = "is not a number";
pub const NOT_AN_INTEGER: &str = "must be an integer";
pub const OUT_OF_RANGE: &str = "is out of range";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Field-level errors, kept in the order the checks ran.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_messages().join(", "))
    }
}

impl std::error::Error for ValidationErrors {}

impl ValidationErrors {
    pub fn single(field: &'static str, message: impl Into<String>) -> Self {
        let mut errors = ValidationErrors::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded against one field.
    pub fn on(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `"Name must be given please"` style messages.
    pub fn full_messages(&self) -> Vec<String> {
        self.errors
            .iter()
            .map(|e| format!("{} {}", humanize(e.field), e.message))
            .collect()
    }

    /// `{"name": ["must be given please"], ...}`
    pub fn to_json(&self) -> Value {
        let mut fields = Map::new();
        for error in &self.errors {
            let entry = fields
                .entry(error.field)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(messages) = entry {
                messages.push(Value::String(error.message.clone()));
            }
        }
        Value::Object(fields)
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, ValidationErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }
}

// price_in_cents -> Price in cents
fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |v| v.trim().is_empty())
}

/// Accepts integral JSON numbers and strings of the form `[+-]digits`.
pub fn parse_price_in_cents(value: Option<&Value>) -> Result<i64, &'static str> {
    match value {
        Some(Value::Number(n)) if n.is_i64() => n.as_i64().ok_or(NOT_AN_INTEGER),
        Some(Value::Number(n)) if n.is_u64() => Err(OUT_OF_RANGE),
        Some(Value::Number(_)) => Err(NOT_AN_INTEGER),
        Some(Value::String(raw)) => {
            let numeric = raw
                .trim()
                .parse::<f64>()
                .map(f64::is_finite)
                .unwrap_or(false);
            if !numeric {
                return Err(NOT_A_NUMBER);
            }
            let digits = raw.strip_prefix(['+', '-']).unwrap_or(raw);
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(NOT_AN_INTEGER);
            }
            raw.parse::<i64>().map_err(|_| OUT_OF_RANGE)
        }
        _ => Err(NOT_A_NUMBER),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidProduct {
    pub name: String,
    pub description: String,
    pub price_in_cents: i64,
}

pub fn validate_product(params: &ProductParams) -> Result<ValidProduct, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(params.description.as_deref()) {
        errors.add("description", BLANK_MESSAGE);
    }
    if is_blank(params.name.as_deref()) {
        errors.add("name", BLANK_MESSAGE);
    }
    let price_in_cents = match parse_price_in_cents(params.price_in_cents.as_ref()) {
        Ok(cents) => cents,
        Err(message) => {
            errors.add("price_in_cents", message);
            0
        }
    };

    errors.into_result(|| ValidProduct {
        name: params.name.clone().unwrap_or_default(),
        description: params.description.clone().unwrap_or_default(),
        price_in_cents,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ValidUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

pub fn validate_user(params: &UserParams) -> Result<ValidUser, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if is_blank(params.email.as_deref()) {
        errors.add("email", "can't be blank");
    }
    if params.password.as_deref().map_or(true, str::is_empty) {
        errors.add("password", "can't be blank");
    }
    if let Some(confirmation) = params.password_confirmation.as_deref() {
        if Some(confirmation) != params.password.as_deref() {
            errors.add("password_confirmation", "doesn't match Password");
        }
    }

    errors.into_result(|| ValidUser {
        first_name: params.first_name.clone().unwrap_or_default().trim().to_string(),
        last_name: params.last_name.clone().unwrap_or_default().trim().to_string(),
        email: params
            .email
            .clone()
            .unwrap_or_default()
            .trim()
            .to_lowercase(),
        password: params.password.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(name: &str, description: &str, price: Value) -> ProductParams {
        ProductParams {
            name: Some(name.into()),
            description: Some(description.into()),
            price_in_cents: Some(price),
        }
    }

    #[test]
    fn accepts_a_complete_product() {
        let valid = validate_product(&params("Stuff", "Useless", json!(1000))).unwrap();
        assert_eq!(valid.name, "Stuff");
        assert_eq!(valid.description, "Useless");
        assert_eq!(valid.price_in_cents, 1000);
    }

    #[test]
    fn blank_name_and_description_are_rejected() {
        let errors = validate_product(&params("  ", "", json!(1000))).unwrap_err();
        assert_eq!(errors.on("name"), vec![BLANK_MESSAGE]);
        assert_eq!(errors.on("description"), vec![BLANK_MESSAGE]);
        assert!(errors.on("price_in_cents").is_empty());
        assert_eq!(
            errors.full_messages(),
            vec![
                "Description must be given please".to_string(),
                "Name must be given please".to_string(),
            ]
        );
    }

    #[test]
    fn missing_fields_are_blank() {
        let errors = validate_product(&ProductParams::default()).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.on("price_in_cents"), vec![NOT_A_NUMBER]);
    }

    #[test]
    fn fractional_price_is_rejected() {
        let errors = validate_product(&params("Iphone", "Phone", json!(10.5))).unwrap_err();
        assert_eq!(errors.on("price_in_cents"), vec![NOT_AN_INTEGER]);

        let errors = validate_product(&params("Iphone", "Phone", json!("10.5"))).unwrap_err();
        assert_eq!(errors.on("price_in_cents"), vec![NOT_AN_INTEGER]);
    }

    #[test]
    fn price_strings_are_parsed() {
        assert_eq!(parse_price_in_cents(Some(&json!("700000"))), Ok(700000));
        assert_eq!(parse_price_in_cents(Some(&json!("-5"))), Ok(-5));
        assert_eq!(parse_price_in_cents(Some(&json!("abc"))), Err(NOT_A_NUMBER));
        assert_eq!(parse_price_in_cents(Some(&json!(""))), Err(NOT_A_NUMBER));
        assert_eq!(parse_price_in_cents(Some(&json!("NaN"))), Err(NOT_A_NUMBER));
        assert_eq!(parse_price_in_cents(Some(&json!(" 10 "))), Err(NOT_AN_INTEGER));
        assert_eq!(parse_price_in_cents(Some(&json!(true))), Err(NOT_A_NUMBER));
        assert_eq!(parse_price_in_cents(Some(&Value::Null)), Err(NOT_A_NUMBER));
    }

    #[test]
    fn oversized_integers_are_out_of_range() {
        assert_eq!(parse_price_in_cents(Some(&json!(u64::MAX))), Err(OUT_OF_RANGE));
        assert_eq!(
            parse_price_in_cents(Some(&json!("99999999999999999999"))),
            Err(OUT_OF_RANGE)
        );
        assert_eq!(parse_price_in_cents(Some(&json!(i64::MAX))), Ok(i64::MAX));
        assert_eq!(parse_price_in_cents(Some(&json!(1e30))), Err(NOT_AN_INTEGER));
    }

    #[test]
    fn errors_render_as_field_map() {
        let mut errors = ValidationErrors::single("name", BLANK_MESSAGE);
        errors.add("name", "is too short");
        assert_eq!(
            errors.to_json(),
            json!({"name": ["must be given please", "is too short"]})
        );
        assert_eq!(
            errors.to_string(),
            "Name must be given please, Name is too short"
        );
    }

    #[test]
    fn user_password_confirmation_must_match() {
        let user = UserParams {
            email: Some("ada@example.com".into()),
            password: Some("secret".into()),
            password_confirmation: Some("secrets".into()),
            ..Default::default()
        };
        let errors = validate_user(&user).unwrap_err();
        assert_eq!(errors.on("password_confirmation"), vec!["doesn't match Password"]);
    }

    #[test]
    fn user_email_is_normalized() {
        let user = UserParams {
            email: Some("  Ada@Example.com ".into()),
            password: Some("secret".into()),
            ..Default::default()
        };
        let valid = validate_user(&user).unwrap();
        assert_eq!(valid.email, "ada@example.com");
        assert_eq!(valid.first_name, "");
    }
}

use chrono::NaiveDateTime;
use diesel::{AsChangeset, Identifiable, Insertable, Queryable, Selectable};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::schema::{products, reviews, users};
use crate::validation::{ValidProduct, ValidUser};

pub fn now() -> NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

/// Formats a cent amount as dollars with exactly two fractional digits.
pub fn dollars_conversion(price_in_cents: i64) -> String {
    let price_in_dollars = price_in_cents as f64 / 100.0;
    format!("{:.2}", price_in_dollars)
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub price_in_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Product {
    pub fn dollars_conversion(&self) -> String {
        dollars_conversion(self.price_in_cents)
    }
}

#[derive(Insertable, Debug)]
#[diesel(table_name = products)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price_in_cents: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewProduct {
    pub fn new(product: ValidProduct, now: NaiveDateTime) -> Self {
        NewProduct {
            name: product.name,
            description: product.description,
            price_in_cents: product.price_in_cents,
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(AsChangeset, Debug)]
#[diesel(table_name = products)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price_in_cents: i64,
    pub updated_at: NaiveDateTime,
}

impl ProductChanges {
    pub fn new(product: ValidProduct, now: NaiveDateTime) -> Self {
        ProductChanges {
            name: product.name,
            description: product.description,
            price_in_cents: product.price_in_cents,
            updated_at: now,
        }
    }
}

/// Product attributes as submitted by a form, before validation.
///
/// `price_in_cents` stays untyped so that `"10.5"`, `10.5` and `"abc"` reach
/// the validator and come back as field errors instead of a 400.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ProductParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_in_cents: Option<Value>,
}

impl From<&Product> for ProductParams {
    fn from(product: &Product) -> Self {
        ProductParams {
            name: Some(product.name.clone()),
            description: Some(product.description.clone()),
            price_in_cents: Some(Value::from(product.price_in_cents)),
        }
    }
}

// Marks a key as present even when its value is null.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Partial product attributes for an update. The outer `Option` is `None`
/// when the key was left out; `Some(None)` is an explicit null.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct ProductUpdate {
    #[serde(default, deserialize_with = "present")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub price_in_cents: Option<Option<Value>>,
}

impl ProductUpdate {
    /// Fills every attribute left out of the update with the stored value.
    pub fn merged_onto(self, product: &Product) -> ProductParams {
        let stored = ProductParams::from(product);
        ProductParams {
            name: self.name.unwrap_or(stored.name),
            description: self.description.unwrap_or(stored.description),
            price_in_cents: self.price_in_cents.unwrap_or(stored.price_in_cents),
        }
    }
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct Review {
    pub id: i32,
    pub comment: Option<String>,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = reviews)]
pub struct NewReview {
    pub comment: Option<String>,
    pub product_id: Option<i32>,
    pub user_id: Option<i32>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Deserialize, Debug, Default)]
pub struct ReviewParams {
    pub comment: Option<String>,
}

#[derive(Queryable, Selectable, Identifiable, Serialize, Debug, Clone, PartialEq)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct User {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_digest: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_digest: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl NewUser {
    pub fn new(user: ValidUser, password_digest: String, now: NaiveDateTime) -> Self {
        NewUser {
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            password_digest,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Signup form. The plain-text password never leaves the controller.
#[derive(Deserialize, Serialize, Debug, Default)]
pub struct UserParams {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    #[serde(skip_serializing)]
    pub password_confirmation: Option<String>,
}

//! Common test utilities for building fields, forms and values.
use chrono::NaiveDate;
use shiki::prelude::*;

#[allow(dead_code)]
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[allow(dead_code)]
pub fn text_field(id: &str) -> Field {
    Field::builder(FieldType::Text, id).with_id(id).build()
}

#[allow(dead_code)]
pub fn number_field(id: &str) -> Field {
    Field::builder(FieldType::Number, id).with_id(id).build()
}

#[allow(dead_code)]
pub fn derived_field(id: &str, parents: &[&str], formula: &str) -> Field {
    Field::builder(FieldType::Number, id)
        .with_id(id)
        .derived(parents.iter().copied(), formula)
        .build()
}

/// Builds a value map from `(field id, value)` pairs.
#[allow(dead_code)]
pub fn values<const N: usize>(pairs: [(&str, FieldValue); N]) -> FormValues {
    pairs
        .into_iter()
        .map(|(id, value)| (id.to_string(), value))
        .collect()
}

/// An order form: `price` and `qty` feed the derived `subtotal`, which
/// feeds the derived `total` (`subtotal + shipping`).
///
/// `email` is required and must be a valid address.
#[allow(dead_code)]
pub fn create_order_form() -> FormSchema {
    let mut form = FormSchema::new("Order");
    let fields = vec![
        Field::builder(FieldType::Text, "Email")
            .with_id("email")
            .required(true)
            .with_rule(ValidationRule::required("Email is required"))
            .with_rule(ValidationRule::email("Please enter a valid email address"))
            .with_order(0)
            .build(),
        Field::builder(FieldType::Number, "Price")
            .with_id("price")
            .with_order(1)
            .build(),
        Field::builder(FieldType::Number, "Quantity")
            .with_id("qty")
            .with_default(1.0)
            .with_order(2)
            .build(),
        Field::builder(FieldType::Number, "Shipping")
            .with_id("shipping")
            .with_default(5.0)
            .with_order(3)
            .build(),
        Field::builder(FieldType::Number, "Total")
            .with_id("total")
            .derived(["subtotal", "shipping"], "subtotal + shipping")
            .with_order(5)
            .build(),
        Field::builder(FieldType::Number, "Subtotal")
            .with_id("subtotal")
            .derived(["price", "qty"], "price * qty")
            .with_order(4)
            .build(),
    ];
    for field in fields {
        form.add_field(field).unwrap();
    }
    form
}

/// A profile form whose `age` is derived from the `dob` date field.
#[allow(dead_code)]
pub fn create_profile_form() -> FormSchema {
    let mut form = FormSchema::new("Profile");
    form.add_field(
        Field::builder(FieldType::Date, "Date of birth")
            .with_id("dob")
            .build(),
    )
    .unwrap();
    form.add_field(
        Field::builder(FieldType::Number, "Age")
            .with_id("age")
            .derived(["dob"], "calculateAge(dob)")
            .build(),
    )
    .unwrap();
    form
}

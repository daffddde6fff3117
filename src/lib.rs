//! # Shiki - Form Schema, Derived Value and Validation Engine
//!
//! **Shiki** is the engine behind a form builder. A form is an ordered list of
//! typed fields; each field carries validation rules, and some fields are
//! *derived*: their value is computed from other fields by a small formula
//! such as `price * quantity` or `calculateAge(dob)`.
//!
//! ## Core Workflow
//!
//! 1.  **Describe the form**: Build `Field`s with `Field::builder` and collect them in a `FormSchema`.
//! 2.  **Open a session**: A `FormSession` owns the form, the entered values and the errors. Every
//!     value change recomputes derived fields in dependency order.
//! 3.  **Submit**: `FormSession::submit` validates every non-derived field against its rules.
//! 4.  **Persist**: Save and load forms through any `FormStore`, such as the in-memory
//!     `MemoryStore` or the on-disk `JsonFileStore`.
//!
//! Formulas are compiled by the `compiler` into an `Expression` tree and evaluated by the
//! `interpreter`, which records an `EvaluationTrace` that `TraceFormatter` renders as a
//! human-readable explanation.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use shiki::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let mut form = FormSchema::new("Order");
//!     form.add_field(Field::builder(FieldType::Number, "Price").with_id("price").build())?;
//!     form.add_field(Field::builder(FieldType::Number, "Quantity").with_id("qty").build())?;
//!     form.add_field(
//!         Field::builder(FieldType::Number, "Total")
//!             .with_id("total")
//!             .derived(["price", "qty"], "price * qty")
//!             .build(),
//!     )?;
//!
//!     let mut session = FormSession::builder().with_form(form).build()?;
//!     session.set_field_value("price", 2.5)?;
//!     session.set_field_value("qty", 4.0)?;
//!     println!("Total: {}", session.value("total").cloned().unwrap_or_default());
//!
//!     let outcome = session.submit();
//!     println!("Valid: {}", outcome.is_valid());
//!
//!     let mut store = MemoryStore::new();
//!     session.save(&mut store, "Order form")?;
//!     Ok(())
//! }
//! ```

pub mod ast;
pub mod compiler;
pub mod error;
pub mod evaluator;
pub mod interpreter;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod store;
pub mod trace;
pub mod validation;

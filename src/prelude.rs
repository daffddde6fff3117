//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types and traits from the shiki crate.
//!
//! # Example
//!
//! ```rust,no_run
//! use shiki::prelude::*;
//!
//! # fn run_example() -> Result<()> {
//! let store = JsonFileStore::builder("forms.json").build();
//! for form in store.list_sorted_by_updated()? {
//!     println!("{} ({} fields)", form.name, form.fields.len());
//! }
//! # Ok(())
//! # }
//! ```

// Form description
pub use crate::schema::{
    DependencyGraph, DerivedFieldConfig, Field, FieldBuilder, FieldType, FormSchema, FormSummary,
    MoveDirection, RuleKind, RuleParam, SelectOption, ValidationRule, default_rules_for,
};

// Values
pub use crate::ast::{FieldValue, FormValues};

// Formulas and evaluation
pub use crate::compiler::{Compiler, Formula, FormulaKind};
pub use crate::evaluator::{
    Clock, DerivedOutcome, FixedClock, SystemClock, compute_derived_outcome, compute_derived_value,
    compute_derived_value_now, recompute_derived,
};
pub use crate::validation::{FieldError, validate_field, validate_form};

// Session and persistence
pub use crate::session::{FormSession, SubmitOutcome};
pub use crate::store::{FormStore, JsonFileStore, KeyValueStore, MemoryStore};

// Error types
pub use crate::error::{EvaluationError, FormulaError, SchemaError, StoreError};

// Trace formatting
pub use crate::trace::TraceFormatter;

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

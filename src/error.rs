use crate::ast::FieldValue;
use thiserror::Error;

/// Errors that can occur while turning formula source text into an expression tree.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormulaError {
    #[error("Unexpected character '{character}' at position {position}")]
    UnexpectedCharacter { character: char, position: usize },

    #[error("Invalid number literal '{literal}' at position {position}")]
    InvalidNumber { literal: String, position: usize },

    #[error("Unexpected token '{found}' at position {position}, expected {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: usize,
    },

    #[error("Formula ended unexpectedly, expected {expected}")]
    UnexpectedEnd { expected: String },

    #[error("Formula is empty")]
    Empty,

    #[error("Formula nests deeper than {limit} levels at position {position}")]
    TooDeep { position: usize, limit: usize },
}

/// Errors that can occur while evaluating a compiled formula or a built-in function.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvaluationError {
    #[error("Variable '{0}' is not bound to any parent field")]
    UnboundVariable(String),

    #[error("Value '{found}' of field '{field_id}' cannot be used as a number")]
    NonNumericOperand { field_id: String, found: FieldValue },

    #[error("Value '{0}' is not a valid date")]
    InvalidDate(String),

    #[error("Formula could not be compiled: {0}")]
    Formula(#[from] FormulaError),
}

/// Errors raised when a form schema is mutated into, or found in, an invalid state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Field '{0}' appears more than once in the form")]
    DuplicateFieldId(String),

    #[error("Field '{0}' was not found in the form")]
    FieldNotFound(String),

    #[error("Derived field '{0}' lists itself as a parent")]
    SelfReference(String),

    #[error("Derived field '{field_id}' depends on unknown field '{parent_id}'")]
    UnknownParent { field_id: String, parent_id: String },

    #[error("Derived fields form a dependency cycle: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),

    #[error("Field '{field_id}' cannot change type from '{from}' to '{to}'")]
    TypeChange {
        field_id: String,
        from: String,
        to: String,
    },

    #[error("Field id cannot change from '{from}' to '{to}'")]
    IdChange { from: String, to: String },

    #[error("Form name must not be empty")]
    EmptyName,
}

/// Errors produced by a `FormStore` implementation.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O failed for '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Stored forms could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Form '{0}' was not found in the store")]
    NotFound(String),

    #[error("Form '{id}' was rejected: {source}")]
    InvalidSchema {
        id: String,
        #[source]
        source: SchemaError,
    },
}

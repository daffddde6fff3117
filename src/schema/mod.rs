//! Static description of forms: fields, their rules, derived configurations
//! and the dependency graph between derived fields.

mod field;
mod form;
pub mod graph;
mod rule;

pub use field::*;
pub use form::*;
pub use graph::DependencyGraph;
pub use rule::*;

//! Memory model for the tracer
//!
//! This module provides the storage the classifier mutates:
//! - [`value`]: Runtime value representation (number or text)
//! - [`variables`]: The ordered variable store
//!
//! # Binding Semantics
//!
//! There are no scopes. A name is bound the first time a declaration,
//! assignment or input submission mentions it, and stays bound until the
//! next reset. Expressions see variables through textual substitution, so a
//! loop counter declared in a `for` header remains visible after the loop.

pub mod value;
pub mod variables;

pub use value::Value;
pub use variables::VariableStore;

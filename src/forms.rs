//! Form schema model and validation
//!
//! Re-exports `formgen-forms`: the schema types, the JSON syntax checker,
//! the rule compiler, field validators and settings.

pub use formgen_forms::*;

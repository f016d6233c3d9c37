//! Form rendering and submissions
//!
//! Re-exports `formgen-pages`: the form renderer, the schema editor
//! boundary, the submission coordinator and the submission log.

pub use formgen_pages::*;

//! Wire format of the visual questionnaire editor.
mod types;

pub use types::*;

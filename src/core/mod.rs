//! Core value types and the error taxonomy.
//!
//! Everything a decoded form turns into lives here: invoice lines with
//! their account coding, the recipient variants, and the normalized
//! billing record handed to the downstream processor.

mod error;
mod types;

pub use error::*;
pub use types::*;

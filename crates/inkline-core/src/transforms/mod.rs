//! The two analysis engines: symbolic substitution and branch-outcome
//! classification. Substitution owns and mutates its tree; classification
//! only reads. The two never run over the same tree instance — the printed
//! and re-parsed substitution output is what classification consumes.

pub mod classify;
pub mod substitute;

pub use classify::{classify, Classification};
pub use substitute::substitute;

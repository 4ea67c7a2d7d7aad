//! Analyzer for a restricted JavaScript subset: function declarations, `let`
//! declarations, assignments, `if`/`else`, `while`, `return`, and
//! binary/logical/member/array expressions.
//!
//! Two engines share the grammar. [`substitute`](transforms::substitute)
//! inlines every local variable into the expressions that read it and
//! deletes the statements that defined it, keeping parameters and top-level
//! declarations visible. [`classify`](transforms::classify) takes the
//! substituted program plus concrete parameter values and reports, per
//! `if`/`else if` line, whether its test evaluates true or false.
//! [`analyze`](pipeline::analyze) chains them through a print/re-parse
//! round trip so reported line numbers match the rendered output.

pub mod ast;
pub mod env;
pub mod error;
pub mod lexer;
pub mod params;
pub mod parser;
pub mod pipeline;
pub mod printer;
pub mod transforms;
pub mod value;

pub use error::CoreError;
pub use pipeline::{analyze, substitute_source, Analysis};
pub use transforms::{classify, substitute, Classification};
pub use value::Value;

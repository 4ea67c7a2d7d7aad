//! End-to-end wiring: parse, substitute, render, re-parse, classify.
//!
//! The rendered text between the two engines is not an optimization detail,
//! it is the contract: classification reports line numbers in the rendered
//! output, so it runs over a re-parse of exactly the text the caller sees.

use crate::error::CoreError;
use crate::params::parse_params;
use crate::parser::parse;
use crate::printer::render;
use crate::transforms::{classify, substitute, Classification};

/// The result of a full analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    /// The substituted program, rendered to source text.
    pub rendered: String,
    /// Branch outcomes, with line numbers referring to `rendered`.
    pub classification: Classification,
}

/// Parse `source`, inline its locals, and render the result.
pub fn substitute_source(source: &str) -> Result<String, CoreError> {
    let mut program = parse(source)?;
    substitute(&mut program);
    Ok(render(&program))
}

/// Run the whole pipeline: substitute, then classify every conditional test
/// line against the parameter values in `raw_params`.
pub fn analyze(source: &str, raw_params: &str) -> Result<Analysis, CoreError> {
    let args = parse_params(raw_params)?;
    let rendered = substitute_source(source)?;
    let program = parse(&rendered)?;
    let classification = classify(&program, &args)?;
    Ok(Analysis {
        rendered,
        classification,
    })
}

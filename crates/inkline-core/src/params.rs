//! Tokenizer for the raw parameter string supplied alongside a classify run.
//!
//! The string is comma-delimited, but a bracket-delimited array token or a
//! single-quote-delimited string token is one value: its internal commas do
//! not split. `[1,2],2,'hello, world!'` is three values. Unbalanced brackets
//! or quotes fail before any tree walk begins.

use crate::error::CoreError;
use crate::value::Value;

/// Parse a raw comma-delimited parameter string into positional values.
pub fn parse_params(raw: &str) -> Result<Vec<Value>, CoreError> {
    split_top_level(raw)?
        .iter()
        .map(|token| parse_token(token))
        .collect()
}

/// Split on top-level commas only: commas nested inside brackets or quotes
/// belong to their token.
fn split_top_level(raw: &str) -> Result<Vec<String>, CoreError> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut in_quote = false;
    for ch in raw.chars() {
        match ch {
            '\'' => {
                in_quote = !in_quote;
                current.push(ch);
            }
            '[' if !in_quote => {
                depth += 1;
                current.push(ch);
            }
            ']' if !in_quote => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| CoreError::Params("unbalanced `]`".into()))?;
                current.push(ch);
            }
            ',' if !in_quote && depth == 0 => {
                tokens.push(std::mem::take(&mut current));
                continue;
            }
            _ => current.push(ch),
        }
    }
    if in_quote {
        return Err(CoreError::Params("unterminated quote".into()));
    }
    if depth != 0 {
        return Err(CoreError::Params("unbalanced `[`".into()));
    }
    if !current.trim().is_empty() || !tokens.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

fn parse_token(token: &str) -> Result<Value, CoreError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(CoreError::Params("empty value".into()));
    }
    if let Some(inner) = token
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
    {
        let elements = if inner.trim().is_empty() {
            Vec::new()
        } else {
            split_top_level(inner)?
                .iter()
                .map(|element| parse_token(element))
                .collect::<Result<Vec<_>, _>>()?
        };
        return Ok(Value::Array(elements));
    }
    if let Some(inner) = token
        .strip_prefix('\'')
        .and_then(|rest| rest.strip_suffix('\''))
    {
        return Ok(Value::Str(inner.to_string()));
    }
    match token {
        "true" => return Ok(Value::Bool(true)),
        "false" => return Ok(Value::Bool(false)),
        _ => {}
    }
    token
        .parse::<f64>()
        .map(Value::Num)
        .map_err(|_| CoreError::Params(format!("unrecognized value `{token}`")))
}

//! Reads values back from their canonical textual form.
mod token_handlers;
mod tokenizer;

use anyhow::{anyhow, bail, Result};

use self::token_handlers::{check_record_name, parse_token, quoted_text};
use self::tokenizer::{tokenize, Token};
use crate::value::Value;

/// Read exactly one value
pub fn parse_value(s: &str) -> Result<Value> {
    let mut values = parse_values(s)?;
    match values.len() {
        1 => Ok(values.remove(0)),
        0 => bail!("No value in '{s}'"),
        n => bail!("Expected a single value but got {n} in '{s}'"),
    }
}

/// Read a sequence of values, separated by whitespace and/or commas
pub fn parse_values(s: &str) -> Result<Vec<Value>> {
    let tokens = tokenize(s);
    let mut token_iter = tokens.iter();

    let mut values = Vec::new();
    while let Some(token) = token_iter.next() {
        values.push(build_value(token, &mut token_iter)?);
    }
    Ok(values)
}

/// Build the value that starts at `token`.
///
/// WARNING: This function recurses through `build_items`, once per level of
/// nesting.
fn build_value<'a, I>(token: &'a Token, token_iter: &mut I) -> Result<Value>
where
    I: Iterator<Item = &'a Token>,
{
    match token {
        Token::BracketStart => {
            Ok(Value::list(build_items(
                token_iter,
                &Token::BracketEnd,
            )?))
        },
        Token::TupleStart => {
            Ok(Value::tuple(build_items(
                token_iter,
                &Token::ParenEnd,
            )?))
        },
        Token::RecordStart(name) => {
            check_record_name(name)?;
            let fields = build_items(token_iter, &Token::ParenEnd)?;
            Ok(Value::record(name.clone(), fields))
        },
        // `#"any name"(fields...)`
        Token::StringLit(quote) if quote.sigil == "#" => {
            match token_iter.next() {
                Some(Token::ParenStart) => (),
                _ => bail!("Expected '(' after quoted record name {quote:?}"),
            }
            let fields = build_items(token_iter, &Token::ParenEnd)?;
            Ok(Value::record(quoted_text(quote)?, fields))
        },
        Token::Dash => {
            let next_token = token_iter
                .next()
                .ok_or(anyhow!("Token stream ended after negative sign"))?;
            build_value(next_token, token_iter).and_then(try_negate)
        },
        Token::Word(_) | Token::StringLit(_) => parse_token(token),
        Token::ParenStart | Token::ParenEnd | Token::BracketEnd => {
            bail!("Unexpected token {token:?}")
        },
    }
}

/// Collect values up to (and consuming) the `close` token
fn build_items<'a, I>(token_iter: &mut I, close: &Token) -> Result<Vec<Value>>
where
    I: Iterator<Item = &'a Token>,
{
    let mut items = Vec::new();

    loop {
        let token = token_iter.next().ok_or(anyhow!(
            "Token stream ended before {close:?} was found"
        ))?;
        if token == close {
            break;
        }
        items.push(build_value(token, token_iter)?);
    }

    Ok(items)
}

fn try_negate(value: Value) -> Result<Value> {
    match value {
        Value::Int(n) => Ok(Value::Int(-n)),
        Value::Float(f) => Ok(Value::Float(-f)),
        other => Err(anyhow!("Can't negate {other}")),
    }
}

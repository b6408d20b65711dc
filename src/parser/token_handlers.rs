use anyhow::{anyhow, bail, Result};
use litrs::Literal;

use super::tokenizer::{Quote, Token};
use crate::value::{is_plain_keyword, is_plain_record_name, Value};

/// Parses word and string tokens
pub fn parse_token(t: &Token) -> Result<Value> {
    match t {
        Token::Word(s) => parse_literal(s).or_else(|_| parse_identifier(s)),

        Token::StringLit(q) => parse_quote(q),

        _ => Err(anyhow!("Unhandled token type: {:#?}", t)),
    }
}

/// Try to parse a word as a literal, more or less the same way as rust does
fn parse_literal(s: &str) -> Result<Value> {
    Literal::parse(s)
        .map_err(anyhow::Error::from)
        .and_then(check_suffix)
        .and_then(|r| {
            match r {
                Literal::Bool(_) => Ok(Value::Bool(s.parse()?)),

                Literal::Integer(_) => Ok(Value::Int(s.parse()?)),

                Literal::Float(lit) => {
                    Ok(Value::Float(lit.number_part().parse()?))
                },

                lit => {
                    Err(anyhow!(
                        "eaten by the worms, and weird fishes: '{lit:#?}'"
                    ))
                },
            }
        })
}

/// Parse a word that must be a keyword, a constant or a fieldless record.
/// Must only be called after ensuring that the word is not a literal.
fn parse_identifier(s: &str) -> Result<Value> {
    match s {
        "Nil" | "nil" => Ok(Value::Nil),
        "True" => Ok(Value::Bool(true)),
        "False" => Ok(Value::Bool(false)),
        _ if s.strip_prefix(':').is_some_and(is_plain_keyword) => {
            Ok(Value::keyword(s))
        },
        _ if is_plain_record_name(s) => Ok(Value::record(s, [])),
        _ => Err(anyhow!("'{}' is not a keyword or a record name", s)),
    }
}

/// Record constructors must be capitalized, like `Point(1, 2)`
pub fn check_record_name(name: &str) -> Result<()> {
    if is_plain_record_name(name) {
        Ok(())
    } else {
        bail!("'{name}' is not a valid record name")
    }
}

/// Parse a quoted string. The current treatment should be nearly identical to
/// rust, except that:
/// A) single-quotes are treated as equivalent to double-quotes, and
/// B) characters are denoted by the sigil c and must have len 1
/// C) the sigil ':' makes a keyword, for names that can't be written bare
fn parse_quote(quote: &Quote) -> Result<Value> {
    match quote.sigil.as_str() {
        "c" => return parse_char(quote),
        ":" => return Ok(Value::Keyword(quoted_text(quote)?)),
        "#" => bail!("Quoted record name without fields: {quote:#?}"),
        _ => (),
    }

    let lits = format!("{}\"{}\"", quote.sigil, quote.content);
    Literal::parse(lits)
        .map_err(anyhow::Error::from)
        .and_then(|r| {
            match r {
                Literal::String(sl) => {
                    Ok(Value::Str(sl.into_value().to_string()))
                },
                Literal::ByteString(bl) => {
                    Ok(Value::bytes(bl.into_value().to_vec()))
                },
                _ => Err(anyhow!("Failed to parse quote: {quote:#?}")),
            }
        })
}

/// The content of a quote as a plain string, whatever its sigil
pub fn quoted_text(quote: &Quote) -> Result<String> {
    match Literal::parse(format!("\"{}\"", quote.content))? {
        Literal::String(sl) => Ok(sl.into_value().to_string()),
        _ => Err(anyhow!("Failed to parse quote: {quote:#?}")),
    }
}

fn parse_char(quote: &Quote) -> Result<Value> {
    let mut chars = quote.content.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(Value::Char(c));
    }

    // an escape sequence, let rust sort it out
    match Literal::parse(format!("'{}'", quote.content)) {
        Ok(Literal::Char(cl)) => Ok(Value::Char(cl.value())),
        _ => {
            Err(anyhow!(
                "Quote had sigil `c` but not exactly one character: {quote:#?}"
            ))
        },
    }
}

/***********\
|* Helpers *|
\***********/
/// Ensure literal doesn't have a suffix
/// E.g., "15" is ok, "15u32" is not, because u32 is a rust thing)
fn check_suffix(lit: Literal<&str>) -> Result<Literal<&str>> {
    if lit.suffix() == "" {
        Ok(lit)
    } else {
        Err(anyhow!(
            "Forbidden suffix '{}' on literal '{}'",
            lit.suffix(),
            lit
        ))
    }
}

use std::fmt::{Display, Formatter};
use std::rc::Rc;

use itertools::Itertools;
use lazy_static::lazy_static;
use regex::Regex;

/// Runtime values: the things keys and values are made of.
///
/// Equality is structural all the way down. Compound variants sit behind an
/// `Rc`, so cloning a compound value shares the instance instead of copying
/// it; the token cache relies on that to memoize per instance.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    // primitives
    Nil,
    Bool(bool),
    Int(isize),
    Float(f64),
    Char(char),
    Str(String),
    Keyword(String),

    // compounds
    Bytes(Rc<[u8]>),
    List(Rc<[Value]>),
    Tuple(Rc<[Value]>),
    Record(Rc<Record>),
}

/// A named constructor applied to positional fields, e.g. `Point(1, 2)`
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub fields: Vec<Value>,
}

/// Primitive vs. compound classification, used when deriving key tokens.
#[derive(Debug, Clone, Copy)]
pub enum ValueKind<'a> {
    Primitive,
    Compound(Instance<'a>),
}

/// Borrowed handle on the shared allocation behind a compound value
#[derive(Debug, Clone, Copy)]
pub enum Instance<'a> {
    Bytes(&'a Rc<[u8]>),
    List(&'a Rc<[Value]>),
    Tuple(&'a Rc<[Value]>),
    Record(&'a Rc<Record>),
}

impl Value {
    pub fn kind(&self) -> ValueKind<'_> {
        match self {
            Value::Nil
            | Value::Bool(_)
            | Value::Int(_)
            | Value::Float(_)
            | Value::Char(_)
            | Value::Str(_)
            | Value::Keyword(_) => ValueKind::Primitive,
            Value::Bytes(b) => ValueKind::Compound(Instance::Bytes(b)),
            Value::List(l) => ValueKind::Compound(Instance::List(l)),
            Value::Tuple(t) => ValueKind::Compound(Instance::Tuple(t)),
            Value::Record(r) => ValueKind::Compound(Instance::Record(r)),
        }
    }

    pub fn type_str(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Char(_) => "Char",
            Value::Str(_) => "Str",
            Value::Keyword(_) => "Keyword",
            Value::Bytes(_) => "Bytes",
            Value::List(_) => "List",
            Value::Tuple(_) => "Tuple",
            Value::Record(_) => "Record",
        }
    }

    /***************\
    |* Constructors *|
    \***************/
    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn tuple(items: impl IntoIterator<Item = Value>) -> Self {
        Value::Tuple(items.into_iter().collect())
    }

    /// A 2-tuple, the shape every key/value pair takes in a host list
    pub fn pair(key: impl Into<Value>, value: impl Into<Value>) -> Self {
        Value::tuple([key.into(), value.into()])
    }

    pub fn record(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = Value>,
    ) -> Self {
        Value::Record(Rc::new(Record {
            name: name.into(),
            fields: fields.into_iter().collect(),
        }))
    }

    /// Keywords are stored without their leading ':'
    pub fn keyword(name: &str) -> Self {
        Value::Keyword(name.trim_start_matches(':').to_string())
    }

    pub fn bytes(data: impl Into<Vec<u8>>) -> Self {
        let data: Vec<u8> = data.into();
        Value::Bytes(data.into())
    }
}

lazy_static! {
    static ref KEYWORD_NAME_RE: Regex =
        Regex::new(r"^[a-zA-Z0-9*+!\-_?]+$").unwrap();
    static ref RECORD_NAME_RE: Regex =
        Regex::new(r"^[A-Z][a-zA-Z0-9_]*$").unwrap();
}

/// Keyword names that can be written bare, as in `:name`. Anything else is
/// written quoted, as in `:"a name"`.
pub fn is_plain_keyword(name: &str) -> bool {
    KEYWORD_NAME_RE.is_match(name)
}

/// Record names that can be written bare, as in `Point(1, 2)`. The constant
/// names are excluded, so `Nil` can never mean a record.
pub fn is_plain_record_name(name: &str) -> bool {
    RECORD_NAME_RE.is_match(name) && !matches!(name, "Nil" | "True" | "False")
}

/// The canonical textual form ("inspect"). Structurally equal values always
/// render the same, and no two different values share a rendering (NaN
/// aside).
impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(true) => write!(f, "True"),
            Value::Bool(false) => write!(f, "False"),
            Value::Int(x) => x.fmt(f),
            // -0.0 == 0.0, so both need the same form
            Value::Float(x) if *x == 0.0 => write!(f, "0.0"),
            // Debug keeps the '.0' / exponent, so 1.0 never renders as 1
            Value::Float(x) => write!(f, "{x:?}"),
            Value::Char(c) => write!(f, "c\"{}\"", c.escape_debug()),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Keyword(k) if is_plain_keyword(k) => write!(f, ":{k}"),
            Value::Keyword(k) => write!(f, ":{k:?}"),
            Value::Bytes(b) => {
                let escaped: String = b
                    .iter()
                    .flat_map(|byte| std::ascii::escape_default(*byte))
                    .map(char::from)
                    .collect();
                write!(f, "b\"{escaped}\"")
            },
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Tuple(items) => write!(f, "#({})", items.iter().join(", ")),
            Value::Record(record) => record.fmt(f),
        }
    }
}

impl Display for Record {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let fields = self.fields.iter().join(", ");
        if !is_plain_record_name(&self.name) {
            write!(f, "#{:?}({fields})", self.name)
        } else if self.fields.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}({fields})", self.name)
        }
    }
}

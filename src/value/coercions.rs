use super::{InternalError, MResult, MapError, Value};

/******************************\
|* Rust types <-> Value types *|
\******************************/
// These macros write out a series of TryFrom and From implementations that
// establish a mapping between certain rust values and our `Value`s.
//
// `From<rust_type> for Value` can be infallibly defined, because each rust
// type is associated with at most one Value variant. The other direction
// can't: a given Value isn't guaranteed to hold any specific rust type, so
// we end up with `TryFrom<&Value> for rust_type`.
macro_rules! impl_value_conversions {
    ($($t:ty, $v:ident);* $(;)?) => {
        $(
            impl TryFrom<&Value> for $t {
                type Error = InternalError;

                fn try_from(value: &Value) -> Result<Self, Self::Error> {
                    if let Value::$v(native_val) = value {
                        Ok(native_val.clone())
                    } else {
                        Err(InternalError::Conversion {
                            builtin_type: value.type_str().to_string(),
                            rust_type: stringify!($t).to_string(),
                        })
                    }
                }
            }

            impl From<$t> for Value {
                fn from(val: $t) -> Self {
                    Value::$v(val)
                }
            }
        )*
    };
}

// The mappings.
// The first element is the rust type, the second is the Value variant.
impl_value_conversions! {
    String, Str;
    char, Char;
    f64, Float;
    isize, Int;
    bool, Bool;
}

impl From<&str> for Value {
    fn from(val: &str) -> Self {
        Value::Str(val.to_string())
    }
}

impl<'a> TryFrom<&'a Value> for &'a str {
    type Error = InternalError;

    fn try_from(value: &'a Value) -> Result<Self, Self::Error> {
        if let Value::Str(native_s) = value {
            Ok(native_s)
        } else {
            Err(InternalError::Conversion {
                builtin_type: value.type_str().to_string(),
                rust_type: "&str".to_string(),
            })
        }
    }
}

/**********************\
|* Sequence shapes    *|
\**********************/
impl Value {
    /// View a host list as a slice. Anything else is a malformed sequence.
    pub fn expect_list(&self) -> MResult<&[Value]> {
        if let Value::List(items) = self {
            Ok(items)
        } else {
            Err(MapError::malformed("List", self))
        }
    }

    /// View a 2-tuple as a (key, value) pair.
    pub fn expect_pair(&self) -> MResult<(&Value, &Value)> {
        match self {
            Value::Tuple(items) => {
                match items.as_ref() {
                    [key, value] => Ok((key, value)),
                    _ => Err(MapError::malformed("#(key, value)", self)),
                }
            },
            _ => Err(MapError::malformed("#(key, value)", self)),
        }
    }
}

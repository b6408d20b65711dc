use super::{Arity, Command, Registry, SResult, Session, ShellError};
use crate::functional::{
    drop, has_key, keys, merge_listed, take, to_value_list, update, values,
};
use crate::value::Value;

pub(super) trait CommandBuilder {
    fn register(registry: &mut Registry) {
        let names = Self::names();
        let command = Command {
            name: names
                .first()
                .copied()
                .unwrap_or_default()
                .to_string(),
            arity: Self::arity(),
            arguments: Self::arguments()
                .into_iter()
                .map(|s| s.to_string())
                .collect(),
            eval: Self::eval,
        };

        names
            .into_iter()
            .for_each(|s| registry.set(s, command.clone()))
    }

    /// names to bind to this command
    fn names() -> Vec<&'static str>;

    /// names of the command's arguments, for `help`
    fn arguments() -> Vec<&'static str>;

    /// variadic or fixed arity; checked before `eval` is called
    fn arity() -> Arity;

    /// Run the command against the session. Returns the text to print.
    fn eval(args: &[Value], session: &mut Session) -> SResult<String>;
}

/// Arity has been checked already, this just gets us a fixed-size view.
fn fixed<'a, const N: usize>(
    name: &str,
    args: &'a [Value],
) -> SResult<&'a [Value; N]> {
    args.try_into().map_err(|_| {
        ShellError::Arity {
            name: name.to_string(),
            arity: N,
            num_args_provided: args.len(),
        }
    })
}

/**************\
|* Primitives *|
\**************/
pub(super) struct InsertCommand;
impl CommandBuilder for InsertCommand {
    fn names() -> Vec<&'static str> {
        vec!["insert", "set"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key", "value"]
    }

    fn arity() -> Arity {
        Arity::Fixed(2)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [key, value] = fixed::<2>("insert", args)?;
        session
            .map
            .insert(key.clone(), value.clone());
        Ok(String::new())
    }
}

pub(super) struct GetCommand;
impl CommandBuilder for GetCommand {
    fn names() -> Vec<&'static str> {
        vec!["get"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key"]
    }

    fn arity() -> Arity {
        Arity::Fixed(1)
    }

    /// A missing key is reported, not an error
    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [key] = fixed::<1>("get", args)?;
        Ok(match session.map.get(key) {
            Ok(value) => value.to_string(),
            Err(not_found) => not_found.to_string(),
        })
    }
}

pub(super) struct HasKeyCommand;
impl CommandBuilder for HasKeyCommand {
    fn names() -> Vec<&'static str> {
        vec!["has", "has_key"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key"]
    }

    fn arity() -> Arity {
        Arity::Fixed(1)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [key] = fixed::<1>("has", args)?;
        Ok(Value::Bool(has_key(&session.map, key)).to_string())
    }
}

pub(super) struct DeleteCommand;
impl CommandBuilder for DeleteCommand {
    fn names() -> Vec<&'static str> {
        vec!["delete", "del"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key"]
    }

    fn arity() -> Arity {
        Arity::Fixed(1)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [key] = fixed::<1>("delete", args)?;
        session.map.delete(key);
        Ok(String::new())
    }
}

pub(super) struct SizeCommand;
impl CommandBuilder for SizeCommand {
    fn names() -> Vec<&'static str> {
        vec!["size", "len"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(session.map.size().to_string())
    }
}

/****************\
|* Enumerations *|
\****************/
pub(super) struct ListCommand;
impl CommandBuilder for ListCommand {
    fn names() -> Vec<&'static str> {
        vec!["list", "to_list"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(to_value_list(&session.map).to_string())
    }
}

pub(super) struct KeysCommand;
impl CommandBuilder for KeysCommand {
    fn names() -> Vec<&'static str> {
        vec!["keys"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(Value::list(keys(&session.map)).to_string())
    }
}

pub(super) struct ValuesCommand;
impl CommandBuilder for ValuesCommand {
    fn names() -> Vec<&'static str> {
        vec!["values"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(Value::list(values(&session.map)).to_string())
    }
}

pub(super) struct ShowCommand;
impl CommandBuilder for ShowCommand {
    fn names() -> Vec<&'static str> {
        vec!["show", "inspect"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(session.map.to_string())
    }
}

/*****************\
|* Bulk updates  *|
\*****************/

/// Shows the taken entries; the session map is left alone
pub(super) struct TakeCommand;
impl CommandBuilder for TakeCommand {
    fn names() -> Vec<&'static str> {
        vec!["take"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key"]
    }

    fn arity() -> Arity {
        Arity::Variadic
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(take(&session.map, args).to_string())
    }
}

pub(super) struct DropCommand;
impl CommandBuilder for DropCommand {
    fn names() -> Vec<&'static str> {
        vec!["drop"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key"]
    }

    fn arity() -> Arity {
        Arity::Variadic
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        drop(&session.map, args);
        Ok(String::new())
    }
}

pub(super) struct MergeCommand;
impl CommandBuilder for MergeCommand {
    fn names() -> Vec<&'static str> {
        vec!["merge"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["[#(key, value), ...]"]
    }

    fn arity() -> Arity {
        Arity::Fixed(1)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [pairs] = fixed::<1>("merge", args)?;
        merge_listed(&session.map, pairs)?;
        Ok(String::new())
    }
}

/// Replaces the session map. Nothing is replaced if the list is malformed.
pub(super) struct LoadCommand;
impl CommandBuilder for LoadCommand {
    fn names() -> Vec<&'static str> {
        vec!["load", "from_list"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["[#(key, value), ...]"]
    }

    fn arity() -> Arity {
        Arity::Fixed(1)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [pairs] = fixed::<1>("load", args)?;
        session.map = merge_listed(&session.map.empty_like(), pairs)?;
        Ok(String::new())
    }
}

/// Adds to an integer value, treating a missing key as 0
pub(super) struct IncrCommand;
impl CommandBuilder for IncrCommand {
    fn names() -> Vec<&'static str> {
        vec!["incr"]
    }

    fn arguments() -> Vec<&'static str> {
        vec!["key", "amount"]
    }

    fn arity() -> Arity {
        Arity::Fixed(2)
    }

    fn eval(args: &[Value], session: &mut Session) -> SResult<String> {
        let [key, amount] = fixed::<2>("incr", args)?;
        let amount = isize::try_from(amount)?;

        // refuse to clobber a non-integer
        let current = match session.map.get(key) {
            Ok(current) => isize::try_from(&current)?,
            Err(_) => 0,
        };
        let total = current.checked_add(amount).ok_or_else(|| {
            ShellError::Overflow {
                current,
                amount,
            }
        })?;

        let map = update(&session.map, key.clone(), |_| Value::Int(total));
        Ok(match map.get(key) {
            Ok(value) => value.to_string(),
            Err(not_found) => not_found.to_string(),
        })
    }
}

pub(super) struct ClearCommand;
impl CommandBuilder for ClearCommand {
    fn names() -> Vec<&'static str> {
        vec!["clear"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        session.map = session.map.empty_like();
        Ok(String::new())
    }
}

pub(super) struct HelpCommand;
impl CommandBuilder for HelpCommand {
    fn names() -> Vec<&'static str> {
        vec!["help", "?"]
    }

    fn arguments() -> Vec<&'static str> {
        vec![]
    }

    fn arity() -> Arity {
        Arity::Fixed(0)
    }

    fn eval(_args: &[Value], session: &mut Session) -> SResult<String> {
        Ok(session.registry.usage().join("\n"))
    }
}

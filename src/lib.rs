pub mod functional;
pub mod identity;
mod map;
pub mod parser;
pub mod shell;
pub mod value;

pub use identity::*;
pub use map::*;
pub use value::*;

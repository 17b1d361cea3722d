//! thunkgen-core: front end for the thunk IDL.
//!
//! Turns an IDL file into an ordered list of resolved [`FunctionDecl`]s:
//!
//! - [`canonicalize()`] -- whitespace normalization applied to every line
//! - [`TypeRegistry`] -- parameter and return type scopes of [`TypeBinding`]s
//! - [`ParseSession`] / [`parse_str()`] / [`parse_file()`] -- the line grammar
//! - [`ThunkModule`] -- the parse result shared by every emitter
//!
//! Lines that fail to parse never abort a pass; they are returned as
//! [`Diagnostic`]s alongside the declarations that did parse.

pub mod canonical;
pub mod error;
pub mod model;
pub mod parser;
pub mod registry;

pub use canonical::canonicalize;
pub use error::{DeclError, Diagnostic, ParseError};
pub use model::{FunctionDecl, Parameter, ThunkModule};
pub use parser::{parse_file, parse_reader, parse_str, ParseMode, ParseSession};
pub use registry::{Marshaling, Scope, TypeBinding, TypeRegistry};

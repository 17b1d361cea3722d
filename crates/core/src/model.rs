//! Resolved function signatures.

use std::sync::Arc;

use serde::Serialize;

use crate::canonical::canonicalize;
use crate::error::{DeclError, Diagnostic};
use crate::registry::{Scope, TypeBinding, TypeRegistry};

/// Inline marker suppressing the generated native wrapper body.
pub const MANUAL_WRAPPER_MARKER: &str = "[ManualNativeWrapper]";
/// Pointer marker; names may not begin with it.
pub const POINTER_MARKER: char = '*';

/// One named, typed parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Arc<TypeBinding>,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Arc<TypeBinding>) -> Result<Self, DeclError> {
        let name = name.into();
        check_name(&name)?;
        Ok(Parameter { name, ty })
    }
}

/// One function signature, resolved against a [`TypeRegistry`].
///
/// Parameter order is exactly the declared order; both emitters rely on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Arc<TypeBinding>,
    pub parameters: Vec<Parameter>,
    pub manual_native_wrapper: bool,
}

impl FunctionDecl {
    /// Parse a canonical `[marker] Ret Name(Type name, ...)` line.
    ///
    /// The return type is resolved in the return scope, parameter types in
    /// the parameter scope. Anything after the first `)` is ignored.
    pub fn parse(line: &str, registry: &TypeRegistry) -> Result<Self, DeclError> {
        let manual_native_wrapper = line.contains(MANUAL_WRAPPER_MARKER);
        let line = line.replace(MANUAL_WRAPPER_MARKER, "");

        let open = line.find('(').ok_or(DeclError::MissingParameterList)?;
        let close = line
            .find(')')
            .filter(|&close| close > open)
            .ok_or(DeclError::MissingParameterList)?;

        let (return_text, name) = split_declarator(&line[..open]);
        if name.is_empty() {
            return Err(DeclError::EmptyName(canonicalize(&line[..open])));
        }
        check_name(&name)?;
        let return_type = registry.resolve(&return_text, Scope::Return)?;

        let list = canonicalize(&line[open + 1..close]);
        let mut parameters = Vec::new();
        if !list.is_empty() {
            for piece in list.split(',') {
                let (type_text, param_name) = split_declarator(piece);
                if param_name.is_empty() {
                    return Err(DeclError::EmptyName(canonicalize(piece)));
                }
                let ty = registry.resolve(&type_text, Scope::Parameter)?;
                parameters.push(Parameter::new(param_name, ty)?);
            }
        }

        Ok(FunctionDecl {
            name,
            return_type,
            parameters,
            manual_native_wrapper,
        })
    }
}

/// Split `Type Name` at the last space or pointer marker.
///
/// Returns `(type, name)`; with no separator the whole text is the name.
fn split_declarator(text: &str) -> (String, String) {
    let text = canonicalize(text);
    match text.rfind(|c: char| c == ' ' || c == POINTER_MARKER) {
        Some(idx) => (canonicalize(&text[..=idx]), canonicalize(&text[idx + 1..])),
        None => (String::new(), text),
    }
}

fn check_name(name: &str) -> Result<(), DeclError> {
    if name.starts_with(POINTER_MARKER) {
        return Err(DeclError::PointerName(name.to_string()));
    }
    Ok(())
}

/// Result of one parse pass: the ordered declarations every emitter
/// consumes, plus the lines that were skipped.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ThunkModule {
    pub functions: Vec<FunctionDecl>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ThunkModule {
    pub fn has_diagnostics(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

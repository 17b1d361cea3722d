//! Type bindings and the two-scope type registry.
//!
//! A type line `Thunk[,Managed[,Native]]` produces one [`TypeBinding`]. The
//! binding's marshaling category is decided once, here, from the managed
//! spelling; the emitters only ever branch on [`Marshaling`].

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;

use crate::canonical::canonicalize;
use crate::error::DeclError;

/// Managed annotation for a boolean passed as a single byte.
pub const BOOL8_ANNOTATION: &str = "[MarshalAs(UnmanagedType.I1)]bool";
/// Managed annotation for a legacy four-byte boolean.
pub const BOOL32_ANNOTATION: &str = "[MarshalAs(UnmanagedType.Bool)]bool";
/// Prefix marking a managed spelling as passed by reference.
pub const BY_REF_MARKER: &str = "ref ";

/// How a value crosses the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Marshaling {
    /// Passed as the managed spelling, unchanged.
    Direct,
    /// Managed `bool`, wire `byte`.
    Bool8,
    /// Managed `bool`, wire `int`.
    Bool32,
    /// Managed `ref T`, wire `T*`.
    ByRef,
}

impl Marshaling {
    /// Classify a canonical managed spelling.
    ///
    /// The boolean annotations are matched exactly and take precedence over
    /// the by-reference marker.
    pub fn classify(managed: &str) -> Self {
        if managed == BOOL8_ANNOTATION {
            Marshaling::Bool8
        } else if managed == BOOL32_ANNOTATION {
            Marshaling::Bool32
        } else if managed.contains(BY_REF_MARKER) {
            Marshaling::ByRef
        } else {
            Marshaling::Direct
        }
    }

    pub fn is_boolean(self) -> bool {
        matches!(self, Marshaling::Bool8 | Marshaling::Bool32)
    }
}

/// One named type as seen from both sides of the boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeBinding {
    /// Canonical IDL name; the registry key.
    pub thunk_name: String,
    pub managed_name: String,
    pub native_name: String,
    pub marshaling: Marshaling,
    /// Spelling used at the ABI boundary itself.
    pub wire_name: String,
}

impl TypeBinding {
    /// Build a binding from a `Thunk[,Managed[,Native]]` declaration.
    pub fn from_decl(line: &str) -> Result<Self, DeclError> {
        let fields: Vec<&str> = line.split(',').collect();
        if fields.is_empty() || fields.len() > 3 {
            return Err(DeclError::TypeFieldCount(fields.len()));
        }

        let thunk_name = canonicalize(fields[0]);
        if thunk_name.is_empty() {
            return Err(DeclError::EmptyTypeName);
        }

        let managed_name = match fields.get(1) {
            Some(m) if !m.trim().is_empty() => canonicalize(m),
            _ => thunk_name.clone(),
        };
        let native_name = match fields.get(2) {
            Some(n) => canonicalize(n),
            None => thunk_name.clone(),
        };

        Ok(TypeBinding::new(thunk_name, managed_name, native_name))
    }

    /// Build a binding from already-canonical spellings.
    pub fn new(
        thunk_name: impl Into<String>,
        managed_name: impl Into<String>,
        native_name: impl Into<String>,
    ) -> Self {
        let managed_name = managed_name.into();
        let marshaling = Marshaling::classify(&managed_name);
        let wire_name = match marshaling {
            Marshaling::Bool8 => "byte".to_string(),
            Marshaling::Bool32 => "int".to_string(),
            Marshaling::ByRef => format!("{}*", managed_name.replace(BY_REF_MARKER, "")),
            Marshaling::Direct => managed_name.clone(),
        };
        TypeBinding {
            thunk_name: thunk_name.into(),
            managed_name,
            native_name: native_name.into(),
            marshaling,
            wire_name,
        }
    }

    pub fn is_managed_void(&self) -> bool {
        self.managed_name == "void"
    }

    pub fn is_native_void(&self) -> bool {
        self.native_name == "void"
    }
}

/// Which lookup table a name is declared into or resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Parameter types. Declaring into this scope also makes the type
    /// available as a return type.
    Parameter,
    /// Return types only.
    Return,
}

/// Parameter and return type scopes, keyed by canonical thunk name.
#[derive(Debug, Default, Clone)]
pub struct TypeRegistry {
    params: HashMap<String, Arc<TypeBinding>>,
    returns: HashMap<String, Arc<TypeBinding>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a type line and register it.
    ///
    /// `Scope::Parameter` inserts into both scopes and fails on a duplicate
    /// parameter type; an existing return-scope entry is kept, so a
    /// `RETURNTYPES` override survives a later normal declaration.
    /// `Scope::Return` inserts or overwrites the return scope only.
    pub fn declare(&mut self, line: &str, scope: Scope) -> Result<Arc<TypeBinding>, DeclError> {
        let binding = Arc::new(TypeBinding::from_decl(line)?);
        let key = binding.thunk_name.clone();
        match scope {
            Scope::Parameter => {
                if self.params.contains_key(&key) {
                    return Err(DeclError::DuplicateType(key));
                }
                self.params.insert(key.clone(), Arc::clone(&binding));
                self.returns
                    .entry(key)
                    .or_insert_with(|| Arc::clone(&binding));
            }
            Scope::Return => {
                self.returns.insert(key, Arc::clone(&binding));
            }
        }
        Ok(binding)
    }

    /// Exact-match lookup of a canonical type name.
    pub fn resolve(&self, name: &str, scope: Scope) -> Result<Arc<TypeBinding>, DeclError> {
        let table = match scope {
            Scope::Parameter => &self.params,
            Scope::Return => &self.returns,
        };
        table
            .get(name)
            .cloned()
            .ok_or_else(|| DeclError::UnknownType(name.to_string()))
    }

    pub fn len(&self, scope: Scope) -> usize {
        match scope {
            Scope::Parameter => self.params.len(),
            Scope::Return => self.returns.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_field_defaults_every_spelling() {
        let b = TypeBinding::from_decl("A").unwrap();
        assert_eq!(b.thunk_name, "A");
        assert_eq!(b.managed_name, "A");
        assert_eq!(b.native_name, "A");
        assert_eq!(b.wire_name, "A");
        assert_eq!(b.marshaling, Marshaling::Direct);
    }

    #[test]
    fn two_fields_default_native_to_thunk_name() {
        let b = TypeBinding::from_decl("A,B").unwrap();
        assert_eq!(b.managed_name, "B");
        assert_eq!(b.native_name, "A");
        assert_eq!(b.wire_name, "B");
    }

    #[test]
    fn blank_managed_field_falls_back_to_thunk_name() {
        let b = TypeBinding::from_decl("LPCWSTR, ,const WCHAR*").unwrap();
        assert_eq!(b.managed_name, "LPCWSTR");
        assert_eq!(b.native_name, "const WCHAR*");
    }

    #[test]
    fn fields_are_canonicalized() {
        let b = TypeBinding::from_decl(" const char * , byte * ").unwrap();
        assert_eq!(b.thunk_name, "const char*");
        assert_eq!(b.managed_name, "byte*");
    }

    #[test]
    fn too_many_fields_is_rejected() {
        let err = TypeBinding::from_decl("a,b,c,d").unwrap_err();
        assert_eq!(err, DeclError::TypeFieldCount(4));
    }

    #[test]
    fn empty_thunk_name_is_rejected() {
        assert_eq!(
            TypeBinding::from_decl(",int").unwrap_err(),
            DeclError::EmptyTypeName
        );
    }

    #[test]
    fn single_byte_boolean_wires_as_byte() {
        let b = TypeBinding::from_decl("bool,[MarshalAs(UnmanagedType.I1)]bool").unwrap();
        assert_eq!(b.marshaling, Marshaling::Bool8);
        assert_eq!(b.wire_name, "byte");
        assert_eq!(b.native_name, "bool");
    }

    #[test]
    fn legacy_boolean_wires_as_int() {
        let b = TypeBinding::from_decl("BOOL,[MarshalAs(UnmanagedType.Bool)]bool").unwrap();
        assert_eq!(b.marshaling, Marshaling::Bool32);
        assert_eq!(b.wire_name, "int");
    }

    #[test]
    fn by_ref_wires_as_pointer() {
        let b = TypeBinding::from_decl("uint32_t*,ref uint").unwrap();
        assert_eq!(b.marshaling, Marshaling::ByRef);
        assert_eq!(b.wire_name, "uint*");
        assert_eq!(b.native_name, "uint32_t*");
    }

    #[test]
    fn normal_types_resolve_in_both_scopes() {
        let mut reg = TypeRegistry::new();
        reg.declare("int", Scope::Parameter).unwrap();
        assert!(reg.resolve("int", Scope::Parameter).is_ok());
        assert!(reg.resolve("int", Scope::Return).is_ok());
    }

    #[test]
    fn return_types_do_not_leak_into_parameter_scope() {
        let mut reg = TypeRegistry::new();
        reg.declare("void*", Scope::Return).unwrap();
        assert!(reg.resolve("void*", Scope::Return).is_ok());
        assert_eq!(
            reg.resolve("void*", Scope::Parameter).unwrap_err(),
            DeclError::UnknownType("void*".into())
        );
    }

    #[test]
    fn duplicate_parameter_type_is_an_error() {
        let mut reg = TypeRegistry::new();
        reg.declare("int", Scope::Parameter).unwrap();
        assert_eq!(
            reg.declare("int,Int32", Scope::Parameter).unwrap_err(),
            DeclError::DuplicateType("int".into())
        );
        assert_eq!(
            reg.resolve("int", Scope::Parameter).unwrap().managed_name,
            "int"
        );
    }

    #[test]
    fn return_declaration_overrides_return_scope_only() {
        let mut reg = TypeRegistry::new();
        reg.declare("bool", Scope::Parameter).unwrap();
        reg.declare("bool,[MarshalAs(UnmanagedType.I1)]bool", Scope::Return)
            .unwrap();
        assert_eq!(
            reg.resolve("bool", Scope::Return).unwrap().marshaling,
            Marshaling::Bool8
        );
        assert_eq!(
            reg.resolve("bool", Scope::Parameter).unwrap().marshaling,
            Marshaling::Direct
        );
    }

    #[test]
    fn earlier_return_override_survives_normal_declaration() {
        let mut reg = TypeRegistry::new();
        reg.declare("BOOL,[MarshalAs(UnmanagedType.Bool)]bool", Scope::Return)
            .unwrap();
        reg.declare("BOOL", Scope::Parameter).unwrap();
        assert_eq!(
            reg.resolve("BOOL", Scope::Return).unwrap().marshaling,
            Marshaling::Bool32
        );
        assert_eq!(reg.len(Scope::Parameter), 1);
        assert_eq!(reg.len(Scope::Return), 1);
    }
}

use serde::Serialize;

/// Why a single declaration line was rejected.
///
/// Every variant is recoverable: the parser records it as a [`Diagnostic`]
/// against the offending line and moves on to the next one.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeclError {
    /// A type line split into the wrong number of comma-separated fields.
    #[error("wrong number of type name entries: expected 1 to 3, found {0}")]
    TypeFieldCount(usize),

    /// The thunk name field of a type line is empty.
    #[error("type declaration has an empty thunk name")]
    EmptyTypeName,

    /// A function references a type that is not registered in the scope it needs.
    #[error("type '{0}' unknown")]
    UnknownType(String),

    /// A normal type was declared twice.
    #[error("type '{0}' is already declared")]
    DuplicateType(String),

    /// A function line lacks a well-formed `(...)` parameter list.
    #[error("function declaration is missing a parameter list")]
    MissingParameterList,

    /// A function or parameter declarator has no name.
    #[error("missing name in declarator '{0}'")]
    EmptyName(String),

    /// A function or parameter name starts with the pointer marker.
    #[error("name '{0}' is not allowed to start with '*'")]
    PointerName(String),
}

/// A recovered per-line failure, reported with its 1-based source line.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Diagnostic {
    pub line: u32,
    pub message: String,
}

impl Diagnostic {
    pub fn new(line: u32, message: impl Into<String>) -> Self {
        Diagnostic {
            line,
            message: message.into(),
        }
    }

    pub fn from_decl(line: u32, err: &DeclError) -> Self {
        Diagnostic::new(line, err.to_string())
    }

    /// Serialize to the JSON shape used by `--output json`.
    pub fn to_json_value(&self) -> serde_json::Value {
        serde_json::json!({
            "line":    self.line,
            "message": self.message,
        })
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error parsing line {} : {}", self.line, self.message)
    }
}

/// Fatal failure while reading IDL input.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("error reading '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnostic_display_carries_line_and_message() {
        let d = Diagnostic::from_decl(7, &DeclError::UnknownType("HANDLE".into()));
        assert_eq!(d.to_string(), "error parsing line 7 : type 'HANDLE' unknown");
    }

    #[test]
    fn diagnostic_json_shape() {
        let d = Diagnostic::new(3, "bad");
        let v = d.to_json_value();
        assert_eq!(v["line"], 3);
        assert_eq!(v["message"], "bad");
    }
}

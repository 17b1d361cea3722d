//! Line-oriented grammar for thunk IDL files.
//!
//! ```text
//! ; comment
//! NORMALTYPES
//! Thunk[,Managed[,Native]]
//! RETURNTYPES
//! Thunk[,Managed[,Native]]
//! FUNCTIONS
//! [ManualNativeWrapper] Ret Name(Type name, ...)
//! #if ANYTHING
//! ...skipped...
//! #endif
//! ```
//!
//! A line that fails to parse is recorded as a [`Diagnostic`] and dropped;
//! parsing always continues with the next line.

use std::io::BufRead;
use std::path::Path;

use crate::canonical::canonicalize;
use crate::error::{DeclError, Diagnostic, ParseError};
use crate::model::{FunctionDecl, ThunkModule};
use crate::registry::{Scope, TypeRegistry};

pub const COMMENT_MARKER: char = ';';
pub const RETURN_TYPES_KEYWORD: &str = "RETURNTYPES";
pub const NORMAL_TYPES_KEYWORD: &str = "NORMALTYPES";
pub const FUNCTIONS_KEYWORD: &str = "FUNCTIONS";
pub const CONDITIONAL_START: &str = "#if";
pub const CONDITIONAL_END: &str = "#endif";

/// Which kind of statement the next line is expected to hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseMode {
    ReturnTypes,
    NormalTypes,
    Functions,
    /// Inside `#if ... #endif`; content is ignored.
    ConditionalSkip,
}

/// Transient state of one parse pass.
///
/// Conditional regions remember a single saved mode. A nested `#if` while
/// already skipping overwrites that slot with `ConditionalSkip`, so the
/// first `#endif` does not leave the region; only a section keyword does.
#[derive(Debug)]
pub struct ParseSession {
    mode: ParseMode,
    saved_mode: ParseMode,
    registry: TypeRegistry,
    functions: Vec<FunctionDecl>,
    diagnostics: Vec<Diagnostic>,
}

impl Default for ParseSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseSession {
    pub fn new() -> Self {
        ParseSession {
            mode: ParseMode::Functions,
            saved_mode: ParseMode::Functions,
            registry: TypeRegistry::new(),
            functions: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    pub fn mode(&self) -> ParseMode {
        self.mode
    }

    /// Process one raw source line. `line_no` is 1-based.
    pub fn feed_line(&mut self, line_no: u32, raw: &str) {
        if let Err(e) = self.process(raw) {
            tracing::warn!(line = line_no, error = %e, "skipping declaration");
            self.diagnostics.push(Diagnostic::from_decl(line_no, &e));
        }
    }

    fn process(&mut self, raw: &str) -> Result<(), DeclError> {
        let line = canonicalize(raw);

        if line.is_empty() || line.starts_with(COMMENT_MARKER) {
            return Ok(());
        }

        match line.as_str() {
            RETURN_TYPES_KEYWORD => {
                self.mode = ParseMode::ReturnTypes;
                return Ok(());
            }
            NORMAL_TYPES_KEYWORD => {
                self.mode = ParseMode::NormalTypes;
                return Ok(());
            }
            FUNCTIONS_KEYWORD => {
                self.mode = ParseMode::Functions;
                return Ok(());
            }
            CONDITIONAL_END => {
                self.mode = self.saved_mode;
                return Ok(());
            }
            _ => {}
        }

        if line.starts_with(CONDITIONAL_START) {
            self.saved_mode = self.mode;
            self.mode = ParseMode::ConditionalSkip;
        }

        match self.mode {
            ParseMode::ConditionalSkip => Ok(()),
            ParseMode::NormalTypes => self.declare_type(&line, Scope::Parameter),
            ParseMode::ReturnTypes => self.declare_type(&line, Scope::Return),
            ParseMode::Functions => {
                let decl = FunctionDecl::parse(&line, &self.registry)?;
                tracing::debug!(
                    function = %decl.name,
                    parameters = decl.parameters.len(),
                    "parsed function"
                );
                self.functions.push(decl);
                Ok(())
            }
        }
    }

    fn declare_type(&mut self, line: &str, scope: Scope) -> Result<(), DeclError> {
        let binding = self.registry.declare(line, scope)?;
        tracing::debug!(
            thunk = %binding.thunk_name,
            wire = %binding.wire_name,
            ?scope,
            "declared type"
        );
        Ok(())
    }

    pub fn finish(self) -> ThunkModule {
        ThunkModule {
            functions: self.functions,
            diagnostics: self.diagnostics,
        }
    }
}

/// Parse IDL text held in memory.
pub fn parse_str(src: &str) -> ThunkModule {
    let mut session = ParseSession::new();
    for (idx, line) in src.lines().enumerate() {
        session.feed_line(line_number(idx), line);
    }
    session.finish()
}

/// Parse IDL text from a buffered reader. Read failures are fatal.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD; the line is
/// then parsed like any other.
pub fn parse_reader<R: BufRead>(mut reader: R, name: &str) -> Result<ThunkModule, ParseError> {
    let mut session = ParseSession::new();
    let mut buf = Vec::new();
    let mut idx = 0usize;
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|source| ParseError::Read {
                path: name.to_string(),
                source,
            })?;
        if read == 0 {
            break;
        }
        let mut bytes = buf.as_slice();
        if let Some(rest) = bytes.strip_suffix(b"\n") {
            bytes = rest.strip_suffix(b"\r").unwrap_or(rest);
        }
        session.feed_line(line_number(idx), &String::from_utf8_lossy(bytes));
        idx += 1;
    }
    Ok(session.finish())
}

/// Parse an IDL file from disk.
pub fn parse_file(path: &Path) -> Result<ThunkModule, ParseError> {
    let name = path.display().to_string();
    let file = std::fs::File::open(path).map_err(|source| ParseError::Read {
        path: name.clone(),
        source,
    })?;
    parse_reader(std::io::BufReader::new(file), &name)
}

fn line_number(idx: usize) -> u32 {
    u32::try_from(idx + 1).unwrap_or(u32::MAX)
}

pub(crate) mod check;
pub(crate) mod generate;
pub(crate) mod parse;

use std::path::Path;
use std::process;

use thunkgen_core::{Diagnostic, ThunkModule};

use crate::{report_error, OutputFormat};

/// Parse `input`, exiting with status 1 if it cannot be read.
pub(crate) fn load_module(input: &Path, output: OutputFormat, quiet: bool) -> ThunkModule {
    match thunkgen_core::parse_file(input) {
        Ok(module) => {
            tracing::debug!(
                input = %input.display(),
                functions = module.functions.len(),
                diagnostics = module.diagnostics.len(),
                "parsed input"
            );
            module
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }
}

/// Print every rejected line to stderr. Shown even with `--quiet`.
pub(crate) fn report_diagnostics(diagnostics: &[Diagnostic], output: OutputFormat) {
    for d in diagnostics {
        match output {
            OutputFormat::Text => eprintln!("{}", d),
            OutputFormat::Json => eprintln!("{}", d.to_json_value()),
        }
    }
}

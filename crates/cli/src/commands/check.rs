use std::path::Path;
use std::process;

use crate::OutputFormat;

use super::{load_module, report_diagnostics};

pub(crate) fn cmd_check(input: &Path, output: OutputFormat, quiet: bool) {
    let module = load_module(input, output, quiet);
    report_diagnostics(&module.diagnostics, output);

    if !quiet {
        match output {
            OutputFormat::Text => {
                println!(
                    "{}: {} functions, {} diagnostics",
                    input.display(),
                    module.functions.len(),
                    module.diagnostics.len()
                );
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({
                        "input": input.display().to_string(),
                        "functions": module.functions.len(),
                        "diagnostics": module.diagnostics.len(),
                    })
                );
            }
        }
    }

    if module.has_diagnostics() {
        process::exit(1);
    }
}

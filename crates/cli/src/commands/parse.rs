use std::path::Path;
use std::process;

use crate::{report_error, OutputFormat};

use super::load_module;

pub(crate) fn cmd_parse(input: &Path, output: OutputFormat, quiet: bool) {
    let module = load_module(input, output, quiet);
    match serde_json::to_string_pretty(&module) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            let msg = format!("serialization error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

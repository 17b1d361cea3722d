use std::path::Path;
use std::process;

use thunkgen_codegen::EmitConfig;

use crate::{report_error, OutputFormat};

use super::{load_module, report_diagnostics};

pub(crate) struct GenerateOptions<'a> {
    pub input: &'a Path,
    pub managed_out: &'a Path,
    pub native_out: &'a Path,
    pub config: Option<&'a Path>,
    pub strict: bool,
}

pub(crate) fn cmd_generate(opts: GenerateOptions<'_>, output: OutputFormat, quiet: bool) {
    let config = match opts.config {
        Some(path) => match EmitConfig::from_toml_file(path) {
            Ok(c) => c,
            Err(e) => {
                report_error(&e.to_string(), output, quiet);
                process::exit(1);
            }
        },
        None => EmitConfig::default(),
    };

    let module = load_module(opts.input, output, quiet);
    report_diagnostics(&module.diagnostics, output);

    if opts.strict && module.has_diagnostics() {
        let msg = format!(
            "{} line(s) rejected in '{}'; no files written",
            module.diagnostics.len(),
            opts.input.display()
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    // Both artifacts come from the same parsed module.
    let generated = match thunkgen_codegen::generate(
        &module,
        &config,
        opts.managed_out,
        opts.native_out,
        |path| {
            if !quiet && output == OutputFormat::Text {
                println!("Generating {}", path.display());
            }
        },
    ) {
        Ok(g) => g,
        Err(e) => {
            let msg = format!("code generation error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    if !quiet && output == OutputFormat::Json {
        println!(
            "{}",
            serde_json::json!({
                "managed": generated.managed.display().to_string(),
                "native": generated.native.display().to_string(),
                "functions": generated.functions,
                "diagnostics": module.diagnostics.len(),
            })
        );
    }
}

//! Managed (C#) export table.
//!
//! One `[UnmanagedCallersOnly]` entry point per function, followed by the
//! callback-table builder. Slot `i` of the table holds the entry point of
//! `functions[i]`; the native dispatch struct relies on that order.

use thunkgen_core::{FunctionDecl, Marshaling, Parameter};

use crate::config::EmitConfig;
use crate::GENERATED_BANNER;

/// Render the managed artifact for `functions`, in order.
pub fn emit_managed(functions: &[FunctionDecl], config: &EmitConfig) -> String {
    let mut out = String::new();

    if !config.license_header.is_empty() {
        out.push_str(&config.license_header);
        out.push_str("\n\n");
    }
    out.push_str(GENERATED_BANNER);
    out.push('\n');
    out.push_str("using System;\nusing System.Runtime.InteropServices;\n\n");
    out.push_str(&format!("namespace {}\n{{\n", config.managed_namespace));
    out.push_str(&format!(
        "    unsafe partial class {}\n    {{\n",
        config.managed_class
    ));

    for decl in functions {
        emit_entry_point(&mut out, decl);
    }

    emit_callback_table(&mut out, functions, config);

    out.push_str("    }\n}\n");
    out
}

fn emit_entry_point(out: &mut String, decl: &FunctionDecl) {
    let is_void = decl.return_type.is_managed_void();

    out.push_str("        [UnmanagedCallersOnly]\n");
    out.push_str(&format!(
        "        static {} _{}(IntPtr thisHandle, IntPtr* ppException",
        decl.return_type.wire_name, decl.name
    ));
    for param in &decl.parameters {
        out.push_str(&format!(", {} {}", param.ty.wire_name, param.name));
    }
    out.push_str(")\n");
    out.push_str("        {\n");
    out.push_str("            var _this = GetThis(thisHandle);\n");
    out.push_str("            try\n");
    out.push_str("            {\n");

    let args: Vec<String> = decl.parameters.iter().map(forward_argument).collect();
    let result_conversion = if decl.return_type.marshaling.is_boolean() {
        " ? 1 : 0"
    } else {
        ""
    };
    out.push_str(&format!(
        "                {}_this.{}({}){};\n",
        if is_void { "" } else { "return " },
        decl.name,
        args.join(", "),
        result_conversion
    ));

    out.push_str("            }\n");
    out.push_str("            catch (Exception ex)\n");
    out.push_str("            {\n");
    out.push_str("                *ppException = _this.AllocException(ex);\n");
    if !is_void {
        out.push_str("                return default;\n");
    }
    out.push_str("            }\n");
    out.push_str("        }\n\n");
}

/// Convert a wire-level argument back into what the instance method takes.
fn forward_argument(param: &Parameter) -> String {
    match param.ty.marshaling {
        Marshaling::ByRef => format!("ref *{}", param.name),
        Marshaling::Bool8 | Marshaling::Bool32 => format!("{} != 0", param.name),
        Marshaling::Direct => param.name.clone(),
    }
}

fn emit_callback_table(out: &mut String, functions: &[FunctionDecl], config: &EmitConfig) {
    out.push_str(&format!("        static IntPtr {}()\n", config.callbacks_method));
    out.push_str("        {\n");
    out.push_str(&format!(
        "            void** callbacks = (void**)Marshal.AllocCoTaskMem(sizeof(IntPtr) * {});\n\n",
        functions.len()
    ));

    for (index, decl) in functions.iter().enumerate() {
        let mut pointer_type = String::from("IntPtr, IntPtr*");
        for param in &decl.parameters {
            pointer_type.push_str(", ");
            pointer_type.push_str(&param.ty.wire_name);
        }
        pointer_type.push_str(", ");
        pointer_type.push_str(&decl.return_type.wire_name);
        out.push_str(&format!(
            "            callbacks[{}] = (delegate* unmanaged<{}>)&_{};\n",
            index, pointer_type, decl.name
        ));
    }

    out.push_str("\n            return (IntPtr)callbacks;\n");
    out.push_str("        }\n");
}

//! Native (C++) dispatch struct and wrapper class.
//!
//! The dispatch struct mirrors the managed callback table field-for-field;
//! the wrapper turns a non-null exception slot into a thrown exception.

use thunkgen_core::FunctionDecl;

use crate::config::EmitConfig;
use crate::GENERATED_BANNER;

/// Render the native artifact for `functions`, in order.
pub fn emit_native(functions: &[FunctionDecl], config: &EmitConfig) -> String {
    let mut out = String::new();

    if !config.license_header.is_empty() {
        out.push_str(&config.license_header);
        out.push_str("\n\n");
    }
    out.push_str(GENERATED_BANNER);
    out.push_str(&format!("#include \"{}\"\n\n", config.native_include));

    emit_dispatch_struct(&mut out, functions, config);
    emit_wrapper_class(&mut out, functions, config);

    out
}

fn emit_dispatch_struct(out: &mut String, functions: &[FunctionDecl], config: &EmitConfig) {
    out.push_str(&format!("struct {}\n{{\n", config.callbacks_struct));
    for decl in functions {
        out.push_str(&format!(
            "    {} (* {})(void * thisHandle, {}** ppException",
            decl.return_type.native_name, decl.name, config.native_exception_type
        ));
        for param in &decl.parameters {
            out.push_str(&format!(", {} {}", param.ty.native_name, param.name));
        }
        out.push_str(");\n");
    }
    out.push_str("};\n\n");
}

fn emit_wrapper_class(out: &mut String, functions: &[FunctionDecl], config: &EmitConfig) {
    let wrapper = &config.wrapper_class;
    let callbacks = &config.callbacks_struct;

    out.push_str(&format!("class {}\n{{\n", wrapper));
    out.push_str("    void * _thisHandle;\n");
    out.push_str(&format!("    {} * _callbacks;\n\n", callbacks));
    out.push_str("public:\n");
    out.push_str(&format!(
        "    {}(void * thisHandle, void ** callbacks)\n",
        wrapper
    ));
    out.push_str(&format!(
        "        : _thisHandle(thisHandle), _callbacks(({} *)callbacks)\n",
        callbacks
    ));
    out.push_str("    {\n    }\n\n");

    for decl in functions {
        emit_wrapper_method(out, decl, config);
    }

    out.push_str("};\n");
}

fn emit_wrapper_method(out: &mut String, decl: &FunctionDecl, config: &EmitConfig) {
    let params: Vec<String> = decl
        .parameters
        .iter()
        .map(|p| format!("{} {}", p.ty.native_name, p.name))
        .collect();
    out.push_str(&format!(
        "    virtual {} {}({})",
        decl.return_type.native_name,
        decl.name,
        params.join(", ")
    ));

    // Hand-written elsewhere; declaration only.
    if decl.manual_native_wrapper {
        out.push_str(";\n");
        return;
    }

    let returns_value = !decl.return_type.is_native_void();
    out.push_str("\n    {\n");
    out.push_str(&format!(
        "        {}* pException = nullptr;\n",
        config.native_exception_type
    ));
    out.push_str("        ");
    if returns_value {
        out.push_str(&format!("{} _ret = ", decl.return_type.native_name));
    }
    out.push_str(&format!(
        "_callbacks->{}(_thisHandle, &pException",
        decl.name
    ));
    for param in &decl.parameters {
        out.push_str(&format!(", {}", param.name));
    }
    out.push_str(");\n");
    out.push_str("        if (pException != nullptr)\n");
    out.push_str("            throw pException;\n");
    if returns_value {
        out.push_str("        return _ret;\n");
    }
    out.push_str("    }\n\n");
}

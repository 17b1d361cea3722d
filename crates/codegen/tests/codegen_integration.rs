//! Integration tests for the full IDL-to-artifacts pipeline.
//!
//! These tests parse the JIT interface fixture and check both generated
//! files against each other and against the declarations.

use std::fs;
use std::path::Path;
use thunkgen_codegen::{generate, EmitConfig};
use thunkgen_core::parse_file;

/// Locate the workspace root by walking up from CARGO_MANIFEST_DIR.
fn workspace_root() -> &'static Path {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    // crates/codegen -> workspace root is two levels up
    manifest_dir
        .parent()
        .and_then(|p| p.parent())
        .expect("workspace root")
}

fn fixture(name: &str) -> std::path::PathBuf {
    workspace_root().join("fixtures").join(name)
}

const FIXTURE_FUNCTIONS: [&str; 9] = [
    "getMethodAttribs",
    "getMethodSig",
    "isValidToken",
    "getSystemVAmd64PassStructInRegisterDescriptor",
    "getMethodName",
    "getClassModuleIdForStatics",
    "isCompatibleDelegate",
    "reportInliningDecision",
    "getMethodSync",
];

#[test]
fn fixture_parses_cleanly() {
    let module = parse_file(&fixture("jit_interface.idl")).expect("parse failed");
    assert!(
        module.diagnostics.is_empty(),
        "unexpected diagnostics: {:?}",
        module.diagnostics
    );
    let names: Vec<&str> = module.functions.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, FIXTURE_FUNCTIONS);
}

#[test]
fn generate_writes_both_artifacts() {
    let module = parse_file(&fixture("jit_interface.idl")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");
    let managed_path = dir.path().join("CorInfoImpl_generated.cs");
    let native_path = dir.path().join("jitinterface_generated.h");

    let mut announced = Vec::new();
    let artifacts = generate(
        &module,
        &EmitConfig::default(),
        &managed_path,
        &native_path,
        |path| announced.push(path.to_path_buf()),
    )
    .expect("generation failed");
    assert_eq!(artifacts.functions, FIXTURE_FUNCTIONS.len());
    assert_eq!(artifacts.managed, managed_path);
    assert_eq!(artifacts.native, native_path);
    assert_eq!(announced, [managed_path.clone(), native_path.clone()]);

    let managed = fs::read_to_string(&managed_path).unwrap();
    let native = fs::read_to_string(&native_path).unwrap();

    // Managed entry points with wire spellings
    assert!(managed.contains(
        "static uint _getMethodAttribs(IntPtr thisHandle, IntPtr* ppException, CORINFO_METHOD_STRUCT_* ftn)"
    ));
    assert!(managed.contains(
        "static UIntPtr _getClassModuleIdForStatics(IntPtr thisHandle, IntPtr* ppException, CORINFO_CLASS_STRUCT_* cls, uint* pIndex)"
    ));
    assert!(managed.contains("return _this.getClassModuleIdForStatics(cls, ref *pIndex);"));
    assert!(managed.contains(
        "return _this.isCompatibleDelegate(objCls, methodParentCls, method, delegateCls, ref *pfIsOpenDelegate) ? 1 : 0;"
    ));
    assert!(managed.contains("static byte _isValidToken("));
    assert!(managed.contains("return _this.getMethodSync(ftn, ref *ppIndirection);"));
    assert!(managed.contains(
        "_this.reportInliningDecision(inlinerHnd, inlineeHnd, inlineResult, reason);"
    ));

    // Native side keeps native spellings
    assert!(native.contains(
        "    unsigned (* getMethodAttribs)(void * thisHandle, CorInfoException** ppException, CORINFO_METHOD_HANDLE ftn);"
    ));
    assert!(native.contains(
        "    virtual const char* getMethodName(CORINFO_METHOD_HANDLE ftn, const char** moduleName)"
    ));
    assert!(native.contains(
        "    virtual bool getSystemVAmd64PassStructInRegisterDescriptor(CORINFO_CLASS_HANDLE structHnd, bool* pIsRegPassed);\n"
    ));

    // Skipped conditional function appears in neither artifact
    assert!(!managed.contains("getHelperFtn"));
    assert!(!native.contains("getHelperFtn"));
}

#[test]
fn callback_slots_and_dispatch_fields_line_up() {
    let module = parse_file(&fixture("jit_interface.idl")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");
    let managed_path = dir.path().join("managed.cs");
    let native_path = dir.path().join("native.h");
    generate(&module, &EmitConfig::default(), &managed_path, &native_path, |_| {}).unwrap();

    let managed = fs::read_to_string(&managed_path).unwrap();
    let native = fs::read_to_string(&native_path).unwrap();

    let slots: Vec<String> = managed
        .lines()
        .filter(|l| l.trim_start().starts_with("callbacks["))
        .map(|l| {
            let name = l.rsplit("&_").next().unwrap();
            name.trim_end_matches(';').to_string()
        })
        .collect();

    let fields: Vec<String> = native
        .lines()
        .filter(|l| l.contains("(* "))
        .map(|l| {
            let start = l.find("(* ").unwrap() + 3;
            let end = l[start..].find(')').unwrap() + start;
            l[start..end].to_string()
        })
        .collect();

    assert_eq!(slots, FIXTURE_FUNCTIONS);
    assert_eq!(fields, FIXTURE_FUNCTIONS);
    assert!(managed.contains(&format!(
        "sizeof(IntPtr) * {});",
        FIXTURE_FUNCTIONS.len()
    )));
}

#[test]
fn unwritable_output_is_fatal() {
    let module = parse_file(&fixture("jit_interface.idl")).expect("parse failed");
    let dir = tempfile::tempdir().expect("temp dir");
    let missing_dir = dir.path().join("does-not-exist").join("out.cs");
    let native_path = dir.path().join("native.h");

    let mut announced = Vec::new();
    let err = generate(
        &module,
        &EmitConfig::default(),
        &missing_dir,
        &native_path,
        |path| announced.push(path.to_path_buf()),
    )
    .unwrap_err();
    assert!(err.to_string().contains("does-not-exist"));
    assert_eq!(announced, [missing_dir.clone()]);
    assert!(!native_path.exists(), "native artifact must not be written");
}

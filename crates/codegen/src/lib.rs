//! thunkgen-codegen: emitters for the two sides of a thunk boundary.
//!
//! Both artifacts are rendered from the same `&[FunctionDecl]` slice, so the
//! managed callback table and the native dispatch struct always agree on
//! order and arity.

pub mod config;
pub mod error;
pub mod managed;
pub mod native;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use thunkgen_core::ThunkModule;

pub use config::EmitConfig;
pub use error::CodegenError;
pub use managed::emit_managed;
pub use native::emit_native;

pub(crate) const GENERATED_BANNER: &str = "// DO NOT EDIT THIS FILE! It IS AUTOGENERATED\n";

/// Paths of the artifacts produced by [`generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedArtifacts {
    pub managed: PathBuf,
    pub native: PathBuf,
    pub functions: usize,
}

/// Write the managed and native artifacts for `module`.
///
/// `on_artifact` is called with each path just before it is written. Any
/// I/O failure aborts the run; an artifact already written is left in place.
pub fn generate(
    module: &ThunkModule,
    config: &EmitConfig,
    managed_path: &Path,
    native_path: &Path,
    mut on_artifact: impl FnMut(&Path),
) -> Result<GeneratedArtifacts, CodegenError> {
    on_artifact(managed_path);
    write_managed(module, config, managed_path)?;
    on_artifact(native_path);
    write_native(module, config, native_path)?;
    Ok(GeneratedArtifacts {
        managed: managed_path.to_path_buf(),
        native: native_path.to_path_buf(),
        functions: module.functions.len(),
    })
}

pub fn write_managed(
    module: &ThunkModule,
    config: &EmitConfig,
    path: &Path,
) -> Result<(), CodegenError> {
    write_artifact(path, &emit_managed(&module.functions, config))
}

pub fn write_native(
    module: &ThunkModule,
    config: &EmitConfig,
    path: &Path,
) -> Result<(), CodegenError> {
    write_artifact(path, &emit_native(&module.functions, config))
}

/// Create `path` and write `content`, flushing before returning.
pub fn write_artifact(path: &Path, content: &str) -> Result<(), CodegenError> {
    let io_err = |source| CodegenError::Io {
        path: path.to_path_buf(),
        source,
    };
    tracing::info!(path = %path.display(), bytes = content.len(), "generating");
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(content.as_bytes()).map_err(io_err)?;
    writer.flush().map_err(io_err)?;
    Ok(())
}

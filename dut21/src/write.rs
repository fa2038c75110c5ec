//!
//! # Markup Writing Module
//!
//! Serializes [ModuleDeclaration]s for downstream generators.
//! Field names follow the long-standing dictionary layout:
//! `name` and `value` for parameters; `name`, `direction`, `type`, and `dimension` for ports.
//!

// Standard Lib Imports
use std::path::Path;

// Crates.io Imports
use log::info;

// Local imports
use super::data::*;
use super::utils::SerializationFormat;

/// Save `decl` to file `fname`, in the markup format implied by its extension
pub fn save(decl: &ModuleDeclaration, fname: impl AsRef<Path>) -> DutResult<()> {
    let fmt = format_for(&fname)?;
    fmt.save(decl, &fname)?;
    info!("Wrote {:?}", fname.as_ref());
    Ok(())
}
/// Write `decl` to a markup [String] of format `fmt`
pub fn to_string(decl: &ModuleDeclaration, fmt: SerializationFormat) -> DutResult<String> {
    Ok(fmt.to_string(decl)?)
}
/// Get the [SerializationFormat] implied by the extension of `fname`
pub fn format_for(fname: impl AsRef<Path>) -> DutResult<SerializationFormat> {
    match SerializationFormat::from_path(&fname) {
        Some(fmt) => Ok(fmt),
        None => Err(DutError::Str(format!(
            "Cannot infer a markup format from {:?}. Use one of (.json, .yaml, .yml, .toml).",
            fname.as_ref()
        ))),
    }
}

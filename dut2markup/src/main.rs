//! # dut2markup
//!
//! SystemVerilog DUT Declaration to Markup Converter
//!
//! Reads the parameter and port lists of a design-under-test's top-level module,
//! and writes them as JSON, YAML, or TOML for testbench generators.
//!

use clap::Parser;
use dut21::{ModuleDeclaration, SerializationFormat};
use log::{debug, info};
use std::error::Error;

// => The doc-comment on `ProgramOptions` here is displayed by the `clap`-generated help docs =>

/// SystemVerilog DUT Declaration to Markup Converter
#[derive(Parser)]
struct ProgramOptions {
    /// SystemVerilog Input File
    #[arg(short = 'i', long, default_value = "")]
    dut: String,
    /// Markup Output File
    #[arg(short = 'o', long, default_value = "")]
    out: String,
    /// Output Format. One of (json, yaml, toml). Inferred from the output file extension if omitted.
    #[arg(short = 'f', long)]
    fmt: Option<String>,
    /// Verbose Output Mode
    #[arg(short, long)]
    verbose: bool,
}

/// The main entry point.
/// All logic is offloaded to `_main` for sake of testing.
fn main() -> Result<(), Box<dyn Error>> {
    let options = ProgramOptions::parse();
    let level = if options.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    _main(&options)
}

/// All the real logic, with `ProgramOptions` argument for sake of testing
fn _main(options: &ProgramOptions) -> Result<(), Box<dyn Error>> {
    let fmt: SerializationFormat = match &options.fmt {
        Some(fmt) => fmt.parse()?,
        None => dut21::write::format_for(&options.out)?,
    };
    debug!("Output format {:?}", fmt);

    // Parse the DUT's declaration
    let decl = ModuleDeclaration::open(&options.dut)?;
    info!(
        "Module {}: {} parameters, {} ports",
        decl.name.as_deref().unwrap_or("<unnamed>"),
        decl.parameters.len(),
        decl.ports.len()
    );

    // And write it out as markup
    fmt.save(&decl, &options.out)?;
    info!("Wrote {:?}", &options.out);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_to_golden_yaml() -> Result<(), Box<dyn Error>> {
        let output_path = scratch("sync_fifo.test_output.yaml");
        let options = ProgramOptions {
            dut: resource("sync_fifo.sv"),
            out: output_path.clone(),
            fmt: None,
            verbose: true,
        };

        // Run the main function, producing file `output_path`
        let result = _main(&options);
        assert!(result.is_ok());

        // Read back what it wrote to disk, and compare to the golden version
        use SerializationFormat::Yaml;
        let readback: ModuleDeclaration = Yaml.open(&output_path)?;
        let golden: ModuleDeclaration = Yaml.open(resource("sync_fifo.golden.yaml"))?;
        assert_eq!(readback, golden);
        Ok(())
    }
    #[test]
    fn converts_to_explicit_json() -> Result<(), Box<dyn Error>> {
        // Explicit format wins over the (missing) extension
        let output_path = scratch("sync_fifo.test_output");
        let options = ProgramOptions {
            dut: resource("sync_fifo.sv"),
            out: output_path.clone(),
            fmt: Some("json".into()),
            verbose: false,
        };
        _main(&options)?;
        let readback: ModuleDeclaration = SerializationFormat::Json.open(&output_path)?;
        assert_eq!(readback.name.as_deref(), Some("sync_fifo"));
        assert_eq!(readback.ports.len(), 8);
        Ok(())
    }
    #[test]
    fn rejects_unknown_formats() {
        let options = ProgramOptions {
            dut: resource("sync_fifo.sv"),
            out: scratch("sync_fifo.test_output.xml"),
            fmt: None,
            verbose: false,
        };
        assert!(_main(&options).is_err());
    }
    #[test]
    fn rejects_missing_files() {
        let options = ProgramOptions {
            dut: resource("nonexistent.sv"),
            out: scratch("nonexistent.yaml"),
            fmt: None,
            verbose: false,
        };
        assert!(_main(&options).is_err());
    }

    /// Grab the full path of resource-file `fname`
    fn resource(rname: &str) -> String {
        format!("{}/resources/{}", env!("CARGO_MANIFEST_DIR"), rname)
    }
    /// Grab the full path of scratch-file `fname`, in the system temp directory
    fn scratch(rname: &str) -> String {
        std::env::temp_dir()
            .join(format!("dut2markup.{}", rname))
            .to_string_lossy()
            .into_owned()
    }
}

//!
//! # Dut21 SystemVerilog Module-Declaration Scanner
//!
//! Dut21 reads the declaration surface of a design-under-test's top-level module:
//! its parameter list and its port list.
//! The result, a [ModuleDeclaration], is the input to testbench and wrapper generators,
//! which need each port's direction, type, and width, in declaration order.
//!
//! Dut21 is deliberately not a SystemVerilog parser.
//! It targets headers written in the conventional ANSI style, one declaration per entry:
//!
//! ```text
//! module fifo #(
//!     parameter WIDTH = 8,
//!     parameter DEPTH
//! ) (
//!     input  logic             clk_i,
//!     output logic [WIDTH-1:0] data_o
//! );
//! ```
//!
//! Ports are `<direction> <type> [<dimensions>] <name>`, with directions `input`, `output`, `inout`
//! and types `logic`, `wire`, `tri`. Interfaces, user-defined types, and signal-kind attributes
//! (e.g. `input wire logic`) are not supported, and produce errors.
//!
//! ## Usage
//!
//! ```
//! use dut21::{ModuleDeclaration, PortDirection};
//!
//! let decl: ModuleDeclaration = "module m (input logic clk_i, output logic [7:0] q_o);".parse()?;
//! assert_eq!(decl.name.as_deref(), Some("m"));
//! assert!(decl.parameters.is_empty());
//! assert_eq!(decl.ports[1].dimension.as_deref(), Some("[7:0]"));
//! assert_eq!(decl.ports_of(PortDirection::Input).count(), 1);
//! # Ok::<(), dut21::DutError>(())
//! ```
//!
//! Loading from, and saving to, disk:
//!
//! ```skip
//! let decl = ModuleDeclaration::open("rtl/fifo.sv")?;
//! decl.save("fifo.yaml")?;
//! ```
//!

// Internal modules
pub mod data;
pub use data::*;
pub mod read;
pub use read::{
    extract_parameter_block, extract_port_block, parse_file, parse_parameter, parse_port,
    parse_str, split_entries,
};
pub mod write;

// Re-exports
pub use dut21utils as utils;
pub use utils::SerializationFormat;

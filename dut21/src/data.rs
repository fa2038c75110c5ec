//!
//! # Dut21 Data Model
//!
//! The declaration surface of a module: its [Parameter]s and [Port]s,
//! collected into a [ModuleDeclaration].
//!

// Std-Lib
use std::path::Path;
use std::str::FromStr;

// Crates.io Imports
use derive_builder::Builder;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// Local Imports
use crate::utils::{self, enumstr, SerializationFormat};

/// # Module Declaration
///
/// The parameter and port lists of a single module header, in declaration order.
/// An empty `parameters` list is valid, and is what a module without a `#( ... )` block produces.
#[derive(Default, Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[builder(pattern = "owned", setter(into))]
pub struct ModuleDeclaration {
    /// Module Name
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub name: Option<String>,
    /// Parameter List
    #[serde(default)]
    #[builder(default)]
    pub parameters: Vec<Parameter>,
    /// Port List
    #[serde(default)]
    #[builder(default)]
    pub ports: Vec<Port>,
}
impl ModuleDeclaration {
    /// Create a new and initially empty [ModuleDeclaration].
    /// Also available via [Default].
    pub fn new() -> ModuleDeclaration {
        ModuleDeclaration::default()
    }
    /// Parse a [ModuleDeclaration] from (SystemVerilog) file `fname`
    pub fn open(fname: impl AsRef<Path>) -> DutResult<ModuleDeclaration> {
        super::read::parse_file(fname)
    }
    /// Save as markup to file `fname`, in the format implied by its extension.
    pub fn save(&self, fname: impl AsRef<Path>) -> DutResult<()> {
        super::write::save(self, fname)
    }
    /// Write to a [String] in markup-format `fmt`
    pub fn to_markup(&self, fmt: SerializationFormat) -> DutResult<String> {
        super::write::to_string(self, fmt)
    }
    /// Get a reference to the [Parameter] named `name`, if one exists
    pub fn parameter(&self, name: &str) -> Option<&Parameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
    /// Get a reference to the [Port] named `name`, if one exists
    pub fn port(&self, name: &str) -> Option<&Port> {
        self.ports.iter().find(|p| p.name == name)
    }
    /// Iterate over the [Port]s of direction `dir`, in declaration order
    pub fn ports_of(&self, dir: PortDirection) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(move |p| p.direction == dir)
    }
}
impl FromStr for ModuleDeclaration {
    type Err = DutError;
    /// Parse from SystemVerilog source text
    fn from_str(src: &str) -> DutResult<Self> {
        super::read::parse_str(src)
    }
}

/// # Parameter
///
/// Named, optionally-defaulted elaboration-time value.
/// Default values are kept as raw, unparsed expression text.
#[derive(Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[builder(pattern = "owned", setter(into))]
pub struct Parameter {
    /// Parameter Name
    pub name: String,
    /// Default-Value Expression
    #[serde(rename = "value", default)]
    #[builder(default, setter(strip_option))]
    pub default_value: Option<String>,
}
impl Parameter {
    /// Create a new [Parameter]
    pub fn new(name: impl Into<String>, default_value: Option<String>) -> Self {
        Self {
            name: name.into(),
            default_value,
        }
    }
}

/// # Port
///
/// A single entry of a module's port list.
#[derive(Clone, Builder, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
#[builder(pattern = "owned", setter(into))]
pub struct Port {
    /// Port Name
    pub name: String,
    /// Port Direction
    pub direction: PortDirection,
    /// Net / Variable Type
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    /// Packed Dimensions, e.g. `[7:0]` or `[3:0][1:0]`.
    /// `None` for scalar ports.
    #[serde(default)]
    #[builder(default, setter(strip_option))]
    pub dimension: Option<String>,
}
impl Port {
    /// Create a new scalar [Port]
    pub fn new(name: impl Into<String>, direction: PortDirection, signal_type: SignalType) -> Self {
        Self {
            name: name.into(),
            direction,
            signal_type,
            dimension: None,
        }
    }
    /// Boolean indication of a single-bit port, i.e. one without dimensions
    pub fn is_scalar(&self) -> bool {
        self.dimension.is_none()
    }
}

enumstr!(
    /// # Port Directions
    #[derive(JsonSchema)]
    PortDirection {
        Input: "input",
        Output: "output",
        Inout: "inout",
    }
);
enumstr!(
    /// # Port Signal Types
    ///
    /// Signal-kind attributes (e.g. `wire logic`) are not accepted.
    /// Ports must use exactly one of these keywords.
    #[derive(JsonSchema)]
    SignalType {
        Logic: "logic",
        Wire: "wire",
        Tri: "tri",
    }
);
enumstr!(
    /// # Parameter Keywords
    ///
    /// Optional leading keywords of a parameter-list entry, discarded while parsing.
    ParamKeyword {
        Parameter: "parameter",
        LocalParam: "localparam",
    }
);
enumstr!(
    /// # Module Lifetimes
    ///
    /// Optional keyword between `module` and the module's name.
    ModuleLifetime {
        Static: "static",
        Automatic: "automatic",
    }
);

/// # Dut21 Error Enumeration
#[derive(Debug)]
pub enum DutError {
    /// No port-list parenthesis was found after the module header
    MissingPortBlock,
    /// Opening or closing delimiter without a matching partner.
    /// `offset` is the byte-offset of `delimiter` in the source text.
    Unbalanced { delimiter: char, offset: usize },
    /// Unmatched `[` or `]` within a port entry.
    /// `offset` is the byte-offset of `delimiter` in `entry`, the whitespace-normalized entry text.
    UnbalancedDimension {
        entry: String,
        delimiter: char,
        offset: usize,
    },
    /// Port entry whose first token is not a [PortDirection]
    InvalidDirection {
        entry: String,
        token: String,
        expected: &'static [&'static str],
    },
    /// Port entry whose second token is not a [SignalType]
    InvalidSignalType {
        entry: String,
        token: String,
        expected: &'static [&'static str],
    },
    /// Port entry with nothing after its direction, type, and dimensions
    MissingPortName { entry: String },
    /// Port entry with more than one candidate name-token
    AmbiguousPortName {
        entry: String,
        candidates: Vec<String>,
    },
    /// Wrapped errors, generally from other crates
    Boxed(Box<dyn std::error::Error + Send + Sync>),
    /// String message-valued errors
    Str(String),
}
impl From<utils::ser::Error> for DutError {
    fn from(e: utils::ser::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<std::io::Error> for DutError {
    fn from(e: std::io::Error) -> Self {
        Self::Boxed(Box::new(e))
    }
}
impl From<String> for DutError {
    /// Convert string-based errors by wrapping them
    fn from(e: String) -> Self {
        Self::Str(e)
    }
}
impl std::fmt::Display for DutError {
    /// Delegates to the [Debug] implementation
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> Result<(), std::fmt::Error> {
        std::fmt::Debug::fmt(self, f)
    }
}
impl std::error::Error for DutError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Boxed(e) => Some(&**e),
            _ => None,
        }
    }
}

/// Dut21 Library-Wide Result Type
pub type DutResult<T> = Result<T, DutError>;

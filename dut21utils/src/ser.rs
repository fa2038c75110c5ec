//!
//! # Markup Formats
//!
//! The [SerializationFormat]s declarations are written in, and read back from.
//! Each converts any [serde] data to and from strings and files.
//!

// Standard Lib Imports
use std::path::Path;
use std::str::FromStr;

// Crates.io Imports
use serde::de::DeserializeOwned;
use serde::Serialize;
use textwrap::dedent;

/// # Markup Formats
///
/// Named on the command line and in file extensions as
/// `json`, `yaml` (or `yml`), and `toml`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerializationFormat {
    Json,
    Yaml,
    Toml,
}
impl SerializationFormat {
    /// Infer a format from the extension of file-path `fname`.
    /// Returns `None` for missing or unrecognized extensions.
    pub fn from_path(fname: impl AsRef<Path>) -> Option<Self> {
        let ext = fname.as_ref().extension()?.to_str()?;
        ext.to_ascii_lowercase().parse().ok()
    }
    /// Render `data` as markup. JSON is pretty-printed.
    pub fn to_string(&self, data: &impl Serialize) -> Result<String, Error> {
        let s = match self {
            Self::Json => serde_json::to_string_pretty(data)?,
            Self::Yaml => serde_yaml::to_string(data)?,
            Self::Toml => toml::to_string(data)?,
        };
        Ok(s)
    }
    /// Parse markup string `s`.
    /// Common leading indentation is removed first, so inline (e.g. test) content can be indented freely.
    pub fn from_str<T: DeserializeOwned>(&self, s: &str) -> Result<T, Error> {
        let s = dedent(s);
        let data = match self {
            Self::Json => serde_json::from_str(&s)?,
            Self::Yaml => serde_yaml::from_str(&s)?,
            Self::Toml => toml::from_str(&s)?,
        };
        Ok(data)
    }
    /// Write `data` as markup to file `fname`, replacing any existing content
    pub fn save(&self, data: &impl Serialize, fname: impl AsRef<Path>) -> Result<(), Error> {
        let markup = self.to_string(data)?;
        std::fs::write(fname, markup)?;
        Ok(())
    }
    /// Read markup file `fname`
    pub fn open<T: DeserializeOwned>(&self, fname: impl AsRef<Path>) -> Result<T, Error> {
        let markup = std::fs::read_to_string(fname)?;
        self.from_str(&markup)
    }
}
impl FromStr for SerializationFormat {
    type Err = Error;
    /// Parse a format-name, one of ("json", "yaml", "yml", "toml")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "toml" => Ok(Self::Toml),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// # Markup Errors
#[derive(Debug)]
pub enum Error {
    /// Format-name other than those of [SerializationFormat]
    UnknownFormat(String),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
    TomlWrite(toml::ser::Error),
    TomlRead(toml::de::Error),
    Io(std::io::Error),
}
impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownFormat(s) => write!(
                f,
                "Invalid format: {}. Must be one of (json, yaml, toml).",
                s
            ),
            Self::Json(e) => write!(f, "JSON error: {}", e),
            Self::Yaml(e) => write!(f, "YAML error: {}", e),
            Self::TomlWrite(e) => write!(f, "TOML error: {}", e),
            Self::TomlRead(e) => write!(f, "TOML error: {}", e),
            Self::Io(e) => write!(f, "IO error: {}", e),
        }
    }
}
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::UnknownFormat(_) => None,
            Self::Json(e) => Some(e),
            Self::Yaml(e) => Some(e),
            Self::TomlWrite(e) => Some(e),
            Self::TomlRead(e) => Some(e),
            Self::Io(e) => Some(e),
        }
    }
}
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
impl From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Self {
        Self::Yaml(e)
    }
}
impl From<toml::ser::Error> for Error {
    fn from(e: toml::ser::Error) -> Self {
        Self::TomlWrite(e)
    }
}
impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::TomlRead(e)
    }
}
impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

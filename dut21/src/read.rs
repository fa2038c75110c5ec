//!
//! # Declaration Reading Module
//!
//! Facilities for reading a module's declaration surface from file or string.
//! Reading proceeds in three stages, each a free function:
//!
//! * Block extraction: [extract_parameter_block] and [extract_port_block]
//!   find the `#( ... )` and `( ... )` lists of the module header.
//! * Entry splitting: [split_entries] breaks a block into entries on its top-level commas.
//! * Entry classification: [parse_parameter] and [parse_port] convert each entry to a record.
//!
//! All matching uses depth-counted scans over `()`, `[]` and `{}`,
//! so nested expressions never end a block or split an entry early.
//!

// Standard Lib Imports
use std::io::Read;
use std::path::Path;

// Crates.io Imports
use log::{debug, info, warn};

// Local imports
use super::data::*;
use super::utils::EnumStr;

/// Parse a [ModuleDeclaration] from file `fname`
pub fn parse_file(fname: impl AsRef<Path>) -> DutResult<ModuleDeclaration> {
    let mut file = std::fs::File::open(&fname)?;
    let mut src = String::new();
    file.read_to_string(&mut src)?;
    debug!("Read {} bytes from {:?}", src.len(), fname.as_ref());
    parse_str(&src)
}
/// Parse a [ModuleDeclaration] from source string `src`
pub fn parse_str(src: &str) -> DutResult<ModuleDeclaration> {
    let text = strip_comments(src);
    let header = locate_header(&text)?;

    let parameters: Vec<Parameter> = match header.parameters {
        Some(block) => split_entries(&collapse_line_breaks(block))
            .iter()
            .map(|entry| parse_parameter(entry))
            .collect(),
        None => {
            info!(
                "No parameter list found for module {}",
                header.name.unwrap_or("<unnamed>")
            );
            Vec::new()
        }
    };

    let block = match header.ports {
        Some(block) => collapse_line_breaks(block),
        None => return Err(DutError::MissingPortBlock),
    };
    let ports = split_entries(&block)
        .iter()
        .map(|entry| parse_port(entry))
        .collect::<DutResult<Vec<Port>>>()?;

    debug!(
        "Parsed module {:?}: {} parameters, {} ports",
        header.name,
        parameters.len(),
        ports.len()
    );
    Ok(ModuleDeclaration {
        name: header.name.map(String::from),
        parameters,
        ports,
    })
}

/// Extract the content of the parameter block `#( ... )` from source `text`.
/// Returns `Ok(None)` if the module header has no parameter block.
pub fn extract_parameter_block(text: &str) -> DutResult<Option<String>> {
    let text = strip_comments(text);
    let header = locate_header(&text)?;
    Ok(header.parameters.map(collapse_line_breaks))
}
/// Extract the content of the port block `( ... )` from source `text`.
/// The block of an empty port list `()` is the empty string.
pub fn extract_port_block(text: &str) -> DutResult<String> {
    let text = strip_comments(text);
    let header = locate_header(&text)?;
    match header.ports {
        Some(block) => Ok(collapse_line_breaks(block)),
        None => Err(DutError::MissingPortBlock),
    }
}

/// Split `block` into its entries, on commas outside any `()`, `[]`, or `{}`.
/// Each entry is whitespace-normalized. Empty entries are dropped.
pub fn split_entries(block: &str) -> Vec<String> {
    let mut entries = Vec::new();
    let mut depth: usize = 0;
    let mut start = 0;
    for (idx, byte) in structure(block) {
        match byte {
            b'(' | b'[' | b'{' => depth += 1,
            b')' | b']' | b'}' => depth = depth.saturating_sub(1),
            b',' if depth == 0 => {
                entries.push(&block[start..idx]);
                start = idx + 1;
            }
            _ => (),
        }
    }
    entries.push(&block[start..]);
    entries
        .into_iter()
        .map(normalize_whitespace)
        .filter(|entry| !entry.is_empty())
        .collect()
}

/// Parse a parameter-list entry, e.g. `parameter int WIDTH = 8`.
///
/// Splits on the first `=` only. Leading keywords, types, and dimensions
/// ahead of the name are discarded; the default value is kept verbatim (trimmed).
/// Never fails. Whatever precedes the `=` yields the name.
pub fn parse_parameter(entry: &str) -> Parameter {
    let (lhs, default_value) = match entry.split_once('=') {
        Some((lhs, rhs)) => (lhs, Some(rhs.trim().to_string())),
        None => (entry, None),
    };
    let lhs = match split_dimensions(lhs) {
        Ok((_, rest)) => rest,
        Err(_) => lhs.to_string(),
    };
    let name = lhs
        .split_whitespace()
        .filter(|tok| !ParamKeyword::is_keyword(tok))
        .last()
        .unwrap_or("")
        .to_string();
    if name.is_empty() {
        warn!("Parameter entry `{}` has an empty name", entry);
    }
    Parameter {
        name,
        default_value,
    }
}

/// Parse a port-list entry, of the form `<direction> <type> [<dimensions>] <name>`.
pub fn parse_port(entry: &str) -> DutResult<Port> {
    let (dimension, rest) = split_dimensions(entry)?;
    let tokens: Vec<&str> = rest.split_whitespace().collect();

    let token = tokens.first().copied().unwrap_or("");
    let direction = match PortDirection::from_str(token) {
        Some(d) => d,
        None => {
            return Err(DutError::InvalidDirection {
                entry: entry.to_string(),
                token: token.to_string(),
                expected: PortDirection::VALUES,
            })
        }
    };
    let token = tokens.get(1).copied().unwrap_or("");
    let signal_type = match SignalType::from_str(token) {
        Some(t) => t,
        None => {
            return Err(DutError::InvalidSignalType {
                entry: entry.to_string(),
                token: token.to_string(),
                expected: SignalType::VALUES,
            })
        }
    };
    let name = match &tokens[2..] {
        [name] => name.to_string(),
        [] => {
            return Err(DutError::MissingPortName {
                entry: entry.to_string(),
            })
        }
        candidates => {
            return Err(DutError::AmbiguousPortName {
                entry: entry.to_string(),
                candidates: candidates.iter().map(|s| s.to_string()).collect(),
            })
        }
    };
    Ok(Port {
        name,
        direction,
        signal_type,
        dimension,
    })
}

/// Byte-ranges of the module header, borrowed from the (comment-stripped) source
#[derive(Debug, Default)]
struct Header<'t> {
    name: Option<&'t str>,
    parameters: Option<&'t str>,
    ports: Option<&'t str>,
}

/// Locate the module name, parameter block, and port block in `text`.
///
/// Scanning starts after the `module` keyword, if there is one.
/// A `#(` is only a parameter block ahead of the port list,
/// and the port list is the first depth-zero `(` following it.
/// A `;` before any port list ends the header.
fn locate_header(text: &str) -> DutResult<Header<'_>> {
    let bytes = text.as_bytes();
    let mut header = Header::default();
    let mut pos = match find_module_keyword(text) {
        Some(end) => {
            header.name = module_name(&text[end..]);
            end
        }
        None => 0,
    };
    while pos < bytes.len() {
        match bytes[pos] {
            b'#' => {
                let open = skip_whitespace(bytes, pos + 1);
                if header.parameters.is_none() && bytes.get(open) == Some(&b'(') {
                    let close = match_close(text, open)?;
                    header.parameters = Some(&text[open + 1..close]);
                    pos = close + 1;
                } else {
                    pos += 1;
                }
            }
            b'(' => {
                let close = match_close(text, pos)?;
                header.ports = Some(&text[pos + 1..close]);
                break;
            }
            b';' => break,
            _ => pos += 1,
        }
    }
    Ok(header)
}

/// Find the end-offset of the first `module` (or `macromodule`) keyword in `text`
fn find_module_keyword(text: &str) -> Option<usize> {
    const KEYWORD: &str = "module";
    text.match_indices(KEYWORD).find_map(|(idx, _)| {
        let before = &text[..idx];
        let before = before.strip_suffix("macro").unwrap_or(before);
        let end = idx + KEYWORD.len();
        let bounded = !before.chars().next_back().map_or(false, is_ident_char)
            && !text[end..].chars().next().map_or(false, is_ident_char);
        bounded.then(|| end)
    })
}

/// Get the module name from the text immediately following the `module` keyword
fn module_name(text: &str) -> Option<&str> {
    let mut rest = text.trim_start();
    let first = rest.split(|c: char| !is_ident_char(c)).next()?;
    if ModuleLifetime::is_keyword(first) {
        rest = rest[first.len()..].trim_start();
    }
    let end = rest.find(|c: char| !is_ident_char(c)).unwrap_or(rest.len());
    match &rest[..end] {
        "" => None,
        name => Some(name),
    }
}

/// Find the index of the delimiter closing the one opened at byte-offset `open`
fn match_close(text: &str, open: usize) -> DutResult<usize> {
    let mut stack: Vec<(u8, usize)> = Vec::new();
    for (idx, byte) in structure(&text[open..]) {
        let idx = idx + open;
        match byte {
            b'(' | b'[' | b'{' => stack.push((byte, idx)),
            b')' | b']' | b'}' => match stack.pop() {
                Some((opener, _)) if closer(opener) == byte => {
                    if stack.is_empty() {
                        return Ok(idx);
                    }
                }
                _ => {
                    return Err(DutError::Unbalanced {
                        delimiter: byte as char,
                        offset: idx,
                    })
                }
            },
            _ => (),
        }
    }
    let (delimiter, offset) = stack.pop().unwrap_or((b'(', open));
    Err(DutError::Unbalanced {
        delimiter: delimiter as char,
        offset,
    })
}

/// Pull the top-level `[...]` groups out of `entry`.
///
/// Returns the groups concatenated without intervening whitespace (or `None` if there are none),
/// plus the remainder of `entry`, with a space standing in for each group.
fn split_dimensions(entry: &str) -> DutResult<(Option<String>, String)> {
    let mut dims = String::new();
    let mut rest = String::new();
    let mut depth: usize = 0;
    let mut group_start = 0;
    let mut last = 0;
    for (idx, byte) in structure(entry) {
        match byte {
            b'[' => {
                if depth == 0 {
                    rest.push_str(&entry[last..idx]);
                    group_start = idx;
                }
                depth += 1;
            }
            b']' => {
                if depth == 0 {
                    return Err(DutError::UnbalancedDimension {
                        entry: entry.to_string(),
                        delimiter: ']',
                        offset: idx,
                    });
                }
                depth -= 1;
                if depth == 0 {
                    dims.push_str(&entry[group_start..=idx]);
                    rest.push(' ');
                    last = idx + 1;
                }
            }
            _ => (),
        }
    }
    if depth > 0 {
        return Err(DutError::UnbalancedDimension {
            entry: entry.to_string(),
            delimiter: '[',
            offset: group_start,
        });
    }
    rest.push_str(&entry[last..]);
    let dims = match dims.is_empty() {
        true => None,
        false => Some(dims),
    };
    Ok((dims, rest))
}

/// Iterate over the structural bytes of `text`, i.e. its delimiters and commas,
/// along with their byte-offsets. Content of string literals is skipped.
fn structure(text: &str) -> impl Iterator<Item = (usize, u8)> + '_ {
    let mut in_string = false;
    let mut escaped = false;
    text.bytes().enumerate().filter(move |&(_, byte)| {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            return false;
        }
        match byte {
            b'"' => {
                in_string = true;
                false
            }
            b'(' | b')' | b'[' | b']' | b'{' | b'}' | b',' => true,
            _ => false,
        }
    })
}

/// Comment-scanning states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CommentState {
    Code,
    StringLiteral,
    LineComment,
    BlockComment,
}

/// Blank out `//` and `/* */` comments in `src`.
/// Comment characters become spaces (one per byte), newlines are kept,
/// so byte-offsets and line numbers are unchanged.
fn strip_comments(src: &str) -> String {
    use CommentState::*;
    let mut out = String::with_capacity(src.len());
    let mut state = Code;
    let mut chars = src.chars().peekable();
    while let Some(c) = chars.next() {
        match state {
            Code => match (c, chars.peek().copied()) {
                ('/', Some('/')) => {
                    chars.next();
                    out.push_str("  ");
                    state = LineComment;
                }
                ('/', Some('*')) => {
                    chars.next();
                    out.push_str("  ");
                    state = BlockComment;
                }
                ('"', _) => {
                    out.push(c);
                    state = StringLiteral;
                }
                _ => out.push(c),
            },
            StringLiteral => {
                out.push(c);
                if c == '\\' {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                } else if c == '"' {
                    state = Code;
                }
            }
            LineComment if c == '\n' => {
                out.push(c);
                state = Code;
            }
            BlockComment if c == '*' && chars.peek() == Some(&'/') => {
                chars.next();
                out.push_str("  ");
                state = Code;
            }
            LineComment | BlockComment => blank(&mut out, c),
        }
    }
    out
}
/// Push the blanked-out replacement for comment character `c`
fn blank(out: &mut String, c: char) {
    match c {
        '\n' => out.push('\n'),
        _ => out.extend(std::iter::repeat(' ').take(c.len_utf8())),
    }
}

/// Remove line-breaks and their following indentation from `block`.
/// Where removal would fuse two identifier characters, a single space is kept instead.
fn collapse_line_breaks(block: &str) -> String {
    let mut out = String::with_capacity(block.len());
    let mut chars = block.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\n' {
            out.push(c);
            continue;
        }
        while chars.peek().map_or(false, |c| c.is_whitespace()) {
            chars.next();
        }
        let fuses = out.chars().next_back().map_or(false, is_ident_char)
            && chars.peek().map_or(false, |c| is_ident_char(*c));
        if fuses {
            out.push(' ');
        }
    }
    out
}

/// Trim `s`, and collapse each internal whitespace run to a single space
fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Index of the first non-whitespace byte at or after `pos`
fn skip_whitespace(bytes: &[u8], pos: usize) -> usize {
    let mut pos = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_whitespace() {
        pos += 1;
    }
    pos
}

/// Closing delimiter paired with `opener`
fn closer(opener: u8) -> u8 {
    match opener {
        b'(' => b')',
        b'[' => b']',
        _ => b'}',
    }
}

/// Boolean indication of whether `c` can be part of an identifier (or numeric literal)
fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$' || c == '\''
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_strips_comments() {
        let src = "a // (b, c)\n/* d ( */ e \"//f\"";
        let stripped = strip_comments(src);
        assert_eq!(stripped.len(), src.len());
        assert_eq!(normalize_whitespace(&stripped), "a e \"//f\"");
        assert_eq!(stripped.lines().count(), 2);
    }
    #[test]
    fn it_strips_multibyte_comments() {
        let src = "x // µ(\ny";
        let stripped = strip_comments(src);
        assert_eq!(stripped.len(), src.len());
        assert_eq!(normalize_whitespace(&stripped), "x y");
    }
    #[test]
    fn it_collapses_line_breaks() {
        assert_eq!(collapse_line_breaks("a,\n    b"), "a,b");
        assert_eq!(collapse_line_breaks("input logic\n    clk_i"), "input logic clk_i");
        assert_eq!(collapse_line_breaks("\n  input logic a\n"), "input logic a");
        assert_eq!(collapse_line_breaks("[7:0]\n\t\tdata"), "[7:0]data");
    }
    #[test]
    fn it_finds_module_keywords() {
        assert_eq!(find_module_keyword("module m;"), Some(6));
        assert_eq!(find_module_keyword("macromodule m;"), Some(11));
        assert_eq!(find_module_keyword("endmodule"), None);
        assert_eq!(find_module_keyword("modules"), None);
        assert_eq!(find_module_keyword("endmodule\nmodule x"), Some(16));
    }
    #[test]
    fn it_reads_module_names() {
        assert_eq!(module_name(" counter #("), Some("counter"));
        assert_eq!(module_name(" automatic fifo("), Some("fifo"));
        assert_eq!(module_name("\n\tdut_top\n("), Some("dut_top"));
        assert_eq!(module_name(" ("), None);
    }
    #[test]
    fn it_matches_nested_delimiters() -> DutResult<()> {
        let text = "(a, (b + c), [d:e], {f, g}) tail";
        assert_eq!(match_close(text, 0)?, 26);
        assert_eq!(match_close(text, 4)?, 10);
        Ok(())
    }
    #[test]
    fn it_skips_string_literals() -> DutResult<()> {
        let text = r#"(NAME = "a)b, c") x"#;
        assert_eq!(match_close(text, 0)?, 16);
        assert_eq!(split_entries(r#"A = "x,y", B"#), vec![r#"A = "x,y""#, "B"]);
        Ok(())
    }
    #[test]
    fn it_rejects_unbalanced_delimiters() {
        match match_close("(a, (b)", 0) {
            Err(DutError::Unbalanced { delimiter, offset }) => {
                assert_eq!(delimiter, '(');
                assert_eq!(offset, 0);
            }
            other => panic!("Expected Unbalanced, got {:?}", other),
        }
        match match_close("(a, b]", 0) {
            Err(DutError::Unbalanced { delimiter, offset }) => {
                assert_eq!(delimiter, ']');
                assert_eq!(offset, 5);
            }
            other => panic!("Expected Unbalanced, got {:?}", other),
        }
    }
    #[test]
    fn it_splits_entries() {
        let entries = split_entries(" input logic [3:0]  clk_i ,\n\t output logic [W-1:0] q_o ");
        assert_eq!(entries, vec!["input logic [3:0] clk_i", "output logic [W-1:0] q_o"]);

        // Commas nested in any delimiter pair stay put
        let entries = split_entries("A = f(1, 2), B = {8{1'b0}}, C = {x, y}, D [1:0][2:0]");
        assert_eq!(
            entries,
            vec!["A = f(1, 2)", "B = {8{1'b0}}", "C = {x, y}", "D [1:0][2:0]"]
        );

        // Empty blocks and empty entries produce nothing
        assert!(split_entries("").is_empty());
        assert!(split_entries("  \n ").is_empty());
        assert_eq!(split_entries("a,"), vec!["a"]);
    }
    #[test]
    fn it_splits_dimensions() -> DutResult<()> {
        let (dims, rest) = split_dimensions("output logic [3:0] [7:0] mem_o")?;
        assert_eq!(dims, Some("[3:0][7:0]".to_string()));
        assert_eq!(normalize_whitespace(&rest), "output logic mem_o");

        let (dims, rest) = split_dimensions("input logic [W[0]-1:0] a")?;
        assert_eq!(dims, Some("[W[0]-1:0]".to_string()));
        assert_eq!(normalize_whitespace(&rest), "input logic a");

        let (dims, rest) = split_dimensions("input logic a")?;
        assert_eq!(dims, None);
        assert_eq!(rest, "input logic a");

        assert!(split_dimensions("input logic [3:0 a").is_err());
        assert!(split_dimensions("input logic 3:0] a").is_err());
        Ok(())
    }
    #[test]
    fn it_locates_unbalanced_dimensions_within_entries() {
        match parse_port("input logic [3:0 a") {
            Err(DutError::UnbalancedDimension {
                entry,
                delimiter,
                offset,
            }) => {
                assert_eq!(entry, "input logic [3:0 a");
                assert_eq!(delimiter, '[');
                assert_eq!(offset, 12);
            }
            other => panic!("Expected UnbalancedDimension, got {:?}", other),
        }
        match parse_port("output wire 3:0] q") {
            Err(DutError::UnbalancedDimension {
                delimiter, offset, ..
            }) => {
                assert_eq!(delimiter, ']');
                assert_eq!(offset, 15);
            }
            other => panic!("Expected UnbalancedDimension, got {:?}", other),
        }
    }
    #[test]
    fn it_parses_parameters() {
        assert_eq!(
            parse_parameter("parameter WIDTH = 8"),
            Parameter::new("WIDTH", Some("8".into()))
        );
        assert_eq!(parse_parameter("DEPTH"), Parameter::new("DEPTH", None));
        assert_eq!(
            parse_parameter("parameter int unsigned W = (8+8)"),
            Parameter::new("W", Some("(8+8)".into()))
        );
        assert_eq!(
            parse_parameter("parameter logic [7:0] INIT = 8'hFF"),
            Parameter::new("INIT", Some("8'hFF".into()))
        );
        assert_eq!(
            parse_parameter("localparam EQ = (A == B)"),
            Parameter::new("EQ", Some("(A == B)".into()))
        );
        // Empty names are accepted, not rejected
        assert_eq!(parse_parameter("= 3"), Parameter::new("", Some("3".into())));
    }
    #[test]
    fn it_parses_ports() -> DutResult<()> {
        assert_eq!(
            parse_port("input logic clk_i")?,
            Port::new("clk_i", PortDirection::Input, SignalType::Logic)
        );
        let port = parse_port("inout tri [15:0] bus_io")?;
        assert_eq!(port.direction, PortDirection::Inout);
        assert_eq!(port.signal_type, SignalType::Tri);
        assert_eq!(port.dimension.as_deref(), Some("[15:0]"));
        assert_eq!(port.name, "bus_io");

        // Dimensions may also follow the name
        let port = parse_port("output wire q_o [1:0]")?;
        assert_eq!(port.name, "q_o");
        assert_eq!(port.dimension.as_deref(), Some("[1:0]"));
        Ok(())
    }
    #[test]
    fn it_rejects_invalid_ports() {
        match parse_port("foo logic bar_o") {
            Err(DutError::InvalidDirection {
                entry,
                token,
                expected,
            }) => {
                assert_eq!(entry, "foo logic bar_o");
                assert_eq!(token, "foo");
                assert_eq!(expected, &["input", "output", "inout"]);
            }
            other => panic!("Expected InvalidDirection, got {:?}", other),
        }
        match parse_port("input reg [3:0] q") {
            Err(DutError::InvalidSignalType { token, expected, .. }) => {
                assert_eq!(token, "reg");
                assert_eq!(expected, &["logic", "wire", "tri"]);
            }
            other => panic!("Expected InvalidSignalType, got {:?}", other),
        }
        match parse_port("input wire logic clk_i") {
            Err(DutError::AmbiguousPortName { candidates, .. }) => {
                assert_eq!(candidates, vec!["logic", "clk_i"]);
            }
            other => panic!("Expected AmbiguousPortName, got {:?}", other),
        }
        assert!(matches!(
            parse_port("output logic [7:0]"),
            Err(DutError::MissingPortName { .. })
        ));
        assert!(matches!(
            parse_port("input"),
            Err(DutError::InvalidSignalType { token, .. }) if token.is_empty()
        ));
    }
}

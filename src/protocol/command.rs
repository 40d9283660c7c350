//! Command definitions
//!
//! Represents commands sent to the server and their wire encoding.

use super::codec::escape;

/// Value of a command parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    /// `key=value`
    Single(String),

    /// `key=a|key=b|...`, one record per element on the server side
    List(Vec<String>),
}

impl From<&str> for ParamValue {
    fn from(s: &str) -> Self {
        ParamValue::Single(s.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(s: String) -> Self {
        ParamValue::Single(s)
    }
}

impl From<i64> for ParamValue {
    fn from(n: i64) -> Self {
        ParamValue::Single(n.to_string())
    }
}

impl From<Vec<String>> for ParamValue {
    fn from(values: Vec<String>) -> Self {
        ParamValue::List(values)
    }
}

impl From<Vec<&str>> for ParamValue {
    fn from(values: Vec<&str>) -> Self {
        ParamValue::List(values.into_iter().map(str::to_string).collect())
    }
}

/// A command with its encoded wire text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    options: Vec<String>,
    parameters: Vec<(String, ParamValue)>,
    text: String,
}

impl Command {
    /// Build a command and encode it
    pub fn new(
        name: impl Into<String>,
        options: Vec<String>,
        parameters: Vec<(String, ParamValue)>,
    ) -> Self {
        let name = name.into();
        let text = encode_command(&name, &options, &parameters);
        Self {
            name,
            options,
            parameters,
            text,
        }
    }

    /// Command name as given by the caller (unescaped)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Flag options, without the leading `-`
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Parameters in the order they are written to the wire
    pub fn parameters(&self) -> &[(String, ParamValue)] {
        &self.parameters
    }

    /// Full wire text, without the line terminator
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Encode a command line (without the trailing newline)
///
/// Format: `<cmd>[ -<option>]*[ <key>=<value>[|<key>=<value>]*]*`
pub fn encode_command(name: &str, options: &[String], parameters: &[(String, ParamValue)]) -> String {
    let mut text = escape(name);

    for option in options {
        text.push_str(" -");
        text.push_str(&escape(option));
    }

    for (key, value) in parameters {
        let key = escape(key);
        text.push(' ');
        match value {
            ParamValue::Single(v) => push_pair(&mut text, &key, v),
            ParamValue::List(values) => {
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        text.push('|');
                    }
                    push_pair(&mut text, &key, v);
                }
            }
        }
    }

    text
}

fn push_pair(text: &mut String, escaped_key: &str, value: &str) {
    text.push_str(escaped_key);
    text.push('=');
    text.push_str(&escape(value));
}

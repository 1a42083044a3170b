//! Environment variable validation with helpful error messages
//!
//! Invalid values fall back to the current setting with a warning and a
//! "did you mean" hint.

use std::io::Write;

use tracing::warn;

use crate::domain::services::suggest;

/// Validator for environment variable values
pub struct EnvVarValidator<'a> {
    var_name: &'a str,
    valid_values: &'a [&'a str],
}

impl<'a> EnvVarValidator<'a> {
    pub fn new(var_name: &'a str, valid_values: &'a [&'a str]) -> Self {
        Self {
            var_name,
            valid_values,
        }
    }

    /// Parse a value, returning `default` if invalid (with a warning on stderr)
    pub fn parse<T, F>(&self, value: &str, parser: F, default: T) -> T
    where
        F: Fn(&str) -> Option<T>,
    {
        self.parse_with_writer(value, parser, default, &mut std::io::stderr())
    }

    /// Parse with a custom writer (for testing)
    pub fn parse_with_writer<T, F, W>(&self, value: &str, parser: F, default: T, writer: &mut W) -> T
    where
        F: Fn(&str) -> Option<T>,
        W: Write,
    {
        match parser(value) {
            Some(parsed) => parsed,
            None => {
                let hint = self.hint(value);
                warn!(var = self.var_name, value, "invalid environment override ignored");
                let _ = writeln!(
                    writer,
                    "Warning: Invalid {} value '{}'{}",
                    self.var_name, value, hint
                );
                let _ = writeln!(writer, "Valid values: {}", self.valid_values.join(", "));
                default
            }
        }
    }

    fn hint(&self, value: &str) -> String {
        let input = value.trim().to_lowercase();
        match suggest(&input, self.valid_values.iter().copied()) {
            Some(candidate) if candidate != input => format!(". Did you mean '{}'?", candidate),
            _ => String::new(),
        }
    }
}

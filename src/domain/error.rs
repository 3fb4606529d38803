use std::fmt;

use thiserror::Error;

/// A report definition failed validation.
///
/// `path` is the dotted location of the offending key (`report_params.url`),
/// empty when the problem concerns the document as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ValidationError {
    pub path: String,
    pub reason: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn root(reason: impl Into<String>) -> Self {
        Self::new(String::new(), reason)
    }

    pub fn missing(path: impl Into<String>, expected: &str) -> Self {
        Self::new(
            path,
            format!("expected value of type [{expected}] but got [undefined]"),
        )
    }

    pub fn wrong_type(path: impl Into<String>, expected: &str, actual: &str) -> Self {
        Self::new(
            path,
            format!("expected value of type [{expected}] but got [{actual}]"),
        )
    }

    pub fn unknown_key(path: impl Into<String>) -> Self {
        Self::new(path, "definition for this key is missing")
    }

    pub fn unsupported(path: impl Into<String>, what: &str, value: &str) -> Self {
        Self::new(path, format!("{what} [{value}] is not supported yet"))
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            f.write_str(&self.reason)
        } else {
            write!(f, "[{}]: {}", self.path, self.reason)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_path() {
        let err = ValidationError::missing("report_params.url", "string");
        assert_eq!(
            err.to_string(),
            "[report_params.url]: expected value of type [string] but got [undefined]"
        );
    }

    #[test]
    fn root_errors_have_no_prefix() {
        let err = ValidationError::wrong_type("", "object", "array");
        assert_eq!(
            err.to_string(),
            "expected value of type [object] but got [array]"
        );
    }
}

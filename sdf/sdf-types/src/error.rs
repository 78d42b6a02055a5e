//! Error types for parsing value strings.

use thiserror::Error;

/// Errors that can occur when parsing a value type from its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueParseError {
    /// A component was not a valid number.
    #[error("invalid number '{token}' in {kind}")]
    InvalidNumber {
        /// The offending token.
        token: String,
        /// The value type being parsed.
        kind: &'static str,
    },

    /// Wrong number of components.
    #[error("expected {expected} values for {kind}, got {actual}")]
    WrongArity {
        /// The value type being parsed.
        kind: &'static str,
        /// Required number of components.
        expected: usize,
        /// Number of components found.
        actual: usize,
    },
}

/// Parse a whitespace-separated list of exactly `N` floats.
pub(crate) fn parse_floats<const N: usize>(
    s: &str,
    kind: &'static str,
) -> Result<[f64; N], ValueParseError> {
    let mut out = [0.0; N];
    let mut count = 0;
    for token in s.split_whitespace() {
        let value: f64 = token
            .parse()
            .map_err(|_| ValueParseError::InvalidNumber {
                token: token.to_string(),
                kind,
            })?;
        if count < N {
            out[count] = value;
        }
        count += 1;
    }
    if count != N {
        return Err(ValueParseError::WrongArity {
            kind,
            expected: N,
            actual: count,
        });
    }
    Ok(out)
}

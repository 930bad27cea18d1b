use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// How a character array was quoted. Double-quoted strings process
/// escapes; single-quoted strings are literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quote {
    Double,
    Single,
}

/// Two-dimensional character array. Each row is one string; all rows
/// have the same length.
#[derive(Debug, Clone, PartialEq)]
pub struct CharMatrix {
    pub data: DMatrix<char>,
    pub quote: Quote,
}

impl CharMatrix {
    pub fn new(data: DMatrix<char>, quote: Quote) -> Self {
        Self { data, quote }
    }

    pub fn empty(quote: Quote) -> Self {
        Self {
            data: DMatrix::from_element(0, 0, ' '),
            quote,
        }
    }

    /// Single-row array holding `s`. The empty string is 0x0.
    pub fn from_str(s: &str, quote: Quote) -> Self {
        let chars: Vec<char> = s.chars().collect();
        if chars.is_empty() {
            return Self::empty(quote);
        }
        Self {
            data: DMatrix::from_row_slice(1, chars.len(), &chars),
            quote,
        }
    }

    /// Row `r` as an owned string
    pub fn row_string(&self, r: usize) -> String {
        if r >= self.data.nrows() {
            return String::new();
        }
        self.data.row(r).iter().collect()
    }

    /// All rows
    pub fn rows(&self) -> Vec<String> {
        (0..self.data.nrows()).map(|r| self.row_string(r)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_row() {
        let c = CharMatrix::from_str("abc", Quote::Double);
        assert_eq!(c.data.shape(), (1, 3));
        assert_eq!(c.row_string(0), "abc");
    }

    #[test]
    fn test_empty_string_is_zero_by_zero() {
        let c = CharMatrix::from_str("", Quote::Single);
        assert_eq!(c.data.shape(), (0, 0));
        assert_eq!(c.row_string(0), "");
    }
}

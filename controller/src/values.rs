// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use serde::Deserialize;
use std::str::FromStr;

/// A loosely typed JSON scalar, as received from the front end
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Int64(i64),
    Double(f64),
    String(String),
}

impl Value {
    /// Identifiers are opaque, either strings or integers are accepted
    pub fn as_identifier(&self) -> Result<String, ErrorKind> {
        match self {
            Self::String(s) if s.trim().is_empty() => {
                Err(ErrorKind::ValueConvert("Empty identifier".into()))
            }
            Self::String(s) => Ok(s.clone()),
            Self::Int64(v) => Ok(v.to_string()),
            Self::Double(_) => Err(ErrorKind::ValueConvert(
                "Identifier must be a string or an integer".into(),
            )),
        }
    }

    pub fn as_f64(&self) -> Result<f64, ErrorKind> {
        let value = match self {
            Self::Int64(v) => *v as f64,
            Self::Double(v) => *v,
            Self::String(s) => s
                .trim()
                .parse()
                .map_err(|e: <f64 as FromStr>::Err| ErrorKind::ValueConvert(e.to_string()))?,
        };

        if value.is_finite() {
            Ok(value)
        } else {
            Err(ErrorKind::ValueConvert("Rating must be a finite number".into()))
        }
    }
}

// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use serde_json::{json, Value as Json};

/// Everything the handler can answer, rendered by the caller as status + JSON body
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Success,
    Rating(f64),
    NotFound,
    Conflict,
    InvalidAction,
    InvalidRequest(String),
    InternalError,
}

impl Response {
    pub fn status(&self) -> u16 {
        match self {
            Self::Success | Self::Rating(_) => 200,
            Self::InvalidAction | Self::InvalidRequest(_) => 400,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::InternalError => 500,
        }
    }

    pub fn body(&self) -> Json {
        match self {
            Self::Success => json!({ "message": "Operation successful" }),
            Self::Rating(rating) => json!({ "rating": rating }),
            Self::NotFound => json!({ "error": "Rating not found" }),
            Self::Conflict => json!({ "error": "Rating already exists" }),
            Self::InvalidAction => json!({ "error": "Invalid action" }),
            Self::InvalidRequest(reason) => json!({ "error": reason }),
            Self::InternalError => json!({ "error": "Internal server error" }),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status() == 200
    }
}

impl From<ErrorKind> for Response {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidAction(_) => Self::InvalidAction,
            ErrorKind::MissingField(_) | ErrorKind::ValueConvert(_) => {
                Self::InvalidRequest(kind.to_string())
            }
            ErrorKind::DuplicateRating(..) => Self::Conflict,
            // The row was deleted under us, same answer as a zero-row update
            ErrorKind::WriteConflict(..) => Self::NotFound,
            _ => Self::InternalError,
        }
    }
}

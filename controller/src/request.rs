// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::entity::RatingKey;
use crate::error::ErrorKind;
use crate::values::Value;
use serde::Deserialize;
use std::fmt::{self, Display};
use std::str::FromStr;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Action {
    Create,
    Update,
    Get,
    Delete,
}

impl FromStr for Action {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "get" => Ok(Self::Get),
            "delete" => Ok(Self::Delete),
            other => Err(ErrorKind::InvalidAction(other.into())),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Get => "get",
            Self::Delete => "delete",
        };

        write!(f, "{}", name)
    }
}

/// The request body as it arrives, nothing validated yet
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RatingRequest {
    pub action: Option<String>,
    #[serde(rename = "userID")]
    pub user_id: Option<Value>,
    #[serde(rename = "musicID")]
    pub music_id: Option<Value>,
    pub rating: Option<Value>,
}

/// A validated request, each variant carries only what its statement binds
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Create { key: RatingKey, rating: f64 },
    Update { key: RatingKey, rating: f64 },
    Get { key: RatingKey },
    Delete { key: RatingKey },
}

impl Command {
    pub fn action(&self) -> Action {
        match self {
            Self::Create { .. } => Action::Create,
            Self::Update { .. } => Action::Update,
            Self::Get { .. } => Action::Get,
            Self::Delete { .. } => Action::Delete,
        }
    }

    pub fn key(&self) -> &RatingKey {
        match self {
            Self::Create { key, .. }
            | Self::Update { key, .. }
            | Self::Get { key }
            | Self::Delete { key } => key,
        }
    }
}

fn required<'a>(value: &'a Option<Value>, name: &'static str) -> Result<&'a Value, ErrorKind> {
    value.as_ref().ok_or(ErrorKind::MissingField(name))
}

impl TryFrom<RatingRequest> for Command {
    type Error = ErrorKind;

    fn try_from(request: RatingRequest) -> Result<Self, Self::Error> {
        // The action is checked before anything else
        let action: Action = request
            .action
            .as_deref()
            .ok_or_else(|| ErrorKind::InvalidAction(String::new()))?
            .parse()?;

        let key = RatingKey {
            user_id: required(&request.user_id, "userID")?.as_identifier()?,
            music_id: required(&request.music_id, "musicID")?.as_identifier()?,
        };

        let command = match action {
            Action::Create => Self::Create {
                key,
                rating: required(&request.rating, "rating")?.as_f64()?,
            },
            Action::Update => Self::Update {
                key,
                rating: required(&request.rating, "rating")?.as_f64()?,
            },
            Action::Get => Self::Get { key },
            Action::Delete => Self::Delete { key },
        };

        Ok(command)
    }
}

// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use thiserror::Error as DError;

#[derive(Debug, Clone, PartialEq, DError)]
pub enum ErrorKind {
    #[error("Invalid action({0})")]
    InvalidAction(String),

    #[error("Missing required field {0}")]
    MissingField(&'static str),

    #[error("Failed to cast to some value ({0})")]
    ValueConvert(String),

    #[error("Couldn't connect to the ratings store ({0})")]
    ConnectionFailed(String),

    #[error("There's no open transaction")]
    NoTransaction,

    #[error("Connection was already released")]
    ConnectionReleased,

    #[error("Rating for user({0}) on item({1}) already exists")]
    DuplicateRating(String, String),

    #[error("Rating for user({0}) on item({1}) changed before commit")]
    WriteConflict(String, String),
}

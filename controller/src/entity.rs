// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use std::fmt::{self, Display};

/// Identifies a single rating, one per user and music item
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub struct RatingKey {
    pub user_id: String,
    pub music_id: String,
}

impl RatingKey {
    pub fn new(user_id: &str, music_id: &str) -> Self {
        Self {
            user_id: user_id.into(),
            music_id: music_id.into(),
        }
    }
}

impl Display for RatingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "user({}) on item({})", self.user_id, self.music_id)
    }
}

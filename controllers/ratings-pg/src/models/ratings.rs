// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::schema::ratings;
use controller::RatingKey;
use diesel::prelude::*;

// To query data from the database
#[derive(Debug, Clone, Queryable)]
pub struct Rating {
    pub user_id: String,
    pub music_id: String,
    pub rating: f64,
}

impl Rating {
    pub fn key(&self) -> RatingKey {
        RatingKey::new(&self.user_id, &self.music_id)
    }
}

// To insert a new rating into the database
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ratings)]
pub struct NewRating<'a> {
    pub music_id: &'a str,
    pub rating: f64,
    pub user_id: &'a str,
}

impl<'a> NewRating<'a> {
    pub fn new(key: &'a RatingKey, rating: f64) -> Self {
        Self {
            music_id: &key.music_id,
            rating,
            user_id: &key.user_id,
        }
    }
}

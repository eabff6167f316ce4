// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

#[macro_use]
extern crate diesel;

pub mod models;
pub mod schema;

use crate::models::ratings::NewRating;
use crate::schema::ratings;
use anyhow::Error;
use config::DatabaseConfig;
use controller::error::ErrorKind;
use controller::store::{Connection as RatingsConnection, Store};
use controller::RatingKey;
use diesel::connection::{AnsiTransactionManager, TransactionManager};
use diesel::pg::PgConnection;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::{delete, insert_into, prelude::*, update};

type Transactions = AnsiTransactionManager;

pub fn establish_connection(url: &str) -> Result<PgConnection, Error> {
    Ok(PgConnection::establish(url)?)
}

/// Opens one PostgreSQL connection per request, no pooling
#[derive(Debug, Clone)]
pub struct PgStore {
    url: String,
}

impl PgStore {
    pub fn new() -> Self {
        Self::with_url("postgres://postgres:@localhost/ratings")
    }

    pub fn with_url(url: &str) -> Self {
        Self { url: url.into() }
    }

    pub fn from_config(config: &DatabaseConfig) -> Self {
        Self::with_url(&config.url())
    }
}

impl Default for PgStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for PgStore {
    type Connection = PgRatings;

    fn acquire(&self) -> Result<Self::Connection, Error> {
        let pg_conn = establish_connection(&self.url)
            .map_err(|e| ErrorKind::ConnectionFailed(e.to_string()))?;

        Ok(PgRatings {
            pg_conn: Some(pg_conn),
        })
    }
}

pub struct PgRatings {
    pg_conn: Option<PgConnection>,
}

impl PgRatings {
    fn conn(&mut self) -> Result<&mut PgConnection, Error> {
        Ok(self
            .pg_conn
            .as_mut()
            .ok_or(ErrorKind::ConnectionReleased)?)
    }
}

impl RatingsConnection for PgRatings {
    fn begin(&mut self) -> Result<(), Error> {
        <Transactions as TransactionManager<PgConnection>>::begin_transaction(self.conn()?)?;
        Ok(())
    }

    fn insert_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize, Error> {
        let new_rating = NewRating::new(key, rating);

        let psql_result = insert_into(ratings::table)
            .values(&new_rating)
            .execute(self.conn()?);

        match psql_result {
            Ok(rows) => Ok(rows),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(ErrorKind::DuplicateRating(key.user_id.clone(), key.music_id.clone()).into())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize, Error> {
        let rows = update(ratings::table)
            .filter(ratings::music_id.eq(&key.music_id))
            .filter(ratings::user_id.eq(&key.user_id))
            .set(ratings::rating.eq(rating))
            .execute(self.conn()?)?;

        Ok(rows)
    }

    fn find_rating(&mut self, key: &RatingKey) -> Result<Option<f64>, Error> {
        let rating = ratings::table
            .filter(ratings::music_id.eq(&key.music_id))
            .filter(ratings::user_id.eq(&key.user_id))
            .select(ratings::rating)
            .first::<f64>(self.conn()?)
            .optional()?;

        Ok(rating)
    }

    fn delete_rating(&mut self, key: &RatingKey) -> Result<usize, Error> {
        let rows = delete(ratings::table)
            .filter(ratings::music_id.eq(&key.music_id))
            .filter(ratings::user_id.eq(&key.user_id))
            .execute(self.conn()?)?;

        Ok(rows)
    }

    fn commit(&mut self) -> Result<(), Error> {
        <Transactions as TransactionManager<PgConnection>>::commit_transaction(self.conn()?)?;
        Ok(())
    }

    fn rollback(&mut self) -> Result<(), Error> {
        <Transactions as TransactionManager<PgConnection>>::rollback_transaction(self.conn()?)?;
        Ok(())
    }

    fn release(&mut self) -> Result<(), Error> {
        // Dropping the connection closes it
        self.pg_conn.take().ok_or(ErrorKind::ConnectionReleased)?;
        log::trace!("PostgreSQL connection closed");
        Ok(())
    }
}

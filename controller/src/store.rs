// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::entity::RatingKey;
use crate::Result;
use std::ops::{Deref, DerefMut};

/// Result of running one statement that didn't fail
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    /// A read matched a row
    Found(f64),
    /// A mutation touched at least one row
    Applied,
    /// Nothing matched the key
    NoMatch,
}

impl Outcome {
    pub fn from_rows(rows: usize) -> Self {
        if rows == 0 {
            Self::NoMatch
        } else {
            Self::Applied
        }
    }
}

/// Hands out connections to the ratings store, one per request
pub trait Store {
    type Connection: Connection;

    /// Open a new connection, failing here means no transaction exists yet
    fn acquire(&self) -> Result<Self::Connection>;
}

/// A single connection, every statement binds its parameters
pub trait Connection {
    /// Start a transaction
    fn begin(&mut self) -> Result<()>;

    /// Insert a new rating, returns the number of inserted rows
    fn insert_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize>;

    /// Set the rating for the key, returns the number of updated rows
    fn update_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize>;

    /// Get the rating for the key, if any
    fn find_rating(&mut self, key: &RatingKey) -> Result<Option<f64>>;

    /// Remove the rating for the key, returns the number of deleted rows
    fn delete_rating(&mut self, key: &RatingKey) -> Result<usize>;

    /// Make the current transaction durable
    fn commit(&mut self) -> Result<()>;

    /// Discard the current transaction
    fn rollback(&mut self) -> Result<()>;

    /// Give the connection back, no statement may run afterwards
    fn release(&mut self) -> Result<()>;
}

/// Owns a connection for the duration of one request.
///
/// Dropping the session releases the connection exactly once. If a
/// transaction is still open at that point it is rolled back first.
pub struct Session<C: Connection> {
    conn: C,
    in_transaction: bool,
}

impl<C: Connection> Session<C> {
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            in_transaction: false,
        }
    }

    pub fn in_transaction(&self) -> bool {
        self.in_transaction
    }

    pub fn begin(&mut self) -> Result<()> {
        self.conn.begin()?;
        self.in_transaction = true;
        Ok(())
    }

    pub fn commit(&mut self) -> Result<()> {
        self.conn.commit()?;
        self.in_transaction = false;
        Ok(())
    }

    /// A failed rollback still closes the transaction from our side, it
    /// won't be retried on drop
    pub fn rollback(&mut self) -> Result<()> {
        self.in_transaction = false;
        self.conn.rollback()
    }
}

impl<C: Connection> Deref for Session<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl<C: Connection> DerefMut for Session<C> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl<C: Connection> Drop for Session<C> {
    fn drop(&mut self) {
        if self.in_transaction {
            log::warn!("Session dropped with an open transaction, rolling back");
            if let Err(e) = self.rollback() {
                log::error!("Rollback on drop failed: {:#}", e);
            }
        }

        if let Err(e) = self.conn.release() {
            log::error!("Couldn't release connection: {:#}", e);
        }
    }
}

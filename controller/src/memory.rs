// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::entity::RatingKey;
use crate::error::ErrorKind;
use crate::store::{Connection, Store};
use crate::Result;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type Table = Arc<Mutex<HashMap<RatingKey, f64>>>;

/// Ratings kept in process memory, cloning shares the same table
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    ratings: Table,
}

impl MemoryStore {
    pub fn new() -> Self {
        Default::default()
    }

    /// Committed rating for the key, bypasses any connection
    pub fn rating(&self, key: &RatingKey) -> Option<f64> {
        self.ratings.lock().ok()?.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.ratings.lock().map(|table| table.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    type Connection = MemoryConnection;

    fn acquire(&self) -> Result<Self::Connection> {
        Ok(MemoryConnection {
            ratings: Some(self.ratings.clone()),
            pending: None,
        })
    }
}

#[derive(Debug, Clone)]
enum Write {
    Insert(RatingKey, f64),
    Update(RatingKey, f64),
    Remove(RatingKey),
}

#[derive(Debug)]
pub struct MemoryConnection {
    ratings: Option<Table>,
    pending: Option<Vec<Write>>,
}

impl MemoryConnection {
    fn table(&self) -> Result<&Table> {
        Ok(self.ratings.as_ref().ok_or(ErrorKind::ConnectionReleased)?)
    }

    fn pending(&mut self) -> Result<&mut Vec<Write>> {
        Ok(self.pending.as_mut().ok_or(ErrorKind::NoTransaction)?)
    }

    // What this connection sees, its own uncommitted writes included
    fn current(&self, key: &RatingKey) -> Result<Option<f64>> {
        if let Some(pending) = &self.pending {
            for write in pending.iter().rev() {
                match write {
                    Write::Insert(k, rating) | Write::Update(k, rating) if k == key => {
                        return Ok(Some(*rating))
                    }
                    Write::Remove(k) if k == key => return Ok(None),
                    _ => {}
                }
            }
        }

        let table = self
            .table()?
            .lock()
            .map_err(|_| anyhow::anyhow!("Ratings table lock poisoned"))?;

        Ok(table.get(key).copied())
    }
}

// Staged writes are replayed over the committed table, an insert must not
// find a row and an update or delete must still find one
fn check_writes(table: &HashMap<RatingKey, f64>, writes: &[Write]) -> Result<()> {
    let mut staged: HashMap<&RatingKey, bool> = HashMap::new();

    for write in writes {
        let (key, after) = match write {
            Write::Insert(key, _) | Write::Update(key, _) => (key, true),
            Write::Remove(key) => (key, false),
        };
        let exists = staged
            .get(key)
            .copied()
            .unwrap_or_else(|| table.contains_key(key));

        match write {
            Write::Insert(..) if exists => {
                return Err(
                    ErrorKind::DuplicateRating(key.user_id.clone(), key.music_id.clone()).into(),
                )
            }
            Write::Update(..) | Write::Remove(..) if !exists => {
                return Err(
                    ErrorKind::WriteConflict(key.user_id.clone(), key.music_id.clone()).into(),
                )
            }
            _ => {}
        }

        staged.insert(key, after);
    }

    Ok(())
}

impl Connection for MemoryConnection {
    fn begin(&mut self) -> Result<()> {
        self.table()?;
        self.pending = Some(Vec::new());
        Ok(())
    }

    fn insert_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize> {
        if self.current(key)?.is_some() {
            return Err(ErrorKind::DuplicateRating(key.user_id.clone(), key.music_id.clone()).into());
        }

        self.pending()?.push(Write::Insert(key.clone(), rating));
        Ok(1)
    }

    fn update_rating(&mut self, key: &RatingKey, rating: f64) -> Result<usize> {
        if self.current(key)?.is_none() {
            // Still requires a transaction, even when nothing matches
            self.pending()?;
            return Ok(0);
        }

        self.pending()?.push(Write::Update(key.clone(), rating));
        Ok(1)
    }

    fn find_rating(&mut self, key: &RatingKey) -> Result<Option<f64>> {
        self.current(key)
    }

    fn delete_rating(&mut self, key: &RatingKey) -> Result<usize> {
        if self.current(key)?.is_none() {
            self.pending()?;
            return Ok(0);
        }

        self.pending()?.push(Write::Remove(key.clone()));
        Ok(1)
    }

    fn commit(&mut self) -> Result<()> {
        let table = self.table()?.clone();
        let mut table = table
            .lock()
            .map_err(|_| anyhow::anyhow!("Ratings table lock poisoned"))?;

        // Other connections may have committed since the writes were staged,
        // nothing is applied unless all of them still hold
        check_writes(&table, self.pending.as_ref().ok_or(ErrorKind::NoTransaction)?)?;

        let writes = self.pending.take().ok_or(ErrorKind::NoTransaction)?;
        for write in writes {
            match write {
                Write::Insert(key, rating) | Write::Update(key, rating) => {
                    table.insert(key, rating);
                }
                Write::Remove(key) => {
                    table.remove(&key);
                }
            }
        }

        Ok(())
    }

    fn rollback(&mut self) -> Result<()> {
        self.pending.take().ok_or(ErrorKind::NoTransaction)?;
        Ok(())
    }

    fn release(&mut self) -> Result<()> {
        self.pending = None;
        self.ratings.take().ok_or(ErrorKind::ConnectionReleased)?;
        Ok(())
    }
}

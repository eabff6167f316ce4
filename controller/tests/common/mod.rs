// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::anyhow;
use controller::{Connection, RatingKey, Result, Store};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    Acquire,
    Begin,
    Insert,
    Update,
    Find,
    Delete,
    Commit,
    Rollback,
    Release,
}

/// Which calls should fail, and what the statements answer
#[derive(Debug, Clone, Default)]
pub struct Script {
    pub fail: Vec<Call>,
    pub rows: usize,
    pub found: Option<f64>,
}

/// A store that records every call made through it
#[derive(Debug, Clone, Default)]
pub struct RecordingStore {
    script: Script,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingStore {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: Default::default(),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().map(|calls| calls.clone()).unwrap_or_default()
    }

    pub fn count(&self, call: Call) -> usize {
        self.calls().into_iter().filter(|c| *c == call).count()
    }

    pub fn counts(&self) -> HashMap<Call, usize> {
        let mut counts = HashMap::new();
        for call in self.calls() {
            *counts.entry(call).or_insert(0) += 1;
        }

        counts
    }

    fn record(script: &Script, calls: &Mutex<Vec<Call>>, call: Call) -> Result<()> {
        calls
            .lock()
            .map_err(|_| anyhow!("calls lock poisoned"))?
            .push(call);

        if script.fail.contains(&call) {
            Err(anyhow!("injected failure on {:?}", call))
        } else {
            Ok(())
        }
    }
}

impl Store for RecordingStore {
    type Connection = RecordingConnection;

    fn acquire(&self) -> Result<Self::Connection> {
        Self::record(&self.script, &self.calls, Call::Acquire)?;

        Ok(RecordingConnection {
            script: self.script.clone(),
            calls: self.calls.clone(),
        })
    }
}

pub struct RecordingConnection {
    script: Script,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl RecordingConnection {
    fn record(&self, call: Call) -> Result<()> {
        RecordingStore::record(&self.script, &self.calls, call)
    }
}

impl Connection for RecordingConnection {
    fn begin(&mut self) -> Result<()> {
        self.record(Call::Begin)
    }

    fn insert_rating(&mut self, _: &RatingKey, _: f64) -> Result<usize> {
        self.record(Call::Insert)?;
        Ok(1)
    }

    fn update_rating(&mut self, _: &RatingKey, _: f64) -> Result<usize> {
        self.record(Call::Update)?;
        Ok(self.script.rows)
    }

    fn find_rating(&mut self, _: &RatingKey) -> Result<Option<f64>> {
        self.record(Call::Find)?;
        Ok(self.script.found)
    }

    fn delete_rating(&mut self, _: &RatingKey) -> Result<usize> {
        self.record(Call::Delete)?;
        Ok(self.script.rows)
    }

    fn commit(&mut self) -> Result<()> {
        self.record(Call::Commit)
    }

    fn rollback(&mut self) -> Result<()> {
        self.record(Call::Rollback)
    }

    fn release(&mut self) -> Result<()> {
        self.record(Call::Release)
    }
}

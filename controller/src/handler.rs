// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;
use crate::request::{Command, RatingRequest};
use crate::response::Response;
use crate::store::{Connection, Outcome, Session, Store};
use crate::Result;

/// Runs one rating request against the store inside its own connection.
///
/// The handler keeps no per-request state, a single instance can serve
/// concurrent requests as long as the store can.
pub struct RatingTransactionHandler<S> {
    store: S,
}

impl<S: Store> RatingTransactionHandler<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate and run the request, never fails, errors become responses
    pub fn handle(&self, request: RatingRequest) -> Response {
        match Command::try_from(request) {
            Ok(command) => self.execute(&command),
            Err(kind) => {
                log::warn!("Rejected rating request: {}", kind);
                Response::from(kind)
            }
        }
    }

    pub fn execute(&self, command: &Command) -> Response {
        let conn = match self.store.acquire() {
            Ok(conn) => conn,
            Err(e) => {
                log::error!("Couldn't acquire a connection: {:#}", e);
                return Response::InternalError;
            }
        };

        let mut session = Session::new(conn);
        let response = match run(&mut session, command) {
            Ok(Outcome::Found(rating)) => Response::Rating(rating),
            Ok(Outcome::Applied) => Response::Success,
            Ok(Outcome::NoMatch) => Response::NotFound,
            Err(e) => {
                log::error!("Error handling the rating request: {:#}", e);

                // Whatever failed, the connection is rolled back before it's
                // given back
                if let Err(e) = session.rollback() {
                    log::error!("Rollback failed: {:#}", e);
                }

                match e.downcast_ref::<ErrorKind>() {
                    Some(kind @ (ErrorKind::DuplicateRating(..) | ErrorKind::WriteConflict(..))) => {
                        Response::from(kind.clone())
                    }
                    _ => Response::InternalError,
                }
            }
        };

        log::debug!(
            "{} for {} answered with {}",
            command.action(),
            command.key(),
            response.status()
        );

        response
    }
}

fn run<C: Connection>(session: &mut Session<C>, command: &Command) -> Result<Outcome> {
    match command {
        // Reads don't open a transaction, there's nothing to commit
        Command::Get { key } => match session.find_rating(key)? {
            Some(rating) => Ok(Outcome::Found(rating)),
            None => Ok(Outcome::NoMatch),
        },
        Command::Create { key, rating } => mutate(session, |conn| conn.insert_rating(key, *rating)),
        Command::Update { key, rating } => mutate(session, |conn| conn.update_rating(key, *rating)),
        Command::Delete { key } => mutate(session, |conn| conn.delete_rating(key)),
    }
}

fn mutate<C, F>(session: &mut Session<C>, statement: F) -> Result<Outcome>
where
    C: Connection,
    F: FnOnce(&mut C) -> Result<usize>,
{
    session.begin()?;
    let rows = statement(&mut **session)?;

    match Outcome::from_rows(rows) {
        Outcome::NoMatch => {
            session.rollback()?;
            Ok(Outcome::NoMatch)
        }
        outcome => {
            session.commit()?;
            Ok(outcome)
        }
    }
}

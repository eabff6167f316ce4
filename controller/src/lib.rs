// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

pub mod entity;
pub mod error;
pub mod handler;
pub mod memory;
pub mod request;
pub mod response;
pub mod store;
pub mod values;

use anyhow::Error;

pub use entity::RatingKey;
pub use handler::RatingTransactionHandler;
pub use memory::MemoryStore;
pub use request::{Action, Command, RatingRequest};
pub use response::Response;
pub use store::{Connection, Outcome, Session, Store};
pub use values::Value;

pub type Result<T> = std::result::Result<T, Error>;

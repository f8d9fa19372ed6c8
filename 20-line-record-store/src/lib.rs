//! A line-oriented TCP service over one flat-text record store.
//!
//! Each line of the store file is one record, addressed by its 1-based
//! position. Clients send `read`, `add`, `change`, `delete` and `exit`
//! commands, one per line, and every connection runs as its own task
//! against a single shared/exclusive gate in front of the file.
//!
//! - [`store`] holds the line-indexed operations and the storage seam.
//! - [`coordinator`] is the reader/writer gate around the store.
//! - [`command`] parses request lines; [`dispatch`] executes them and turns
//!   every outcome into a [`reply::Reply`].
//! - [`service`] bundles the gate with the connection counter.
//! - [`session`] runs one connection; [`server`] accepts them.
//! - [`client`] and [`cli`] make up the interactive front end.

pub mod cli;
pub mod client;
pub mod command;
pub mod coordinator;
pub mod dispatch;
pub mod error;
pub mod reply;
pub mod server;
pub mod service;
pub mod session;
pub mod store;

//! # Inventory client
//!
//! Everything a front end needs to drive the inventory server.
//!
//! - [`ApiClient`] speaks the `/api` envelope protocol over HTTP
//! - [`ClientState`] is the listing screen as a pure reducer: [`Action`] in, [`Effect`] out
//! - [`ProductForm`] holds the add form and mirrors the server's field rules
//! - [`Session`] wires the three together and runs effects against a live server
//!
//! The `inventory` binary is a thin command line shell over [`Session`].

pub mod api;
pub mod error;
pub mod form;
pub mod session;
pub mod state;

pub use api::ApiClient;
pub use error::ClientError;
pub use form::ProductForm;
pub use session::Session;
pub use state::{Action, ClientState, Effect, Notice, PendingDelete};

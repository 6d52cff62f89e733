//! # Catalog
//!
//! Shared data model between the inventory server and its clients.
//!
//! ## Collections
//!
//! - **Category**: `_id`, `name`, `description`. Read-only over HTTP, written by the seeder.
//! - **Product**: `_id`, `name`, `description`, `quantity`, `categories` (ids), `createdAt`, `updatedAt`.
//!
//! Products store category *ids*. Responses carry a [`ProductView`] where those ids are
//! resolved into full [`Category`] records at read time, never persisted that way.
//!
//! ## Envelope
//!
//! Every response body is an [`Envelope`]:
//! ```json
//! { "success": true, "data": { ... }, "message": "...", "errors": [{ "field": "...", "message": "..." }] }
//! ```

pub mod envelope;
pub mod models;
pub mod payloads;
pub mod query;

pub use envelope::{Envelope, FieldError, Pagination, ProductPage};
pub use models::{Category, Product, ProductView};
pub use payloads::{NewProduct, ProductPatch, ProductPayload};
pub use query::{ProductQuery, RawProductQuery};

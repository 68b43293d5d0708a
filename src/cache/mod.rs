//! Client-side cache for query results.
//!
//! A `ListStore` keeps the last list returned by the server, in server
//! order, and exposes the local edits mutations need:
//! - `replace_all` after a read
//! - `remove_by_id` after a delete
//! - `patch_by_id` / `upsert` after an update or insert

mod store;
mod traits;

pub use store::ListStore;
pub use traits::Cacheable;

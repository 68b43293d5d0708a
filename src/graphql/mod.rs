pub mod api_types;
pub mod cache;
pub mod client;
pub mod operations;
pub mod types;

pub use cache::TodoStore;
pub use client::{GraphqlClient, TodoApi};
pub use types::{Todo, TodoId};

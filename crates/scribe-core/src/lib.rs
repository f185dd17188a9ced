//! Core types, the graph store contract, and the article aggregation service
//! for the Scribe blogging backend.
//!
//! This crate is deliberately free of HTTP and database dependencies. Storage
//! backends implement [`store::BlogStore`]; transports drive
//! [`service::BlogService`].

// Native `async fn` in traits; the store trait spells out `Send` futures
// explicitly so the advisory lint is noise here.
#![allow(async_fn_in_trait)]

pub mod article;
pub mod comment;
pub mod error;
pub mod projection;
pub mod query;
pub mod service;
pub mod slug;
pub mod store;
pub mod tags;
pub mod user;

mod timestamp;

pub use error::{Error, Result, ValidationErrors};
pub use service::BlogService;
pub use store::BlogStore;

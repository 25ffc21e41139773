//! Core types and the group-invitation lifecycle for Hearth.
//!
//! This crate has no HTTP or database dependencies. Storage
//! is reached through the [`store::DocumentStore`] trait; backends (e.g.
//! `hearth-store-sqlite`) implement it and the HTTP layer drives the
//! components defined here.

pub mod chore;
pub mod document;
pub mod error;
pub mod group;
pub mod invite;
pub mod model;
pub mod path;
pub mod profile;
pub mod resolve;
pub mod store;

pub use error::{Error, Result};
pub use invite::InvitationWriter;
pub use resolve::{InvitationResolver, Resolution};

//! Core types for the campus lead desk.
//!
//! Contact submissions, the keyword classifier, the analytics aggregator, the
//! typed lead filter, and the [`store::ContactStore`] trait. This crate has no
//! HTTP or database dependencies; every other crate in the workspace builds on
//! it.

#![allow(async_fn_in_trait)]

pub mod analytics;
pub mod classify;
pub mod contact;
pub mod error;
pub mod filter;
pub mod store;

pub use error::{Error, Result};

//! # Request Module
//!
//! The request model consumed by the dispatcher: an HTTP verb, a logical
//! action name, a named parameter mapping, and the raw request body.
//!
//! The transport builds an [`ApiRequest`] once per inbound request; the
//! dispatcher borrows it for the duration of a single dispatch. Parameters
//! use stack-allocated storage ([`ParamVec`]) since most requests carry only
//! a handful of them.
//!
//! Body decoding lives in [`body`]: raw bytes are parsed as JSON and mapped
//! into a typed value through the [`body::RequestBody`] capability trait.

pub mod body;
mod core;

pub use core::{ApiRequest, ParamVec, MAX_INLINE_PARAMS};

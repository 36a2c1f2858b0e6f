//! Core trait abstractions.
//!
//! Applications implement [`store::ContentStore`] to reach their content and
//! [`receiver::Receiver`] (plus per-level capability traits) to act on it.

pub mod receiver;
pub mod store;

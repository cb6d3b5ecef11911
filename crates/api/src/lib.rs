//! The contract between the widgets and the AI service.
//!
//! This crate establishes how a request reaches the service and how a
//! failure is classified, so that the widgets can run against the real
//! HTTP backend or a scripted double without changing their code.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.

#![deny(missing_docs)]

mod error;
mod request;
mod transport;

pub use error::*;
pub use request::*;
pub use transport::*;

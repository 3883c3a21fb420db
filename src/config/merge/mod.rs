//! Merge policy and service for config composition.

mod policy;
pub(crate) mod service;

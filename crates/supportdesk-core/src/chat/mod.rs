//! Chat orchestration for the support assistant.

pub mod service;

//! Conversational memory for supportdesk.
//!
//! This module defines the `MemoryRepository` port that the infrastructure
//! layer implements, the lexical relevance function used for recall, the
//! `MemoryExtractor` that asks an LLM which facts to keep, and the
//! `MemoryService` tying sessions, recall, and augmentation together.

pub mod extractor;
pub mod relevance;
pub mod service;
pub mod store;

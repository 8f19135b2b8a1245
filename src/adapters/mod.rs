//! External system integrations for the ingestion bridge.
//!
//! This module provides adapters for the three external surfaces:
//!
//! - [`remote`] - The partner's file server (FTP)
//! - [`replica`] - Durable replica storage (local disk or object storage)
//! - [`queue`] - The downstream notification channel (FIFO queue)
//!
//! # Design Pattern
//!
//! Adapters follow the **Adapter Pattern** to isolate external
//! dependencies and enable testing with in-memory fakes. Each surface
//! is a trait; the pipeline only ever sees the trait objects, so
//! backends swap per configuration without touching the core.

pub mod queue;
pub mod remote;
pub mod replica;

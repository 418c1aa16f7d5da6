//! Server module for building HTTP servers from registered resources
//!
//! This module provides a `ServerBuilder` that serves:
//! - The routes of every registered resource
//! - Health check routes

pub mod builder;
pub mod registry;
pub mod rest;

pub use builder::ServerBuilder;
pub use registry::{ResourceDescriptor, ResourceRegistry};
pub use rest::RestExposure;

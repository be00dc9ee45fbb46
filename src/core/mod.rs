//! Planning core: geometry, data model, allocator and the request layer

pub mod allocator;
pub mod error;
pub mod geometry;
pub mod naming;
pub mod plan;
pub mod submission;
pub mod validation;
pub mod wire;

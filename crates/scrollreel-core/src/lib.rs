//! # scrollreel-core
//!
//! Core types and primitives for the scrollreel frame-sequence engine.
//! This crate contains foundational types shared across all scrollreel crates:
//! pixel buffers, frame indices, surface sizes, host clock values,
//! content hashes, configuration, and error types.

pub mod config;
pub mod error;
pub mod frame;
pub mod hash;
pub mod math;
pub mod time;

pub use config::*;

pub use error::{ScrollreelError, ScrollreelResult};
pub use frame::{FrameBuffer, FrameIndex, PixelFormat};
pub use hash::{hash_frame, ContentHash};
pub use math::{Rect, SurfaceSize};
pub use time::{Duration, Timestamp};

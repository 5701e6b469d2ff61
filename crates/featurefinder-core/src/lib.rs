//! Core types and utilities for fiducial reference resolution.
//!
//! This crate is intentionally small and purely geometric. It does *not*
//! run any detection kernel; image buffers are carried as read-only
//! artifacts produced elsewhere.

mod geometry;
mod image;
mod logger;

pub use geometry::{
    angle_deg, angle_diff_deg, distance, midpoint, nearest_point, normalize_angle_deg,
    triangle_area, GeometryError,
};
pub use image::{ImageArtifacts, ImageBuffer};

/// Pixel-space point used throughout the workspace.
pub type Point = nalgebra::Point2<f64>;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;

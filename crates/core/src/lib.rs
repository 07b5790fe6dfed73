//! Camera face-preview pipeline.
//!
//! Raw luma frames from a capture device are decimated into a reduced
//! grayscale search image, scanned by a pre-trained cascade detector, and the
//! largest confirmed face is published as an immutable snapshot for an
//! overlay surface to project into display coordinates.

pub mod capture;
pub mod detection;
pub mod overlay;
pub mod pipeline;
pub mod shared;

//! Fixed-size linear algebra used by the camera, the projection and the
//! per-frame matrix upload.
//!
//! Conventions:
//! - matrices are stored row-major (`e[row][col]`)
//! - points are row vectors: a point is transformed as `p · M`, so the
//!   translation of a 4×4 transform lives in its fourth row
//! - dimensions are part of the type; there is no runtime size check

mod mat;
mod vec;

pub use mat::{Mat3, Mat4};
pub use vec::{Vec3, Vec4};

//! Visibility engine: radial sweep plus recursive tracing through portals.
//!
//! Purpose
//! - From a viewpoint in one space, compute the exact visibility polygon
//!   ("scope") and continue through every portal whose visible aperture lies
//!   within `TraceCfg::max_distance`, yielding a `RayTrace` tree.
//!
//! Shape of the computation
//! - `sweep.rs`: one space, optionally restricted to an occlusion window (the
//!   portal aperture as seen from the transformed viewpoint).
//! - `build.rs`: breadth-first worklist of sweeps; each node records the
//!   accumulated map back into the viewpoint frame. Recursion stops at the
//!   distance cutoff or at `TraceCfg::max_depth`, whichever comes first.
//!
//! Failure containment
//! - An error in the root sweep is returned to the caller. An error in any
//!   sub-trace drops that branch only.

mod build;
mod sweep;
mod types;

pub use build::build_radial_trace;
pub use types::{Iter, RayTrace, RecursiveRayTrace, TraceCfg};

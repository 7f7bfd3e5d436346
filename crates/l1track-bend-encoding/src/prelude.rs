//! Common imports for bend encoding.

pub use crate::encoding::{BendEncoding, ResolutionModel};
pub use crate::window::{BendWindow, DegradedBend};

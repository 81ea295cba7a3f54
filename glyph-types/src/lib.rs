//! Scalar types shared by the glyph engine.
//!
//! Font libraries describe outlines and metrics in 26.6 fixed point, so the
//! central type here is [`F26Dot6`]. Geometry is expressed with the generic
//! [`Point`] and [`BoundingBox`] types.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod bbox;
mod fixed;
mod glyph_id;
mod point;

pub use bbox::BoundingBox;
pub use fixed::F26Dot6;
pub use glyph_id::GlyphId;
pub use point::Point;

//! Coordinate, unit and geometry types.
//!
//! Canonical CPU space:
//! - pixels, origin top-left
//! - +X right, +Y down
//!
//! Integer `Px*` types carry layout and texture-atlas data; `Dp*` types are
//! density independent and go through [`DensityConverter`]. `Vec2`/`Rect`
//! carry fractional destination geometry.

mod density;
mod dp;
mod matrix3;
mod px;
mod rect;
mod vec2;

pub use density::{DensityConverter, ScaledTrimmedImage, ScaledTrimmedNineSlice, BASE_DPI};
pub use dp::{DpExtent2D, DpPoint2, DpSize1D, DpThicknessU, DpValue};
pub use matrix3::Matrix3;
pub use px::{
    PxExtent2D, PxPoint2, PxRectangle, PxSize1D, PxSize2D, PxSize2DF, PxThicknessF, PxThicknessU,
    PxValue,
};
pub use rect::Rect;
pub use vec2::Vec2;

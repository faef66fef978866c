//! 体数据二维切片对象的操作.

mod core;
mod save;

pub use core::{OwnedSlice2d, Slice2d};

pub use save::{ImgWriteVis, MARKER_RADIUS};

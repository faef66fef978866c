#![warn(missing_docs)] // <= 合适时移除它.

//! 核心库. 为全息断层 (holotomography, HT) 三维细胞图像提供中心点标注所需的
//! 体数据加载、坐标变换、持久化与会话状态机.
//!
//! 该 crate 不包含任何渲染技术. 与用户交互的 "点选控件" 由调用方通过
//! [`view::PointPicker`] trait 提供.
//!
//! # 注意
//!
//! 1. 体数据统一按照 `(Z, X, Y)` 轴序存储. 所有 `Idx3d` 均按此顺序解释.
//! 2. 屏幕坐标统一为 `(水平, 垂直)`, 与数组的 `(行, 列)` 顺序正好相反.
//!   两者之间的换算只允许发生在 [`axis`] 模块中.
//!
//! # 开发计划
//!
//! ### 体数据加载与规范化 ✅
//!
//! 支持多页 TIFF, nifti 和 npy 三种容器. 规范化使用体数据自身的最小/最大值,
//! 线性映射到 `0..=255`.
//!
//! 实现位于 `holo-center/src/data`.
//!
//! ### 双视图坐标变换 ✅
//!
//! XY 视图: 水平方向对应 `y`, 垂直方向对应 `x`.
//! YZ 视图: 水平方向对应 `x`, 垂直方向对应 `z`, 且只回写 `z`.
//!
//! 实现位于 `holo-center/src/axis.rs`.
//!
//! ### 中心点持久化 ✅
//!
//! 每个项目一张 `{project}_image_center` 表, 以 `image_id` 为主键 upsert.
//!
//! 实现位于 `holo-center/src/store`.
//!
//! ### 会话状态机 ✅
//!
//! `NoImage` / `Loading` / `Ready` 三态. 切换图像时体数据与中心点整体替换.
//!
//! 实现位于 `holo-center/src/session`.
//!
//! ### 三轴形态学视图 ✅
//!
//! 实现位于 `holo-center/src/view.rs`.

/// 二维索引 `(行, 列)`.
pub type Idx2d = (usize, usize);

/// 三维索引 `(z, x, y)`.
pub type Idx3d = (usize, usize, usize);

pub mod axis;
pub mod config;
pub mod consts;
pub mod data;
pub mod error;
pub mod point;
pub mod prelude;
pub mod session;
pub mod source;
pub mod store;
pub mod view;

pub use data::{ImgWriteVis, IntensityRange, OwnedSlice2d, Slice2d, Volume, VolumeAxis};
pub use error::{LabelError, LabelResult};
pub use point::{ClampEvent, Point3d};
pub use session::CenterLabellerSession;

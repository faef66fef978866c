//! 三维中心点.

use std::fmt;

use crate::{Idx3d, VolumeAxis};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// 三维中心点, 以逻辑轴 `(x, y, z)` 命名.
///
/// 注意与体数据存储顺序 `(z, x, y)` 的区别, 见 [`Point3d::to_index`].
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point3d {
    /// 第 1 轴坐标.
    pub x: usize,

    /// 第 2 轴坐标.
    pub y: usize,

    /// 第 0 轴坐标.
    pub z: usize,
}

impl fmt::Display for Point3d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// 一次截断记录. 外部给出的坐标落在体数据范围外时产生.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ClampEvent {
    /// 原始请求的坐标 `(x, y, z)`, 可能为负.
    pub requested: (i64, i64, i64),

    /// 截断后实际采用的点.
    pub clamped: Point3d,

    /// 截断时依据的体数据形状 `(z, x, y)`.
    pub shape: Idx3d,
}

impl fmt::Display for ClampEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (x, y, z) = self.requested;
        write!(
            f,
            "({x}, {y}, {z}) clamped to {} for volume {:?}",
            self.clamped, self.shape
        )
    }
}

/// 将 `value` 截断到 `0..len`. `len == 0` 时结果为 0.
#[inline]
fn clamp_axis(value: i64, len: usize) -> usize {
    let upper = len.saturating_sub(1);
    if value <= 0 {
        0
    } else {
        (value as u64).min(upper as u64) as usize
    }
}

impl Point3d {
    /// 直接构造.
    #[inline]
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// 体数据的默认中心点: `x = shape[1] / 2, y = shape[2] / 2, z = shape[0] / 2`.
    #[inline]
    pub const fn midpoint((z, x, y): Idx3d) -> Self {
        Self {
            x: x / 2,
            y: y / 2,
            z: z / 2,
        }
    }

    /// 转换为体数据索引 `(z, x, y)`.
    #[inline]
    pub const fn to_index(&self) -> Idx3d {
        (self.z, self.x, self.y)
    }

    /// 沿 `axis` 的坐标.
    #[inline]
    pub const fn get(&self, axis: VolumeAxis) -> usize {
        match axis {
            VolumeAxis::Z => self.z,
            VolumeAxis::X => self.x,
            VolumeAxis::Y => self.y,
        }
    }

    /// 以有符号整数给出坐标. 用于截断计算.
    #[inline]
    pub fn to_signed(&self) -> (i64, i64, i64) {
        (self.x as i64, self.y as i64, self.z as i64)
    }

    /// 点是否位于形状为 `shape` 的体数据内部.
    #[inline]
    pub fn is_within(&self, (z, x, y): Idx3d) -> bool {
        self.x < x && self.y < y && self.z < z
    }

    /// 将任意坐标 `(x, y, z)` 截断到 `shape` 内部.
    ///
    /// 若发生了截断, 同时返回截断记录.
    pub fn clamped(
        (x, y, z): (i64, i64, i64),
        shape: Idx3d,
    ) -> (Self, Option<ClampEvent>) {
        let (sz, sx, sy) = shape;
        let point = Self {
            x: clamp_axis(x, sx),
            y: clamp_axis(y, sy),
            z: clamp_axis(z, sz),
        };
        let event = (point.to_signed() != (x, y, z)).then_some(ClampEvent {
            requested: (x, y, z),
            clamped: point,
            shape,
        });
        (point, event)
    }

    /// 将自身截断到 `shape` 内部. 见 [`Point3d::clamped`].
    #[inline]
    pub fn clamp_to(self, shape: Idx3d) -> (Self, Option<ClampEvent>) {
        Self::clamped(self.to_signed(), shape)
    }
}

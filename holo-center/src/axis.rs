//! 双视图坐标变换.
//!
//! 体数据按 `(z, x, y)` 存储, 而点选控件报告的是屏幕 `(水平, 垂直)` 坐标.
//! 二维切片的 `(行, 列)` 对应屏幕 `(垂直, 水平)`, 因此两个视图各自有一套
//! 逻辑轴与屏幕轴的配对:
//!
//! | 视图 | 切片方向 | 切片索引 | 水平 | 垂直 | 回写 |
//! |------|----------|----------|------|------|------|
//! | XY   | 轴 0     | `z`      | `y`  | `x`  | `y = h`, `x = v` |
//! | YZ   | 轴 2     | `y`      | `x`  | `z`  | `z = v` |
//!
//! YZ 视图的水平分量只用于显示, 不回写.
//!
//! 由于 YZ 视图的切片依赖 `y`, 而 XY 视图会修改 `y`, 同一刷新周期内必须先应用
//! XY 视图的结果再构造 YZ 视图.

use std::fmt;

use crate::point::{ClampEvent, Point3d};
use crate::{Idx3d, VolumeAxis};

/// 屏幕坐标 `(水平, 垂直)`, 以像素为单位.
///
/// 点选控件可能报告图像外的坐标, 因此使用有符号整数.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct ScreenPoint {
    /// 水平方向 (图像列).
    pub h: i64,

    /// 垂直方向 (图像行).
    pub v: i64,
}

impl ScreenPoint {
    /// 直接构造.
    #[inline]
    pub const fn new(h: i64, v: i64) -> Self {
        Self { h, v }
    }

    /// 转为元组 `(h, v)`.
    #[inline]
    pub const fn as_tuple(&self) -> (i64, i64) {
        (self.h, self.v)
    }
}

impl fmt::Display for ScreenPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(h={}, v={})", self.h, self.v)
    }
}

/// 两个正交的二维视图.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ViewKind {
    /// 视图 A. 在 `z = point.z` 处沿轴 0 切片.
    Xy,

    /// 视图 B. 在 `y = point.y` 处沿轴 2 切片.
    Yz,
}

impl ViewKind {
    /// 视图标题.
    #[inline]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Xy => "HT - XY",
            Self::Yz => "HT - YZ",
        }
    }

    /// 切片方向.
    #[inline]
    pub const fn slice_axis(self) -> VolumeAxis {
        match self {
            Self::Xy => VolumeAxis::Z,
            Self::Yz => VolumeAxis::Y,
        }
    }

    /// 当前点决定的切片索引.
    #[inline]
    pub const fn slice_index(self, point: &Point3d) -> usize {
        match self {
            Self::Xy => point.z,
            Self::Yz => point.y,
        }
    }

    /// 当前点在该视图上的屏幕坐标, 用于初始化点选控件.
    #[inline]
    pub const fn initial(self, point: &Point3d) -> ScreenPoint {
        match self {
            Self::Xy => ScreenPoint::new(point.y as i64, point.x as i64),
            Self::Yz => ScreenPoint::new(point.x as i64, point.z as i64),
        }
    }

    /// 将点选结果写回 `point`, 并截断到形状为 `shape` 的体数据内部.
    ///
    /// XY 视图: `y = h`, `x = v`. YZ 视图: 只有 `z = v`.
    pub fn apply(
        self,
        point: &Point3d,
        screen: ScreenPoint,
        shape: Idx3d,
    ) -> (Point3d, Option<ClampEvent>) {
        let (x, y, z) = point.to_signed();
        let requested = match self {
            Self::Xy => (screen.v, screen.h, z),
            Self::Yz => (x, y, screen.v),
        };
        Point3d::clamped(requested, shape)
    }
}

impl fmt::Display for ViewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPE: Idx3d = (10, 10, 10);

    #[test]
    fn test_initial_screen_order() {
        let p = Point3d::new(1, 2, 3);
        assert_eq!(ViewKind::Xy.initial(&p), ScreenPoint::new(2, 1));
        assert_eq!(ViewKind::Yz.initial(&p), ScreenPoint::new(1, 3));
        assert_eq!(ViewKind::Xy.slice_index(&p), 3);
        assert_eq!(ViewKind::Yz.slice_index(&p), 2);
    }

    #[test]
    fn test_view_a_swaps_axes() {
        let p = Point3d::new(5, 5, 5);
        for h in 0..10 {
            for v in 0..10 {
                let (q, ev) = ViewKind::Xy.apply(&p, ScreenPoint::new(h, v), SHAPE);
                assert!(ev.is_none());
                assert_eq!(q.y as i64, h);
                assert_eq!(q.x as i64, v);
                assert_eq!(q.z, 5);
            }
        }
    }

    #[test]
    fn test_view_b_writes_only_z() {
        let p = Point3d::new(3, 7, 5);
        for h in 0..10 {
            for v in 0..10 {
                let (q, _) = ViewKind::Yz.apply(&p, ScreenPoint::new(h, v), SHAPE);
                assert_eq!((q.x, q.y), (3, 7));
                assert_eq!(q.z as i64, v);
            }
        }
    }

    #[test]
    fn test_apply_clamps_outside_click() {
        let p = Point3d::new(5, 5, 5);
        // shape (z, x, y) = (10, 4, 6)
        let (q, ev) = ViewKind::Xy.apply(&p, ScreenPoint::new(-3, 12), (10, 4, 6));
        assert_eq!(q, Point3d::new(3, 0, 5));
        assert_eq!(ev.unwrap().requested, (12, -3, 5));
    }

    #[test]
    fn test_view_b_follows_view_a() {
        let p = Point3d::new(5, 5, 5);
        let (p, _) = ViewKind::Xy.apply(&p, ScreenPoint::new(7, 2), SHAPE);
        assert_eq!(ViewKind::Yz.slice_index(&p), 7);
        assert_eq!(ViewKind::Yz.initial(&p), ScreenPoint::new(2, 5));
    }
}

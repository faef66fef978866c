//! 中心点持久化.
//!
//! 每个项目一张表 `{project}_image_center`, 以 `image_id` 为唯一键, 三列
//! `x`, `y`, `z` 均可为空. 读取时缺失的列分别回退到体数据中点.

use log::warn;

use crate::point::{ClampEvent, Point3d};
use crate::Idx3d;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod error;
mod sqlite;

pub use error::{StoreError, StoreResult};
pub use sqlite::SqliteCenterStore;

/// 表中的一行.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct StoredCenter {
    /// 远端图像编号.
    pub image_id: i64,

    /// 第 1 轴坐标.
    pub x: Option<i64>,

    /// 第 2 轴坐标.
    pub y: Option<i64>,

    /// 第 0 轴坐标.
    pub z: Option<i64>,
}

impl StoredCenter {
    /// 由完整的点构造.
    pub fn from_point(image_id: i64, point: &Point3d) -> Self {
        let (x, y, z) = point.to_signed();
        Self {
            image_id,
            x: Some(x),
            y: Some(y),
            z: Some(z),
        }
    }

    /// 三列是否都有值.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.x.is_some() && self.y.is_some() && self.z.is_some()
    }

    /// 得到形状为 `shape` 的体数据上的点.
    ///
    /// 空列回退到中点, 越界的坐标被截断.
    pub fn resolve(&self, shape: Idx3d) -> (Point3d, Option<ClampEvent>) {
        let (dx, dy, dz) = Point3d::midpoint(shape).to_signed();
        let requested = (
            self.x.unwrap_or(dx),
            self.y.unwrap_or(dy),
            self.z.unwrap_or(dz),
        );
        Point3d::clamped(requested, shape)
    }
}

/// 中心点的来源.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum PointOrigin {
    /// 来自已保存的行 (可能部分回退).
    Stored,

    /// 没有记录, 使用中点.
    Default,
}

/// 一次读取的完整结果.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ResolvedPoint {
    /// 可以直接使用的点, 保证位于体数据内部.
    pub point: Point3d,

    /// 点的来源.
    pub origin: PointOrigin,

    /// 若保存的坐标越界, 记录截断.
    pub clamp: Option<ClampEvent>,
}

/// 中心点表的读写接口.
pub trait CenterStore {
    /// 读取一行. 不存在时返回 `Ok(None)`.
    fn fetch(&self, project: &str, image_id: i64) -> StoreResult<Option<StoredCenter>>;

    /// 写入一行, 覆盖全部三列. 返回前已提交.
    ///
    /// 对同一 `(project, image_id)` 重复保存同一个点, 结果与保存一次相同.
    fn save(&mut self, project: &str, image_id: i64, point: &Point3d) -> StoreResult<()>;

    /// 项目中已标注的图像数.
    fn count(&self, project: &str) -> StoreResult<usize>;

    /// 项目中的全部行, 按 `image_id` 升序.
    fn list(&self, project: &str) -> StoreResult<Vec<StoredCenter>>;

    /// 读取形状为 `shape` 的体数据的中心点.
    ///
    /// 没有记录时返回中点, 这不是错误.
    fn load_or_default(
        &self,
        project: &str,
        image_id: i64,
        shape: Idx3d,
    ) -> StoreResult<ResolvedPoint> {
        let resolved = match self.fetch(project, image_id)? {
            Some(row) => {
                let (point, clamp) = row.resolve(shape);
                ResolvedPoint {
                    point,
                    origin: PointOrigin::Stored,
                    clamp,
                }
            }
            None => ResolvedPoint {
                point: Point3d::midpoint(shape),
                origin: PointOrigin::Default,
                clamp: None,
            },
        };
        if let Some(ev) = &resolved.clamp {
            warn!("Stored center of {project}#{image_id} is out of range: {ev}");
        }
        Ok(resolved)
    }
}

/// 判断项目名能否安全地作为表名前缀: `[A-Za-z_][A-Za-z0-9_]*`.
pub fn is_valid_project(project: &str) -> bool {
    let mut chars = project.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_names() {
        assert!(is_valid_project("liver"));
        assert!(is_valid_project("_p2"));
        assert!(is_valid_project("Project_01"));
        assert!(!is_valid_project(""));
        assert!(!is_valid_project("2p"));
        assert!(!is_valid_project("p; DROP TABLE x"));
        assert!(!is_valid_project("p-1"));
    }

    #[test]
    fn test_null_columns_fall_back() {
        let row = StoredCenter {
            image_id: 1,
            x: Some(2),
            y: None,
            z: None,
        };
        // shape (z, x, y) = (20, 10, 8), 中点 (5, 4, 10).
        let (p, ev) = row.resolve((20, 10, 8));
        assert_eq!(p, Point3d::new(2, 4, 10));
        assert!(ev.is_none());
        assert!(!row.is_complete());
    }

    #[test]
    fn test_negative_stored_clamps_to_zero() {
        let row = StoredCenter {
            image_id: 1,
            x: Some(-4),
            y: Some(3),
            z: Some(100),
        };
        let (p, ev) = row.resolve((5, 5, 5));
        assert_eq!(p, Point3d::new(0, 3, 4));
        assert_eq!(ev.unwrap().requested, (-4, 3, 100));
    }
}

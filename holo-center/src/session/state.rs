use crate::data::Volume;
use crate::point::Point3d;
use crate::source::ImageIdentity;
use crate::store::PointOrigin;

/// 已加载的图像: 标识, 规范化后的体数据, 当前中心点.
///
/// 三者总是一起创建、一起替换.
#[derive(Debug, Clone)]
pub struct Entry {
    pub(super) identity: ImageIdentity,
    pub(super) volume: Volume,
    pub(super) point: Point3d,
}

impl Entry {
    /// 图像标识.
    #[inline]
    pub fn identity(&self) -> &ImageIdentity {
        &self.identity
    }

    /// 规范化后的体数据.
    #[inline]
    pub fn volume(&self) -> &Volume {
        &self.volume
    }

    /// 当前中心点. 总是位于 [`Entry::volume`] 内部.
    #[inline]
    pub fn point(&self) -> Point3d {
        self.point
    }
}

/// 会话状态.
#[derive(Debug, Clone, Default)]
pub enum SessionState {
    /// 没有图像.
    #[default]
    NoImage,

    /// 正在加载给定图像.
    Loading(ImageIdentity),

    /// 图像已就绪.
    Ready(Box<Entry>),
}

impl SessionState {
    /// 状态名, 用于日志.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoImage => "NoImage",
            Self::Loading(_) => "Loading",
            Self::Ready(_) => "Ready",
        }
    }

    /// 是否就绪.
    #[inline]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// 就绪时的图像.
    #[inline]
    pub fn entry(&self) -> Option<&Entry> {
        match self {
            Self::Ready(entry) => Some(entry),
            _ => None,
        }
    }
}

/// 一次 `select` 的效果.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Transition {
    /// 与当前图像相同, 什么也没有发生.
    Retained,

    /// 加载了新图像.
    Loaded {
        /// 中心点来源.
        origin: PointOrigin,
    },
}

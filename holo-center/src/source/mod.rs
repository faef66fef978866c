//! 图像来源.
//!
//! 上游的级联选择 (项目, 病人, 细胞类型, 细胞编号) 最终给出一个 [`ImageIdentity`],
//! 再由 [`VolumeLocator`] 把它解析为本地的体数据文件.

use std::collections::HashMap;
use std::fmt;

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

mod fetch;
mod locate;

pub use fetch::{CopyFetcher, FileFetcher};
pub use locate::{DirectoryLocator, FetchLocator, VolumeLocator};

/// 获取图像时的错误.
#[derive(Debug, Error)]
pub enum SourceError {
    /// 上游没有对应的图像或文件.
    #[error("image not found: {0}")]
    NotFound(String),

    /// 文件读写错误.
    #[error("fetch failed: {0}")]
    Io(#[from] std::io::Error),
}

/// 图像来源操作结果.
pub type SourceResult<T> = Result<T, SourceError>;

/// 当前图像的标识: 项目名与远端图像编号.
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ImageIdentity {
    /// 项目名, 同时是中心点表名前缀.
    pub project: String,

    /// 远端图像编号.
    pub image_id: i64,
}

impl ImageIdentity {
    /// 直接构造.
    pub fn new<S: Into<String>>(project: S, image_id: i64) -> Self {
        Self {
            project: project.into(),
            image_id,
        }
    }
}

impl fmt::Display for ImageIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.project, self.image_id)
    }
}

/// 级联选择的结果.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CellQuery {
    /// 项目名.
    pub project: String,

    /// 病人编号.
    pub patient_id: String,

    /// 细胞类型.
    pub cell_type: String,

    /// 细胞编号.
    pub cell_number: u32,
}

/// 一个可下载的图像.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ImageRecord {
    /// 图像标识.
    pub identity: ImageIdentity,

    /// 远端文件引用, 交给 [`FileFetcher`] 使用.
    pub file_ref: String,
}

/// 上游图像目录.
pub trait ImageSource {
    /// 查找级联选择对应的 HT 图像. 没有可用图像时返回 `Ok(None)`.
    fn resolve(&self, query: &CellQuery) -> SourceResult<Option<ImageRecord>>;

    /// 由标识反查记录.
    fn record(&self, identity: &ImageIdentity) -> SourceResult<Option<ImageRecord>>;
}

/// 内存中的图像目录.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    by_query: HashMap<CellQuery, ImageIdentity>,
    refs: HashMap<ImageIdentity, String>,
}

impl Catalog {
    /// 空目录.
    pub fn new() -> Self {
        Self::default()
    }

    /// 登记一个图像. 同一查询重复登记时以后者为准.
    pub fn insert<S: Into<String>>(&mut self, query: CellQuery, identity: ImageIdentity, file_ref: S) {
        self.refs.insert(identity.clone(), file_ref.into());
        self.by_query.insert(query, identity);
    }

    /// 图像个数.
    pub fn len(&self) -> usize {
        self.refs.len()
    }

    /// 是否为空.
    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }
}

impl ImageSource for Catalog {
    fn resolve(&self, query: &CellQuery) -> SourceResult<Option<ImageRecord>> {
        match self.by_query.get(query) {
            Some(identity) => self.record(identity),
            None => Ok(None),
        }
    }

    fn record(&self, identity: &ImageIdentity) -> SourceResult<Option<ImageRecord>> {
        Ok(self.refs.get(identity).map(|file_ref| ImageRecord {
            identity: identity.clone(),
            file_ref: file_ref.clone(),
        }))
    }
}

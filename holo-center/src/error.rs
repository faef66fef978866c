//! 会话层错误.

use thiserror::Error;

use crate::data::VolumeError;
use crate::source::SourceError;
use crate::store::StoreError;

/// 标注会话中可能出现的错误. 都不会导致进程退出.
#[derive(Debug, Error)]
pub enum LabelError {
    /// 没有可选的图像, 或图像文件不存在.
    ///
    /// 会话保持或回到 `NoImage`, 界面显示提示信息.
    #[error("no image available: {0}")]
    NotFound(String),

    /// 下载图像文件失败.
    #[error("unable to fetch image: {0}")]
    Fetch(#[source] std::io::Error),

    /// 体数据无法读取或解码. 会话回到 `NoImage`, 重新选择即可重试.
    #[error(transparent)]
    Volume(#[from] VolumeError),

    /// 读写中心点失败. 内存中的点保持不变.
    #[error("center store: {0}")]
    Store(#[from] StoreError),

    /// 当前没有已加载的图像.
    #[error("no image is loaded")]
    NotReady,
}

impl From<SourceError> for LabelError {
    fn from(value: SourceError) -> Self {
        match value {
            SourceError::NotFound(s) => Self::NotFound(s),
            SourceError::Io(e) => Self::Fetch(e),
        }
    }
}

impl LabelError {
    /// 是否属于 "找不到图像".
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// 是否属于 I/O 失败 (下载或读取体数据).
    pub fn is_io(&self) -> bool {
        match self {
            Self::Fetch(_) => true,
            Self::Volume(e) => e.is_io(),
            _ => false,
        }
    }
}

/// 会话操作结果.
pub type LabelResult<T> = Result<T, LabelError>;

//! 体数据运行时错误.

use super::VolumeAxis;
use thiserror::Error;

/// 加载、解码或切片体数据时的错误.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// 文件不存在或无法读取.
    #[error("unable to read volume file: {0}")]
    Io(#[from] std::io::Error),

    /// 文件后缀不属于任何已知容器.
    #[error("unsupported volume format `{0}`")]
    UnsupportedFormat(String),

    /// TIFF 解码错误.
    #[error("invalid multi-frame tiff: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// nifti 解码错误.
    #[error("invalid nifti volume: {0}")]
    Nifti(#[from] nifti::NiftiError),

    /// npy 解码错误.
    #[error("invalid npy volume: {0}")]
    Npy(#[from] ndarray_npy::ReadNpyError),

    /// 多帧文件中某一帧的尺寸与第一帧不一致.
    ///
    /// 尺寸按 `(宽, 高)` 给出.
    #[error("frame {index} is {found:?}, expected {expected:?}")]
    FrameMismatch {
        /// 出错帧的序号.
        index: usize,
        /// 第一帧的尺寸.
        expected: (u32, u32),
        /// 出错帧的尺寸.
        found: (u32, u32),
    },

    /// 帧不是单通道灰度图.
    #[error("expected single-channel frames, found {0}")]
    NotGrayscale(String),

    /// 数据不是三维的, 或各维度无法组成一个体.
    #[error("volume data is not 3-dimensional: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// 体数据至少有一个维度为 0.
    #[error("volume is empty")]
    Empty,

    /// 轴序号不是 0, 1, 2.
    #[error("axis {0} does not exist, expected 0, 1 or 2")]
    InvalidAxis(usize),

    /// 切片索引越界.
    #[error("slice index {index} out of range for axis {axis} of length {len}")]
    IndexOutOfRange {
        /// 切片方向.
        axis: VolumeAxis,
        /// 请求的索引.
        index: usize,
        /// 该轴长度.
        len: usize,
    },
}

impl VolumeError {
    /// 是否是底层 I/O 错误 (文件缺失, 权限等).
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// 体数据操作结果.
pub type VolumeResult<T> = Result<T, VolumeError>;

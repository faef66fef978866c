//! 三维体数据: 加载, 规范化与切片.

use std::fmt;
use std::ops::Index;
use std::path::Path;

use itertools::{Itertools, MinMaxResult};
use log::{debug, warn};
use ndarray::{Array3, ArrayView3, Axis};

use crate::Idx3d;

mod error;
pub mod load;
pub mod slice;
pub mod window;

pub use error::{VolumeError, VolumeResult};
pub use slice::{ImgWriteVis, OwnedSlice2d, Slice2d};
pub use window::IntensityRange;

/// 体数据的三个轴. 存储顺序为 `(Z, X, Y)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum VolumeAxis {
    /// 第 0 轴, 相邻切片方向.
    Z,

    /// 第 1 轴, 切片内的行方向.
    X,

    /// 第 2 轴, 切片内的列方向.
    Y,
}

impl VolumeAxis {
    /// 按存储顺序排列的全部轴.
    pub const ALL: [VolumeAxis; 3] = [Self::Z, Self::X, Self::Y];

    /// 轴在数组中的序号.
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Self::Z => 0,
            Self::X => 1,
            Self::Y => 2,
        }
    }

    /// 轴的逻辑名称.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Z => "z",
            Self::X => "x",
            Self::Y => "y",
        }
    }
}

impl TryFrom<usize> for VolumeAxis {
    type Error = VolumeError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Z),
            1 => Ok(Self::X),
            2 => Ok(Self::Y),
            n => Err(VolumeError::InvalidAxis(n)),
        }
    }
}

impl fmt::Display for VolumeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (axis {})", self.name(), self.index())
    }
}

/// 三维强度体数据, 以 `f32` 保存, 轴序为 `(Z, X, Y)`.
///
/// 体数据一经创建便不可修改. 规范化等操作总是产生新的实例.
#[derive(Debug, Clone, PartialEq)]
pub struct Volume {
    data: Array3<f32>,
}

impl Index<Idx3d> for Volume {
    type Output = f32;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl Volume {
    /// 直接由 `(Z, X, Y)` 排列的数组创建.
    #[inline]
    pub fn from_array(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// 由形状和生成函数创建. 生成函数接受 `(z, x, y)` 索引.
    pub fn from_shape_fn<F>(shape: Idx3d, f: F) -> Self
    where
        F: FnMut(Idx3d) -> f32,
    {
        Self {
            data: Array3::from_shape_fn(shape, f),
        }
    }

    /// 打开体数据文件. 见 [`load::load`].
    #[inline]
    pub fn open<P: AsRef<Path>>(path: P) -> VolumeResult<Self> {
        load::load(path)
    }

    /// 获取数据形状 `(z, x, y)`.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取某个轴的长度.
    #[inline]
    pub fn dim(&self, axis: VolumeAxis) -> usize {
        self.data.len_of(Axis(axis.index()))
    }

    /// 体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// 是否存在长度为 0 的轴.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// 检查索引是否合法.
    #[inline]
    pub fn check(&self, (z0, x0, y0): &Idx3d) -> bool {
        let (z, x, y) = self.shape();
        *z0 < z && *x0 < x && *y0 < y
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f32> {
        self.data.view()
    }

    /// 体数据中有限值的最小/最大值区间. 退化 (全部相等、无有限值) 时返回 `None`.
    pub fn intensity_range(&self) -> Option<IntensityRange> {
        let (min, max) = finite_bounds(&self.data)?;
        IntensityRange::new(min, max)
    }

    /// 获取沿 `axis` 方向第 `index` 层的切片视图.
    ///
    /// 当 `index` 越界时返回 `VolumeError::IndexOutOfRange`.
    pub fn slice(&self, index: usize, axis: VolumeAxis) -> VolumeResult<Slice2d<'_>> {
        let len = self.dim(axis);
        if index >= len {
            return Err(VolumeError::IndexOutOfRange { axis, index, len });
        }
        Ok(Slice2d::new(self.data.index_axis(Axis(axis.index()), index)))
    }

    /// 规范化后的新体数据. 见 [`normalize`].
    #[inline]
    pub fn normalized(&self) -> Volume {
        normalize(self)
    }
}

/// 一组值中有限值的 `(min, max)`. 没有有限值时返回 `None`.
fn finite_minmax<'a, I>(values: I) -> Option<(f32, f32)>
where
    I: Iterator<Item = &'a f32>,
{
    match values.copied().filter(|v| v.is_finite()).minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(v) => Some((v, v)),
        MinMaxResult::MinMax(min, max) => Some((min, max)),
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};

        /// 借助 `rayon`, 逐层并行求有限值区间后合并.
        fn finite_bounds(data: &Array3<f32>) -> Option<(f32, f32)> {
            data.axis_iter(Axis(0))
                .into_par_iter()
                .filter_map(|layer| finite_minmax(layer.iter()))
                .reduce_with(|(a0, a1), (b0, b1)| (a0.min(b0), a1.max(b1)))
        }
    } else {
        fn finite_bounds(data: &Array3<f32>) -> Option<(f32, f32)> {
            finite_minmax(data.iter())
        }
    }
}

/// 打开体数据文件. 见 [`load::load`].
#[inline]
pub fn load<P: AsRef<Path>>(path: P) -> VolumeResult<Volume> {
    load::load(path)
}

/// 使用体数据自身的最小值与最大值, 将强度线性映射到 `0.0..=255.0`:
/// `out = (in - min) / (max - min) * 255`.
///
/// 退化区间 (`max == min`) 时缩放系数无定义, 此时返回同形状的全零体数据并记录警告.
/// 非有限值映射为 `0.0`.
pub fn normalize(volume: &Volume) -> Volume {
    let Some(range) = volume.intensity_range() else {
        warn!(
            "Degenerate intensity range in volume of shape {:?}, falling back to all-zero",
            volume.shape()
        );
        return Volume {
            data: Array3::zeros(volume.data.raw_dim()),
        };
    };
    debug!(
        "Normalizing volume {:?} from [{}, {}]",
        volume.shape(),
        range.min(),
        range.max()
    );

    let mut data = volume.data.clone();
    cfg_if::cfg_if! {
        if #[cfg(feature = "rayon")] {
            data.par_mapv_inplace(|v| range.eval_f32(v));
        } else {
            data.mapv_inplace(|v| range.eval_f32(v));
        }
    }
    Volume { data }
}

/// 获取 `volume` 沿 `axis` 方向第 `index` 层的切片. 见 [`Volume::slice`].
#[inline]
pub fn slice(volume: &Volume, index: usize, axis: VolumeAxis) -> VolumeResult<Slice2d<'_>> {
    volume.slice(index, axis)
}

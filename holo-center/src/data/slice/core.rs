use crate::Idx2d;
use ndarray::iter::{IndexedIter, Iter};
use ndarray::{Array2, ArrayView2, Ix2};
use std::borrow::Cow;
use std::ops::Index;

/// 不可变、借用的二维切片.
///
/// 行对应屏幕垂直方向, 列对应屏幕水平方向.
#[derive(Debug, Clone)]
pub struct Slice2d<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::Volume`].
    data: ArrayView2<'a, f32>,
}

/// 拥有所有权的二维切片. 用于脱离体数据单独保存或传递.
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSlice2d {
    data: Array2<f32>,
}

impl<'a> Slice2d<'a> {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: ArrayView2<'a, f32>) -> Self {
        Self { data }
    }

    /// 复制出一份拥有所有权的切片.
    #[inline]
    pub fn to_owned_slice(&self) -> OwnedSlice2d {
        OwnedSlice2d {
            data: self.data.to_owned(),
        }
    }
}

impl OwnedSlice2d {
    /// 由 `(行, 列)` 数组直接初始化.
    #[inline]
    pub fn new(data: Array2<f32>) -> Self {
        Self { data }
    }

    /// 获得借用视图.
    #[inline]
    pub fn as_slice(&self) -> Slice2d<'_> {
        Slice2d::new(self.data.view())
    }
}

impl From<&Slice2d<'_>> for OwnedSlice2d {
    fn from(value: &Slice2d<'_>) -> Self {
        value.to_owned_slice()
    }
}

macro_rules! impl_slice_immut {
    ($($slice: ty),+) => {
        $(
            impl Index<Idx2d> for $slice {
                type Output = f32;

                #[inline]
                fn index(&self, index: Idx2d) -> &Self::Output {
                    &self.data[index]
                }
            }

            /// 不可变方法集合.
            impl $slice {
                /// 获得 **底层** 数据的一份不可变 shallow copy.
                #[inline]
                pub fn array_view(&self) -> ArrayView2<'_, f32> {
                    self.data.view()
                }

                /// 获取可以迭代图像像素的迭代器.
                #[inline]
                pub fn iter(&self) -> Iter<'_, f32, Ix2> {
                    self.data.iter()
                }

                /// 获取可以迭代 (索引, 像素) 的迭代器.
                #[inline]
                pub fn indexed_iter(&self) -> IndexedIter<'_, f32, Ix2> {
                    self.data.indexed_iter()
                }

                /// 获取给定位置 (行, 列) 的像素值. 越界时返回 `None`.
                #[inline]
                pub fn get(&self, pos: Idx2d) -> Option<&f32> {
                    self.data.get(pos)
                }

                /// 图像的分辨率 (行, 列).
                #[inline]
                pub fn shape(&self) -> Idx2d {
                    self.data.dim()
                }

                /// 屏幕宽度, 即列数.
                #[inline]
                pub fn width(&self) -> usize {
                    self.shape().1
                }

                /// 屏幕高度, 即行数.
                #[inline]
                pub fn height(&self) -> usize {
                    self.shape().0
                }

                /// 图像的像素个数.
                #[inline]
                pub fn size(&self) -> usize {
                    let (h, w) = self.shape();
                    h * w
                }

                /// 判断一个索引是否合法 (未越界).
                #[inline]
                pub fn check(&self, (h, w): Idx2d) -> bool {
                    let (h_len, w_len) = self.shape();
                    h < h_len && w < w_len
                }

                /// 将图像转化为行优先的序列化存储.
                pub fn as_row_major_vec(&self) -> Vec<f32> {
                    let mut buf = Vec::with_capacity(self.size());
                    buf.extend(self.iter());
                    buf
                }

                /// 获得行优先存储的序列化数据.
                /// 当原始数据本身就是行优先格式时, 可以避免一次 deepcopy.
                pub fn as_row_major_slice(&self) -> Cow<'_, [f32]> {
                    match self.data.as_slice() {
                        Some(s) => Cow::Borrowed(s),
                        None => Cow::Owned(self.as_row_major_vec()),
                    }
                }
            }
        )+
    };
}

impl_slice_immut!(Slice2d<'_>, OwnedSlice2d);

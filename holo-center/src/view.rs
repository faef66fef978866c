//! 标注界面编排.
//!
//! 本模块不涉及任何渲染. 点选由调用方实现的 [`PointPicker`] 完成,
//! 坐标变换与持久化全部委托给 [`CenterLabellerSession`].

use log::{info, warn};

use crate::axis::{ScreenPoint, ViewKind};
use crate::consts::NOT_AVAILABLE_MESSAGE;
use crate::data::{Slice2d, VolumeAxis};
use crate::error::{LabelError, LabelResult};
use crate::point::Point3d;
use crate::session::{CenterLabellerSession, Transition, ViewSlice};
use crate::source::{CellQuery, ImageSource, VolumeLocator};
use crate::store::CenterStore;

/// 点标记颜色.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum PickerColor {
    /// 红.
    #[default]
    Red,
    /// 绿.
    Green,
    /// 蓝.
    Blue,
    /// 黄.
    Yellow,
}

impl PickerColor {
    /// RGB 分量.
    pub const fn rgb(self) -> [u8; 3] {
        match self {
            Self::Red => [255, 0, 0],
            Self::Green => [0, 255, 0],
            Self::Blue => [0, 0, 255],
            Self::Yellow => [255, 255, 0],
        }
    }
}

/// 点选控件.
///
/// 给定切片图像与初始屏幕坐标, 返回用户选择的坐标. 用户没有操作时原样返回
/// `view.point`.
pub trait PointPicker {
    /// 在 `view` 上点选.
    fn pick(&mut self, view: &ViewSlice<'_>, color: PickerColor) -> ScreenPoint;
}

impl<F> PointPicker for F
where
    F: FnMut(&ViewSlice<'_>, PickerColor) -> ScreenPoint,
{
    fn pick(&mut self, view: &ViewSlice<'_>, color: PickerColor) -> ScreenPoint {
        self(view, color)
    }
}

/// 一次刷新的结果.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Frame {
    /// 没有可用图像, 只显示提示.
    NotAvailable {
        /// 提示文字, 每项一行.
        message: [&'static str; 2],
    },

    /// 两个视图均已绘制.
    Rendered {
        /// 刷新后的中心点.
        point: Point3d,
    },
}

impl Frame {
    fn not_available() -> Self {
        Self::NotAvailable {
            message: NOT_AVAILABLE_MESSAGE,
        }
    }
}

/// 三轴形态学视图中的一个切片.
#[derive(Debug, Clone)]
pub struct AxisSlice<'a> {
    /// 切片方向.
    pub axis: VolumeAxis,

    /// 切片索引, 滑块的当前值.
    pub index: usize,

    /// 该轴长度, 滑块范围为 `0..len`.
    pub len: usize,

    /// 切片图像.
    pub image: Slice2d<'a>,
}

/// 三轴形态学视图, 依次为 z, x, y.
#[derive(Debug, Clone)]
pub struct Morphology<'a> {
    /// 三个切片.
    pub slices: Vec<AxisSlice<'a>>,
}

impl<'a> Morphology<'a> {
    /// 沿 `axis` 的切片.
    pub fn get(&self, axis: VolumeAxis) -> Option<&AxisSlice<'a>> {
        self.slices.iter().find(|s| s.axis == axis)
    }
}

/// 中心点标注界面.
#[derive(Clone, Debug, Default)]
pub struct CenterLabellerView {
    color: PickerColor,
}

impl CenterLabellerView {
    /// 使用 `color` 作为两个视图的标记颜色.
    pub fn new(color: PickerColor) -> Self {
        Self { color }
    }

    /// 标记颜色.
    pub fn color(&self) -> PickerColor {
        self.color
    }

    /// 由上游级联选择切换图像.
    ///
    /// 没有可用图像时会话回到 `NoImage`, 返回 `LabelError::NotFound`.
    pub fn select_cell<S, L, I>(
        &self,
        session: &mut CenterLabellerSession<S, L>,
        source: &I,
        query: &CellQuery,
    ) -> LabelResult<Transition>
    where
        S: CenterStore,
        L: VolumeLocator,
        I: ImageSource + ?Sized,
    {
        let record = source.resolve(query)?;
        if record.is_none() {
            info!("No image for {query:?}");
        }
        session.select(record.map(|r| r.identity))
    }

    /// 刷新一次: 绘制 XY 视图并应用其点选结果, 然后用更新后的点绘制 YZ 视图.
    ///
    /// 会话不处于就绪状态时不绘制, 返回提示信息.
    pub fn refresh<S, L, A, B>(
        &self,
        session: &mut CenterLabellerSession<S, L>,
        picker_a: &mut A,
        picker_b: &mut B,
    ) -> LabelResult<Frame>
    where
        S: CenterStore,
        L: VolumeLocator,
        A: PointPicker + ?Sized,
        B: PointPicker + ?Sized,
    {
        if !session.is_ready() {
            return Ok(Frame::not_available());
        }

        let picked = picker_a.pick(&session.view_slice(ViewKind::Xy)?, self.color);
        session.apply(ViewKind::Xy, picked)?;

        let picked = picker_b.pick(&session.view_slice(ViewKind::Yz)?, self.color);
        let point = session.apply(ViewKind::Yz, picked)?;

        Ok(Frame::Rendered { point })
    }

    /// 三轴形态学视图. 每个轴的切片默认取当前中心点的坐标;
    /// `overrides` 依次为 z, x, y 轴的滑块值, 越界时截断.
    pub fn morphology<'s, S, L>(
        &self,
        session: &'s CenterLabellerSession<S, L>,
        overrides: [Option<usize>; 3],
    ) -> LabelResult<Morphology<'s>>
    where
        S: CenterStore,
        L: VolumeLocator,
    {
        let entry = session.entry().ok_or(LabelError::NotReady)?;
        let volume = entry.volume();
        let point = entry.point();

        let mut slices = Vec::with_capacity(3);
        for (axis, requested) in VolumeAxis::ALL.into_iter().zip(overrides) {
            let len = volume.dim(axis);
            let index = match requested {
                Some(i) if i >= len => {
                    let last = len.saturating_sub(1);
                    warn!("{axis} slider {i} is out of range, using {last}");
                    last
                }
                Some(i) => i,
                None => point.get(axis),
            };
            let image = volume.slice(index, axis)?;
            slices.push(AxisSlice {
                axis,
                index,
                len,
                image,
            });
        }
        Ok(Morphology { slices })
    }
}

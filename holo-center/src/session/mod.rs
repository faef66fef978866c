//! 中心点标注会话.
//!
//! 会话持有当前图像的体数据与中心点, 负责:
//!
//! 1. 切换图像时整体替换体数据与中心点;
//! 2. 将两个视图的点选结果经 [`ViewKind::apply`] 写回三维点;
//! 3. 显式保存.
//!
//! 会话是普通的拥有所有权的值, 单线程同步使用.

use log::{debug, error, info, warn};

use crate::axis::{ScreenPoint, ViewKind};
use crate::data::{Slice2d, Volume};
use crate::error::{LabelError, LabelResult};
use crate::point::{ClampEvent, Point3d};
use crate::source::{ImageIdentity, VolumeLocator};
use crate::store::{CenterStore, PointOrigin};

mod state;

pub use state::{Entry, SessionState, Transition};

/// 一个视图需要显示的内容.
#[derive(Debug, Clone)]
pub struct ViewSlice<'a> {
    /// 视图.
    pub kind: ViewKind,

    /// 切片索引.
    pub index: usize,

    /// 切片图像.
    pub image: Slice2d<'a>,

    /// 当前点的屏幕坐标.
    pub point: ScreenPoint,
}

/// 两个视图的显示内容, 均由同一个中心点得到.
#[derive(Debug, Clone)]
pub struct DisplaySlices<'a> {
    /// XY 视图.
    pub a: ViewSlice<'a>,

    /// YZ 视图.
    pub b: ViewSlice<'a>,
}

/// 中心点标注会话.
pub struct CenterLabellerSession<S, L> {
    store: S,
    locator: L,
    state: SessionState,
    clamp_log: Vec<ClampEvent>,
}

impl<S: CenterStore, L: VolumeLocator> CenterLabellerSession<S, L> {
    /// 新会话, 初始状态为 `NoImage`.
    pub fn new(store: S, locator: L) -> Self {
        Self {
            store,
            locator,
            state: SessionState::NoImage,
            clamp_log: Vec::new(),
        }
    }

    /// 当前状态.
    #[inline]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// 是否就绪.
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.state.is_ready()
    }

    /// 当前已就绪的图像.
    #[inline]
    pub fn entry(&self) -> Option<&Entry> {
        self.state.entry()
    }

    /// 当前已就绪图像的标识.
    #[inline]
    pub fn identity(&self) -> Option<&ImageIdentity> {
        self.entry().map(Entry::identity)
    }

    /// 当前中心点.
    #[inline]
    pub fn current_point(&self) -> Option<Point3d> {
        self.entry().map(Entry::point)
    }

    /// 当前体数据 (已规范化).
    #[inline]
    pub fn volume(&self) -> Option<&Volume> {
        self.entry().map(Entry::volume)
    }

    /// 至今发生过的全部截断.
    #[inline]
    pub fn clamp_log(&self) -> &[ClampEvent] {
        &self.clamp_log
    }

    /// 取出并清空截断记录.
    pub fn take_clamp_log(&mut self) -> Vec<ClampEvent> {
        std::mem::take(&mut self.clamp_log)
    }

    /// 中心点表.
    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 中心点表, 可变.
    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// 切换到 `identity`.
    ///
    /// - `None`: 上游没有可选图像, 会话回到 `NoImage`, 返回 `LabelError::NotFound`.
    /// - 与当前图像相同: 什么也不做, 编辑中的点保留.
    /// - 其它: 丢弃旧图像, 加载新的体数据并读取 (或计算默认) 中心点.
    ///   加载失败时会话回到 `NoImage`, 不会暴露半成品.
    pub fn select(&mut self, identity: Option<ImageIdentity>) -> LabelResult<Transition> {
        let Some(identity) = identity else {
            if let Some(old) = self.identity() {
                info!("No selectable image, releasing {old}");
            }
            self.state = SessionState::NoImage;
            return Err(LabelError::NotFound("no selectable image".into()));
        };

        if self.identity() == Some(&identity) {
            debug!("{identity} is already loaded");
            return Ok(Transition::Retained);
        }

        let name = identity.to_string();
        debug!("{} -> Loading {name}", self.state.name());
        self.state = SessionState::Loading(identity.clone());
        match self.load_entry(identity) {
            Ok((entry, origin)) => {
                info!(
                    "Switched to {} with volume {:?}, center {} ({origin:?})",
                    entry.identity,
                    entry.volume.shape(),
                    entry.point
                );
                self.state = SessionState::Ready(Box::new(entry));
                Ok(Transition::Loaded { origin })
            }
            Err(e) => {
                error!("Failed to load {name}: {e}");
                self.state = SessionState::NoImage;
                Err(e)
            }
        }
    }

    fn load_entry(&mut self, identity: ImageIdentity) -> LabelResult<(Entry, PointOrigin)> {
        let path = self.locator.locate(&identity)?;
        let volume = Volume::open(&path)?.normalized();
        let resolved =
            self.store
                .load_or_default(&identity.project, identity.image_id, volume.shape())?;
        if let Some(ev) = resolved.clamp {
            self.clamp_log.push(ev);
        }
        let entry = Entry {
            identity,
            volume,
            point: resolved.point,
        };
        Ok((entry, resolved.origin))
    }

    /// 把 `view` 上的点选结果写回中心点. 越界时截断并记录.
    pub fn apply(&mut self, view: ViewKind, screen: ScreenPoint) -> LabelResult<Point3d> {
        let SessionState::Ready(entry) = &mut self.state else {
            return Err(LabelError::NotReady);
        };
        let (point, clamp) = view.apply(&entry.point, screen, entry.volume.shape());
        if let Some(ev) = clamp {
            warn!("{view} pick {screen} is outside the volume: {ev}");
            self.clamp_log.push(ev);
        }
        if point != entry.point {
            debug!("{view}: center {} -> {point}", entry.point);
        }
        entry.point = point;
        Ok(point)
    }

    /// XY 视图: `y = h`, `x = v`.
    #[inline]
    pub fn apply_view_a(&mut self, h: i64, v: i64) -> LabelResult<Point3d> {
        self.apply(ViewKind::Xy, ScreenPoint::new(h, v))
    }

    /// YZ 视图: `z = v`, 忽略 `h`.
    #[inline]
    pub fn apply_view_b(&mut self, h: i64, v: i64) -> LabelResult<Point3d> {
        self.apply(ViewKind::Yz, ScreenPoint::new(h, v))
    }

    /// 保存当前中心点. 失败时内存中的点保持不变.
    pub fn save(&mut self) -> LabelResult<Point3d> {
        let SessionState::Ready(entry) = &self.state else {
            return Err(LabelError::NotReady);
        };
        let identity = &entry.identity;
        self.store
            .save(&identity.project, identity.image_id, &entry.point)
            .map_err(|e| {
                error!("Failed to save center of {identity}: {e}");
                e
            })?;
        Ok(entry.point)
    }

    /// 由当前中心点构造 `kind` 视图.
    pub fn view_slice(&self, kind: ViewKind) -> LabelResult<ViewSlice<'_>> {
        let entry = self.entry().ok_or(LabelError::NotReady)?;
        let index = kind.slice_index(&entry.point);
        let image = entry.volume.slice(index, kind.slice_axis())?;
        Ok(ViewSlice {
            kind,
            index,
            image,
            point: kind.initial(&entry.point),
        })
    }

    /// 当前中心点下两个视图的显示内容.
    ///
    /// 若要在同一刷新周期内先应用 XY 视图的点选结果, 应使用 [`Self::view_slice`]
    /// 分两次构造, 见 [`crate::view::CenterLabellerView::refresh`].
    pub fn slices_for_display(&self) -> LabelResult<DisplaySlices<'_>> {
        Ok(DisplaySlices {
            a: self.view_slice(ViewKind::Xy)?,
            b: self.view_slice(ViewKind::Yz)?,
        })
    }
}

//! 常用类型.

pub use crate::axis::{ScreenPoint, ViewKind};
pub use crate::config::Config;
pub use crate::data::{
    ImgWriteVis, IntensityRange, OwnedSlice2d, Slice2d, Volume, VolumeAxis, VolumeError,
    VolumeResult,
};
pub use crate::error::{LabelError, LabelResult};
pub use crate::point::{ClampEvent, Point3d};
pub use crate::session::{
    CenterLabellerSession, DisplaySlices, Entry, SessionState, Transition, ViewSlice,
};
pub use crate::source::{
    Catalog, CellQuery, CopyFetcher, DirectoryLocator, FetchLocator, FileFetcher,
    ImageIdentity, ImageRecord, ImageSource, SourceError, VolumeLocator,
};
pub use crate::store::{
    CenterStore, PointOrigin, ResolvedPoint, SqliteCenterStore, StoreError, StoreResult,
    StoredCenter,
};
pub use crate::view::{CenterLabellerView, Frame, Morphology, PickerColor, PointPicker};
pub use crate::{Idx2d, Idx3d};

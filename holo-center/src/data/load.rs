//! 体数据文件解码.
//!
//! 支持三种容器, 按文件后缀区分:
//!
//! 1. 多页 TIFF (`.tif`, `.tiff`): 每页为一个 Z 帧, 所有页尺寸必须一致且为单通道.
//! 2. nifti (`.nii`, `.nii.gz`): 按 `[W, H, Z]` 存储, 加载时转换为 `(Z, H, W)`.
//! 3. npy (`.npy`): 已按 `(Z, X, Y)` 排列的三维数组.
//!
//! 任何采样类型都会被转换为 `f32`.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use ndarray::{Array3, ArrayD, Axis, Ix3};
use ndarray_npy::{ReadNpyError, ReadableElement};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use num::ToPrimitive;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;

use super::{Volume, VolumeError, VolumeResult};
use crate::consts::VOLUME_EXTENSIONS;

/// 体数据容器格式.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VolumeFormat {
    /// 多页 TIFF.
    Tiff,

    /// nifti-1, 可为 gzip 压缩.
    Nifti,

    /// numpy `.npy`.
    Npy,
}

impl VolumeFormat {
    /// 由文件名后缀判断格式 (忽略大小写).
    pub fn detect(path: &Path) -> Option<Self> {
        let name = path.file_name()?.to_string_lossy().to_lowercase();
        let ext = VOLUME_EXTENSIONS
            .into_iter()
            .find(|ext| name.ends_with(&format!(".{ext}")))?;
        match ext {
            "tiff" | "tif" => Some(Self::Tiff),
            "nii.gz" | "nii" => Some(Self::Nifti),
            "npy" => Some(Self::Npy),
            _ => None,
        }
    }
}

/// 打开体数据文件, 返回 **未经规范化** 的体数据.
///
/// 文件不可读时返回 `VolumeError::Io`; 格式无法识别或不是合法的多帧数据时返回
/// 对应的解码错误; 任何一维长度为 0 时返回 `VolumeError::Empty`.
pub fn load<P: AsRef<Path>>(path: P) -> VolumeResult<Volume> {
    let path = path.as_ref();
    // 先确认可读, 以便缺失文件统一报告为 I/O 错误.
    File::open(path)?;

    let format = VolumeFormat::detect(path)
        .ok_or_else(|| VolumeError::UnsupportedFormat(path.display().to_string()))?;
    let volume = match format {
        VolumeFormat::Tiff => read_tiff(path)?,
        VolumeFormat::Nifti => read_nifti(path)?,
        VolumeFormat::Npy => read_npy(path)?,
    };
    if volume.is_empty() {
        return Err(VolumeError::Empty);
    }

    info!(
        "Loaded {format:?} volume {:?} from {}",
        volume.shape(),
        path.display()
    );
    Ok(volume)
}

#[inline]
fn to_f32<T: ToPrimitive>(value: T) -> f32 {
    value.to_f32().unwrap_or(f32::NAN)
}

fn extend_samples<T: ToPrimitive + Copy>(buf: &mut Vec<f32>, frame: &[T]) {
    buf.extend(frame.iter().map(|&v| to_f32(v)));
}

#[allow(unreachable_patterns)]
fn extend_decoded(buf: &mut Vec<f32>, frame: DecodingResult, path: &Path) -> VolumeResult<()> {
    match frame {
        DecodingResult::U8(frame) => extend_samples(buf, &frame),
        DecodingResult::U16(frame) => extend_samples(buf, &frame),
        DecodingResult::U32(frame) => extend_samples(buf, &frame),
        DecodingResult::U64(frame) => extend_samples(buf, &frame),
        DecodingResult::F32(frame) => extend_samples(buf, &frame),
        DecodingResult::F64(frame) => extend_samples(buf, &frame),
        DecodingResult::I8(frame) => extend_samples(buf, &frame),
        DecodingResult::I16(frame) => extend_samples(buf, &frame),
        DecodingResult::I32(frame) => extend_samples(buf, &frame),
        DecodingResult::I64(frame) => extend_samples(buf, &frame),
        _ => return Err(VolumeError::UnsupportedFormat(path.display().to_string())),
    }
    Ok(())
}

fn read_tiff(path: &Path) -> VolumeResult<Volume> {
    let file = File::open(path)?;
    let mut decoder = Decoder::new(BufReader::new(file))?.with_limits(Limits::unlimited());

    let expected = decoder.dimensions()?;
    let (width, height) = expected;
    let mut samples = Vec::new();
    let mut frames = 0usize;

    loop {
        let found = decoder.dimensions()?;
        if found != expected {
            return Err(VolumeError::FrameMismatch {
                index: frames,
                expected,
                found,
            });
        }
        match decoder.colortype()? {
            ColorType::Gray(_) => {}
            other => return Err(VolumeError::NotGrayscale(format!("{other:?}"))),
        }

        extend_decoded(&mut samples, decoder.read_image()?, path)?;
        frames += 1;

        if !decoder.more_images() {
            break;
        }
        decoder.next_image()?;
    }

    // 页内按行存储: 行对应 x, 列对应 y.
    let data = Array3::from_shape_vec((frames, height as usize, width as usize), samples)?;
    Ok(Volume::from_array(data))
}

fn read_nifti(path: &Path) -> VolumeResult<Volume> {
    let obj = ReaderOptions::new().read_file(path)?;
    let data: ArrayD<f32> = obj.into_volume().into_ndarray()?;

    // 单时间点的四维数据 `[W, H, Z, 1]` 视为三维.
    let data = if data.ndim() == 4 && data.len_of(Axis(3)) == 1 {
        data.index_axis_move(Axis(3), 0)
    } else {
        data
    };

    // [W, H, z] -> [z, H, W].
    // hint: 原第一维向下增长, 原第二维向右增长.
    let data = data
        .into_dimensionality::<Ix3>()?
        .permuted_axes([2, 1, 0])
        .as_standard_layout()
        .into_owned();
    Ok(Volume::from_array(data))
}

fn read_npy_as<T>(path: &Path) -> Result<Volume, ReadNpyError>
where
    T: ReadableElement + ToPrimitive + Copy,
{
    let data: Array3<T> = ndarray_npy::read_npy(path)?;
    Ok(Volume::from_array(data.mapv(to_f32)))
}

fn read_npy(path: &Path) -> VolumeResult<Volume> {
    // npy 头部记录了元素类型, 逐个尝试常见的显微图像采样类型.
    let first = match read_npy_as::<f32>(path) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    let fallbacks: [fn(&Path) -> Result<Volume, ReadNpyError>; 5] = [
        read_npy_as::<u16>,
        read_npy_as::<u8>,
        read_npy_as::<f64>,
        read_npy_as::<i16>,
        read_npy_as::<i32>,
    ];
    fallbacks
        .into_iter()
        .find_map(|read| read(path).ok())
        .ok_or(VolumeError::Npy(first))
}

//! 切片的可视化与持久化存储.

use super::{OwnedSlice2d, Slice2d};
use image::{GrayImage, ImageResult, Luma, Rgb, RgbImage};
use std::path::Path;

/// 点标记 (十字) 的臂长, 单位为像素.
pub const MARKER_RADIUS: i64 = 3;

/// 规范化强度 (`0.0..=255.0`) 到灰度像素. NaN 映射为黑色.
#[inline]
fn gray(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// 表明一个可以通过 **可视化友好** 模式持久化存储的切片对象.
///
/// 切片内容应当已经经过 [`crate::data::normalize`] 规范化.
/// 行对应图像的 y 方向 (垂直), 列对应图像的 x 方向 (水平).
pub trait ImgWriteVis {
    /// 转换为 8-bit 灰度图.
    fn to_gray_image(&self) -> GrayImage;

    /// 转换为 RGB 图, 并在屏幕坐标 `(h, v)` 处画一个颜色为 `rgb` 的十字标记.
    ///
    /// 标记超出图像的部分会被裁掉.
    fn to_marked_image(&self, (h, v): (i64, i64), rgb: [u8; 3]) -> RgbImage {
        let gray = self.to_gray_image();
        let mut buf = RgbImage::from_fn(gray.width(), gray.height(), |x, y| {
            let Luma([p]) = *gray.get_pixel(x, y);
            Rgb([p, p, p])
        });
        let (w, h_len) = (buf.width() as i64, buf.height() as i64);
        let arm = (-MARKER_RADIUS..=MARKER_RADIUS)
            .map(|d| (h + d, v))
            .chain((-MARKER_RADIUS..=MARKER_RADIUS).map(|d| (h, v + d)));
        for (x, y) in arm.filter(|&(x, y)| (0..w).contains(&x) && (0..h_len).contains(&y)) {
            buf.put_pixel(x as u32, y as u32, Rgb(rgb));
        }
        buf
    }

    /// 将灰度图保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray_image().save(path)
    }

    /// 将带标记的 RGB 图保存到 `path` 路径.
    fn save_marked<P: AsRef<Path>>(&self, path: P, point: (i64, i64), rgb: [u8; 3]) -> ImageResult<()> {
        self.to_marked_image(point, rgb).save(path)
    }
}

macro_rules! impl_slice_vis {
    ($($slice: ty),+) => {
        $(
            /// 按 `0..=255` 四舍五入取整.
            impl ImgWriteVis for $slice {
                fn to_gray_image(&self) -> GrayImage {
                    let (height, width) = self.shape();
                    let mut buf = GrayImage::new(width as u32, height as u32);
                    for ((r, c), &p) in self.indexed_iter() {
                        buf.put_pixel(c as u32, r as u32, Luma([gray(p)]));
                    }
                    buf
                }
            }
        )+
    };
}

impl_slice_vis!(Slice2d<'_>, OwnedSlice2d);

//! 强度区间与灰度映射.

use crate::consts::GRAY_MAX;

/// 强度区间, 包含体数据观测到的最小值和最大值.
///
/// 该区间是只读的, 且保证 `min < max`. 若要修改区间, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntensityRange {
    min: f32,
    max: f32,
}

impl IntensityRange {
    /// 构建强度区间.
    ///
    /// `min`, `max` 必须有限且 `min < max`, 否则返回 `None`.
    /// `min == max` 即退化区间, 此时缩放系数无定义.
    pub fn new(min: f32, max: f32) -> Option<IntensityRange> {
        if min.is_finite() && max.is_finite() && min < max {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// 区间下限.
    #[inline]
    pub fn min(&self) -> f32 {
        self.min
    }

    /// 区间上限.
    #[inline]
    pub fn max(&self) -> f32 {
        self.max
    }

    /// 区间宽度, 恒为正.
    #[inline]
    pub fn width(&self) -> f32 {
        self.max - self.min
    }

    /// 求 `value` 在 `0.0..=255.0` 中的线性映射值.
    ///
    /// 区间外的值被截断到端点. 无意义的值 (inf, NaN) 映射为 `0.0`.
    pub fn eval_f32(&self, value: f32) -> f32 {
        if !value.is_finite() || value <= self.min {
            0.0
        } else if value >= self.max {
            GRAY_MAX
        } else {
            (value - self.min) / self.width() * GRAY_MAX
        }
    }

    /// 求 `value` 对应的 8-bit 灰度值 (四舍五入).
    #[inline]
    pub fn eval(&self, value: f32) -> u8 {
        self.eval_f32(value).round() as u8
    }
}

#[cfg(test)]
mod tests {
    use super::IntensityRange;

    fn float_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_range_invalid_input() {
        assert!(IntensityRange::new(1.0, 1.0).is_none());
        assert!(IntensityRange::new(2.0, 1.0).is_none());
        assert!(IntensityRange::new(f32::NAN, 1.0).is_none());
        assert!(IntensityRange::new(0.0, f32::INFINITY).is_none());
    }

    #[test]
    fn test_range_generic() {
        // [100, 200]
        let r = IntensityRange::new(100.0, 200.0).unwrap();
        assert_eq!(r.eval_f32(f32::NAN), 0.0);
        assert_eq!(r.eval(f32::MIN), 0);
        assert_eq!(r.eval(f32::MAX), 255);

        assert!(float_eq(r.eval_f32(100.0), 0.0));
        assert!(float_eq(r.eval_f32(125.0), 255.0 * 0.25));
        assert!(float_eq(r.eval_f32(150.0), 127.5));
        assert!(float_eq(r.eval_f32(200.0), 255.0));

        // 127.5 rounds up.
        assert_eq!(r.eval(150.0), 128);
        assert_eq!(r.eval(199.9), 255);
    }
}

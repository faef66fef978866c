//! 终端点选控件.

use std::cell::RefCell;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use holo_center::prelude::*;
use log::warn;

/// 预览图文件名.
pub fn preview_name(kind: ViewKind) -> &'static str {
    match kind {
        ViewKind::Xy => "ht-xy.png",
        ViewKind::Yz => "ht-yz.png",
    }
}

/// 按行读取的输入. 读到结尾时返回 `None`.
pub trait LineInput {
    /// 读取一行.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// 共享同一个输入源. 每次读取时才借用.
impl<R: LineInput> LineInput for &RefCell<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        self.borrow_mut().next_line()
    }
}

impl LineInput for io::Stdin {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match self.read_line(&mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

/// 把切片导出为 PNG, 再从输入中读取 `h v`. 空行保持当前点.
pub struct TerminalPicker<R> {
    out: PathBuf,
    input: R,
}

impl<R: LineInput> TerminalPicker<R> {
    /// 预览图写入 `out` 目录.
    pub fn new<P: AsRef<Path>>(out: P, input: R) -> Self {
        Self {
            out: out.as_ref().to_path_buf(),
            input,
        }
    }

    fn read_point(&mut self) -> io::Result<Option<ScreenPoint>> {
        Ok(self.input.next_line()?.as_deref().and_then(parse_point))
    }
}

/// 解析 `h v` 或 `h,v`. 空行或格式错误时返回 `None`.
pub fn parse_point(line: &str) -> Option<ScreenPoint> {
    let mut it = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty());
    let h = it.next()?.parse().ok()?;
    let v = it.next()?.parse().ok()?;
    if it.next().is_some() {
        return None;
    }
    Some(ScreenPoint::new(h, v))
}

impl<R: LineInput> PointPicker for TerminalPicker<R> {
    fn pick(&mut self, view: &ViewSlice<'_>, color: PickerColor) -> ScreenPoint {
        let path = self.out.join(preview_name(view.kind));
        if let Err(e) = view
            .image
            .save_marked(&path, view.point.as_tuple(), color.rgb())
        {
            warn!("Unable to write preview {}: {e}", path.display());
        }

        println!(
            "{} slice {} ({} x {}) -> {}",
            view.kind,
            view.index,
            view.image.width(),
            view.image.height(),
            path.display()
        );
        print!("  current {}, enter `h v` or leave empty: ", view.point);
        let _ = io::stdout().flush();

        match self.read_point() {
            Ok(Some(p)) => p,
            Ok(None) => view.point,
            Err(e) => {
                warn!("Unable to read input: {e}");
                view.point
            }
        }
    }
}

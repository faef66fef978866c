//! 交互式标注循环与预览导出.

use std::cell::RefCell;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use holo_center::prelude::*;
use log::{error, info};

use crate::picker::{preview_name, LineInput, TerminalPicker};

/// 终端工具的运行结果.
pub type AppResult<T> = Result<T, Box<dyn Error>>;

const HELP: &str = "[enter] pick again, s: save, m: export morphology, q: quit";

/// 一条循环命令.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum Action {
    Refresh,
    Save,
    Morphology,
    Quit,
}

fn parse_action(line: Option<&str>) -> Action {
    match line.map(str::trim) {
        None | Some("q") => Action::Quit,
        Some("s") => Action::Save,
        Some("m") => Action::Morphology,
        Some(_) => Action::Refresh,
    }
}

/// 打开 `identity` 并进入标注循环, 直到用户退出或输入结束.
///
/// 两个视图的点选与循环命令依次从 `input` 读取.
pub fn label<S, L, R>(
    session: &mut CenterLabellerSession<S, L>,
    identity: ImageIdentity,
    out: &Path,
    input: R,
) -> AppResult<()>
where
    S: CenterStore,
    L: VolumeLocator,
    R: LineInput,
{
    fs::create_dir_all(out)?;
    session.select(Some(identity))?;

    let view = CenterLabellerView::default();
    let input = RefCell::new(input);
    let mut picker_a = TerminalPicker::new(out, &input);
    let mut picker_b = TerminalPicker::new(out, &input);
    let mut commands = &input;

    loop {
        match view.refresh(session, &mut picker_a, &mut picker_b)? {
            Frame::NotAvailable { message } => {
                for line in message {
                    println!("{line}");
                }
                return Ok(());
            }
            Frame::Rendered { point } => println!("The coordinates of center point: {point}"),
        }
        for ev in session.take_clamp_log() {
            println!("Clamped: {ev}");
        }

        println!("{HELP}");
        let line = commands.next_line().unwrap_or_else(|e| {
            error!("Unable to read input: {e}");
            None
        });
        match parse_action(line.as_deref()) {
            Action::Refresh => {}
            Action::Save => match session.save() {
                Ok(p) => println!("Saved {p}"),
                // 保存失败不影响内存中的点, 可以重试.
                Err(e) => error!("{e}"),
            },
            Action::Morphology => {
                for path in export_morphology(&view, session, out)? {
                    println!("Exported {}", path.display());
                }
            }
            Action::Quit => return Ok(()),
        }
    }
}

/// 把两个视图带标记导出到 `out` 目录.
pub fn export_views<S, L>(
    session: &CenterLabellerSession<S, L>,
    out: &Path,
) -> AppResult<Vec<PathBuf>>
where
    S: CenterStore,
    L: VolumeLocator,
{
    fs::create_dir_all(out)?;
    let color = PickerColor::default();
    let slices = session.slices_for_display()?;

    let mut paths = Vec::with_capacity(2);
    for v in [slices.a, slices.b] {
        let path = out.join(preview_name(v.kind));
        match v.image.save_marked(&path, v.point.as_tuple(), color.rgb()) {
            Ok(()) => paths.push(path),
            Err(e) => error!("Unable to write {}: {e}", path.display()),
        }
    }
    Ok(paths)
}

/// 把三轴形态学切片导出到 `out` 目录.
fn export_morphology<S, L>(
    view: &CenterLabellerView,
    session: &CenterLabellerSession<S, L>,
    out: &Path,
) -> LabelResult<Vec<PathBuf>>
where
    S: CenterStore,
    L: VolumeLocator,
{
    let morphology = view.morphology(session, [None; 3])?;
    let mut paths = Vec::with_capacity(3);
    for s in &morphology.slices {
        let path = out.join(format!("morphology-{}-{}.png", s.axis.name(), s.index));
        match s.image.save(&path) {
            Ok(()) => paths.push(path),
            Err(e) => error!("Unable to write {}: {e}", path.display()),
        }
    }
    info!("Exported {} morphology slices", paths.len());
    Ok(paths)
}

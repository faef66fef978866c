//! 文本输出.

use std::io::{self, Write};

use holo_center::prelude::*;

const S4: &str = "    ";

#[inline]
fn coord_to_display(c: Option<i64>) -> String {
    match c {
        Some(c) => c.to_string(),
        None => "/".to_string(),
    }
}

/// 将当前图像与中心点写进 `w` 中.
pub fn describe_session_into<S, L, W>(
    session: &CenterLabellerSession<S, L>,
    transition: Transition,
    w: &mut W,
) -> io::Result<()>
where
    S: CenterStore,
    L: VolumeLocator,
    W: Write,
{
    let Some(entry) = session.entry() else {
        for line in holo_center::consts::NOT_AVAILABLE_MESSAGE {
            writeln!(w, "{line}")?;
        }
        return Ok(());
    };

    let origin = match transition {
        Transition::Loaded {
            origin: PointOrigin::Stored,
        } => "stored",
        Transition::Loaded {
            origin: PointOrigin::Default,
        } => "default midpoint",
        Transition::Retained => "in memory",
    };
    let (z, x, y) = entry.volume().shape();

    writeln!(w, "Image `{}`:", entry.identity())?;
    writeln!(w, "{S4}Volume (z, x, y): ({z}, {x}, {y})")?;
    writeln!(w, "{S4}The coordinates of center point: {}", entry.point())?;
    writeln!(w, "{S4}Source: {origin}")?;
    for ev in session.clamp_log() {
        writeln!(w, "{S4}Clamped: {ev}")?;
    }
    Ok(())
}

/// 将项目的标注进度与全部中心点写进 `w` 中.
pub fn describe_centers_into<W: Write>(
    project: &str,
    count: usize,
    rows: &[StoredCenter],
    w: &mut W,
) -> io::Result<()> {
    writeln!(w, "Project `{project}`: {count} labelled")?;
    for row in rows {
        writeln!(
            w,
            "{S4}{:>8}  ({}, {}, {})",
            row.image_id,
            coord_to_display(row.x),
            coord_to_display(row.y),
            coord_to_display(row.z)
        )?;
    }
    Ok(())
}

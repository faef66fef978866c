//! 完整的标注流程: 选择 -> 点选 -> 保存 -> 切换 -> 重新选择.

use std::fs::{self, File};
use std::path::Path;

use holo_center::prelude::*;
use ndarray::Array3;
use tiff::encoder::{colortype, TiffEncoder};

/// 写入 `frames` 页, 每页 `height` 行 `width` 列的 16-bit 灰度 TIFF.
fn write_ht_tiff(path: &Path, frames: usize, height: u32, width: u32) {
    let file = File::create(path).unwrap();
    let mut encoder = TiffEncoder::new(file).unwrap();
    for f in 0..frames {
        let page: Vec<u16> = (0..height * width)
            .map(|i| (f as u32 * 1000 + i) as u16)
            .collect();
        encoder
            .write_image::<colortype::Gray16>(width, height, &page)
            .unwrap();
    }
}

struct Fixture {
    _root: tempfile::TempDir,
    data_dir: std::path::PathBuf,
    db: std::path::PathBuf,
}

fn fixture() -> Fixture {
    let root = tempfile::tempdir().unwrap();
    let data_dir = root.path().join("holo");
    fs::create_dir_all(data_dir.join("liver")).unwrap();

    // 42: 10 帧, 每帧 10 x 10.
    write_ht_tiff(&data_dir.join("liver/42.tiff"), 10, 10, 10);
    // 43: npy, 形状 (4, 6, 8).
    let arr = Array3::from_shape_fn((4, 6, 8), |(z, x, y)| (z * 48 + x * 8 + y) as u16);
    ndarray_npy::write_npy(data_dir.join("liver/43.npy"), &arr).unwrap();
    // 44: 常数体数据.
    let flat = Array3::<f32>::from_elem((3, 3, 3), 7.0);
    ndarray_npy::write_npy(data_dir.join("liver/44.npy"), &flat).unwrap();

    let db = root.path().join("db").join("labels.db");
    Fixture {
        _root: root,
        data_dir,
        db,
    }
}

fn open(fx: &Fixture) -> CenterLabellerSession<SqliteCenterStore, DirectoryLocator> {
    CenterLabellerSession::new(
        SqliteCenterStore::open(&fx.db).unwrap(),
        DirectoryLocator::new(&fx.data_dir),
    )
}

fn liver(id: i64) -> Option<ImageIdentity> {
    Some(ImageIdentity::new("liver", id))
}

#[test]
fn label_save_and_reload() {
    let fx = fixture();
    let mut session = open(&fx);
    let view = CenterLabellerView::default();

    let t = session.select(liver(42)).unwrap();
    assert_eq!(t, Transition::Loaded { origin: PointOrigin::Default });
    assert_eq!(session.current_point(), Some(Point3d::new(5, 5, 5)));

    let mut pick_a = |_: &ViewSlice<'_>, _: PickerColor| ScreenPoint::new(7, 2);
    let mut index_b = None;
    let mut pick_b = |v: &ViewSlice<'_>, _: PickerColor| {
        index_b = Some(v.index);
        ScreenPoint::new(0, 3)
    };
    let frame = view.refresh(&mut session, &mut pick_a, &mut pick_b).unwrap();
    assert_eq!(index_b, Some(7));
    assert_eq!(frame, Frame::Rendered { point: Point3d::new(2, 7, 3) });

    session.save().unwrap();
    session.save().unwrap();
    assert_eq!(session.store().count("liver").unwrap(), 1);

    // 切换后体数据与点一起替换.
    session.select(liver(43)).unwrap();
    let entry = session.entry().unwrap();
    assert_eq!(entry.volume().shape(), (4, 6, 8));
    assert_eq!(entry.point(), Point3d::new(3, 4, 2));

    // 新会话 (新连接) 读到保存过的点.
    drop(session);
    let mut session = open(&fx);
    let t = session.select(liver(42)).unwrap();
    assert_eq!(t, Transition::Loaded { origin: PointOrigin::Stored });
    assert_eq!(session.current_point(), Some(Point3d::new(2, 7, 3)));
    assert_eq!(
        session.store().list("liver").unwrap(),
        vec![StoredCenter {
            image_id: 42,
            x: Some(2),
            y: Some(7),
            z: Some(3),
        }]
    );
}

#[test]
fn stored_point_larger_than_volume_is_clamped() {
    let fx = fixture();
    let mut session = open(&fx);
    session
        .store_mut()
        .save("liver", 43, &Point3d::new(9, 9, 9))
        .unwrap();

    session.select(liver(43)).unwrap();
    let p = session.current_point().unwrap();
    // shape (z, x, y) = (4, 6, 8).
    assert_eq!(p, Point3d::new(5, 7, 3));
    assert_eq!(session.clamp_log().len(), 1);

    let d = session.slices_for_display().unwrap();
    assert!(d.a.image.check((p.x, p.y)));
    assert!(d.b.image.check((p.z, p.x)));
}

#[test]
fn degenerate_volume_is_all_zero() {
    let fx = fixture();
    let mut session = open(&fx);
    session.select(liver(44)).unwrap();
    let v = session.volume().unwrap();
    assert!(v.data().iter().all(|&x| x == 0.0));
}

#[test]
fn missing_and_broken_images_leave_no_image() {
    let fx = fixture();
    fs::write(fx.data_dir.join("liver/45.tif"), b"not a tiff").unwrap();
    let mut session = open(&fx);
    session.select(liver(42)).unwrap();

    let err = session.select(liver(45)).unwrap_err();
    assert!(matches!(err, LabelError::Volume(_)));
    assert!(!session.is_ready());

    let err = session.select(liver(99)).unwrap_err();
    assert!(err.is_not_found());
    assert!(matches!(session.state(), SessionState::NoImage));

    // 重新选择即可恢复.
    session.select(liver(42)).unwrap();
    assert!(session.is_ready());
}

#[test]
fn fetch_into_cache() {
    let fx = fixture();
    let cache = tempfile::tempdir().unwrap();
    let query = CellQuery {
        project: "liver".into(),
        patient_id: "P07".into(),
        cell_type: "hepatocyte".into(),
        cell_number: 2,
    };
    let mut catalog = Catalog::new();
    catalog.insert(query.clone(), ImageIdentity::new("liver", 43), "liver/43.npy");

    let locator = FetchLocator::new(
        catalog.clone(),
        CopyFetcher::new(&fx.data_dir),
        cache.path(),
    );
    let mut session = CenterLabellerSession::new(SqliteCenterStore::in_memory().unwrap(), locator);
    let view = CenterLabellerView::new(PickerColor::Green);

    view.select_cell(&mut session, &catalog, &query).unwrap();
    assert!(cache.path().join("liver/43.npy").is_file());
    assert_eq!(session.volume().unwrap().shape(), (4, 6, 8));
}

#[test]
fn preview_export() {
    let fx = fixture();
    let out = tempfile::tempdir().unwrap();
    let mut session = open(&fx);
    session.select(liver(42)).unwrap();

    let d = session.slices_for_display().unwrap();
    let path = out.path().join("xy.png");
    d.a.image
        .save_marked(&path, d.a.point.as_tuple(), PickerColor::Red.rgb())
        .unwrap();
    let img = image::open(&path).unwrap().to_rgb8();
    assert_eq!((img.width(), img.height()), (10, 10));
    assert_eq!(img.get_pixel(5, 5).0, [255, 0, 0]);
}

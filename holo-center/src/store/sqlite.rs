use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use super::{is_valid_project, CenterStore, StoreError, StoreResult, StoredCenter};
use crate::consts::CENTER_TABLE_SUFFIX;
use crate::point::Point3d;

/// 基于 SQLite 的中心点表.
pub struct SqliteCenterStore {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl SqliteCenterStore {
    /// 打开或创建数据库文件. 所在目录不存在时会被创建.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        info!("Center database opened at {}", path.display());
        Ok(Self {
            conn,
            db_path: Some(path.to_path_buf()),
        })
    }

    /// 内存数据库. 进程结束后内容丢失.
    pub fn in_memory() -> StoreResult<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
            db_path: None,
        })
    }

    /// 数据库文件路径. 内存数据库为 `None`.
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    /// 校验项目名, 返回表名.
    fn table(project: &str) -> StoreResult<String> {
        if is_valid_project(project) {
            Ok(format!("{project}{CENTER_TABLE_SUFFIX}"))
        } else {
            Err(StoreError::InvalidProject(project.to_string()))
        }
    }

    /// 确保表存在, 返回表名.
    fn ensure_table(&self, project: &str) -> StoreResult<String> {
        let table = Self::table(project)?;
        self.conn.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {table} (
                    image_id    INTEGER PRIMARY KEY,
                    x           INTEGER,
                    y           INTEGER,
                    z           INTEGER
                )"
            ),
            [],
        )?;
        Ok(table)
    }
}

fn read_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredCenter> {
    Ok(StoredCenter {
        image_id: row.get(0)?,
        x: row.get(1)?,
        y: row.get(2)?,
        z: row.get(3)?,
    })
}

impl CenterStore for SqliteCenterStore {
    fn fetch(&self, project: &str, image_id: i64) -> StoreResult<Option<StoredCenter>> {
        let table = self.ensure_table(project)?;
        let row = self
            .conn
            .query_row(
                &format!("SELECT image_id, x, y, z FROM {table} WHERE image_id = ?1"),
                params![image_id],
                read_row,
            )
            .optional()?;
        debug!("Fetched center of {project}#{image_id}: {row:?}");
        Ok(row)
    }

    fn save(&mut self, project: &str, image_id: i64, point: &Point3d) -> StoreResult<()> {
        let table = self.ensure_table(project)?;
        let (x, y, z) = point.to_signed();

        let tx = self.conn.transaction()?;
        tx.execute(
            &format!(
                "INSERT INTO {table} (image_id, x, y, z) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(image_id) DO UPDATE SET
                    x = excluded.x, y = excluded.y, z = excluded.z"
            ),
            params![image_id, x, y, z],
        )?;
        tx.commit()?;

        info!("Saved center {point} for {project}#{image_id}");
        Ok(())
    }

    fn count(&self, project: &str) -> StoreResult<usize> {
        let table = self.ensure_table(project)?;
        let n: i64 = self
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
        Ok(n.max(0) as usize)
    }

    fn list(&self, project: &str) -> StoreResult<Vec<StoredCenter>> {
        let table = self.ensure_table(project)?;
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT image_id, x, y, z FROM {table} ORDER BY image_id"))?;
        let rows = stmt.query_map([], read_row)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PointOrigin;

    #[test]
    fn test_save_is_idempotent() {
        let mut store = SqliteCenterStore::in_memory().unwrap();
        let p = Point3d::new(1, 2, 3);
        store.save("liver", 42, &p).unwrap();
        store.save("liver", 42, &p).unwrap();

        assert_eq!(store.count("liver").unwrap(), 1);
        assert_eq!(
            store.list("liver").unwrap(),
            vec![StoredCenter::from_point(42, &p)]
        );
    }

    #[test]
    fn test_save_overwrites() {
        let mut store = SqliteCenterStore::in_memory().unwrap();
        store.save("liver", 7, &Point3d::new(1, 1, 1)).unwrap();
        store.save("liver", 7, &Point3d::new(4, 3, 2)).unwrap();
        let row = store.fetch("liver", 7).unwrap().unwrap();
        assert_eq!((row.x, row.y, row.z), (Some(4), Some(3), Some(2)));
        assert_eq!(store.count("liver").unwrap(), 1);
    }

    #[test]
    fn test_round_trip_and_default() {
        let mut store = SqliteCenterStore::in_memory().unwrap();
        let shape = (20, 10, 8);

        let r = store.load_or_default("p", 3, shape).unwrap();
        assert_eq!(r.origin, PointOrigin::Default);
        assert_eq!(r.point, Point3d::new(5, 4, 10));

        store.save("p", 3, &Point3d::new(9, 7, 19)).unwrap();
        let r = store.load_or_default("p", 3, shape).unwrap();
        assert_eq!(r.origin, PointOrigin::Stored);
        assert_eq!(r.point, Point3d::new(9, 7, 19));
        assert!(r.clamp.is_none());
    }

    #[test]
    fn test_projects_are_separate_tables() {
        let mut store = SqliteCenterStore::in_memory().unwrap();
        store.save("a", 1, &Point3d::new(1, 1, 1)).unwrap();
        assert!(store.fetch("b", 1).unwrap().is_none());
        assert_eq!(store.count("b").unwrap(), 0);
    }

    #[test]
    fn test_null_columns_from_legacy_rows() {
        let store = SqliteCenterStore::in_memory().unwrap();
        let table = store.ensure_table("p").unwrap();
        store
            .conn
            .execute(
                &format!("INSERT INTO {table} (image_id, x) VALUES (5, 1)"),
                [],
            )
            .unwrap();
        let r = store.load_or_default("p", 5, (20, 10, 8)).unwrap();
        assert_eq!(r.origin, PointOrigin::Stored);
        assert_eq!(r.point, Point3d::new(1, 4, 10));
    }

    #[test]
    fn test_invalid_project_rejected() {
        let mut store = SqliteCenterStore::in_memory().unwrap();
        let err = store
            .save("x; DROP TABLE y", 1, &Point3d::default())
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidProject(_)));
    }

    #[test]
    fn test_file_database_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("labels.db");
        {
            let mut store = SqliteCenterStore::open(&path).unwrap();
            store.save("p", 1, &Point3d::new(3, 2, 1)).unwrap();
        }
        let store = SqliteCenterStore::open(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        let row = store.fetch("p", 1).unwrap().unwrap();
        assert_eq!(row, StoredCenter::from_point(1, &Point3d::new(3, 2, 1)));
    }
}

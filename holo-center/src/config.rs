//! 路径配置.
//!
//! 每一项均按以下顺序确定:
//!
//! 1. 若对应的环境变量非空, 则使用其值;
//! 2. 否则, 使用用户目录下的默认位置.

use std::env;
use std::path::{Path, PathBuf};

use crate::consts::env as keys;

/// 获取 `$HOME/dataset/...` 路径.
pub fn home_dataset_dir_with<P: AsRef<Path>, I: IntoIterator<Item = P>>(it: I) -> Option<PathBuf> {
    let mut ans = dirs::home_dir()?;
    ans.push("dataset");
    ans.extend(it);
    Some(ans)
}

/// 标注工具用到的全部路径.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// SQLite 数据库文件.
    pub database: PathBuf,

    /// 体数据仓库根目录, 按 `{project}/{image_id}.{ext}` 组织.
    pub data_dir: PathBuf,

    /// 下载缓存目录.
    pub cache_dir: PathBuf,
}

impl Config {
    /// 由环境变量或用户目录确定全部路径.
    pub fn from_env_or_home() -> Self {
        Self::resolve(|key| env::var_os(key).map(PathBuf::from))
    }

    /// 由 `lookup` 查询变量, 缺失或为空时使用默认值.
    ///
    /// 无法确定用户目录时, 退回到当前目录下的相对路径.
    pub fn resolve<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<PathBuf>,
    {
        let get = |key: &str| lookup(key).filter(|p| !p.as_os_str().is_empty());

        let database = get(keys::DB).unwrap_or_else(|| {
            dirs::data_dir()
                .or_else(dirs::home_dir)
                .unwrap_or_default()
                .join("holo-center")
                .join("labels.db")
        });
        let data_dir = get(keys::DATA_DIR)
            .or_else(|| home_dataset_dir_with(["holo"]))
            .unwrap_or_else(|| PathBuf::from("dataset").join("holo"));
        let cache_dir = get(keys::CACHE_DIR).unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(env::temp_dir)
                .join("holo-center")
        });

        Self {
            database,
            data_dir,
            cache_dir,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, PathBuf> = [
            (keys::DB, PathBuf::from("/tmp/a.db")),
            (keys::DATA_DIR, PathBuf::from("/data/holo")),
            (keys::CACHE_DIR, PathBuf::new()),
        ]
        .into_iter()
        .collect();
        let c = Config::resolve(|k| vars.get(k).cloned());

        assert_eq!(c.database, PathBuf::from("/tmp/a.db"));
        assert_eq!(c.data_dir, PathBuf::from("/data/holo"));
        // 空值视为未设置.
        assert!(c.cache_dir.ends_with("holo-center"));
    }

    #[test]
    fn test_defaults() {
        let c = Config::resolve(|_| None);
        assert!(c.database.ends_with("holo-center/labels.db"));
        assert!(c.data_dir.ends_with("dataset/holo"));
        assert!(c.cache_dir.ends_with("holo-center"));
    }
}

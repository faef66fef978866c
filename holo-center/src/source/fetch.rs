use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use super::{SourceError, SourceResult};

/// 远端文件下载.
pub trait FileFetcher {
    /// 把 `file_ref` 下载到 `destination` 目录, 返回本地路径.
    ///
    /// 阻塞执行. 要么得到完整的文件, 要么返回错误.
    fn fetch(&mut self, file_ref: &str, destination: &Path) -> SourceResult<PathBuf>;
}

/// 从本地仓库目录复制文件.
///
/// 先写入同目录下的 `.part` 临时文件, 完成后再重命名, 保证不会留下不完整的目标文件.
#[derive(Clone, Debug)]
pub struct CopyFetcher {
    root: PathBuf,
}

impl CopyFetcher {
    /// 以 `root` 为仓库根目录.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// 仓库根目录.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileFetcher for CopyFetcher {
    fn fetch(&mut self, file_ref: &str, destination: &Path) -> SourceResult<PathBuf> {
        let from = self.root.join(file_ref);
        if !from.is_file() {
            return Err(SourceError::NotFound(from.display().to_string()));
        }
        let name = from
            .file_name()
            .ok_or_else(|| SourceError::NotFound(file_ref.to_string()))?;

        fs::create_dir_all(destination)?;
        let target = destination.join(name);
        let mut part = target.clone().into_os_string();
        part.push(".part");
        let part = PathBuf::from(part);

        if let Err(e) = fs::copy(&from, &part).and_then(|_| fs::rename(&part, &target)) {
            let _ = fs::remove_file(&part);
            return Err(e.into());
        }
        debug!("Fetched {} -> {}", from.display(), target.display());
        Ok(target)
    }
}

use std::path::{Path, PathBuf};

use super::{
    CellQuery, FileFetcher, ImageIdentity, ImageRecord, ImageSource, SourceError, SourceResult,
};
use crate::consts::VOLUME_EXTENSIONS;

/// 把图像标识解析为本地体数据文件.
pub trait VolumeLocator {
    /// 返回可以直接交给 [`crate::data::load`] 的路径.
    fn locate(&mut self, identity: &ImageIdentity) -> SourceResult<PathBuf>;
}

impl<L: VolumeLocator + ?Sized> VolumeLocator for Box<L> {
    fn locate(&mut self, identity: &ImageIdentity) -> SourceResult<PathBuf> {
        (**self).locate(identity)
    }
}

/// 按目录约定查找: `{root}/{project}/{image_id}.{ext}`.
///
/// 后缀按 [`VOLUME_EXTENSIONS`] 的顺序尝试.
#[derive(Clone, Debug)]
pub struct DirectoryLocator {
    root: PathBuf,
}

impl DirectoryLocator {
    /// 以 `root` 为仓库根目录.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// 仓库根目录.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 相对于仓库根目录的文件名, 如 `liver/42.tiff`.
    fn find(&self, identity: &ImageIdentity) -> Option<String> {
        VOLUME_EXTENSIONS
            .iter()
            .map(|ext| format!("{}/{}.{ext}", identity.project, identity.image_id))
            .find(|name| self.root.join(name).is_file())
    }
}

impl VolumeLocator for DirectoryLocator {
    fn locate(&mut self, identity: &ImageIdentity) -> SourceResult<PathBuf> {
        self.find(identity)
            .map(|name| self.root.join(name))
            .ok_or_else(|| SourceError::NotFound(identity.to_string()))
    }
}

/// 目录仓库只按标识组织, 不记录级联选择信息, 因此 `resolve` 总是返回 `None`.
impl ImageSource for DirectoryLocator {
    fn resolve(&self, _query: &CellQuery) -> SourceResult<Option<ImageRecord>> {
        Ok(None)
    }

    fn record(&self, identity: &ImageIdentity) -> SourceResult<Option<ImageRecord>> {
        Ok(self.find(identity).map(|file_ref| ImageRecord {
            identity: identity.clone(),
            file_ref,
        }))
    }
}

/// 先通过 [`ImageSource`] 查到文件引用, 再由 [`FileFetcher`] 下载到缓存目录.
///
/// 每个项目使用缓存目录下的一个子目录.
pub struct FetchLocator<S, F> {
    source: S,
    fetcher: F,
    cache_dir: PathBuf,
}

impl<S: ImageSource, F: FileFetcher> FetchLocator<S, F> {
    /// 直接构造.
    pub fn new<P: Into<PathBuf>>(source: S, fetcher: F, cache_dir: P) -> Self {
        Self {
            source,
            fetcher,
            cache_dir: cache_dir.into(),
        }
    }

    /// 图像目录.
    pub fn source(&self) -> &S {
        &self.source
    }
}

impl<S: ImageSource, F: FileFetcher> VolumeLocator for FetchLocator<S, F> {
    fn locate(&mut self, identity: &ImageIdentity) -> SourceResult<PathBuf> {
        let record = self
            .source
            .record(identity)?
            .ok_or_else(|| SourceError::NotFound(identity.to_string()))?;
        let destination = self.cache_dir.join(&identity.project);
        self.fetcher.fetch(&record.file_ref, &destination)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{Catalog, CellQuery, CopyFetcher};
    use std::fs;

    #[test]
    fn test_directory_locator() {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("liver")).unwrap();
        fs::write(root.path().join("liver/3.npy"), b"").unwrap();
        fs::write(root.path().join("liver/4.tif"), b"").unwrap();

        let mut locator = DirectoryLocator::new(root.path());
        let p = locator.locate(&ImageIdentity::new("liver", 3)).unwrap();
        assert_eq!(p, root.path().join("liver/3.npy"));
        let p = locator.locate(&ImageIdentity::new("liver", 4)).unwrap();
        assert_eq!(p, root.path().join("liver/4.tif"));

        let err = locator.locate(&ImageIdentity::new("liver", 5)).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));

        let record = locator.record(&ImageIdentity::new("liver", 4)).unwrap().unwrap();
        assert_eq!(record.file_ref, "liver/4.tif");
    }

    #[test]
    fn test_directory_as_remote_repository() {
        let repo = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fs::create_dir_all(repo.path().join("liver")).unwrap();
        fs::write(repo.path().join("liver/8.nii.gz"), b"nii").unwrap();

        let mut locator: Box<dyn VolumeLocator> = Box::new(FetchLocator::new(
            DirectoryLocator::new(repo.path()),
            CopyFetcher::new(repo.path()),
            cache.path(),
        ));
        let p = locator.locate(&ImageIdentity::new("liver", 8)).unwrap();
        assert_eq!(p, cache.path().join("liver/8.nii.gz"));
    }

    #[test]
    fn test_fetch_locator() {
        let repo = tempfile::tempdir().unwrap();
        let cache = tempfile::tempdir().unwrap();
        fs::write(repo.path().join("remote-9.tiff"), b"tiff").unwrap();

        let id = ImageIdentity::new("liver", 9);
        let mut catalog = Catalog::new();
        let query = CellQuery {
            project: "liver".into(),
            patient_id: "P".into(),
            cell_type: "t".into(),
            cell_number: 1,
        };
        catalog.insert(query, id.clone(), "remote-9.tiff");

        let mut locator = FetchLocator::new(catalog, CopyFetcher::new(repo.path()), cache.path());
        let p = locator.locate(&id).unwrap();
        assert_eq!(p, cache.path().join("liver/remote-9.tiff"));

        let err = locator.locate(&ImageIdentity::new("liver", 1)).unwrap_err();
        assert!(matches!(err, SourceError::NotFound(_)));
    }
}

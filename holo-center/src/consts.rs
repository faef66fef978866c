//! 通用常量.

/// 可识别的体数据文件后缀. 按探测顺序排列, 比较时忽略大小写.
pub const VOLUME_EXTENSIONS: [&str; 5] = ["tiff", "tif", "nii.gz", "nii", "npy"];

/// 中心点表名后缀. 完整表名为 `{project}{CENTER_TABLE_SUFFIX}`.
pub const CENTER_TABLE_SUFFIX: &str = "_image_center";

/// 规范化后的灰度上限.
pub const GRAY_MAX: f32 = 255.0;

/// 上游选择没有可用图像时展示给用户的提示.
pub const NOT_AVAILABLE_MESSAGE: [&str; 2] = [
    "Not Available images",
    "Please uncheck filter out labeled or check the images really exist.",
];

/// 环境变量名.
pub mod env {
    /// SQLite 数据库文件.
    pub const DB: &str = "HOLO_CENTER_DB";

    /// 体数据仓库根目录.
    pub const DATA_DIR: &str = "HOLO_CENTER_DATA_DIR";

    /// 下载缓存目录.
    pub const CACHE_DIR: &str = "HOLO_CENTER_CACHE_DIR";
}

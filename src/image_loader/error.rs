//! # 错误模型模块
//!
//! ## 设计思路
//!
//! 三种加载路径与分发器的所有失败都收敛到单一枚举 `LoadError`，
//! 调用侧可以按分支匹配，而不是解析字符串。
//!
//! - 字符串为空、无法识别的输入：由本 crate 直接构造。
//! - 文件读取失败：原样携带底层 `std::io::Error`，保留 source 链。
//! - 引用 URL 创建失败：配额耗尽或注册表锁中毒。

/// 图片来源加载统一错误类型。
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("src is empty")]
    EmptyInput,

    #[error(transparent)]
    Read(#[from] std::io::Error),

    #[error("file `{name}` is too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge { name: String, size: u64, limit: u64 },

    #[error("failed to create reference url: {0}")]
    ResourceCreation(String),

    #[error("prop `{0}` is not a valid loadable object")]
    Unrecognized(String),

    #[error("invalid blob payload: {0}")]
    InvalidData(String),

    #[error("no async runtime available to read the file: {0}")]
    RuntimeUnavailable(String),
}

impl LoadError {
    /// 稳定的错误码，供 CLI / 日志做机器可读输出。
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyInput => "empty_input",
            Self::Read(_) => "read_error",
            Self::FileTooLarge { .. } => "file_too_large",
            Self::ResourceCreation(_) => "resource_creation",
            Self::Unrecognized(_) => "unrecognized_input",
            Self::InvalidData(_) => "invalid_data",
            Self::RuntimeUnavailable(_) => "runtime_unavailable",
        }
    }
}

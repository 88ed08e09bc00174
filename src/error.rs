//! 统一错误类型模块
//!
//! # 设计思路
//!
//! `LoadError` 只描述单次加载的失败；配置文件、命令行等外围流程另有失败来源。
//! `AppError` 把它们收敛到一个枚举，供二进制入口与设置加载使用。
//!
//! # 实现思路
//!
//! - 使用 `thiserror` 派生可读错误消息。
//! - 为 `LoadError` / `std::io::Error` 提供 `From` 转换，无需手动 map。
//! - 实现 `Serialize` 将错误序列化为字符串，便于以 JSON 输出。

use serde::Serialize;

use crate::image_loader::LoadError;

/// 应用级统一错误类型
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// 图片来源加载失败
    #[error("{0}")]
    Load(#[from] LoadError),

    /// 文件系统 I/O 错误
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// 配置文件或命令行参数无效
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

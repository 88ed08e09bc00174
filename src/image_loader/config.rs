//! # 配置模块
//!
//! ## 设计思路
//!
//! 将所有“可调策略”集中到 `LoaderConfig`：文件体积上限、MIME 推断策略、
//! 引用 URL 注册表的命名空间与配额。
//!
//! ## 实现思路
//!
//! - `Default` 提供生产可用的配置。
//! - `#[serde(default)]` 允许配置文件只写需要覆盖的字段。
//! - `validate` 在配置生效前拒绝明显无效的组合。

use serde::{Deserialize, Serialize};

use super::LoadError;

/// 图片来源加载配置。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 读取文件时允许的最大体积（字节）。
    pub max_file_size: u64,
    /// 未声明 MIME 类型时是否通过文件签名（magic bytes）推断。
    pub sniff_mime: bool,
    /// 无法确定类型时写入 data URL 的 MIME。
    pub fallback_mime: String,
    /// 引用 URL 的来源段：`blob:<origin>/<id>`。
    pub reference_origin: String,
    /// 同时存活的引用 URL 数量上限。
    pub max_reference_urls: usize,
    /// 注册表中所有 blob 的总字节上限。
    pub max_reference_bytes: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_file_size: 50 * 1024 * 1024,
            sniff_mime: true,
            fallback_mime: "application/octet-stream".to_string(),
            reference_origin: "image-loader".to_string(),
            max_reference_urls: 1024,
            max_reference_bytes: 256 * 1024 * 1024,
        }
    }
}

impl LoaderConfig {
    /// 校验配置。
    ///
    /// 返回 `LoadError::InvalidData`，由上层包装为配置错误。
    pub fn validate(&self) -> Result<(), LoadError> {
        if self.max_file_size == 0 {
            return Err(LoadError::InvalidData("max_file_size must be greater than 0".to_string()));
        }
        if self.max_reference_urls == 0 {
            return Err(LoadError::InvalidData("max_reference_urls must be greater than 0".to_string()));
        }
        if self.max_reference_bytes == 0 {
            return Err(LoadError::InvalidData("max_reference_bytes must be greater than 0".to_string()));
        }
        if self.fallback_mime.trim().is_empty() {
            return Err(LoadError::InvalidData("fallback_mime must not be empty".to_string()));
        }
        let origin = self.reference_origin.trim();
        if origin.is_empty() || origin.contains('/') {
            return Err(LoadError::InvalidData(format!(
                "reference_origin `{}` must be non-empty and contain no `/`",
                self.reference_origin
            )));
        }
        Ok(())
    }
}

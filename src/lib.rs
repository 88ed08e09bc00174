//! # 图片来源加载器 — 库入口
//!
//! ## 架构总览
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  调用方：ImageInput（Text / File / Blob）或 JSON 负载     │
//! └───────┬──────────────────────────────────────────────────┘
//!         ↓  async fn / FnOnce 回调
//! ┌───────┴──────────────────────────────────────────────────┐
//! │  image_loader                                            │
//! │  ├─ handler ─── ImageLoader（分发 + 配置快照）            │
//! │  ├─ loader ──── 字符串透传 / 文件 → Data URL / blob → URL │
//! │  ├─ registry ── blob: 引用 URL + ReleaseHandle (RAII)     │
//! │  └─ data_url ── Base64 编解码                             │
//! │                                                          │
//! │  error ─── AppError（外围统一错误）                       │
//! │  settings ─ JSON 配置文件                                 │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## 模块职责
//!
//! | 模块 | 职责 |
//! |------|------|
//! | [`image_loader`] | 三种来源的统一加载、引用 URL 生命周期 |
//! | [`error`] | 统一错误类型 `AppError` |
//! | [`settings`] | 配置文件读写 |
//!
//! 顶层的 `load_*` 函数使用进程级默认加载器，适合不关心配置注入的调用点。

pub mod error;
pub mod image_loader;
pub mod settings;

use once_cell::sync::Lazy;
use serde_json::Value;

pub use error::AppError;
pub use image_loader::data_url;
pub use image_loader::{
    Blob, FileHandle, ImageContent, ImageInput, ImageLoader, LoadError, LoadedImage, LoaderConfig,
    ReferenceUrlRegistry, ReleaseHandle,
};

static DEFAULT_LOADER: Lazy<ImageLoader> = Lazy::new(ImageLoader::default);

/// 进程级默认加载器（默认配置，独立注册表）。
pub fn default_loader() -> &'static ImageLoader {
    &DEFAULT_LOADER
}

pub fn load_string(src: &str) -> Result<LoadedImage, LoadError> {
    DEFAULT_LOADER.load_string(src)
}

pub async fn load_file(file: &FileHandle) -> Result<LoadedImage, LoadError> {
    DEFAULT_LOADER.load_file(file).await
}

pub fn load_blob(blob: &Blob) -> Result<LoadedImage, LoadError> {
    DEFAULT_LOADER.load_blob(blob)
}

/// 默认入口：接受任意一种来源。
pub async fn load_anything(input: impl Into<ImageInput>) -> Result<LoadedImage, LoadError> {
    DEFAULT_LOADER.load_anything(input.into()).await
}

pub async fn load_value(value: &Value) -> Result<LoadedImage, LoadError> {
    DEFAULT_LOADER.load_value(value).await
}

//! # 图片来源加载模块（image_loader）
//!
//! ## 设计思路
//!
//! 把三种来源（字符串 / 文件 / blob）统一成同一种可直接作为图片 `src` 的结果，
//! 按职责拆分为多个子模块：
//!
//! - `handler`：`ImageLoader` 本体，负责分发与配置
//! - `loader`：三条具体加载路径
//! - `callback`：回调风格入口（`FnOnce`，恰好触发一次）
//! - `registry`：引用 URL 注册表与释放守卫
//! - `data_url`：Data URL 编解码
//! - `config/error/source`：配置、错误、输入与结果模型
//!
//! ## 调用链
//!
//! ```text
//! load_anything / load_value
//!    ↓
//! handler.rs（识别来源 + 耗时日志）
//!    ├─ loader.rs::load_string（非空校验）
//!    ├─ loader.rs::load_blob ─→ registry.rs（创建引用 URL + ReleaseHandle）
//!    └─ loader.rs::load_file ─→ data_url.rs（异步读取 + 编码）
//!    ↓
//! Result<LoadedImage, LoadError>
//! ```

mod callback;
mod config;
pub mod data_url;
mod error;
mod handler;
mod loader;
mod registry;
mod source;

pub use config::LoaderConfig;
pub use error::LoadError;
pub use handler::ImageLoader;
pub use registry::{ReferenceUrlRegistry, RegistryLimits, ReleaseHandle};
pub use source::{Blob, FileHandle, ImageContent, ImageInput, LoadedImage};

//! # 核心编排模块
//!
//! ## 设计思路
//!
//! `ImageLoader` 只负责分发与配置管理：按来源类别把请求交给恰好一个加载函数，
//! 自身不保存任何请求级状态，每次调用互相独立。
//!
//! ## 实现思路
//!
//! - 配置通过 `Arc<RwLock<LoaderConfig>>` 支持运行时替换，单次请求使用同一快照。
//! - 注册表与配置一起共享，`ImageLoader` 可廉价克隆，便于交给异步任务。
//! - 记录每次加载的来源类别与耗时，便于诊断。

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Instant;

use serde_json::Value;

use super::registry::{ReferenceUrlRegistry, RegistryLimits};
use super::source::{ImageInput, LoadedImage};
use super::{LoadError, LoaderConfig};

/// 图片来源加载器。
#[derive(Clone)]
pub struct ImageLoader {
    pub(super) config: Arc<RwLock<LoaderConfig>>,
    pub(super) registry: ReferenceUrlRegistry,
}

impl ImageLoader {
    /// 根据配置创建加载器，同时创建独立的引用 URL 注册表。
    ///
    /// # 示例
    /// ```rust
    /// use image_loader::{ImageLoader, LoaderConfig};
    ///
    /// let loader = ImageLoader::new(LoaderConfig::default())?;
    /// let loaded = loader.load_string("cat.png")?;
    /// assert_eq!(loaded.src(), "cat.png");
    /// # Ok::<(), image_loader::LoadError>(())
    /// ```
    pub fn new(config: LoaderConfig) -> Result<Self, LoadError> {
        let registry = ReferenceUrlRegistry::with_limits(RegistryLimits::from(&config));
        Self::with_registry(config, registry)
    }

    /// 复用已有注册表，多个加载器可共享同一组引用 URL。
    ///
    /// 注册表的配额以传入的配置为准。
    pub fn with_registry(config: LoaderConfig, registry: ReferenceUrlRegistry) -> Result<Self, LoadError> {
        config.validate()?;
        registry.set_limits(RegistryLimits::from(&config));
        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            registry,
        })
    }

    /// 获取配置快照，保证单次请求链路使用一致参数。
    pub fn config_snapshot(&self) -> LoaderConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// 替换配置，注册表配额同步更新。
    ///
    /// 配额与配置在同一把写锁内更新，读到新配置的请求必然也看到新配额。
    pub fn set_config(&self, config: LoaderConfig) -> Result<(), LoadError> {
        config.validate()?;
        let mut current = self.config.write().unwrap_or_else(PoisonError::into_inner);
        self.registry.set_limits(RegistryLimits::from(&config));
        *current = config;
        drop(current);

        log::info!("⚙️ 已更新图片加载配置");
        Ok(())
    }

    pub fn registry(&self) -> &ReferenceUrlRegistry {
        &self.registry
    }

    /// 处理主入口：按来源类别分发到对应加载函数。
    ///
    /// # 示例
    /// ```rust
    /// use image_loader::{Blob, ImageInput, ImageLoader, LoaderConfig};
    ///
    /// # async fn demo() -> Result<(), image_loader::LoadError> {
    /// let loader = ImageLoader::new(LoaderConfig::default())?;
    /// let loaded = loader.load_anything(ImageInput::Blob(Blob::new(vec![1u8, 2, 3]))).await?;
    /// assert!(loaded.src().starts_with("blob:"));
    /// loaded.release();
    /// # Ok(())
    /// # }
    /// ```
    pub async fn load_anything(&self, input: ImageInput) -> Result<LoadedImage, LoadError> {
        let start = Instant::now();
        let kind = input.kind();

        let result = match input {
            ImageInput::Text(src) => self.load_string(&src),
            ImageInput::Blob(blob) => self.load_blob(&blob),
            ImageInput::File(file) => self.load_file(&file).await,
        };

        match &result {
            Ok(_) => log::info!("✅ 图片来源加载完成 - kind={} elapsed={}ms", kind, start.elapsed().as_millis()),
            Err(e) => log::debug!("❌ 图片来源加载失败 - kind={} code={}: {}", kind, e.code(), e),
        }
        result
    }

    /// 动态负载入口：先识别类别，再交给 [`ImageLoader::load_anything`]。
    pub async fn load_value(&self, value: &Value) -> Result<LoadedImage, LoadError> {
        let input = self.classify(value)?;
        self.load_anything(input).await
    }

    pub(super) fn classify(&self, value: &Value) -> Result<ImageInput, LoadError> {
        ImageInput::classify(value, self.config_snapshot().max_reference_bytes)
    }
}

impl Default for ImageLoader {
    /// 默认配置必然通过校验，无需返回 `Result`。
    fn default() -> Self {
        let config = LoaderConfig::default();
        Self {
            registry: ReferenceUrlRegistry::with_limits(RegistryLimits::from(&config)),
            config: Arc::new(RwLock::new(config)),
        }
    }
}

impl std::fmt::Debug for ImageLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageLoader")
            .field("config", &self.config_snapshot())
            .field("registry", &self.registry)
            .finish()
    }
}

//! # 加载模块
//!
//! ## 设计思路
//!
//! 三种来源各自只有一条很短的转换路径，彼此独立：
//! - 字符串：非空校验后原样包装。
//! - 文件：异步读取全部内容，编码为 Data URL，附带原始文件名。
//! - Blob：同步登记到引用 URL 注册表，附带释放守卫。
//!
//! ## 实现思路
//!
//! - 文件先读 metadata 做体积校验，尽早失败；读取时再以 `take(limit + 1)` 限流，
//!   metadata 不可信（长度为 0 或读取期间增长）时同样拒绝。
//! - MIME 推断顺序：句柄声明 → 文件签名（`infer`）→ 配置中的兜底类型。
//! - 底层 I/O 错误原样透传为 `LoadError::Read`。

use tokio::io::AsyncReadExt;

use super::source::{Blob, FileHandle, ImageContent, LoadedImage};
use super::{ImageLoader, LoadError, LoaderConfig, data_url};

impl ImageLoader {
    /// 字符串来源：非空即原样返回。
    pub fn load_string(&self, src: &str) -> Result<LoadedImage, LoadError> {
        if src.is_empty() {
            return Err(LoadError::EmptyInput);
        }

        log::debug!("📝 字符串来源直接透传（{} 字节）", src.len());
        Ok(LoadedImage::new(ImageContent::FromString { src: src.to_string() }))
    }

    /// 文件来源：读取为 Data URL，`alt` 为文件名。
    pub async fn load_file(&self, file: &FileHandle) -> Result<LoadedImage, LoadError> {
        let config = self.config_snapshot();
        log::debug!("📁 开始读取图片文件 - 路径: {}", file.path().display());

        let metadata = tokio::fs::metadata(file.path()).await?;
        if metadata.len() > config.max_file_size {
            return Err(LoadError::FileTooLarge {
                name: file.name().to_string(),
                size: metadata.len(),
                limit: config.max_file_size,
            });
        }

        // procfs / 设备文件的 metadata 长度可能为 0，读取本身也必须受限
        let handle = tokio::fs::File::open(file.path()).await?;
        let mut bytes = Vec::with_capacity(metadata.len().min(config.max_file_size) as usize);
        handle
            .take(config.max_file_size.saturating_add(1))
            .read_to_end(&mut bytes)
            .await?;
        if bytes.len() as u64 > config.max_file_size {
            return Err(LoadError::FileTooLarge {
                name: file.name().to_string(),
                size: bytes.len() as u64,
                limit: config.max_file_size,
            });
        }

        let mime = Self::resolve_mime(file.mime(), &bytes, &config);
        let src = data_url::encode(&mime, &bytes);

        log::debug!("📁 文件读取完成 - {}（{} 字节，{}）", file.name(), bytes.len(), mime);
        Ok(LoadedImage::new(ImageContent::FromFile {
            src,
            alt: file.name().to_string(),
        }))
    }

    /// Blob 来源：创建引用 URL，并返回对应的释放守卫。
    pub fn load_blob(&self, blob: &Blob) -> Result<LoadedImage, LoadError> {
        let src = self.registry.create(blob)?;
        let release = self.registry.release_handle(src.clone());

        Ok(LoadedImage::with_release(ImageContent::FromBlob { src }, release))
    }

    fn resolve_mime(declared: Option<&str>, bytes: &[u8], config: &LoaderConfig) -> String {
        if let Some(mime) = declared.map(str::trim).filter(|m| !m.is_empty()) {
            return mime.to_string();
        }

        if config.sniff_mime {
            if let Some(kind) = infer::get(bytes) {
                return kind.mime_type().to_string();
            }
        }

        config.fallback_mime.clone()
    }
}

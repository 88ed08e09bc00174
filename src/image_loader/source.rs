//! # 数据源与结果模型
//!
//! ## 设计思路
//!
//! 将“外部输入类型”和“加载结果”解耦：
//! - `ImageInput` 表示调用方给出的来源（文本 / 文件 / blob），在调用点确定分支
//! - `ImageContent` 表示统一后的结果形状（`src`，文件来源额外带 `alt`）
//! - `LoadedImage` 把结果与可选的释放守卫绑在一起，只有 blob 来源才会带守卫
//!
//! 动态负载（例如 JSON 形式的 IPC 参数）通过 `ImageInput::classify` 识别，
//! 顺序固定为 string → blob → file，其他一律视为无法识别。

use std::path::{Path, PathBuf};

use bytes::Bytes;
use serde::Serialize;
use serde_json::Value;

use super::registry::ReleaseHandle;
use super::{LoadError, data_url};

/// 指向具名、可读二进制资源的文件句柄。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    path: PathBuf,
    name: String,
    mime: Option<String>,
}

impl FileHandle {
    /// 以路径的文件名作为显示名称。
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name, mime: None }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 声明 MIME 类型，优先于签名推断。
    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }
}

/// 无名称的内存二进制负载。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    bytes: Bytes,
    mime: Option<String>,
}

impl Blob {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self { bytes: bytes.into(), mime: None }
    }

    pub fn with_mime(mut self, mime: impl Into<String>) -> Self {
        self.mime = Some(mime.into());
        self
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime(&self) -> Option<&str> {
        self.mime.as_deref()
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// 图片输入来源。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    /// 原样透传的字符串。
    Text(String),
    /// 本地文件，加载为 Data URL。
    File(FileHandle),
    /// 内存 blob，加载为引用 URL。
    Blob(Blob),
}

impl ImageInput {
    /// 识别动态负载。
    ///
    /// - JSON 字符串 → `Text`
    /// - `{"blob": "<base64 | data url>", "type"?: "..."}` → `Blob`
    /// - `{"file": "<path>", "name"?: "...", "type"?: "..."}` → `File`
    /// - 其余 → `LoadError::Unrecognized`
    ///
    /// `max_blob_bytes` 限制内联 blob 解码后的体积。
    pub fn classify(value: &Value, max_blob_bytes: u64) -> Result<Self, LoadError> {
        if let Some(text) = value.as_str() {
            return Ok(Self::Text(text.to_string()));
        }

        if let Some(object) = value.as_object() {
            let declared_type = object.get("type").and_then(Value::as_str);

            if let Some(payload) = object.get("blob").and_then(Value::as_str) {
                let decoded = data_url::parse_with_limit(payload, max_blob_bytes)?;
                let blob = Blob::new(decoded.bytes);
                return Ok(Self::Blob(match declared_type.map(str::to_string).or(decoded.mime) {
                    Some(mime) => blob.with_mime(mime),
                    None => blob,
                }));
            }

            if let Some(path) = object.get("file").and_then(Value::as_str) {
                let mut handle = FileHandle::new(path);
                if let Some(name) = object.get("name").and_then(Value::as_str) {
                    handle = handle.with_name(name);
                }
                if let Some(mime) = declared_type {
                    handle = handle.with_mime(mime);
                }
                return Ok(Self::File(handle));
            }
        }

        Err(LoadError::Unrecognized(value.to_string()))
    }

    /// 来源类别，用于日志。
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "string",
            Self::File(_) => "file",
            Self::Blob(_) => "blob",
        }
    }
}

impl From<String> for ImageInput {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for ImageInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<FileHandle> for ImageInput {
    fn from(value: FileHandle) -> Self {
        Self::File(value)
    }
}

impl From<Blob> for ImageInput {
    fn from(value: Blob) -> Self {
        Self::Blob(value)
    }
}

/// 统一后的图片来源。序列化时只保留字段形状：`{src}` 或 `{src, alt}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ImageContent {
    FromString { src: String },
    FromFile { src: String, alt: String },
    FromBlob { src: String },
}

impl ImageContent {
    pub fn src(&self) -> &str {
        match self {
            Self::FromString { src } | Self::FromFile { src, .. } | Self::FromBlob { src } => src,
        }
    }

    /// 文件来源的原始文件名。
    pub fn alt(&self) -> Option<&str> {
        match self {
            Self::FromFile { alt, .. } => Some(alt),
            _ => None,
        }
    }
}

/// 加载结果：统一来源 + 仅 blob 来源才有的释放守卫。
#[derive(Debug)]
pub struct LoadedImage {
    content: ImageContent,
    release: Option<ReleaseHandle>,
}

impl LoadedImage {
    pub(crate) fn new(content: ImageContent) -> Self {
        Self { content, release: None }
    }

    pub(crate) fn with_release(content: ImageContent, release: ReleaseHandle) -> Self {
        Self { content, release: Some(release) }
    }

    pub fn content(&self) -> &ImageContent {
        &self.content
    }

    pub fn src(&self) -> &str {
        self.content.src()
    }

    pub fn has_release(&self) -> bool {
        self.release.is_some()
    }

    /// 拆分为结果与释放守卫。
    pub fn into_parts(self) -> (ImageContent, Option<ReleaseHandle>) {
        (self.content, self.release)
    }

    /// 释放关联的引用 URL（如有），返回内容本身。
    pub fn release(self) -> ImageContent {
        if let Some(handle) = self.release {
            handle.release();
        }
        self.content
    }
}

//! # 回调适配层
//!
//! 为习惯“加载完成后回调”的调用方提供与 `async` 接口等价的入口。
//! 回调类型为 `FnOnce`，因此每次调用恰好触发一次：
//!
//! - 字符串 / blob / 识别失败：在函数返回前同步触发，返回 `None`。
//! - 文件：在当前 tokio 运行时上派生任务，返回其 `JoinHandle`；
//!   调用方 `abort()` 后回调不会再触发。
//!   不在运行时上下文中时同步回调 `LoadError::RuntimeUnavailable`，返回 `None`。

use serde_json::Value;
use tokio::task::JoinHandle;

use super::source::{Blob, FileHandle, ImageInput, LoadedImage};
use super::{ImageLoader, LoadError};

impl ImageLoader {
    pub fn load_string_with<F>(&self, src: &str, callback: F)
    where
        F: FnOnce(Result<LoadedImage, LoadError>),
    {
        callback(self.load_string(src));
    }

    pub fn load_blob_with<F>(&self, blob: &Blob, callback: F)
    where
        F: FnOnce(Result<LoadedImage, LoadError>),
    {
        callback(self.load_blob(blob));
    }

    /// 读取任务派生到当前 tokio 运行时；没有运行时则立即以错误回调。
    pub fn load_file_with<F>(&self, file: FileHandle, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<LoadedImage, LoadError>) + Send + 'static,
    {
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(e) => {
                callback(Err(LoadError::RuntimeUnavailable(e.to_string())));
                return None;
            }
        };

        let loader = self.clone();
        Some(runtime.spawn(async move {
            let result = loader.load_file(&file).await;
            callback(result);
        }))
    }

    /// 文件来源返回 `Some(JoinHandle)`，其余来源（以及无运行时的文件来源）同步完成并返回 `None`。
    pub fn load_anything_with<F>(&self, input: ImageInput, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<LoadedImage, LoadError>) + Send + 'static,
    {
        match input {
            ImageInput::Text(src) => {
                self.load_string_with(&src, callback);
                None
            }
            ImageInput::Blob(blob) => {
                self.load_blob_with(&blob, callback);
                None
            }
            ImageInput::File(file) => self.load_file_with(file, callback),
        }
    }

    pub fn load_value_with<F>(&self, value: &Value, callback: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce(Result<LoadedImage, LoadError>) + Send + 'static,
    {
        match self.classify(value) {
            Ok(input) => self.load_anything_with(input, callback),
            Err(e) => {
                callback(Err(e));
                None
            }
        }
    }
}

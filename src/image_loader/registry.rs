//! # 引用 URL 注册表
//!
//! ## 设计思路
//!
//! 为内存中的 blob 分配短生命周期的 `blob:<origin>/<id>` 引用 URL，
//! 持有者可以像普通资源地址一样解引用，直到显式释放。
//!
//! - `ReferenceUrlRegistry`：可克隆的共享句柄，负责创建 / 解引用 / 撤销。
//! - `ReleaseHandle`：RAII 守卫，`release()` 消费自身，因此同一 URL 不会被重复释放；
//!   `Drop` 时若仍持有 URL 也会撤销。
//!
//! ## 实现思路
//!
//! - 条目表使用 `Mutex<HashMap<..>>`，`Bytes` 克隆只增加引用计数。
//! - 递增 id 使用 `AtomicU64`，无需加锁。
//! - 数量 / 总字节配额在创建时检查，超限返回 `LoadError::ResourceCreation`。
//! - 释放句柄只持有 `Weak`，注册表销毁后释放为空操作。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use super::{Blob, LoadError, LoaderConfig};

/// 注册表配额与命名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryLimits {
    pub origin: String,
    pub max_urls: usize,
    pub max_bytes: u64,
}

impl From<&LoaderConfig> for RegistryLimits {
    fn from(config: &LoaderConfig) -> Self {
        Self {
            origin: config.reference_origin.clone(),
            max_urls: config.max_reference_urls,
            max_bytes: config.max_reference_bytes,
        }
    }
}

struct RegistryState {
    entries: HashMap<String, Blob>,
    total_bytes: u64,
    limits: RegistryLimits,
}

struct RegistryInner {
    state: Mutex<RegistryState>,
    next_id: AtomicU64,
}

/// 进程内引用 URL 注册表。
#[derive(Clone)]
pub struct ReferenceUrlRegistry {
    inner: Arc<RegistryInner>,
}

impl ReferenceUrlRegistry {
    /// 使用默认配置中的配额创建注册表。
    pub fn new() -> Self {
        Self::with_limits(RegistryLimits::from(&LoaderConfig::default()))
    }

    pub fn with_limits(limits: RegistryLimits) -> Self {
        Self {
            inner: Arc::new(RegistryInner {
                state: Mutex::new(RegistryState {
                    entries: HashMap::new(),
                    total_bytes: 0,
                    limits,
                }),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// 替换配额，只影响之后创建的 URL。
    pub fn set_limits(&self, limits: RegistryLimits) {
        self.inner.lock_recovering().limits = limits;
    }

    /// 为 blob 创建引用 URL。
    pub fn create(&self, blob: &Blob) -> Result<String, LoadError> {
        let mut state = self
            .inner
            .state
            .lock()
            .map_err(|_| LoadError::ResourceCreation("reference registry lock poisoned".to_string()))?;

        if state.entries.len() >= state.limits.max_urls {
            log::warn!("⚠️ 引用 URL 数量已达上限：{}", state.limits.max_urls);
            return Err(LoadError::ResourceCreation(format!(
                "quota exceeded: {} live reference urls (limit {})",
                state.entries.len(),
                state.limits.max_urls
            )));
        }

        let size = blob.size();
        let projected = state.total_bytes.saturating_add(size);
        if projected > state.limits.max_bytes {
            log::warn!(
                "⚠️ 引用 URL 总字节超限：{} + {} > {}",
                state.total_bytes,
                size,
                state.limits.max_bytes
            );
            return Err(LoadError::ResourceCreation(format!(
                "quota exceeded: {} bytes would be registered (limit {} bytes)",
                projected, state.limits.max_bytes
            )));
        }

        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        let url = format!("blob:{}/{:016x}", state.limits.origin, id);
        state.entries.insert(url.clone(), blob.clone());
        state.total_bytes = projected;

        log::debug!("🔗 已创建引用 URL - {}（{} 字节）", url, size);
        Ok(url)
    }

    /// 解引用：URL 仍有效时返回对应 blob。
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.inner.lock_recovering().entries.get(url).cloned()
    }

    /// 撤销 URL，返回该 URL 此前是否有效。
    pub fn revoke(&self, url: &str) -> bool {
        self.inner.revoke(url)
    }

    pub fn len(&self) -> usize {
        self.inner.lock_recovering().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 当前登记的总字节数。
    pub fn total_bytes(&self) -> u64 {
        self.inner.lock_recovering().total_bytes
    }

    pub(crate) fn release_handle(&self, url: String) -> ReleaseHandle {
        ReleaseHandle {
            registry: Arc::downgrade(&self.inner),
            url: Some(url),
        }
    }
}

impl Default for ReferenceUrlRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReferenceUrlRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.lock_recovering();
        f.debug_struct("ReferenceUrlRegistry")
            .field("origin", &state.limits.origin)
            .field("live_urls", &state.entries.len())
            .field("total_bytes", &state.total_bytes)
            .finish()
    }
}

impl RegistryInner {
    fn lock_recovering(&self) -> MutexGuard<'_, RegistryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn revoke(&self, url: &str) -> bool {
        let mut state = self.lock_recovering();
        match state.entries.remove(url) {
            Some(blob) => {
                state.total_bytes = state.total_bytes.saturating_sub(blob.size());
                log::debug!("🧹 已释放引用 URL - {}", url);
                true
            }
            None => false,
        }
    }
}

/// 引用 URL 的释放守卫。
///
/// 调用 [`ReleaseHandle::release`] 或直接丢弃都会撤销 URL；
/// 需要自行管理生命周期时使用 [`ReleaseHandle::keep`]。
#[must_use = "dropping the handle revokes the reference url immediately"]
pub struct ReleaseHandle {
    registry: Weak<RegistryInner>,
    url: Option<String>,
}

impl ReleaseHandle {
    /// 守卫所管理的 URL。
    pub fn url(&self) -> &str {
        self.url.as_deref().unwrap_or_default()
    }

    /// 撤销 URL。返回 `false` 表示 URL 已被其他途径撤销或注册表已销毁。
    pub fn release(mut self) -> bool {
        self.revoke_now()
    }

    /// 解除守卫并交出 URL，之后须由调用方调用 `ReferenceUrlRegistry::revoke`，
    /// 否则条目会一直保留到注册表销毁。
    pub fn keep(mut self) -> String {
        self.url.take().unwrap_or_default()
    }

    fn revoke_now(&mut self) -> bool {
        let Some(url) = self.url.take() else {
            return false;
        };
        match self.registry.upgrade() {
            Some(inner) => inner.revoke(&url),
            None => false,
        }
    }
}

impl Drop for ReleaseHandle {
    fn drop(&mut self) {
        self.revoke_now();
    }
}

impl std::fmt::Debug for ReleaseHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReleaseHandle").field("url", &self.url).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_urls: usize, max_bytes: u64) -> RegistryLimits {
        RegistryLimits {
            origin: "test".to_string(),
            max_urls,
            max_bytes,
        }
    }

    #[test]
    fn created_url_resolves_until_revoked() {
        let registry = ReferenceUrlRegistry::new();
        let url = registry.create(&Blob::new(&b"abc"[..])).expect("create url failed");

        assert!(url.starts_with("blob:image-loader/"));
        let resolved = registry.resolve(&url).expect("url should resolve");
        assert_eq!(resolved.bytes().as_ref(), b"abc");
        assert_eq!(registry.total_bytes(), 3);

        assert!(registry.revoke(&url));
        assert!(registry.resolve(&url).is_none());
        assert!(!registry.revoke(&url));
        assert!(registry.is_empty());
        assert_eq!(registry.total_bytes(), 0);
    }

    #[test]
    fn urls_are_unique_per_creation() {
        let registry = ReferenceUrlRegistry::new();
        let blob = Blob::new(&b"same"[..]);

        let first = registry.create(&blob).expect("create first failed");
        let second = registry.create(&blob).expect("create second failed");

        assert_ne!(first, second);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn create_rejects_when_url_quota_exhausted() {
        let registry = ReferenceUrlRegistry::with_limits(limits(1, 1024));
        let _first = registry.create(&Blob::new(&b"a"[..])).expect("create first failed");

        let result = registry.create(&Blob::new(&b"b"[..]));

        assert!(matches!(result, Err(LoadError::ResourceCreation(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn create_rejects_when_byte_quota_exhausted() {
        let registry = ReferenceUrlRegistry::with_limits(limits(8, 4));

        let result = registry.create(&Blob::new(&b"hello"[..]));

        assert!(matches!(result, Err(LoadError::ResourceCreation(_))));
        assert!(registry.is_empty());
    }

    #[test]
    fn release_handle_revokes_once() {
        let registry = ReferenceUrlRegistry::new();
        let url = registry.create(&Blob::new(&b"x"[..])).expect("create url failed");
        let handle = registry.release_handle(url.clone());

        assert_eq!(handle.url(), url);
        assert!(handle.release());
        assert!(registry.resolve(&url).is_none());
    }

    #[test]
    fn dropping_handle_revokes_and_keep_disarms() {
        let registry = ReferenceUrlRegistry::new();

        let dropped = registry.create(&Blob::new(&b"x"[..])).expect("create url failed");
        drop(registry.release_handle(dropped.clone()));
        assert!(registry.resolve(&dropped).is_none());

        let kept = registry.create(&Blob::new(&b"y"[..])).expect("create url failed");
        let url = registry.release_handle(kept.clone()).keep();
        assert_eq!(url, kept);
        assert!(registry.resolve(&kept).is_some());
        assert!(registry.revoke(&kept));
    }

    #[test]
    fn handle_outliving_registry_is_noop() {
        let registry = ReferenceUrlRegistry::new();
        let url = registry.create(&Blob::new(&b"x"[..])).expect("create url failed");
        let handle = registry.release_handle(url);

        drop(registry);

        assert!(!handle.release());
    }
}

//! 产品集合的持久化
//!
//! 整个集合作为一个命名条目存储，读写都是全量的。

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

use crate::app::product::model::Product;
use crate::config::StorageConfig;
use crate::core::error::CoreError;

/// 产品集合仓储
pub trait ProductRepository: Send + Sync {
    /// 读取完整集合，条目不存在时返回空集合
    fn load(&self) -> Result<Vec<Product>, CoreError>;

    /// 用 `products` 覆盖整个集合
    fn save(&self, products: &[Product]) -> Result<(), CoreError>;
}

/// 内存仓储
#[derive(Debug, Default)]
pub struct MemoryRepository {
    products: Mutex<Vec<Product>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: Vec<Product>) -> Self {
        Self {
            products: Mutex::new(products),
        }
    }

    /// 当前保存的集合
    pub fn snapshot(&self) -> Vec<Product> {
        self.products
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ProductRepository for MemoryRepository {
    fn load(&self) -> Result<Vec<Product>, CoreError> {
        Ok(self.snapshot())
    }

    fn save(&self, products: &[Product]) -> Result<(), CoreError> {
        let mut guard = self
            .products
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *guard = products.to_vec();
        Ok(())
    }
}

/// JSON 文件仓储，集合保存在 `<data_dir>/<key>.json`
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(data_dir: impl AsRef<Path>, key: &str) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", key)),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.data_dir, &config.collection_key)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ProductRepository for JsonFileRepository {
    fn load(&self) -> Result<Vec<Product>, CoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("集合文件不存在，使用空集合: {}", self.path.display());
                return Ok(Vec::new());
            }
            Err(err) => return Err(err.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let products: Vec<Product> = serde_json::from_str(&content)?;
        debug!("已加载 {} 个产品: {}", products.len(), self.path.display());
        Ok(products)
    }

    fn save(&self, products: &[Product]) -> Result<(), CoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(products)?;

        // 先写临时文件再改名，避免写到一半的文件
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, content)?;
        fs::rename(&tmp_path, &self.path)?;

        debug!("已保存 {} 个产品: {}", products.len(), self.path.display());
        Ok(())
    }
}

/// 前 N 次保存失败的内存仓储
#[cfg(test)]
pub(crate) struct FlakyRepository {
    inner: MemoryRepository,
    failures_left: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl FlakyRepository {
    pub(crate) fn new(products: Vec<Product>, failures: usize) -> Self {
        Self {
            inner: MemoryRepository::with_products(products),
            failures_left: std::sync::atomic::AtomicUsize::new(failures),
        }
    }

    pub(crate) fn snapshot(&self) -> Vec<Product> {
        self.inner.snapshot()
    }
}

#[cfg(test)]
impl ProductRepository for FlakyRepository {
    fn load(&self) -> Result<Vec<Product>, CoreError> {
        self.inner.load()
    }

    fn save(&self, products: &[Product]) -> Result<(), CoreError> {
        use std::sync::atomic::Ordering;

        let failed = self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(CoreError::Storage("disk full".to_string()));
        }
        self.inner.save(products)
    }
}

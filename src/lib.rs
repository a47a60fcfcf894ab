//! # 本地产品目录
//!
//! 列出、搜索、创建、编辑和删除产品，整个集合保存在本地的单个 JSON 条目中。
//! - 目录页控制器：过滤列表、确认删除
//! - 表单页控制器：创建/编辑、校验、删除
//! - 仓储、时钟和页面调度都可以注入，测试不依赖真实时间和文件

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::catalog::service::CatalogController;
pub use app::form::service::{FormController, FormMode, SaveOutcome};
pub use app::product::model::{DeleteState, Product, ProductDraft};
pub use app::{router, AppState};
pub use config::{Config, ConfigError};
pub use crate::core::error::CoreError;
pub use infrastructure::storage::{JsonFileRepository, MemoryRepository, ProductRepository};

pub type Result<T> = std::result::Result<T, CoreError>;

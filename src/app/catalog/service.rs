//! 产品目录页

use std::sync::Arc;
use tracing::{debug, info};

use crate::app::product::model::{filter_products, DeleteState, Product};
use crate::config::UiConfig;
use crate::core::error::CoreError;
use crate::core::notification::Notifier;
use crate::infrastructure::storage::ProductRepository;

pub const DELETED_MESSAGE: &str = "Product deleted successfully";

/// 目录页控制器，每个页面视图持有一份集合副本
pub struct CatalogController {
    repository: Arc<dyn ProductRepository>,
    products: Vec<Product>,
    current_filter: String,
    delete_state: DeleteState,
    notifier: Notifier,
}

impl CatalogController {
    pub fn load(repository: Arc<dyn ProductRepository>, ui: &UiConfig) -> Result<Self, CoreError> {
        let products = repository.load()?;
        debug!("目录页加载 {} 个产品", products.len());

        Ok(Self {
            repository,
            products,
            current_filter: String::new(),
            delete_state: DeleteState::Idle,
            notifier: Notifier::new(ui.toast_lifetime(), ui.navigate_delay()),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// 名称包含 `filter` 的产品，保持集合顺序
    pub fn list(&self, filter: Option<&str>) -> Vec<&Product> {
        filter_products(&self.products, filter)
    }

    /// 当前搜索条件下可见的产品
    pub fn visible(&self) -> Vec<&Product> {
        self.list(Some(self.current_filter.as_str()))
    }

    pub fn search(&mut self, text: &str) {
        self.current_filter = text.trim().to_string();
    }

    pub fn clear_search(&mut self) {
        self.current_filter.clear();
    }

    pub fn current_filter(&self) -> &str {
        &self.current_filter
    }

    /// 标记待删除的产品，不检查 id 是否存在
    pub fn request_delete(&mut self, id: impl Into<String>) {
        self.delete_state = DeleteState::PendingConfirmation(id.into());
    }

    pub fn cancel_delete(&mut self) {
        self.delete_state = DeleteState::Idle;
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete_state
    }

    pub fn pending_delete(&self) -> Option<&str> {
        self.delete_state.pending_id()
    }

    /// 删除待确认的产品并保存；没有待确认的删除时返回 `Ok(false)`
    ///
    /// 保存失败时集合和待确认状态都保持不变，可以再次确认。
    pub fn confirm_delete(&mut self) -> Result<bool, CoreError> {
        let id = match &self.delete_state {
            DeleteState::Idle => return Ok(false),
            DeleteState::PendingConfirmation(id) => id.clone(),
        };

        let remaining: Vec<Product> = self
            .products
            .iter()
            .filter(|product| product.id != id)
            .cloned()
            .collect();
        self.repository.save(&remaining)?;

        self.products = remaining;
        self.delete_state = DeleteState::Idle;

        info!("产品已删除: {}", id);
        self.announce_deleted();
        Ok(true)
    }

    /// 显示删除成功的提示
    pub fn announce_deleted(&mut self) {
        self.notifier.success(DELETED_MESSAGE);
    }

    /// 空列表时的提示 (标题, 说明)
    pub fn empty_state(&self) -> (&'static str, &'static str) {
        let hint = if self.current_filter.is_empty() {
            "Create your first product to get started"
        } else {
            "Try adjusting your search criteria"
        };
        ("No products found", hint)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::{FlakyRepository, MemoryRepository};
    use serde_json::Map;
    use std::time::Duration;

    fn product(id: &str, name: &str) -> Product {
        Product {
            id: id.to_string(),
            name: name.to_string(),
            description: format!("About {}", name),
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            updated_at: None,
            extra: Map::new(),
        }
    }

    fn controller(products: Vec<Product>) -> (Arc<MemoryRepository>, CatalogController) {
        let repository = Arc::new(MemoryRepository::with_products(products));
        let controller = CatalogController::load(repository.clone(), &UiConfig::default()).unwrap();
        (repository, controller)
    }

    #[test]
    fn test_search_trims_and_filters() {
        let (_, mut controller) = controller(vec![product("x", "Foo"), product("y", "Bar")]);

        controller.search("  foo ");
        assert_eq!(controller.current_filter(), "foo");
        assert_eq!(controller.visible().len(), 1);
        assert_eq!(controller.empty_state().1, "Try adjusting your search criteria");

        controller.clear_search();
        assert_eq!(controller.visible().len(), 2);
        assert_eq!(controller.empty_state().1, "Create your first product to get started");
    }

    #[test]
    fn test_request_then_cancel_leaves_collection_unchanged() {
        let (repository, mut controller) = controller(vec![product("x", "Foo")]);

        controller.request_delete("x");
        assert_eq!(controller.pending_delete(), Some("x"));

        controller.cancel_delete();
        assert_eq!(controller.delete_state(), &DeleteState::Idle);
        controller.cancel_delete();
        assert_eq!(controller.delete_state(), &DeleteState::Idle);

        assert_eq!(controller.products().len(), 1);
        assert_eq!(repository.snapshot().len(), 1);
    }

    #[test]
    fn test_request_replaces_pending_id() {
        let (_, mut controller) = controller(vec![product("x", "Foo"), product("y", "Bar")]);

        controller.request_delete("x");
        controller.request_delete("y");
        assert_eq!(controller.pending_delete(), Some("y"));

        assert!(controller.confirm_delete().unwrap());
        let ids: Vec<&str> = controller.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["x"]);
    }

    #[test]
    fn test_confirm_removes_only_target_and_keeps_order() {
        let (repository, mut controller) = controller(vec![
            product("a", "Anvil"),
            product("x", "Foo"),
            product("c", "Cog"),
        ]);

        controller.request_delete("x");
        assert!(controller.confirm_delete().unwrap());
        assert_eq!(controller.pending_delete(), None);

        let saved: Vec<String> = repository.snapshot().into_iter().map(|p| p.id).collect();
        assert_eq!(saved, vec!["a", "c"]);
        assert_eq!(
            controller.notifier().toasts()[0].message,
            "Product deleted successfully"
        );

        controller.notifier_mut().advance(Duration::from_millis(3000));
        assert!(controller.notifier().toasts().is_empty());
    }

    #[test]
    fn test_confirm_without_pending_is_noop() {
        let (repository, mut controller) = controller(vec![product("x", "Foo")]);

        assert!(!controller.confirm_delete().unwrap());
        assert_eq!(repository.snapshot().len(), 1);
        assert!(controller.notifier().toasts().is_empty());
    }

    #[test]
    fn test_failed_save_keeps_product_and_pending_delete() {
        let repository = Arc::new(FlakyRepository::new(
            vec![product("a", "Anvil"), product("x", "Foo")],
            1,
        ));
        let mut controller =
            CatalogController::load(repository.clone(), &UiConfig::default()).unwrap();

        controller.request_delete("x");
        assert!(matches!(
            controller.confirm_delete(),
            Err(CoreError::Storage(_))
        ));
        assert_eq!(controller.products().len(), 2);
        assert_eq!(controller.pending_delete(), Some("x"));
        assert_eq!(repository.snapshot().len(), 2);
        assert!(controller.notifier().toasts().is_empty());

        assert!(controller.confirm_delete().unwrap());
        assert_eq!(controller.pending_delete(), None);
        assert_eq!(repository.snapshot(), vec![product("a", "Anvil")]);
        assert_eq!(controller.products(), repository.snapshot().as_slice());
    }

    #[test]
    fn test_confirm_unknown_id_succeeds_silently() {
        let (repository, mut controller) = controller(vec![product("x", "Foo")]);

        controller.request_delete("missing");
        assert!(controller.confirm_delete().unwrap());
        assert_eq!(repository.snapshot(), vec![product("x", "Foo")]);
    }
}

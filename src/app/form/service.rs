//! 产品创建/编辑页

use std::sync::Arc;
use tracing::{info, warn};

use crate::app::catalog::service::DELETED_MESSAGE;
use crate::app::product::model::{generate_unique_id, DeleteState, Product, ProductDraft};
use crate::config::UiConfig;
use crate::core::clock::Clock;
use crate::core::error::CoreError;
use crate::core::notification::Notifier;
use crate::infrastructure::storage::ProductRepository;

/// 保存/删除成功后返回的页面
pub const CATALOG_HREF: &str = "/";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: String },
}

/// 保存结果
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    Created(Product),
    Updated(Product),
}

impl SaveOutcome {
    pub fn product(&self) -> &Product {
        match self {
            SaveOutcome::Created(product) | SaveOutcome::Updated(product) => product,
        }
    }
}

pub struct FormController {
    repository: Arc<dyn ProductRepository>,
    clock: Arc<dyn Clock>,
    products: Vec<Product>,
    mode: FormMode,
    name: String,
    description: String,
    delete_state: DeleteState,
    notifier: Notifier,
}

impl FormController {
    /// 根据 id 进入编辑模式；id 为空或找不到对应产品时进入创建模式
    pub fn initialize(
        repository: Arc<dyn ProductRepository>,
        clock: Arc<dyn Clock>,
        ui: &UiConfig,
        id: Option<&str>,
    ) -> Result<Self, CoreError> {
        let products = repository.load()?;

        let found = id
            .filter(|id| !id.is_empty())
            .and_then(|id| products.iter().find(|product| product.id == id));

        let (mode, name, description) = match found {
            Some(product) => (
                FormMode::Edit {
                    id: product.id.clone(),
                },
                product.name.clone(),
                product.description.clone(),
            ),
            None => {
                if let Some(id) = id.filter(|id| !id.is_empty()) {
                    warn!("产品 {} 不存在，进入创建模式", id);
                }
                (FormMode::Create, String::new(), String::new())
            }
        };

        Ok(Self {
            repository,
            clock,
            products,
            mode,
            name,
            description,
            delete_state: DeleteState::Idle,
            notifier: Notifier::new(ui.toast_lifetime(), ui.navigate_delay()),
        })
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn is_edit(&self) -> bool {
        matches!(self.mode, FormMode::Edit { .. })
    }

    pub fn editing_id(&self) -> Option<&str> {
        match &self.mode {
            FormMode::Edit { id } => Some(id),
            FormMode::Create => None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// 校验并保存表单
    ///
    /// 校验失败时不修改集合，表单保留提交的内容。
    pub fn save(&mut self, name: &str, description: &str) -> Result<SaveOutcome, CoreError> {
        self.name = name.to_string();
        self.description = description.to_string();

        let draft = match ProductDraft::new(name, description).validated() {
            Ok(draft) => draft,
            Err(err) => {
                warn!("产品表单校验失败: {}", err);
                self.notifier.error(err.to_string());
                return Err(err);
            }
        };

        // 在副本上修改，保存成功后才替换当前集合
        let mut products = self.products.clone();
        let outcome = match &self.mode {
            FormMode::Edit { id } => {
                let timestamp = self.clock.timestamp();
                match products.iter_mut().find(|product| &product.id == id) {
                    Some(product) => {
                        product.name = draft.name;
                        product.description = draft.description;
                        product.updated_at = Some(timestamp);
                        SaveOutcome::Updated(product.clone())
                    }
                    None => return Err(CoreError::NotFound(id.clone())),
                }
            }
            FormMode::Create => {
                let now = self.clock.now();
                let product = Product {
                    id: generate_unique_id(now, &products),
                    name: draft.name,
                    description: draft.description,
                    created_at: crate::core::clock::format_timestamp(now),
                    updated_at: None,
                    extra: Default::default(),
                };
                products.push(product.clone());
                SaveOutcome::Created(product)
            }
        };

        self.repository.save(&products)?;
        self.products = products;

        let message = match &outcome {
            SaveOutcome::Created(product) => {
                info!("产品已创建: {} ({})", product.id, product.name);
                "Product created successfully"
            }
            SaveOutcome::Updated(product) => {
                info!("产品已更新: {} ({})", product.id, product.name);
                "Product updated successfully"
            }
        };
        self.name = outcome.product().name.clone();
        self.description = outcome.product().description.clone();
        self.notifier.success(message);
        self.notifier.navigate_later(CATALOG_HREF);

        Ok(outcome)
    }

    /// 打开删除确认；创建模式下返回 false
    pub fn request_delete(&mut self) -> bool {
        match &self.mode {
            FormMode::Edit { id } => {
                self.delete_state = DeleteState::PendingConfirmation(id.clone());
                true
            }
            FormMode::Create => false,
        }
    }

    pub fn cancel_delete(&mut self) {
        self.delete_state = DeleteState::Idle;
    }

    pub fn delete_state(&self) -> &DeleteState {
        &self.delete_state
    }

    /// 确认删除；没有待确认的删除时返回 `Ok(false)`
    ///
    /// 保存失败时待确认状态保持不变。
    pub fn confirm_delete(&mut self) -> Result<bool, CoreError> {
        match self.delete_state {
            DeleteState::Idle => Ok(false),
            DeleteState::PendingConfirmation(_) => self.delete(),
        }
    }

    /// 删除正在编辑的产品；创建模式下不做任何修改并返回 `Ok(false)`
    pub fn delete(&mut self) -> Result<bool, CoreError> {
        let id = match &self.mode {
            FormMode::Edit { id } => id.clone(),
            FormMode::Create => return Ok(false),
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
        self.notifier.success(DELETED_MESSAGE);
        self.notifier.navigate_later(CATALOG_HREF);
        Ok(true)
    }

    pub fn notifier(&self) -> &Notifier {
        &self.notifier
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }
}

use product_catalog::app::{router, AppState};
use product_catalog::config::load_config;
use product_catalog::core::clock::SystemClock;
use product_catalog::infrastructure::{logger::Logger, storage::JsonFileRepository};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;

    // guard 需要一直持有到进程退出
    let _log_guard = Logger::init(&config.logging)?;

    info!("启动产品目录服务...");

    let repository = JsonFileRepository::from_config(&config.storage);
    info!("产品集合: {}", repository.path().display());

    let state = AppState::new(Arc::new(repository), Arc::new(SystemClock), config.ui);
    let app = router(state, config.http.timeout());

    let address = config.http.address();
    let listener = TcpListener::bind(&address).await?;

    info!("🚀 产品目录运行在 http://{}", address);
    info!("   GET  /              - 产品列表 (?q= 搜索)");
    info!("   GET  /create        - 创建产品 (?id= 编辑)");
    info!("   GET  /api/products  - 产品列表 JSON");
    info!("   GET  /health        - 健康检查");

    axum::serve(listener, app).await?;

    Ok(())
}

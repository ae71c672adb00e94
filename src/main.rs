// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use auditrs::application::use_cases::scan_use_case::ScanOrchestrator;
use auditrs::config::settings::Settings;
use auditrs::infrastructure::repositories::memory_scan_repo::MemoryScanRepository;
use auditrs::presentation::routes;
use auditrs::scanner::http_runner::HttpAuditRunner;
use auditrs::utils::telemetry;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting auditrs...");

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Initialize components
    let audit_timeout = Duration::from_secs(settings.scanner.timeout_secs);
    let repo = Arc::new(MemoryScanRepository::new());
    let runner = Arc::new(HttpAuditRunner::new(
        settings.scanner.endpoint.clone(),
        audit_timeout,
    )?);
    let orchestrator = Arc::new(ScanOrchestrator::new(repo, runner, audit_timeout));
    info!("Scan orchestrator initialized");

    // 4. Start HTTP server
    let app = routes::app(orchestrator);
    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

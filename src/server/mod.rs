//! 本地模拟后端（HTTP 层）
//!
//! 提供 `POST /api/simulate`、`POST /api/compare`、`GET /api/health`。
//! 服务端总是直接调用模型，不会再回调自身

pub mod routes;

use actix_cors::Cors;
use actix_web::{dev::Server, error::InternalError, web, App, HttpResponse, HttpServer};
use serde_json::json;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;

/// 服务端共享状态
pub struct ServerState {
    pub config: Arc<Config>,
}

/// 请求体解析配置：上限 32MB（两张 base64 图片），解析失败同样返回 `{"detail": ...}`
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(32 * 1024 * 1024)
        .error_handler(|err, _req| {
            let detail = err.to_string();
            InternalError::from_response(err, HttpResponse::BadRequest().json(json!({ "detail": detail })))
                .into()
        })
}

/// 注册所有路由（测试与正式服务共用）
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).service(
        web::scope("/api")
            .service(routes::simulate)
            .service(routes::compare)
            .service(routes::health),
    );
}

/// 启动 HTTP 服务
pub fn start_server(config: Config) -> std::io::Result<Server> {
    let host = config.server_host.clone();
    let port = config.server_port;
    let state = web::Data::new(ServerState {
        config: Arc::new(config),
    });

    let server = HttpServer::new(move || {
        // 允许任意来源的前端访问
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .configure(configure)
    })
    .bind((host.as_str(), port))?
    .run();

    info!("🌐 本地后端已启动: http://{}:{}/api/simulate", host, port);
    Ok(server)
}

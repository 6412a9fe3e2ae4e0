use actix_web::{get, post, web, HttpResponse, Responder};
use serde_json::json;
use tracing::{error, info};

use super::ServerState;
use crate::clients::{CompareRequest, SimulationRequest};
use crate::config::Config;
use crate::error::{AppError, AppResult, InputError};
use crate::models::{CreativeComparisonReport, CreativeImage, FocusGroupReport};
use crate::services::LlmService;
use crate::workflow::validate_focus_group_input;

/// 错误统一映射为 `{"detail": "..."}`
fn error_response(e: &AppError) -> HttpResponse {
    let body = json!({ "detail": e.to_string() });
    if e.is_client_error() {
        HttpResponse::BadRequest().json(body)
    } else {
        HttpResponse::InternalServerError().json(body)
    }
}

async fn run_simulation(config: &Config, req: &SimulationRequest) -> AppResult<FocusGroupReport> {
    validate_focus_group_input(&req.campaign_pitch, &req.personas)?;
    let service = LlmService::new(config)?;
    service.run_focus_group(&req.campaign_pitch, &req.personas).await
}

async fn run_compare(config: &Config, req: &CompareRequest) -> AppResult<CreativeComparisonReport> {
    let creative_a = CreativeImage::from_data_url("Creative A", &req.image_a)?;
    let creative_b = CreativeImage::from_data_url("Creative B", &req.image_b)?;
    if req.personas.is_empty() {
        return Err(InputError::NoPersonas.into());
    }
    let service = LlmService::new(config)?;
    service
        .compare_creatives(&creative_a, &creative_b, &req.personas)
        .await
}

#[post("/simulate")]
async fn simulate(data: web::Data<ServerState>, req: web::Json<SimulationRequest>) -> impl Responder {
    let req = req.into_inner();
    info!("📨 收到模拟请求，人设: {} 位", req.personas.len());

    match run_simulation(&data.config, &req).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!("模拟失败: {}", e);
            error_response(&e)
        }
    }
}

#[post("/compare")]
async fn compare(data: web::Data<ServerState>, req: web::Json<CompareRequest>) -> impl Responder {
    let req = req.into_inner();
    info!("📨 收到创意对比请求，人设: {} 位", req.personas.len());

    match run_compare(&data.config, &req).await {
        Ok(report) => HttpResponse::Ok().json(report),
        Err(e) => {
            error!("创意对比失败: {}", e);
            error_response(&e)
        }
    }
}

#[get("/health")]
async fn health(data: web::Data<ServerState>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "provider": data.config.llm_provider.name(),
        "model": data.config.llm_model_name,
    }))
}

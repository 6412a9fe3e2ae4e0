use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use synthetic_focus_group::config::{Config, LlmProvider};
use synthetic_focus_group::models::{default_personas, CreativeImage, Verdict, DEFAULT_PITCH};
use synthetic_focus_group::server::{self, ServerState};
use synthetic_focus_group::{AppError, ReportSource, SimulationFlow};

fn focus_group_report() -> Value {
    json!({
        "executiveSummary": "Cash back lands well with families; the fee worries students.",
        "sentimentEvolution": "Early excitement cooled once the annual fee came up.",
        "verdicts": { "apply": 1, "fence": 1, "reject": 1 },
        "featureSentiments": [
            { "feature": "3% groceries", "positive": 2, "negative": 0, "neutral": 1 }
        ],
        "personas": [
            {
                "name": "Maria", "occupation": "Nurse", "location": "Fresno", "income": "$72k",
                "verdict": "Apply", "reason": "Groceries are her biggest spend.",
                "quote": "That 3% adds up fast."
            },
            {
                "name": "David", "occupation": "Engineer", "location": "San Jose", "income": "$185k",
                "verdict": "On the Fence", "reason": "Already has a travel card.",
                "quote": "Show me the lounge access."
            },
            {
                "name": "Chloe", "occupation": "Student", "location": "Berkeley", "income": "$18k",
                "verdict": "Hard No", "reason": "Cannot justify an annual fee.",
                "quote": "Not on a student budget."
            }
        ],
        "missedOpportunities": ["Student tier with no annual fee"]
    })
}

fn creative_report() -> Value {
    json!({
        "overallWinner": "Creative A",
        "summary": "The bolder layout read faster.",
        "creativeAAnalysis": { "appealScore": 7.5, "strengths": ["Clear offer"], "weaknesses": ["Busy footer"] },
        "creativeBAnalysis": { "appealScore": 5, "strengths": ["Calm palette"], "weaknesses": ["Offer is buried"] },
        "personaPreferences": [
            {
                "personaName": "Maria", "preferredCreative": "Creative A", "wouldApply": true,
                "reasoning": "Saw the 3% right away.", "quote": "That one speaks to me."
            }
        ],
        "recommendations": ["Lead with the grocery rate"]
    })
}

/// 模拟 Gemini generateContent 接口
struct MockModel {
    reply: String,
    calls: AtomicUsize,
}

async fn generate_content(req: HttpRequest, body: web::Json<Value>, state: web::Data<MockModel>) -> HttpResponse {
    state.calls.fetch_add(1, Ordering::SeqCst);

    if req.headers().get("x-goog-api-key").is_none() {
        return HttpResponse::Forbidden().json(json!({ "error": "missing key" }));
    }
    if body["generationConfig"]["responseMimeType"] != "application/json" {
        return HttpResponse::BadRequest().finish();
    }

    HttpResponse::Ok().json(json!({
        "candidates": [{ "content": { "parts": [{ "text": state.reply }] } }]
    }))
}

/// 启动 mock 模型服务，返回 (base_url, 共享状态)
fn spawn_mock_model(reply: String) -> (String, web::Data<MockModel>) {
    let state = web::Data::new(MockModel {
        reply,
        calls: AtomicUsize::new(0),
    });
    let data = state.clone();

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/v1beta/models/{model}", web::post().to(generate_content))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("绑定 mock 模型端口失败");

    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());
    (format!("http://127.0.0.1:{}", port), state)
}

/// 启动本地后端（真实路由），模型指向 mock
fn spawn_backend(config: Config) -> String {
    let state = web::Data::new(ServerState {
        config: Arc::new(config),
    });

    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(server::configure)
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("绑定后端端口失败");

    let port = server.addrs()[0].port();
    actix_web::rt::spawn(server.run());
    format!("http://127.0.0.1:{}", port)
}

fn model_config(model_url: &str) -> Config {
    Config {
        llm_provider: LlmProvider::Gemini,
        llm_api_key: "test-key".to_string(),
        llm_api_base_url: model_url.to_string(),
        backend_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 5,
        ..Config::default()
    }
}

#[actix_web::test]
async fn test_falls_back_to_model_when_backend_is_down() {
    let (model_url, mock) = spawn_mock_model(format!("```json\n{}\n```", focus_group_report()));
    let config = model_config(&model_url);

    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas())
        .await
        .expect("回退调用失败");

    assert_eq!(outcome.source, ReportSource::DirectModel);
    assert_eq!(outcome.report.verdicts.total(), 3);
    assert_eq!(outcome.report.personas[2].verdict, Verdict::HardNo);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_backend_serves_report() {
    let (model_url, mock) = spawn_mock_model(focus_group_report().to_string());
    let backend_url = spawn_backend(model_config(&model_url));

    let config = Config {
        backend_url,
        // 后端成功时客户端不需要自己的 key
        llm_api_key: String::new(),
        ..model_config(&model_url)
    };
    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas()[..3])
        .await
        .expect("后端调用失败");

    assert_eq!(outcome.source, ReportSource::Backend);
    assert_eq!(outcome.report.missed_opportunities, vec!["Student tier with no annual fee"]);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

#[actix_web::test]
async fn test_backend_report_keeps_mismatched_verdicts() {
    let mut report = focus_group_report();
    report["verdicts"]["apply"] = json!(3);
    let (model_url, _mock) = spawn_mock_model(report.to_string());
    let backend_url = spawn_backend(model_config(&model_url));

    let config = Config {
        backend_url,
        ..model_config(&model_url)
    };
    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas())
        .await
        .expect("后端调用失败");

    assert_eq!(outcome.source, ReportSource::Backend);
    let (claimed, tallied) = outcome.report.verdict_mismatch().expect("应检测到不一致");
    assert_eq!(claimed.apply, 3);
    assert_eq!(tallied.apply, 1);
}

#[actix_web::test]
async fn test_backend_compares_creatives() {
    let (model_url, _mock) = spawn_mock_model(creative_report().to_string());
    let backend_url = spawn_backend(model_config(&model_url));

    let config = Config {
        backend_url,
        ..model_config(&model_url)
    };
    let image_a = CreativeImage::new("Creative A", "image/png", b"\x89PNG-a");
    let image_b = CreativeImage::new("Creative B", "image/png", b"\x89PNG-b");

    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .compare_creatives(Some(&image_a), Some(&image_b), &default_personas())
        .await
        .expect("创意对比失败");

    assert_eq!(outcome.source, ReportSource::Backend);
    assert_eq!(outcome.report.overall_winner, "Creative A");
    assert_eq!(outcome.report.would_apply_count(), 1);
}

#[actix_web::test]
async fn test_schema_violation_surfaces_after_fallback() {
    let mut broken = focus_group_report();
    broken.as_object_mut().unwrap().remove("verdicts");
    let (model_url, _mock) = spawn_mock_model(broken.to_string());

    let flow = SimulationFlow::new(&model_config(&model_url)).expect("创建流程失败");
    let err = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas())
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Llm(_)));
    assert!(err.to_string().contains("$.verdicts: missing required field"));
}

#[actix_web::test]
async fn test_skip_backend_when_disabled() {
    let (model_url, mock) = spawn_mock_model(focus_group_report().to_string());
    let config = Config {
        use_local_backend: false,
        ..model_config(&model_url)
    };

    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas())
        .await
        .expect("直接调用失败");

    assert_eq!(outcome.source, ReportSource::DirectModel);
    assert_eq!(mock.calls.load(Ordering::SeqCst), 1);
}

/// 真实 Gemini 调用
///
/// 运行方式：
/// ```bash
/// GEMINI_API_KEY=... cargo test --test integration_test -- --ignored --nocapture
/// ```
#[actix_web::test]
#[ignore]
async fn test_live_simulation() {
    synthetic_focus_group::utils::logging::init(true);

    let config = Config {
        use_local_backend: false,
        ..Config::from_env()
    };
    let flow = SimulationFlow::new(&config).expect("创建流程失败");
    let outcome = flow
        .run_focus_group(DEFAULT_PITCH, &default_personas())
        .await
        .expect("模型调用失败");

    println!("{}", outcome.report.executive_summary);
    assert!(!outcome.report.personas.is_empty());
}

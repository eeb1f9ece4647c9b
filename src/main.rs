// src/main.rs

use std::sync::Arc;

use dotenvy::dotenv;
use exam_proctor::capabilities::{AnswerJudge, FaceDetector, HttpFaceDetector, HttpJudge};
use exam_proctor::config::Config;
use exam_proctor::routes;
use exam_proctor::state::AppState;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    // External capabilities. Either one may be absent: open-answer judging
    // and face sampling degrade individually, the exam still runs.
    let judge: Option<Arc<dyn AnswerJudge>> = match &config.judge_url {
        Some(url) => {
            tracing::info!("open-answer judge at {}", url);
            Some(Arc::new(HttpJudge::new(url.clone())))
        }
        None => {
            tracing::warn!("JUDGE_URL not set, open-answer scoring disabled");
            None
        }
    };
    let detector: Option<Arc<dyn FaceDetector>> = match &config.detect_url {
        Some(url) => {
            tracing::info!("face detection at {}", url);
            Some(Arc::new(HttpFaceDetector::new(url.clone())))
        }
        None => {
            tracing::warn!("DETECT_URL not set, face-presence sampling disabled");
            None
        }
    };

    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config, judge, detector);

    // Create the Axum application router
    let app = routes::create_router(state);

    tracing::info!("Listening on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .expect("failed to bind listen address");

    // Start the server
    axum::serve(listener, app).await.expect("server error");
}

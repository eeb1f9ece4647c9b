// src/config.rs

use std::env;

use dotenvy::dotenv;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub rust_log: String,

    /// Open-answer scoring service. Unset disables open-answer judging.
    pub judge_url: Option<String>,
    /// Face-detection service. Unset disables the face-presence sampler.
    pub detect_url: Option<String>,

    /// Default per-question time budget in seconds.
    pub default_time_limit: u32,
    /// Default minimum total score to pass.
    pub default_passing_score: u32,
    /// Auto-advance countdown length in ticks.
    pub auto_advance_ticks: u32,
    /// Consecutive missed face samples before a violation fires.
    pub face_miss_threshold: u32,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let judge_url = env::var("JUDGE_URL").ok();
        let detect_url = env::var("DETECT_URL").ok();

        Self {
            bind_addr,
            rust_log,
            judge_url,
            detect_url,
            default_time_limit: env_u32("QUESTION_TIME_LIMIT", 30),
            default_passing_score: env_u32("PASSING_SCORE", 300),
            auto_advance_ticks: env_u32("AUTO_ADVANCE_TICKS", 2),
            face_miss_threshold: env_u32("FACE_MISS_THRESHOLD", 5),
        }
    }
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

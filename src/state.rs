// src/state.rs

use std::{collections::HashMap, sync::Arc};

use axum::extract::FromRef;
use tokio::sync::RwLock;

use crate::{
    capabilities::{AnswerJudge, FaceDetector},
    config::Config,
    engine::SessionHandle,
};

/// Registry of live session tasks, keyed by session id. Removing an entry
/// drops the command sender, which ends the session task and its timers.
pub type SessionRegistry = Arc<RwLock<HashMap<String, SessionHandle>>>;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub sessions: SessionRegistry,
    pub judge: Option<Arc<dyn AnswerJudge>>,
    pub detector: Option<Arc<dyn FaceDetector>>,
}

impl AppState {
    pub fn new(
        config: Config,
        judge: Option<Arc<dyn AnswerJudge>>,
        detector: Option<Arc<dyn FaceDetector>>,
    ) -> Self {
        AppState {
            config,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            judge,
            detector,
        }
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

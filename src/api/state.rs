use std::sync::Arc;

use crate::analysis::TwAnalysis;

#[derive(Clone)]
pub struct AppState {
    pub analysis: Arc<TwAnalysis>,
}

impl AppState {
    pub fn new(analysis: TwAnalysis) -> Self {
        Self {
            analysis: Arc::new(analysis),
        }
    }
}

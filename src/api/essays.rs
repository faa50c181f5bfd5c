use super::client::ApiClient;
use crate::error::DeskError;
use crate::models::{AnalyzeEssayRequest, EssayAnalysis};

impl ApiClient {
    /// Analyze draft text. The essay id travels in the body so the backend
    /// tags the result with it.
    pub fn analyze_essay_text(&self, request: &AnalyzeEssayRequest) -> Result<EssayAnalysis, DeskError> {
        if request.essay_text.trim().is_empty() {
            return Err(DeskError::validation("Cannot analyze an empty essay"));
        }
        self.request_found("POST", "essays/analyze-text", Some(request), self.analyze_timeout, "Essay analysis", || {
            DeskError::backend("Backend has no essay analysis endpoint")
        })
    }
}

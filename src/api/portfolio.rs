use super::client::ApiClient;
use crate::error::DeskError;
use crate::models::{PortfolioAnalysis, PortfolioAnalyzeRequest};

impl ApiClient {
    pub fn analyze_portfolio(&self, request: &PortfolioAnalyzeRequest) -> Result<PortfolioAnalysis, DeskError> {
        self.request_found(
            "POST",
            "portfolio/analyze",
            Some(request),
            self.analyze_timeout,
            "Portfolio analysis",
            || DeskError::backend("Backend has no portfolio analysis endpoint"),
        )
    }
}

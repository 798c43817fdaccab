//! Health analysis verdict shapes.

use crate::model::cart::AiDecision;
use crate::model::product::ProductId;
use serde::{Deserialize, Serialize};

/// Suggested substitute for the analyzed product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternative {
    pub id: ProductId,
    pub name: String,
}

/// Outcome of analyzing one product against a shopper profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub decision: AiDecision,
    pub reason_summary: String,
    /// Ordered by recommendation strength; may be empty.
    pub alternatives: Vec<Alternative>,
}

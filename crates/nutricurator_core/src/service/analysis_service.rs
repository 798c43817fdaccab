//! Product health analysis behind a pluggable analyzer.
//!
//! # Responsibility
//! - Define the [`Analyzer`] seam a real inference backend can plug into.
//! - Provide the fixed mock verdict used by the storefront today.
//! - Model the artificial latency as a polled `idle -> pending -> complete`
//!   task.
//!
//! # Invariants
//! - Analysis requires a logged-in session.
//! - Starting again from any state restarts at `pending`; the previous
//!   result is discarded.
//! - The analyzer runs once per start, when the delay has elapsed.

use crate::config::AnalysisConfig;
use crate::model::account::{HealthProfile, SessionSnapshot};
use crate::model::analysis::{Alternative, AnalysisResult};
use crate::model::cart::AiDecision;
use crate::model::product::Product;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Produces a verdict for one product and (optional) shopper profile.
pub trait Analyzer {
    fn analyze(&self, product: &Product, profile: Option<&HealthProfile>) -> AnalysisResult;
}

impl<T: Analyzer + ?Sized> Analyzer for &T {
    fn analyze(&self, product: &Product, profile: Option<&HealthProfile>) -> AnalysisResult {
        (**self).analyze(product, profile)
    }
}

impl<T: Analyzer + ?Sized> Analyzer for Box<T> {
    fn analyze(&self, product: &Product, profile: Option<&HealthProfile>) -> AnalysisResult {
        (**self).analyze(product, profile)
    }
}

/// Fixed "caution" verdict regardless of input.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockAnalyzer;

impl Analyzer for MockAnalyzer {
    fn analyze(&self, product: &Product, _profile: Option<&HealthProfile>) -> AnalysisResult {
        AnalysisResult {
            decision: AiDecision::Caution,
            reason_summary: format!(
                "As a prehypertensive shopper, note that the sodium in \"{}\" (420mg) is high \
                 relative to the recommended daily intake. Check the low-sodium alternatives.",
                product.name
            ),
            alternatives: vec![
                Alternative {
                    id: 10046,
                    name: "Low-sodium kimchi stew".to_string(),
                },
                Alternative {
                    id: 10049,
                    name: "Quinoa brown rice".to_string(),
                },
                Alternative {
                    id: 10048,
                    name: "Konjac jelly, peach".to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisStatus {
    Idle,
    Pending,
    Complete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The shopper must log in before requesting analysis.
    LoginRequired,
}

impl Display for AnalysisError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LoginRequired => write!(f, "login is required before analysis"),
        }
    }
}

impl Error for AnalysisError {}

enum TaskState {
    Idle,
    Pending {
        product: Product,
        profile: HealthProfile,
        ready_at: Instant,
    },
    Complete(AnalysisResult),
}

/// Single-shot analysis request for one invocation site.
pub struct AnalysisTask<A: Analyzer> {
    analyzer: A,
    config: AnalysisConfig,
    state: TaskState,
}

impl<A: Analyzer> AnalysisTask<A> {
    pub fn new(analyzer: A) -> Self {
        Self::with_config(analyzer, AnalysisConfig::default())
    }

    pub fn with_config(analyzer: A, config: AnalysisConfig) -> Self {
        Self {
            analyzer,
            config,
            state: TaskState::Idle,
        }
    }

    pub fn status(&self) -> AnalysisStatus {
        match self.state {
            TaskState::Idle => AnalysisStatus::Idle,
            TaskState::Pending { .. } => AnalysisStatus::Pending,
            TaskState::Complete(_) => AnalysisStatus::Complete,
        }
    }

    /// Result of the last completed run.
    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            TaskState::Complete(result) => Some(result),
            _ => None,
        }
    }

    /// Begins (or restarts) analysis of `product`.
    ///
    /// Fails with [`AnalysisError::LoginRequired`] and leaves the task
    /// untouched when `session` is `None`.
    pub fn start(
        &mut self,
        product: &Product,
        session: Option<&SessionSnapshot>,
        now: Instant,
    ) -> Result<(), AnalysisError> {
        let session = session.ok_or(AnalysisError::LoginRequired)?;
        self.state = TaskState::Pending {
            product: product.clone(),
            profile: session.health_profile.clone(),
            ready_at: now + self.config.delay,
        };
        info!(
            "event=analysis_start module=service status=pending product_id={}",
            product.product_id
        );
        Ok(())
    }

    /// Advances a pending task once its delay has elapsed.
    pub fn poll(&mut self, now: Instant) -> AnalysisStatus {
        if let TaskState::Pending {
            product,
            profile,
            ready_at,
        } = &self.state
        {
            if now >= *ready_at {
                let result = self.analyzer.analyze(product, Some(profile));
                info!(
                    "event=analysis_complete module=service status=ok product_id={} decision={}",
                    product.product_id,
                    result.decision.as_str()
                );
                self.state = TaskState::Complete(result);
            }
        }
        self.status()
    }

    /// Returns the task to `idle`.
    pub fn reset(&mut self) {
        self.state = TaskState::Idle;
    }
}

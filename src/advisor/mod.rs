//! Client side of the external advisor (AI generation) service.
//!
//! Every piece of advisory content - roadmaps, SWOT analyses, legal
//! checklists, failure odds, mentor answers - is produced upstream. The
//! gateway only talks to it through the [`Advisor`] trait so handlers can be
//! exercised against a stub.

mod client;
pub mod models;

pub use client::AdvisorClient;
pub use models::{
    ChecklistDetailsRequest, FailurePredictionRequest, LegalProfile, MentorQuestion,
    MentorRequest, SwotRequest, TaskGuidanceRequest,
};

use crate::error::Result;
use async_trait::async_trait;
use serde_json::Value;

/// The advisory capabilities the gateway forwards to.
///
/// Implementations are expected to be idempotent and free of side effects
/// visible to the gateway, which is what makes their results cacheable.
#[async_trait]
pub trait Advisor: Send + Sync {
    /// Multi-phase startup roadmap for an arbitrary founder form.
    async fn roadmap(&self, form_data: &Value) -> Result<Value>;

    async fn task_guidance(&self, request: &TaskGuidanceRequest) -> Result<Value>;

    async fn failure_prediction(&self, request: &FailurePredictionRequest) -> Result<Value>;

    async fn swot_analysis(&self, request: &SwotRequest) -> Result<Value>;

    /// Legal and compliance checklist for a jurisdiction.
    async fn checklist(&self, profile: &LegalProfile) -> Result<Value>;

    async fn checklist_details(&self, request: &ChecklistDetailsRequest) -> Result<Value>;

    /// Answer a mentor question in the context of the prior turns.
    async fn mentor(&self, request: &MentorRequest) -> Result<Value>;

    /// Liveness check.
    async fn ping(&self) -> Result<()>;
}

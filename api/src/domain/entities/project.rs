//! Project domain entity
//!
//! The execution-phase record created from an approved quotation.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{ClientId, Page, QuotationId, UserId};

uuid_id!(
    /// Unique identifier for a project
    ProjectId
);

/// Project state; assigned directly, no transition graph is enforced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectState {
    Planning,
    Engineering,
    Execution,
    Legalization,
    Completed,
    Cancelled,
}

impl ProjectState {
    /// States that still consume resources
    pub fn is_active(&self) -> bool {
        !matches!(self, ProjectState::Completed | ProjectState::Cancelled)
    }
}

impl std::fmt::Display for ProjectState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectState::Planning => write!(f, "planning"),
            ProjectState::Engineering => write!(f, "engineering"),
            ProjectState::Execution => write!(f, "execution"),
            ProjectState::Legalization => write!(f, "legalization"),
            ProjectState::Completed => write!(f, "completed"),
            ProjectState::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for ProjectState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planning" => Ok(ProjectState::Planning),
            "engineering" => Ok(ProjectState::Engineering),
            "execution" => Ok(ProjectState::Execution),
            "legalization" => Ok(ProjectState::Legalization),
            "completed" => Ok(ProjectState::Completed),
            "cancelled" | "canceled" => Ok(ProjectState::Cancelled),
            _ => Err(format!("Unknown project state: {}", s)),
        }
    }
}

/// An installation project
#[derive(Debug, Clone, Serialize)]
pub struct Project {
    pub id: ProjectId,
    pub quotation_id: QuotationId,
    pub client_id: ClientId,
    pub name: String,
    pub state: ProjectState,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub installed_power_kwp: f64,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    /// UPME regulatory filing metadata
    pub upme_filing_number: Option<String>,
    pub upme_filing_date: Option<NaiveDate>,
    pub upme_response_date: Option<NaiveDate>,
    pub upme_status: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a new project
#[derive(Debug, Clone)]
pub struct NewProject {
    pub quotation_id: QuotationId,
    pub client_id: ClientId,
    pub name: String,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub installed_power_kwp: f64,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// One entry of a project's state history
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStateChange {
    pub project_id: ProjectId,
    pub from_state: Option<ProjectState>,
    pub to_state: ProjectState,
    pub changed_by: Option<UserId>,
    pub notes: Option<String>,
    pub changed_at: DateTime<Utc>,
}

/// Listing filter
#[derive(Debug, Clone, Default)]
pub struct ProjectFilter {
    pub state: Option<ProjectState>,
    pub client_id: Option<ClientId>,
    pub page: Page,
}

impl ProjectFilter {
    pub fn matches(&self, p: &Project) -> bool {
        self.state.map_or(true, |s| p.state == s) && self.client_id.map_or(true, |c| p.client_id == c)
    }
}

/// Aggregate per state for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct ProjectStateSummary {
    pub state: ProjectState,
    pub count: i64,
    pub installed_power_kwp: f64,
}

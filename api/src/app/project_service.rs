//! Project lifecycle
//!
//! Projects are opened from approved quotations. State is assigned directly;
//! every change is appended to the project's history.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::{
    CurrentUser, NewProject, Project, ProjectFilter, ProjectId, ProjectState, ProjectStateChange,
    QuotationId, QuotationStatus,
};
use crate::domain::ports::{ClientRepository, ProjectRepository, QuotationRepository};
use crate::domain::validation::FieldErrors;
use crate::error::{AppError, DomainError};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProjectInput {
    pub quotation_id: QuotationId,
    /// Defaults to the quotation's project name
    pub name: Option<String>,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateProjectInput {
    pub name: String,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub installed_power_kwp: f64,
    pub budget: f64,
    pub start_date: Option<NaiveDate>,
    pub estimated_end_date: Option<NaiveDate>,
    pub actual_end_date: Option<NaiveDate>,
    pub upme_filing_number: Option<String>,
    pub upme_filing_date: Option<NaiveDate>,
    pub upme_response_date: Option<NaiveDate>,
    pub upme_status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChangeStateInput {
    pub state: ProjectState,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ProjectDetails {
    #[serde(flatten)]
    pub project: Project,
    pub history: Vec<ProjectStateChange>,
}

fn check_dates(errors: &mut FieldErrors, start: Option<NaiveDate>, end: Option<NaiveDate>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add(
                "estimated_end_date",
                "The estimated_end_date must be a date after or equal to start_date.",
            );
        }
    }
}

pub struct ProjectService<PJ, QR, CR>
where
    PJ: ProjectRepository,
    QR: QuotationRepository,
    CR: ClientRepository,
{
    projects: Arc<PJ>,
    quotations: Arc<QR>,
    clients: Arc<CR>,
}

impl<PJ, QR, CR> ProjectService<PJ, QR, CR>
where
    PJ: ProjectRepository,
    QR: QuotationRepository,
    CR: ClientRepository,
{
    pub fn new(projects: Arc<PJ>, quotations: Arc<QR>, clients: Arc<CR>) -> Self {
        Self {
            projects,
            quotations,
            clients,
        }
    }

    pub async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, AppError> {
        Ok(self.projects.list(filter).await?)
    }

    pub async fn get(&self, id: &ProjectId) -> Result<Project, AppError> {
        self.projects
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::NotFound(format!("Project {} not found", id)).into())
    }

    pub async fn show(&self, id: &ProjectId) -> Result<ProjectDetails, AppError> {
        let project = self.get(id).await?;
        let history = self.projects.history(id).await?;
        Ok(ProjectDetails { project, history })
    }

    pub async fn history(&self, id: &ProjectId) -> Result<Vec<ProjectStateChange>, AppError> {
        self.get(id).await?;
        Ok(self.projects.history(id).await?)
    }

    /// Open a project from an approved quotation
    ///
    /// Power and budget come from the quotation; location defaults to the
    /// client's when not given.
    pub async fn create(
        &self,
        current: &CurrentUser,
        input: CreateProjectInput,
    ) -> Result<Project, AppError> {
        let quotation = self
            .quotations
            .find_by_id(&input.quotation_id)
            .await?
            .ok_or_else(|| AppError::invalid("quotation_id", "The selected quotation_id is invalid."))?;

        if quotation.status != QuotationStatus::Approved {
            return Err(AppError::BadRequest(format!(
                "Only approved quotations can become projects (quotation is {}).",
                quotation.status
            )));
        }

        let mut errors = FieldErrors::new();
        if self.projects.find_by_quotation(&quotation.id).await?.is_some() {
            errors.taken("quotation_id");
        }
        if let Some(name) = &input.name {
            errors.required("name", name);
            errors.max_len("name", name, 255);
        }
        check_dates(&mut errors, input.start_date, input.estimated_end_date);
        errors.into_result()?;

        let client = self.clients.find_by_id(&quotation.client_id).await?;
        let (department, city, address) = match client {
            Some(c) => (
                input.department.or(c.department),
                input.city.or(c.city),
                input.address.or(c.address),
            ),
            None => (input.department, input.city, input.address),
        };

        let id = ProjectId::new();
        let initial = ProjectStateChange {
            project_id: id,
            from_state: None,
            to_state: ProjectState::Planning,
            changed_by: Some(current.user.id),
            notes: Some("Project created".to_string()),
            changed_at: Utc::now(),
        };

        let project = self
            .projects
            .create(
                &NewProject {
                    quotation_id: quotation.id,
                    client_id: quotation.client_id,
                    name: input
                        .name
                        .map(|n| n.trim().to_string())
                        .unwrap_or(quotation.project_name),
                    department,
                    city,
                    address,
                    installed_power_kwp: quotation.power_kwp,
                    budget: quotation.totals.total_value,
                    start_date: input.start_date,
                    estimated_end_date: input.estimated_end_date,
                    notes: input.notes,
                },
                &initial,
            )
            .await?;

        tracing::info!(project_id = %project.id, quotation_id = %quotation.id, "Project created");
        Ok(project)
    }

    pub async fn update(&self, id: &ProjectId, input: UpdateProjectInput) -> Result<Project, AppError> {
        let mut project = self.get(id).await?;

        let mut errors = FieldErrors::new();
        errors.required("name", &input.name);
        errors.max_len("name", &input.name, 255);
        errors.non_negative("installed_power_kwp", input.installed_power_kwp);
        errors.non_negative("budget", input.budget);
        check_dates(&mut errors, input.start_date, input.estimated_end_date);
        errors.into_result()?;

        project.name = input.name.trim().to_string();
        project.department = input.department;
        project.city = input.city;
        project.address = input.address;
        project.installed_power_kwp = input.installed_power_kwp;
        project.budget = input.budget;
        project.start_date = input.start_date;
        project.estimated_end_date = input.estimated_end_date;
        project.actual_end_date = input.actual_end_date;
        project.upme_filing_number = input.upme_filing_number;
        project.upme_filing_date = input.upme_filing_date;
        project.upme_response_date = input.upme_response_date;
        project.upme_status = input.upme_status;
        project.notes = input.notes;

        Ok(self.projects.update(&project).await?)
    }

    /// Assign a new state and record it in the history
    pub async fn change_state(
        &self,
        current: &CurrentUser,
        id: &ProjectId,
        input: ChangeStateInput,
    ) -> Result<Project, AppError> {
        let mut project = self.get(id).await?;
        let from = project.state;

        project.state = input.state;
        if input.state == ProjectState::Completed && project.actual_end_date.is_none() {
            project.actual_end_date = Some(Utc::now().date_naive());
        }

        let change = ProjectStateChange {
            project_id: project.id,
            from_state: Some(from),
            to_state: input.state,
            changed_by: Some(current.user.id),
            notes: input.notes,
            changed_at: Utc::now(),
        };

        let project = self.projects.change_state(&project, &change).await?;
        tracing::info!(project_id = %id, from = %from, to = %input.state, "Project state changed");
        Ok(project)
    }

    pub async fn delete(&self, id: &ProjectId) -> Result<(), AppError> {
        self.projects.delete(id).await?;
        Ok(())
    }
}

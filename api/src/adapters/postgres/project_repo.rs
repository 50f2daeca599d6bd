//! PostgreSQL adapter for ProjectRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    FromQueryResult, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::{db_err, ensure_deleted};
use crate::domain::entities::{
    ClientId, NewProject, Project, ProjectFilter, ProjectId, ProjectState, ProjectStateChange,
    ProjectStateSummary, QuotationId, UserId,
};
use crate::domain::ports::ProjectRepository;
use crate::entity::{project_state_changes, projects};
use crate::error::DomainError;

/// PostgreSQL implementation of ProjectRepository
pub struct PostgresProjectRepository {
    db: DatabaseConnection,
}

impl PostgresProjectRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn append_history<C: ConnectionTrait>(
        conn: &C,
        change: &ProjectStateChange,
    ) -> Result<(), DomainError> {
        project_state_changes::ActiveModel {
            id: Set(Uuid::new_v4()),
            project_id: Set(change.project_id.0),
            from_state: Set(change.from_state.map(|s| s.to_string())),
            to_state: Set(change.to_state.to_string()),
            changed_by: Set(change.changed_by.map(|u| u.0)),
            notes: Set(change.notes.clone()),
            changed_at: Set(change.changed_at.fixed_offset()),
        }
        .insert(conn)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn save<C: ConnectionTrait>(conn: &C, project: &Project) -> Result<Project, DomainError> {
        let result = projects::ActiveModel {
            id: Set(project.id.0),
            name: Set(project.name.clone()),
            state: Set(project.state.to_string()),
            department: Set(project.department.clone()),
            city: Set(project.city.clone()),
            address: Set(project.address.clone()),
            installed_power_kwp: Set(project.installed_power_kwp),
            budget: Set(project.budget),
            start_date: Set(project.start_date),
            estimated_end_date: Set(project.estimated_end_date),
            actual_end_date: Set(project.actual_end_date),
            upme_filing_number: Set(project.upme_filing_number.clone()),
            upme_filing_date: Set(project.upme_filing_date),
            upme_response_date: Set(project.upme_response_date),
            upme_status: Set(project.upme_status.clone()),
            notes: Set(project.notes.clone()),
            updated_at: Set(Utc::now().fixed_offset()),
            ..Default::default()
        }
        .update(conn)
        .await
        .map_err(db_err)?;

        Ok(result.into())
    }
}

#[derive(Debug, FromQueryResult)]
struct StateRow {
    state: String,
    count: i64,
    installed_power_kwp: Option<f64>,
}

#[async_trait]
impl ProjectRepository for PostgresProjectRepository {
    async fn find_by_id(&self, id: &ProjectId) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn find_by_quotation(
        &self,
        quotation_id: &QuotationId,
    ) -> Result<Option<Project>, DomainError> {
        let result = projects::Entity::find()
            .filter(projects::Column::QuotationId.eq(quotation_id.0))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.map(|m| m.into()))
    }

    async fn list(&self, filter: &ProjectFilter) -> Result<Vec<Project>, DomainError> {
        let mut query = projects::Entity::find();

        if let Some(state) = filter.state {
            query = query.filter(projects::Column::State.eq(state.to_string()));
        }
        if let Some(client_id) = filter.client_id {
            query = query.filter(projects::Column::ClientId.eq(client_id.0));
        }

        let results = query
            .order_by_desc(projects::Column::CreatedAt)
            .offset(filter.page.offset)
            .limit(filter.page.limit)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn create(
        &self,
        project: &NewProject,
        initial: &ProjectStateChange,
    ) -> Result<Project, DomainError> {
        let now = Utc::now().fixed_offset();
        let txn = self.db.begin().await.map_err(db_err)?;

        let result = projects::ActiveModel {
            id: Set(initial.project_id.0),
            quotation_id: Set(project.quotation_id.0),
            client_id: Set(project.client_id.0),
            name: Set(project.name.clone()),
            state: Set(initial.to_state.to_string()),
            department: Set(project.department.clone()),
            city: Set(project.city.clone()),
            address: Set(project.address.clone()),
            installed_power_kwp: Set(project.installed_power_kwp),
            budget: Set(project.budget),
            start_date: Set(project.start_date),
            estimated_end_date: Set(project.estimated_end_date),
            actual_end_date: Set(None),
            upme_filing_number: Set(None),
            upme_filing_date: Set(None),
            upme_response_date: Set(None),
            upme_status: Set(None),
            notes: Set(project.notes.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(db_err)?;

        Self::append_history(&txn, initial).await?;
        txn.commit().await.map_err(db_err)?;

        Ok(result.into())
    }

    async fn update(&self, project: &Project) -> Result<Project, DomainError> {
        Self::save(&self.db, project).await
    }

    async fn change_state(
        &self,
        project: &Project,
        change: &ProjectStateChange,
    ) -> Result<Project, DomainError> {
        let txn = self.db.begin().await.map_err(db_err)?;

        let saved = Self::save(&txn, project).await?;
        Self::append_history(&txn, change).await?;

        txn.commit().await.map_err(db_err)?;
        Ok(saved)
    }

    async fn history(&self, id: &ProjectId) -> Result<Vec<ProjectStateChange>, DomainError> {
        let results = project_state_changes::Entity::find()
            .filter(project_state_changes::Column::ProjectId.eq(id.0))
            .order_by_asc(project_state_changes::Column::ChangedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(results.into_iter().map(|m| m.into()).collect())
    }

    async fn delete(&self, id: &ProjectId) -> Result<(), DomainError> {
        let result = projects::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        ensure_deleted(result.rows_affected, format!("Project {}", id))
    }

    async fn state_summary(&self) -> Result<Vec<ProjectStateSummary>, DomainError> {
        let rows = projects::Entity::find()
            .select_only()
            .column(projects::Column::State)
            .column_as(Expr::col(projects::Column::Id).count(), "count")
            .column_as(
                Expr::col(projects::Column::InstalledPowerKwp).sum(),
                "installed_power_kwp",
            )
            .group_by(projects::Column::State)
            .into_model::<StateRow>()
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(rows
            .into_iter()
            .filter_map(|row| {
                Some(ProjectStateSummary {
                    state: row.state.parse().ok()?,
                    count: row.count,
                    installed_power_kwp: row.installed_power_kwp.unwrap_or(0.0),
                })
            })
            .collect())
    }
}

/// Convert SeaORM model to domain entity
impl From<projects::Model> for Project {
    fn from(model: projects::Model) -> Self {
        Project {
            id: ProjectId(model.id),
            quotation_id: QuotationId(model.quotation_id),
            client_id: ClientId(model.client_id),
            name: model.name,
            state: model.state.parse().unwrap_or(ProjectState::Planning),
            department: model.department,
            city: model.city,
            address: model.address,
            installed_power_kwp: model.installed_power_kwp,
            budget: model.budget,
            start_date: model.start_date,
            estimated_end_date: model.estimated_end_date,
            actual_end_date: model.actual_end_date,
            upme_filing_number: model.upme_filing_number,
            upme_filing_date: model.upme_filing_date,
            upme_response_date: model.upme_response_date,
            upme_status: model.upme_status,
            notes: model.notes,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

impl From<project_state_changes::Model> for ProjectStateChange {
    fn from(model: project_state_changes::Model) -> Self {
        ProjectStateChange {
            project_id: ProjectId(model.project_id),
            from_state: model.from_state.and_then(|s| s.parse().ok()),
            to_state: model.to_state.parse().unwrap_or(ProjectState::Planning),
            changed_by: model.changed_by.map(UserId),
            notes: model.notes,
            changed_at: model.changed_at.with_timezone(&Utc),
        }
    }
}

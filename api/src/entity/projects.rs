use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "projects")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub quotation_id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub state: String,
    pub department: Option<String>,
    pub city: Option<String>,
    pub address: Option<String>,
    pub installed_power_kwp: f64,
    pub budget: f64,
    pub start_date: Option<Date>,
    pub estimated_end_date: Option<Date>,
    pub actual_end_date: Option<Date>,
    pub upme_filing_number: Option<String>,
    pub upme_filing_date: Option<Date>,
    pub upme_response_date: Option<Date>,
    pub upme_status: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::project_state_changes::Entity")]
    ProjectStateChanges,
}

impl Related<super::project_state_changes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ProjectStateChanges.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

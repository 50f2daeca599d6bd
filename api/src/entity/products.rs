use sea_orm::entity::prelude::*;

/// Panels, inverters and batteries; spec columns are filled per `kind`
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub brand: String,
    pub model: String,
    pub price: f64,
    pub power_wp: Option<f64>,
    pub panel_type: Option<String>,
    pub power_kw: Option<f64>,
    pub grid_type: Option<String>,
    pub system_type: Option<String>,
    pub capacity_ah: Option<f64>,
    pub voltage: Option<f64>,
    pub battery_type: Option<String>,
    pub technical_sheet_path: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "quotations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub client_id: Uuid,
    pub user_id: Uuid,
    pub project_name: String,
    pub system_type: String,
    pub power_kwp: f64,
    pub panel_count: i32,
    pub requires_financing: bool,
    pub profit_percentage: f64,
    pub iva_profit_percentage: f64,
    pub commercial_management_percentage: f64,
    pub administration_percentage: f64,
    pub contingency_percentage: f64,
    pub withholding_percentage: f64,
    pub subtotal: f64,
    pub commercial_management_value: f64,
    pub administration_value: f64,
    pub contingency_value: f64,
    pub profit_value: f64,
    pub iva_profit_value: f64,
    pub subtotal_with_markups: f64,
    pub withholding_value: f64,
    pub total_value: f64,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::clients::Entity",
        from = "Column::ClientId",
        to = "super::clients::Column::Id",
        on_delete = "Cascade"
    )]
    Clients,
    #[sea_orm(has_many = "super::used_products::Entity")]
    UsedProducts,
    #[sea_orm(has_many = "super::quotation_items::Entity")]
    QuotationItems,
}

impl Related<super::clients::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Clients.def()
    }
}

impl Related<super::used_products::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsedProducts.def()
    }
}

impl Related<super::quotation_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::QuotationItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

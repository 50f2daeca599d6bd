use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "invoices")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub invoice_number: String,
    pub vendor_id: Uuid,
    pub cost_center_id: Uuid,
    pub payment_method_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub issue_date: Date,
    pub due_date: Option<Date>,
    pub subtotal: f64,
    pub tax_amount: f64,
    pub withholding_amount: f64,
    pub total_amount: f64,
    pub status: String,
    pub description: Option<String>,
    pub invoice_file_path: Option<String>,
    pub payment_support_path: Option<String>,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendors,
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendors.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

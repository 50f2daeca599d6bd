//! Accounting reports and the dashboard summary

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

use crate::config::SolarWindow;
use crate::domain::entities::{
    round_money, CostCenterId, InvoiceFilter, InvoiceStatus, ProjectState,
    QuotationStatus, QuotationStatusSummary, VendorId,
};
use crate::domain::ports::{
    ClientRepository, CostCenterRepository, InvoiceRepository, ProjectRepository,
    QuotationRepository, VendorRepository,
};
use crate::domain::solar::{CurvePoint, SolarEstimate};
use crate::error::AppError;

/// Budget execution of one cost center
#[derive(Debug, Clone, Serialize)]
pub struct CostCenterExecution {
    pub cost_center_id: CostCenterId,
    pub code: String,
    pub name: String,
    pub budget: f64,
    pub executed: f64,
    pub remaining: f64,
    /// Executed over budget, 0 when there is no budget
    pub execution_percentage: f64,
}

/// Pending debt with one vendor
#[derive(Debug, Clone, Serialize)]
pub struct VendorPayable {
    pub vendor_id: VendorId,
    pub vendor_name: String,
    pub invoice_count: usize,
    pub total: f64,
    pub overdue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountsPayable {
    pub vendors: Vec<VendorPayable>,
    pub total: f64,
    pub overdue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub clients: u64,
    pub active_projects: i64,
    pub quotations_by_status: Vec<QuotationStatusSummary>,
    pub approved_quotation_value: f64,
    pub installed_kwp: f64,
    pub daily_energy_kwh: f64,
    pub generation_curve: Vec<CurvePoint>,
}

pub struct ReportService<CC, IR, VR, CR, QR, PJ>
where
    CC: CostCenterRepository,
    IR: InvoiceRepository,
    VR: VendorRepository,
    CR: ClientRepository,
    QR: QuotationRepository,
    PJ: ProjectRepository,
{
    cost_centers: Arc<CC>,
    invoices: Arc<IR>,
    vendors: Arc<VR>,
    clients: Arc<CR>,
    quotations: Arc<QR>,
    projects: Arc<PJ>,
    solar: SolarWindow,
}

impl<CC, IR, VR, CR, QR, PJ> ReportService<CC, IR, VR, CR, QR, PJ>
where
    CC: CostCenterRepository,
    IR: InvoiceRepository,
    VR: VendorRepository,
    CR: ClientRepository,
    QR: QuotationRepository,
    PJ: ProjectRepository,
{
    pub fn new(
        cost_centers: Arc<CC>,
        invoices: Arc<IR>,
        vendors: Arc<VR>,
        clients: Arc<CR>,
        quotations: Arc<QR>,
        projects: Arc<PJ>,
        solar: SolarWindow,
    ) -> Self {
        Self {
            cost_centers,
            invoices,
            vendors,
            clients,
            quotations,
            projects,
            solar,
        }
    }

    /// Budget against non-cancelled invoices issued within `[from, to]`
    pub async fn cost_center_report(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CostCenterExecution>, AppError> {
        if let (Some(f), Some(t)) = (from, to) {
            if t < f {
                return Err(AppError::invalid("to", "The end date must be on or after the start date."));
            }
        }

        let invoices = self
            .invoices
            .list(&InvoiceFilter {
                from,
                to,
                ..Default::default()
            })
            .await?;

        let mut executed: HashMap<CostCenterId, f64> = HashMap::new();
        for invoice in invoices.iter().filter(|i| i.is_executed()) {
            *executed.entry(invoice.cost_center_id).or_default() += invoice.total_amount;
        }

        let centers = self.cost_centers.list().await?;
        Ok(centers
            .into_iter()
            .map(|c| {
                let spent = round_money(executed.get(&c.id).copied().unwrap_or(0.0));
                let percentage = if c.budget > 0.0 {
                    round_money(spent / c.budget * 100.0)
                } else {
                    0.0
                };
                CostCenterExecution {
                    cost_center_id: c.id,
                    code: c.code,
                    name: c.name,
                    budget: c.budget,
                    executed: spent,
                    remaining: round_money(c.budget - spent),
                    execution_percentage: percentage,
                }
            })
            .collect())
    }

    /// Pending invoices grouped by vendor, largest debt first
    pub async fn accounts_payable(&self, today: NaiveDate) -> Result<AccountsPayable, AppError> {
        let pending = self
            .invoices
            .list(&InvoiceFilter {
                status: Some(InvoiceStatus::Pending),
                ..Default::default()
            })
            .await?;

        let mut grouped: HashMap<VendorId, VendorPayable> = HashMap::new();
        for invoice in &pending {
            let entry = grouped.entry(invoice.vendor_id).or_insert_with(|| VendorPayable {
                vendor_id: invoice.vendor_id,
                vendor_name: String::new(),
                invoice_count: 0,
                total: 0.0,
                overdue: 0.0,
            });
            entry.invoice_count += 1;
            entry.total += invoice.total_amount;
            if invoice.is_overdue(today) {
                entry.overdue += invoice.total_amount;
            }
        }

        let mut vendors = Vec::with_capacity(grouped.len());
        for (id, mut payable) in grouped {
            payable.vendor_name = self
                .vendors
                .find_by_id(&id)
                .await?
                .map(|v| v.name)
                .unwrap_or_else(|| id.to_string());
            payable.total = round_money(payable.total);
            payable.overdue = round_money(payable.overdue);
            vendors.push(payable);
        }
        vendors.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.vendor_name.cmp(&b.vendor_name)));

        let total = round_money(vendors.iter().map(|v| v.total).sum());
        let overdue = round_money(vendors.iter().map(|v| v.overdue).sum());
        Ok(AccountsPayable {
            vendors,
            total,
            overdue,
        })
    }

    pub async fn dashboard(&self) -> Result<Dashboard, AppError> {
        let clients = self.clients.count().await?;
        let quotations_by_status = self.quotations.status_summary().await?;
        let projects = self.projects.state_summary().await?;

        let approved_quotation_value = round_money(
            quotations_by_status
                .iter()
                .filter(|s| s.status == QuotationStatus::Approved)
                .map(|s| s.total_value)
                .sum(),
        );
        let active_projects = projects
            .iter()
            .filter(|p| p.state.is_active())
            .map(|p| p.count)
            .sum();
        let installed_kwp = projects
            .iter()
            .filter(|p| p.state == ProjectState::Completed)
            .map(|p| p.installed_power_kwp)
            .sum::<f64>();

        let estimate = SolarEstimate::new(installed_kwp, self.solar)?;

        Ok(Dashboard {
            clients,
            active_projects,
            quotations_by_status,
            approved_quotation_value,
            installed_kwp,
            daily_energy_kwh: round_money(estimate.daily_energy_kwh()),
            generation_curve: estimate.daily_curve(1.0),
        })
    }
}

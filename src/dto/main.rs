use serde::Serialize;

use crate::domain::invoice::Invoice;
use crate::domain::payment::Payment;
use crate::finance::summary::FinanceSummary;

/// Number of invoices and payments listed on the dashboard.
pub const RECENT_ROWS: usize = 5;

/// Data required to render the dashboard template.
#[derive(Debug, Serialize)]
pub struct DashboardPageData {
    pub student_count: usize,
    pub staff_count: usize,
    pub summary: FinanceSummary,
    /// Latest invoices by issue date, newest first.
    pub recent_invoices: Vec<Invoice>,
    /// Latest payments by payment time, newest first.
    pub recent_payments: Vec<Payment>,
}

//! Pipeline and cash KPIs computed over the ledgers

mod amount;

pub use amount::coerce_amount;

use serde::Serialize;
use std::collections::HashMap;

use crate::leads::Temperature;
use crate::storage::{LeadRecord, PaymentRecord, PaymentStatus};

/// A label with how many rows carry it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: String,
    pub count: usize,
}

/// Lead-ledger KPIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineSummary {
    pub total_leads: usize,
    pub hot_leads: usize,
    pub closed_deals: usize,
    /// Sum of estimated values; unparsable values count as zero
    pub pipeline_value: f64,
    /// Share of hot leads, 0-100
    pub hot_rate: f64,
    /// Share of closed deals, 0-100
    pub conversion_rate: f64,
    /// Funnel: rows per status as stored
    pub by_status: Vec<Bucket>,
    pub by_origin: Vec<Bucket>,
}

impl PipelineSummary {
    pub fn from_leads(leads: &[LeadRecord]) -> Self {
        let total_leads = leads.len();
        let count_temperature = |wanted: Temperature| {
            leads
                .iter()
                .filter(|lead| Temperature::parse(&lead.status) == Some(wanted))
                .count()
        };
        let hot_leads = count_temperature(Temperature::Hot);
        let closed_deals = count_temperature(Temperature::Closed);

        let pipeline_value = leads
            .iter()
            .map(|lead| coerce_amount(&lead.estimated_value))
            .sum();

        Self {
            total_leads,
            hot_leads,
            closed_deals,
            pipeline_value,
            hot_rate: percentage(hot_leads, total_leads),
            conversion_rate: percentage(closed_deals, total_leads),
            by_status: bucketize(leads.iter().map(|lead| lead.status.trim())),
            by_origin: bucketize(leads.iter().map(|lead| lead.origin.trim())),
        }
    }
}

/// Payment-ledger KPIs
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashSummary {
    pub transactions: usize,
    /// Total of payments marked paid
    pub confirmed_total: f64,
    /// Total of pending and scheduled payments
    pub outstanding_total: f64,
}

impl CashSummary {
    pub fn from_payments(payments: &[PaymentRecord]) -> Self {
        let (paid, outstanding): (Vec<_>, Vec<_>) = payments
            .iter()
            .partition(|payment| payment.status == PaymentStatus::Paid);

        Self {
            transactions: payments.len(),
            confirmed_total: paid.iter().map(|p| p.value).sum(),
            outstanding_total: outstanding.iter().map(|p| p.value).sum(),
        }
    }
}

fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 * 100.0 / whole as f64
    }
}

/// Count labels, most frequent first, ties by label.
fn bucketize<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<Bucket> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut buckets: Vec<Bucket> = counts
        .into_iter()
        .map(|(label, count)| Bucket {
            label: label.to_string(),
            count,
        })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::PaymentMethod;

    fn lead(status: &str, origin: &str, value: &str) -> LeadRecord {
        LeadRecord {
            id: 0,
            timestamp: "19/10/2026 10:30".to_string(),
            name: "x".to_string(),
            origin: origin.to_string(),
            status: status.to_string(),
            pain_point: String::new(),
            estimated_value: value.to_string(),
            notes: String::new(),
        }
    }

    fn payment(value: f64, status: PaymentStatus) -> PaymentRecord {
        PaymentRecord::new(
            "19/10/2026".to_string(),
            "Ana".to_string(),
            "Consulting".to_string(),
            value,
            status,
            PaymentMethod::Pix,
        )
    }

    #[test]
    fn empty_ledger_has_zero_rates() {
        let summary = PipelineSummary::from_leads(&[]);
        assert_eq!(summary.total_leads, 0);
        assert_eq!(summary.hot_rate, 0.0);
        assert_eq!(summary.conversion_rate, 0.0);
        assert!(summary.by_status.is_empty());
    }

    #[test]
    fn counts_and_percentages() {
        let leads = vec![
            lead("Hot", "Instagram", "1000"),
            lead("quente", "Instagram", "R$ 2.500,00"),
            lead("Closed", "Google", "500"),
            lead("Cold", "Referral", "Send case study"),
        ];
        let summary = PipelineSummary::from_leads(&leads);

        assert_eq!(summary.total_leads, 4);
        assert_eq!(summary.hot_leads, 2);
        assert_eq!(summary.closed_deals, 1);
        assert_eq!(summary.pipeline_value, 4000.0);
        assert_eq!(summary.hot_rate, 50.0);
        assert_eq!(summary.conversion_rate, 25.0);
        assert_eq!(
            summary.by_origin[0],
            Bucket {
                label: "Instagram".to_string(),
                count: 2
            }
        );
    }

    #[test]
    fn funnel_keeps_raw_status_labels() {
        let leads = vec![lead("Hot", "a", "0"), lead("Error", "a", "0"), lead("Hot", "b", "0")];
        let summary = PipelineSummary::from_leads(&leads);
        let labels: Vec<_> = summary.by_status.iter().map(|b| b.label.as_str()).collect();
        assert_eq!(labels, ["Hot", "Error"]);
    }

    #[test]
    fn cash_summary_splits_paid_from_outstanding() {
        let payments = vec![
            payment(100.0, PaymentStatus::Paid),
            payment(50.5, PaymentStatus::Paid),
            payment(300.0, PaymentStatus::Pending),
            payment(20.0, PaymentStatus::Scheduled),
        ];
        let summary = CashSummary::from_payments(&payments);
        assert_eq!(summary.transactions, 4);
        assert_eq!(summary.confirmed_total, 150.5);
        assert_eq!(summary.outstanding_total, 320.0);
    }
}

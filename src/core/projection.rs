//! View projection - formats balance engine output for display.
//!
//! Everything here is presentation-only: amounts are already rounded by the engine and
//! nothing in this module feeds back into a computation.

use crate::{
    core::{
        balance::{BalanceReport, BalanceSnapshot, CategoryDetail},
        period::{Granularity, Period},
    },
    entities::transaction,
};
use std::fmt::Write;

/// Human-readable label for a period: `Jan 15 - Jan 21`, `January 2024` or `2024`.
#[must_use]
pub fn format_date_range(period: &Period) -> String {
    match period.granularity {
        Granularity::Weekly => format!(
            "{} - {}",
            period.start.format("%b %-d"),
            period.end.format("%b %-d")
        ),
        Granularity::Monthly => period.start.format("%B %Y").to_string(),
        Granularity::Yearly => period.start.format("%Y").to_string(),
    }
}

/// Formats an amount as dollars, e.g. `$12.50` or `-$3.00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Formats a transaction amount from the account holder's view: expenses (positive)
/// show as `-$25.50`, inflows as `+$50.00`.
#[must_use]
pub fn format_spend(amount: f64) -> String {
    if amount >= 0.0 {
        format!("-${amount:.2}")
    } else {
        format!("+${:.2}", amount.abs())
    }
}

/// Share of this period's allocation still available, clamped to 0-100.
///
/// Returns 0 when nothing was allocated for the period.
#[must_use]
pub fn usage_percent(balance: f64, period_allocation: f64) -> f64 {
    if period_allocation == 0.0 {
        return 0.0;
    }
    (balance / period_allocation * 100.0).clamp(0.0, 100.0)
}

/// Percent of income an amount represents, 0 without income.
#[must_use]
pub fn share_of_income(amount: f64, income: f64) -> f64 {
    if income <= 0.0 {
        return 0.0;
    }
    amount / income * 100.0
}

/// Text progress bar like `[████████░░] 80.0%`.
#[must_use]
pub fn format_progress_bar(percent: f64, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = percent.clamp(0.0, 100.0);
    // clamped is in [0, 100] so the product is in [0, length]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let filled = ((clamped / 100.0) * length as f64).round() as usize;
    let empty = length.saturating_sub(filled);
    format!("[{}{}] {percent:.1}%", "█".repeat(filled), "░".repeat(empty))
}

/// One line of a transaction listing: `Jan 16 | Coffee Shop | -$4.50`.
#[must_use]
pub fn format_transaction_line(tx: &transaction::Model) -> String {
    format!(
        "{} | {} | {}",
        tx.date.format("%b %-d"),
        tx.display_name(),
        format_spend(tx.amount)
    )
}

/// Display model of one category on the balance screen.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryCard {
    /// Category name
    pub category: String,
    /// `Current Balance: $235.00`
    pub balance_line: String,
    /// `$100.00/week`
    pub rate_line: String,
    /// Bar fill, 0-100
    pub bar_percent: f64,
    /// Balance below zero
    pub over_budget: bool,
}

impl CategoryCard {
    /// Builds the card for one snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: &BalanceSnapshot) -> Self {
        Self {
            category: snapshot.category.clone(),
            balance_line: format!("Current Balance: {}", format_currency(snapshot.balance)),
            rate_line: format!("{}/week", format_currency(snapshot.weekly_allocation)),
            bar_percent: usage_percent(snapshot.balance, snapshot.period_allocation),
            over_budget: snapshot.balance < 0.0,
        }
    }
}

/// The drill-down calculation line: `$160.00 + $100.00 - $30.00 = $230.00`.
#[must_use]
pub fn detail_equation(detail: &CategoryDetail) -> String {
    let allocated = detail.snapshot.as_ref().map_or(0.0, |s| s.period_allocation);
    let balance = detail.snapshot.as_ref().map_or(0.0, |s| s.balance);
    let spent: f64 = detail.transactions.iter().map(|tx| tx.amount).sum();
    format!(
        "{} + {} - {} = {}",
        format_currency(detail.starting_balance),
        format_currency(allocated),
        format_currency(spent),
        format_currency(balance)
    )
}

/// Plain-text rendering of a whole report.
#[must_use]
pub fn render_report(report: &BalanceReport) -> String {
    let mut out = format!(
        "{} ({})\n",
        format_date_range(&report.period),
        report.period.granularity
    );

    if let Some(error) = &report.error {
        let _ = writeln!(out, "Balances unavailable: {error}");
        return out;
    }
    if report.snapshots.is_empty() {
        out.push_str("No budget categories found\n");
        return out;
    }

    for card in report.snapshots.iter().map(CategoryCard::from_snapshot) {
        let marker = if card.over_budget { " (over budget)" } else { "" };
        let _ = writeln!(
            out,
            "{}: {} | {} | {}{}",
            card.category,
            card.balance_line,
            card.rate_line,
            format_progress_bar(card.bar_percent, None),
            marker
        );
    }
    out
}

//! 수수료 계산 명령.

use std::fmt::Write as _;

use anyhow::{bail, Result};
use rust_decimal::Decimal;
use tracker_core::FeeBreakdown;

use super::money;
use crate::config::TrackerConfig;

/// 설정된 수수료 체계로 항목별 수수료 계산.
pub fn run_fees(config: &TrackerConfig, quantity: i64, price: Decimal) -> Result<FeeBreakdown> {
    let Ok(quantity) = u64::try_from(quantity) else {
        bail!("수량은 0 이상이어야 합니다: {}", quantity);
    };
    if price < Decimal::ZERO {
        bail!("가격은 0 이상이어야 합니다: {}", price);
    }
    Ok(config.fees.breakdown(quantity, price)?)
}

pub fn render_fees(breakdown: &FeeBreakdown, currency: &str) -> String {
    let mut out = String::new();
    let rows = [
        ("Notional", breakdown.notional),
        ("Brokerage", breakdown.brokerage),
        ("Stamp duty", breakdown.stamp_duty),
        ("Clearing", breakdown.clearing),
    ];
    for (label, value) in rows {
        let _ = writeln!(out, "{:<12} {} {:>12}", label, currency, money(value));
    }
    let _ = writeln!(out, "{:<12} {} {:>12}", "Total fees", currency, money(breakdown.total));
    out
}

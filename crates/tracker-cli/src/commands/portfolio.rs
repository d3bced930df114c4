//! 포트폴리오 평가 명령.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracker_core::{PortfolioReport, PriceSnapshot, PriceSource, Symbol};
use tracker_data::{fetch_snapshot, LedgerStore, YahooPriceProvider};

use super::{money, signed_money, signed_pct};
use crate::config::TrackerConfig;

/// 포트폴리오 명령 옵션
#[derive(Debug, Clone, Default)]
pub struct PortfolioOptions {
    /// 수동 입력 현재가 (조회 결과보다 우선)
    pub manual_prices: Vec<(Symbol, Decimal)>,
    /// 시세 조회 없이 수동 입력 가격만 사용
    pub offline: bool,
}

/// `SYMBOL=PRICE` 형식의 수동 가격 파싱.
pub fn parse_price_override(raw: &str) -> std::result::Result<(Symbol, Decimal), String> {
    let (symbol, price) = raw
        .split_once('=')
        .ok_or_else(|| format!("SYMBOL=PRICE 형식이어야 합니다: {}", raw))?;

    let symbol = Symbol::parse(symbol).map_err(|e| e.to_string())?;
    let price: Decimal = price
        .trim()
        .parse()
        .map_err(|e| format!("잘못된 가격 {}: {}", price.trim(), e))?;
    if price <= Decimal::ZERO {
        return Err(format!("가격은 0보다 커야 합니다: {}", price));
    }
    Ok((symbol, price))
}

/// 보유 포지션을 현재가로 평가.
pub async fn run_portfolio(
    config: &TrackerConfig,
    options: PortfolioOptions,
) -> Result<PortfolioReport> {
    let store = LedgerStore::new(&config.storage.ledger_path);
    let ledger = store.load(config.engine()).context("원장 로드 실패")?;

    let manual: PriceSnapshot = options.manual_prices.into_iter().collect();

    let mut prices = if options.offline {
        PriceSnapshot::new()
    } else {
        let missing: Vec<Symbol> = ledger
            .open_positions()
            .map(|p| p.symbol().clone())
            .filter(|s| manual.price_of(s).is_none())
            .collect();

        if missing.is_empty() {
            PriceSnapshot::new()
        } else {
            let provider = YahooPriceProvider::with_range(&config.market.range)
                .context("시세 제공자 생성 실패")?;
            fetch_snapshot(&provider, &missing, config.market.request_delay()).await
        }
    };
    prices.merge(manual);

    let report = PortfolioReport::build(&ledger, &prices)?;
    for symbol in &report.unpriced {
        warn!(symbol = %symbol, "현재가 없음, 평가에서 제외");
    }
    info!(
        positions = report.rows.len(),
        unpriced = report.unpriced.len(),
        "포트폴리오 평가 완료"
    );
    Ok(report)
}

pub fn render_portfolio(report: &PortfolioReport, currency: &str) -> String {
    let mut out = String::new();

    if report.is_empty() {
        out.push_str("No open positions.\n");
        return out;
    }

    if !report.rows.is_empty() {
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>10} {:>10} {:>12} {:>9} {:>8}",
            "Symbol", "Qty", "Buy", "Current", "P&L", "P&L %", "Fees"
        );
        for row in &report.rows {
            let _ = writeln!(
                out,
                "{:<12} {:>8} {:>10} {:>10} {:>12} {:>9} {:>8}",
                row.symbol.as_str(),
                row.quantity,
                money(row.buy_price),
                money(row.current_price),
                signed_money(row.unrealized_pnl),
                signed_pct(row.pnl_pct),
                money(row.fees),
            );
        }

        let totals = &report.totals;
        let _ = writeln!(out);
        let _ = writeln!(out, "Total cost:      {} {}", currency, money(totals.cost));
        let _ = writeln!(out, "Market value:    {} {}", currency, money(totals.market_value));
        let pct = totals
            .pnl_pct()
            .map(|p| format!(" ({})", signed_pct(p)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "Unrealized P&L:  {} {}{}",
            currency,
            signed_money(totals.unrealized_pnl),
            pct
        );
        let _ = writeln!(out, "Fees (buy side): {} {}", currency, money(totals.fees));
    }

    if !report.unpriced.is_empty() {
        let symbols: Vec<&str> = report.unpriced.iter().map(|s| s.as_str()).collect();
        let _ = writeln!(out, "Price unavailable: {}", symbols.join(", "));
    }

    out
}

//! 청산 거래 기록 명령.

use std::fmt::Write as _;

use anyhow::{Context, Result};
use tracker_core::{ClosedTrade, HistorySummary};
use tracker_data::LedgerStore;

use super::{money, signed_money};
use crate::config::TrackerConfig;

/// 청산 기록과 통계.
#[derive(Debug)]
pub struct HistoryView {
    pub trades: Vec<ClosedTrade>,
    pub summary: HistorySummary,
}

impl HistoryView {
    pub fn new(trades: Vec<ClosedTrade>) -> Result<Self> {
        let summary = HistorySummary::from_trades(&trades).context("청산 기록 집계 실패")?;
        Ok(Self { trades, summary })
    }
}

/// 청산 기록 로드.
pub fn run_history(config: &TrackerConfig) -> Result<HistoryView> {
    let store = LedgerStore::new(&config.storage.ledger_path);
    let ledger = store.load(config.engine()).context("원장 로드 실패")?;
    HistoryView::new(ledger.list_history())
}

pub fn render_history(view: &HistoryView, currency: &str) -> String {
    let HistoryView { trades, summary } = view;
    let mut out = String::new();

    if trades.is_empty() {
        out.push_str("No closed trades.\n");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<12} {:>8} {:>10} {:>10} {:>12}",
        "Symbol", "Qty", "Buy", "Sell", "P&L"
    );
    for trade in trades {
        let _ = writeln!(
            out,
            "{:<12} {:>8} {:>10} {:>10} {:>12}",
            trade.symbol().as_str(),
            trade.quantity(),
            money(trade.buy_price()),
            money(trade.sell_price()),
            signed_money(trade.realized_pnl()),
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Trades: {}  (wins {}, losses {})",
        summary.trade_count, summary.wins, summary.losses
    );
    if let Some(win_rate) = summary.win_rate() {
        let _ = writeln!(out, "Win rate:     {}%", money(win_rate));
    }
    let _ = writeln!(
        out,
        "Realized P&L: {} {}",
        currency,
        signed_money(summary.total_realized_pnl)
    );

    out
}

//! 매수/매도 명령.
//!
//! 원장을 로드해 연산 하나를 적용하고, 성공했을 때만 저장합니다.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use tracing::info;
use tracker_core::{ClosedTrade, OpenPosition};
use tracker_data::LedgerStore;

use super::{money, signed_money};
use crate::config::TrackerConfig;

/// 포지션 매수 기록.
pub fn run_buy(
    config: &TrackerConfig,
    symbol: &str,
    quantity: i64,
    price: Decimal,
) -> Result<OpenPosition> {
    let store = LedgerStore::new(&config.storage.ledger_path);
    let mut ledger = store.load(config.engine()).context("원장 로드 실패")?;

    let position = ledger.open(symbol, quantity, price)?;
    store.save(&ledger).context("원장 저장 실패")?;

    info!(
        symbol = %position.symbol(),
        quantity = position.quantity(),
        buy_price = %position.buy_price(),
        "포지션 추가"
    );
    Ok(position)
}

/// 포지션 매도 및 청산 기록.
pub fn run_sell(config: &TrackerConfig, symbol: &str, price: Decimal) -> Result<ClosedTrade> {
    let store = LedgerStore::new(&config.storage.ledger_path);
    let mut ledger = store.load(config.engine()).context("원장 로드 실패")?;

    let trade = ledger.close(symbol, price)?;
    store.save(&ledger).context("원장 저장 실패")?;

    info!(
        symbol = %trade.symbol(),
        quantity = trade.quantity(),
        sell_price = %trade.sell_price(),
        realized_pnl = %trade.realized_pnl(),
        "포지션 청산"
    );
    Ok(trade)
}

pub fn render_buy(position: &OpenPosition, currency: &str) -> String {
    format!(
        "{} added.\n  {} shares @ {} {}\n",
        position.symbol(),
        position.quantity(),
        currency,
        money(position.buy_price()),
    )
}

pub fn render_sell(trade: &ClosedTrade, currency: &str) -> String {
    format!(
        "{} sold and recorded.\n  {} shares: {} -> {}  realized P&L {} {}\n",
        trade.symbol(),
        trade.quantity(),
        money(trade.buy_price()),
        money(trade.sell_price()),
        currency,
        signed_money(trade.realized_pnl()),
    )
}

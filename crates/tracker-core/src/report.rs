//! 포트폴리오 평가 및 거래 기록 요약.
//!
//! 원장과 시세로부터 화면 표시용 데이터를 만듭니다. 계산값은 반올림하지
//! 않고 그대로 담으며, 표시 단계에서 [`display_round`]로 소수점 2자리에
//! 맞춥니다.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::{
    domain::{ClosedTrade, Symbol},
    error::{LedgerError, Result},
    ledger::Ledger,
    pnl::notional,
    price::PriceSource,
};

/// 합계 누적. 범위를 넘으면 `LedgerError::Overflow`.
fn accumulate(total: &mut Decimal, value: Decimal, operation: &'static str) -> Result<()> {
    *total = total
        .checked_add(value)
        .ok_or(LedgerError::Overflow { operation })?;
    Ok(())
}

/// 표시용 소수점 자리수
pub const DISPLAY_DECIMALS: u32 = 2;

/// 표시용 반올림 (소수점 2자리).
pub fn display_round(value: Decimal) -> Decimal {
    value.round_dp(DISPLAY_DECIMALS)
}

// =============================================================================
// 포트폴리오 평가 (PortfolioReport)
// =============================================================================

/// 보유 종목 1건의 평가 결과.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationRow {
    pub symbol: Symbol,
    pub quantity: u64,
    pub buy_price: Decimal,
    pub current_price: Decimal,
    /// 매입 금액 (quantity * buy_price)
    pub cost: Decimal,
    /// 평가 금액 (quantity * current_price)
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub pnl_pct: Decimal,
    /// 매수 거래 금액 기준 수수료. 손익에서 차감하지 않음
    pub fees: Decimal,
}

/// 평가 합계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ValuationTotals {
    pub cost: Decimal,
    pub market_value: Decimal,
    pub unrealized_pnl: Decimal,
    pub fees: Decimal,
}

impl ValuationTotals {
    /// 전체 손익률 (%). 매입 금액이 0이면 `None`.
    pub fn pnl_pct(&self) -> Option<Decimal> {
        self.unrealized_pnl
            .checked_div(self.cost)
            .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
    }
}

/// 보유 포트폴리오 평가 결과.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PortfolioReport {
    /// 시세가 있는 종목 (보유 순서)
    pub rows: Vec<ValuationRow>,
    /// 시세를 조회하지 못해 제외된 종목
    pub unpriced: Vec<Symbol>,
    pub totals: ValuationTotals,
}

impl PortfolioReport {
    /// 원장의 보유 포지션을 현재가로 평가.
    ///
    /// 현재가가 없는 종목은 행에서 빠지고 `unpriced`에 기록됩니다.
    ///
    /// # Errors
    ///
    /// 종목별 금액이나 합계가 `Decimal` 범위를 넘으면 `LedgerError::Overflow`.
    pub fn build<P>(ledger: &Ledger, prices: &P) -> Result<Self>
    where
        P: PriceSource + ?Sized,
    {
        let engine = ledger.engine();
        let mut report = Self::default();

        for position in ledger.open_positions() {
            let Some(current_price) = prices.price_of(position.symbol()) else {
                report.unpriced.push(position.symbol().clone());
                continue;
            };

            let pnl = engine.unrealized_pnl(position, current_price)?;
            let row = ValuationRow {
                symbol: position.symbol().clone(),
                quantity: position.quantity(),
                buy_price: position.buy_price(),
                current_price,
                cost: position.cost()?,
                market_value: notional(position.quantity(), current_price)?,
                unrealized_pnl: pnl.pnl,
                pnl_pct: pnl.pnl_pct,
                fees: engine.compute_fees(position.quantity(), position.buy_price())?,
            };

            let totals = &mut report.totals;
            accumulate(&mut totals.cost, row.cost, "total_cost")?;
            accumulate(&mut totals.market_value, row.market_value, "total_market_value")?;
            accumulate(&mut totals.unrealized_pnl, row.unrealized_pnl, "total_unrealized_pnl")?;
            accumulate(&mut totals.fees, row.fees, "total_fees")?;
            report.rows.push(row);
        }

        Ok(report)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() && self.unpriced.is_empty()
    }
}

// =============================================================================
// 거래 기록 요약 (HistorySummary)
// =============================================================================

/// 청산 거래 통계.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HistorySummary {
    pub trade_count: usize,
    /// 이익 거래 수
    pub wins: usize,
    /// 손실 거래 수
    pub losses: usize,
    pub total_realized_pnl: Decimal,
}

impl HistorySummary {
    /// # Errors
    ///
    /// 실현 손익 합계가 `Decimal` 범위를 넘으면 `LedgerError::Overflow`.
    pub fn from_trades(trades: &[ClosedTrade]) -> Result<Self> {
        trades.iter().try_fold(Self::default(), |mut summary, trade| {
            summary.trade_count += 1;
            if trade.is_win() {
                summary.wins += 1;
            } else if trade.realized_pnl() < Decimal::ZERO {
                summary.losses += 1;
            }
            accumulate(
                &mut summary.total_realized_pnl,
                trade.realized_pnl(),
                "total_realized_pnl",
            )?;
            Ok(summary)
        })
    }

    /// 승률 (%). 거래가 없으면 `None`.
    pub fn win_rate(&self) -> Option<Decimal> {
        if self.trade_count == 0 {
            return None;
        }
        Some(Decimal::from(self.wins) / Decimal::from(self.trade_count) * Decimal::ONE_HUNDRED)
    }
}

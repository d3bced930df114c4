//! 수수료 및 손익(PnL) 계산 엔진.
//!
//! 상태를 갖지 않는 순수 계산만 제공합니다.
//!
//! # 수수료 공식
//!
//! 거래 금액 `N = quantity * price`에 대해:
//!
//! ```text
//! fees = max(brokerage_rate * N, min_fee)          // 위탁 수수료 (최저 수수료 적용)
//!      + floor(N / stamp_bracket) * stamp_unit     // 인지세 (구간당 정액)
//!      + clearing_rate * N                         // 청산 수수료
//! ```
//!
//! 수수료는 조회/표시용이며 `unrealized_pnl`, `realized_pnl` 결과에서
//! 차감하지 않습니다. 수수료 반영 손익이 필요하면 호출자가 직접 차감합니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    domain::OpenPosition,
    error::{LedgerError, ValidationError},
};

// =============================================================================
// 수수료 체계 (FeeSchedule)
// =============================================================================

/// 단순화된 증권사 수수료 체계.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeSchedule {
    /// 위탁 수수료율 (기본 0.08%)
    pub brokerage_rate: Decimal,
    /// 최저 위탁 수수료 (기본 8)
    pub min_fee: Decimal,
    /// 인지세 구간당 금액 (기본 1)
    pub stamp_unit: Decimal,
    /// 인지세 구간 크기 (기본 1000)
    pub stamp_bracket: Decimal,
    /// 청산 수수료율 (기본 0.03%)
    pub clearing_rate: Decimal,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            brokerage_rate: Decimal::new(8, 4), // 0.08%
            min_fee: Decimal::from(8),
            stamp_unit: Decimal::ONE,
            stamp_bracket: Decimal::from(1000),
            clearing_rate: Decimal::new(3, 4), // 0.03%
        }
    }
}

/// 수수료 항목별 내역.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeBreakdown {
    /// 거래 금액 (quantity * price)
    pub notional: Decimal,
    /// 위탁 수수료
    pub brokerage: Decimal,
    /// 인지세
    pub stamp_duty: Decimal,
    /// 청산 수수료
    pub clearing: Decimal,
    /// 합계
    pub total: Decimal,
}

impl FeeSchedule {
    /// 파라미터 범위 검증.
    ///
    /// 모든 값은 0 이상이어야 하고 `stamp_bracket`은 0보다 커야 합니다.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let non_negative = [
            ("brokerage_rate", self.brokerage_rate),
            ("min_fee", self.min_fee),
            ("stamp_unit", self.stamp_unit),
            ("clearing_rate", self.clearing_rate),
        ];
        for (field, value) in non_negative {
            if value < Decimal::ZERO {
                return Err(ValidationError::InvalidFeeParameter { field, value });
            }
        }
        if self.stamp_bracket <= Decimal::ZERO {
            return Err(ValidationError::InvalidFeeParameter {
                field: "stamp_bracket",
                value: self.stamp_bracket,
            });
        }
        Ok(())
    }

    /// 항목별 수수료 계산.
    ///
    /// # Errors
    ///
    /// 거래 금액이나 수수료 항목이 `Decimal` 범위를 넘으면 `LedgerError::Overflow`.
    pub fn breakdown(&self, quantity: u64, price: Decimal) -> Result<FeeBreakdown, LedgerError> {
        let notional = notional(quantity, price)?;
        let overflow = || LedgerError::Overflow { operation: "fees" };

        let brokerage = self
            .brokerage_rate
            .checked_mul(notional)
            .ok_or_else(overflow)?
            .max(self.min_fee);
        // 정수 나눗셈: 구간 미만 금액은 버림
        let stamp_duty = notional
            .checked_div(self.stamp_bracket)
            .and_then(|brackets| brackets.floor().checked_mul(self.stamp_unit))
            .ok_or_else(overflow)?;
        let clearing = self.clearing_rate.checked_mul(notional).ok_or_else(overflow)?;
        let total = brokerage
            .checked_add(stamp_duty)
            .and_then(|sum| sum.checked_add(clearing))
            .ok_or_else(overflow)?;

        Ok(FeeBreakdown {
            notional,
            brokerage,
            stamp_duty,
            clearing,
            total,
        })
    }
}

/// 거래 금액 (quantity * price).
pub(crate) fn notional(quantity: u64, price: Decimal) -> Result<Decimal, LedgerError> {
    Decimal::from(quantity)
        .checked_mul(price)
        .ok_or(LedgerError::Overflow {
            operation: "notional",
        })
}

/// 매수가 대비 변동률 (%).
fn change_pct(buy_price: Decimal, current_price: Decimal) -> Result<Decimal, LedgerError> {
    if buy_price.is_zero() {
        return Err(LedgerError::Division);
    }
    current_price
        .checked_sub(buy_price)
        .and_then(|diff| diff.checked_div(buy_price))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or(LedgerError::Overflow {
            operation: "pnl_pct",
        })
}

// =============================================================================
// 손익 엔진 (PnlEngine)
// =============================================================================

/// 미실현 손익 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnrealizedPnl {
    /// 평가 손익 ((current - buy) * quantity)
    pub pnl: Decimal,
    /// 손익률 (%)
    pub pnl_pct: Decimal,
}

/// 수수료와 손익을 계산하는 엔진.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PnlEngine {
    fee_schedule: FeeSchedule,
}

impl PnlEngine {
    pub fn new(fee_schedule: FeeSchedule) -> Self {
        Self { fee_schedule }
    }

    pub fn fee_schedule(&self) -> &FeeSchedule {
        &self.fee_schedule
    }

    /// 거래 금액에 대한 총 수수료.
    pub fn compute_fees(&self, quantity: u64, price: Decimal) -> Result<Decimal, LedgerError> {
        Ok(self.fee_schedule.breakdown(quantity, price)?.total)
    }

    /// 보유 포지션의 미실현 손익과 손익률.
    ///
    /// # Errors
    ///
    /// - `LedgerError::Division`: 매수가 0 (검증된 `OpenPosition`에서는 발생하지 않음)
    /// - `LedgerError::Overflow`: 손익 또는 손익률이 `Decimal` 범위 초과
    pub fn unrealized_pnl(
        &self,
        position: &OpenPosition,
        current_price: Decimal,
    ) -> Result<UnrealizedPnl, LedgerError> {
        let pnl_pct = change_pct(position.buy_price(), current_price)?;
        let pnl = current_price
            .checked_sub(position.buy_price())
            .and_then(|diff| diff.checked_mul(Decimal::from(position.quantity())))
            .ok_or(LedgerError::Overflow {
                operation: "unrealized_pnl",
            })?;

        Ok(UnrealizedPnl { pnl, pnl_pct })
    }

    /// 실현 손익 ((sell - buy) * quantity). 수수료는 차감하지 않습니다.
    ///
    /// # Errors
    ///
    /// 결과가 `Decimal` 범위를 넘으면 `LedgerError::Overflow`.
    pub fn realized_pnl(
        &self,
        buy_price: Decimal,
        sell_price: Decimal,
        quantity: u64,
    ) -> Result<Decimal, LedgerError> {
        sell_price
            .checked_sub(buy_price)
            .and_then(|diff| diff.checked_mul(Decimal::from(quantity)))
            .ok_or(LedgerError::Overflow {
                operation: "realized_pnl",
            })
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_fee_schedule_default() {
        let schedule = FeeSchedule::default();
        assert_eq!(schedule.brokerage_rate, dec!(0.0008));
        assert_eq!(schedule.min_fee, dec!(8));
        assert_eq!(schedule.stamp_unit, dec!(1));
        assert_eq!(schedule.stamp_bracket, dec!(1000));
        assert_eq!(schedule.clearing_rate, dec!(0.0003));
        assert!(schedule.validate().is_ok());
    }

    #[test]
    fn test_compute_fees_minimum_brokerage() {
        let engine = PnlEngine::default();
        let breakdown = engine.fee_schedule().breakdown(100, dec!(10)).unwrap();

        // N = 1000
        assert_eq!(breakdown.notional, dec!(1000));
        assert_eq!(breakdown.brokerage, dec!(8)); // max(0.8, 8)
        assert_eq!(breakdown.stamp_duty, dec!(1)); // floor(1000 / 1000) * 1
        assert_eq!(breakdown.clearing, dec!(0.3));
        assert_eq!(breakdown.total, dec!(9.3));
        assert_eq!(engine.compute_fees(100, dec!(10)), Ok(dec!(9.3)));
    }

    #[test]
    fn test_compute_fees_proportional_brokerage() {
        let engine = PnlEngine::default();

        // N = 25,000 → 위탁 20, 인지세 25, 청산 7.5
        let fees = engine.compute_fees(5000, dec!(5)).unwrap();
        assert_eq!(fees, dec!(52.5));
    }

    #[test]
    fn test_stamp_duty_truncates_partial_bracket() {
        let schedule = FeeSchedule::default();

        // N = 1999.99 → 인지세 구간 1개
        let breakdown = schedule.breakdown(1, dec!(1999.99)).unwrap();
        assert_eq!(breakdown.stamp_duty, dec!(1));

        // N = 999 → 인지세 없음
        let breakdown = schedule.breakdown(999, dec!(1)).unwrap();
        assert_eq!(breakdown.stamp_duty, Decimal::ZERO);
    }

    #[test]
    fn test_fee_schedule_validation() {
        let schedule = FeeSchedule {
            min_fee: dec!(-1),
            ..Default::default()
        };
        assert_eq!(
            schedule.validate(),
            Err(ValidationError::InvalidFeeParameter {
                field: "min_fee",
                value: dec!(-1)
            })
        );

        let schedule = FeeSchedule {
            stamp_bracket: Decimal::ZERO,
            ..Default::default()
        };
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_unrealized_pnl() {
        let engine = PnlEngine::default();
        let position = OpenPosition::new("ABC", 100, dec!(10)).unwrap();

        let result = engine.unrealized_pnl(&position, dec!(12)).unwrap();
        assert_eq!(result.pnl, dec!(200));
        assert_eq!(result.pnl_pct, dec!(20.0));

        let result = engine.unrealized_pnl(&position, dec!(9.5)).unwrap();
        assert_eq!(result.pnl, dec!(-50));
        assert_eq!(result.pnl_pct, dec!(-5));
    }

    #[test]
    fn test_unrealized_pnl_excludes_fees() {
        let engine = PnlEngine::default();
        let position = OpenPosition::new("ABC", 100, dec!(10)).unwrap();

        // 가격 변동이 없으면 수수료가 있어도 손익은 0
        let result = engine.unrealized_pnl(&position, dec!(10)).unwrap();
        assert_eq!(result.pnl, Decimal::ZERO);
        assert!(engine.compute_fees(100, dec!(10)).unwrap() > Decimal::ZERO);
    }

    #[test]
    fn test_realized_pnl() {
        let engine = PnlEngine::default();
        assert_eq!(engine.realized_pnl(dec!(5.00), dec!(6.00), 50), Ok(dec!(50.00)));
        assert_eq!(engine.realized_pnl(dec!(2.10), dec!(1.95), 1000), Ok(dec!(-150)));
    }

    // =========================================================================
    // Decimal 범위 경계
    // =========================================================================

    #[test]
    fn test_compute_fees_overflow_returns_error() {
        let engine = PnlEngine::default();

        let result = engine.compute_fees(u64::MAX, dec!(1_000_000_000_000));
        assert_eq!(
            result,
            Err(LedgerError::Overflow {
                operation: "notional"
            })
        );

        // 거래 금액은 범위 안이지만 수수료율이 커서 넘치는 경우
        let schedule = FeeSchedule {
            brokerage_rate: dec!(1_000_000_000_000),
            ..Default::default()
        };
        assert_eq!(
            schedule.breakdown(u64::MAX, dec!(1)),
            Err(LedgerError::Overflow { operation: "fees" })
        );
    }

    #[test]
    fn test_compute_fees_at_large_notional() {
        let engine = PnlEngine::default();

        // N = u64::MAX (약 1.8e19)
        let breakdown = engine.fee_schedule().breakdown(u64::MAX, dec!(1)).unwrap();
        assert_eq!(breakdown.notional, Decimal::from(u64::MAX));
        assert!(breakdown.total > breakdown.brokerage);
    }

    #[test]
    fn test_realized_pnl_overflow_returns_error() {
        let engine = PnlEngine::default();
        let result = engine.realized_pnl(dec!(1), dec!(1_000_000_000_000), i64::MAX as u64);
        assert_eq!(
            result,
            Err(LedgerError::Overflow {
                operation: "realized_pnl"
            })
        );
    }

    #[test]
    fn test_unrealized_pnl_overflow_is_not_division() {
        let engine = PnlEngine::default();
        let position = OpenPosition::new("T", 1, Decimal::new(1, 28)).unwrap();

        let err = engine
            .unrealized_pnl(&position, dec!(1_000_000_000))
            .unwrap_err();
        assert_eq!(
            err,
            LedgerError::Overflow {
                operation: "pnl_pct"
            }
        );
    }

    #[test]
    fn test_change_pct_zero_buy_price() {
        assert_eq!(change_pct(Decimal::ZERO, dec!(1)), Err(LedgerError::Division));
        assert_eq!(change_pct(dec!(4), dec!(5)), Ok(dec!(25)));
    }
}

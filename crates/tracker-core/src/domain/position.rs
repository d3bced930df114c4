//! 보유 포지션 및 청산 거래 타입.
//!
//! 두 타입 모두 검증을 거친 생성자로만 만들어집니다.
//! 역직렬화 시에도 동일한 검증을 다시 수행하므로, 저장된 레코드로부터
//! 매수가 0 같은 잘못된 포지션이 만들어질 수 없습니다.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Symbol;
use crate::{
    error::{LedgerError, ValidationError},
    pnl::notional,
};

/// 가격이 0보다 큰지 검증.
pub(crate) fn ensure_positive_price(
    field: &'static str,
    price: Decimal,
) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice { field, price });
    }
    Ok(price)
}

/// 수량이 양의 정수인지 검증.
pub(crate) fn ensure_positive_quantity(quantity: i64) -> Result<u64, ValidationError> {
    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity { quantity });
    }
    Ok(quantity as u64)
}

// =============================================================================
// 보유 포지션 (OpenPosition)
// =============================================================================

/// 보유 중인 단일 종목 포지션.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "OpenPositionRecord")]
pub struct OpenPosition {
    /// 종목 코드
    symbol: Symbol,
    /// 보유 수량
    quantity: u64,
    /// 주당 매수가
    #[serde(with = "rust_decimal::serde::str")]
    buy_price: Decimal,
}

impl OpenPosition {
    /// 입력을 검증하여 새 포지션 생성.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptySymbol`: 종목 코드 누락
    /// - `ValidationError::NonPositiveQuantity`: 수량 0 이하
    /// - `ValidationError::NonPositivePrice`: 매수가 0 이하
    pub fn new(symbol: &str, quantity: i64, buy_price: Decimal) -> Result<Self, ValidationError> {
        Ok(Self {
            symbol: Symbol::parse(symbol)?,
            quantity: ensure_positive_quantity(quantity)?,
            buy_price: ensure_positive_price("buy_price", buy_price)?,
        })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    /// 매입 금액 (quantity * buy_price).
    pub fn cost(&self) -> Result<Decimal, LedgerError> {
        notional(self.quantity, self.buy_price)
    }
}

#[derive(Deserialize)]
struct OpenPositionRecord {
    symbol: String,
    quantity: i64,
    #[serde(with = "rust_decimal::serde::str")]
    buy_price: Decimal,
}

impl TryFrom<OpenPositionRecord> for OpenPosition {
    type Error = ValidationError;

    fn try_from(record: OpenPositionRecord) -> Result<Self, Self::Error> {
        Self::new(&record.symbol, record.quantity, record.buy_price)
    }
}

// =============================================================================
// 청산 거래 (ClosedTrade)
// =============================================================================

/// 매도로 청산된 거래 기록.
///
/// 청산 시점에 한 번 생성되며 이후 변경되지 않습니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ClosedTradeRecord")]
pub struct ClosedTrade {
    symbol: Symbol,
    quantity: u64,
    #[serde(with = "rust_decimal::serde::str")]
    buy_price: Decimal,
    /// 주당 매도가
    #[serde(with = "rust_decimal::serde::str")]
    sell_price: Decimal,
    /// 청산 시점에 확정된 실현 손익
    #[serde(with = "rust_decimal::serde::str")]
    realized_pnl: Decimal,
}

impl ClosedTrade {
    /// 보유 포지션을 청산 거래로 전환. 원장에서만 호출합니다.
    pub(crate) fn from_position(
        position: OpenPosition,
        sell_price: Decimal,
        realized_pnl: Decimal,
    ) -> Self {
        Self {
            symbol: position.symbol,
            quantity: position.quantity,
            buy_price: position.buy_price,
            sell_price,
            realized_pnl,
        }
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn quantity(&self) -> u64 {
        self.quantity
    }

    pub fn buy_price(&self) -> Decimal {
        self.buy_price
    }

    pub fn sell_price(&self) -> Decimal {
        self.sell_price
    }

    pub fn realized_pnl(&self) -> Decimal {
        self.realized_pnl
    }

    /// 이익 거래 여부 (손익 0은 이익으로 보지 않음).
    pub fn is_win(&self) -> bool {
        self.realized_pnl > Decimal::ZERO
    }
}

#[derive(Deserialize)]
struct ClosedTradeRecord {
    symbol: String,
    quantity: i64,
    #[serde(with = "rust_decimal::serde::str")]
    buy_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    sell_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    realized_pnl: Decimal,
}

impl TryFrom<ClosedTradeRecord> for ClosedTrade {
    type Error = ValidationError;

    fn try_from(record: ClosedTradeRecord) -> Result<Self, Self::Error> {
        let position = OpenPosition::new(&record.symbol, record.quantity, record.buy_price)?;
        let sell_price = ensure_positive_price("sell_price", record.sell_price)?;
        Ok(Self::from_position(position, sell_price, record.realized_pnl))
    }
}

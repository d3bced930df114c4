//! 시세 조회 추상화.
//!
//! 원장과 손익 엔진은 시세 출처를 알지 못합니다. 종목 코드를 받아 최근
//! 체결가 또는 "조회 불가"를 돌려주는 동기 함수로만 취급합니다.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::domain::Symbol;

/// 종목별 현재가 제공자.
pub trait PriceSource {
    /// 현재가 조회. 조회할 수 없으면 `None`.
    fn price_of(&self, symbol: &Symbol) -> Option<Decimal>;
}

impl<F> PriceSource for F
where
    F: Fn(&Symbol) -> Option<Decimal>,
{
    fn price_of(&self, symbol: &Symbol) -> Option<Decimal> {
        self(symbol)
    }
}

/// 특정 시점에 수집한 종목별 현재가.
///
/// 0 이하 가격은 저장하지 않으므로 조회 불가로 취급됩니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PriceSnapshot {
    prices: HashMap<Symbol, Decimal>,
}

impl PriceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// 현재가 설정. 기존 값은 덮어씁니다.
    ///
    /// 가격이 0 이하이면 저장하지 않고 `false`를 반환합니다.
    pub fn insert(&mut self, symbol: Symbol, price: Decimal) -> bool {
        if price <= Decimal::ZERO {
            return false;
        }
        self.prices.insert(symbol, price);
        true
    }

    /// 다른 스냅샷의 가격으로 덮어쓰기 (수동 입력 가격 우선 적용용).
    pub fn merge(&mut self, other: PriceSnapshot) {
        self.prices.extend(other.prices);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceSource for PriceSnapshot {
    fn price_of(&self, symbol: &Symbol) -> Option<Decimal> {
        self.prices.get(symbol).copied()
    }
}

impl FromIterator<(Symbol, Decimal)> for PriceSnapshot {
    fn from_iter<I: IntoIterator<Item = (Symbol, Decimal)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (symbol, price) in iter {
            snapshot.insert(symbol, price);
        }
        snapshot
    }
}

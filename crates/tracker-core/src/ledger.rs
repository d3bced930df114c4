//! 포지션 원장.
//!
//! 보유 포지션과 청산 거래 기록을 함께 소유합니다.
//!
//! - 종목당 보유 포지션은 최대 1개 (중복 매수는 거부)
//! - 청산 기록은 청산 순서대로 추가만 가능
//! - 실패한 연산은 원장을 변경하지 않음
//!
//! # 사용 예시
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tracker_core::Ledger;
//!
//! let mut ledger = Ledger::new();
//! ledger.open("ABC", 50, dec!(5.00))?;
//!
//! let trade = ledger.close("abc", dec!(6.00))?;
//! assert_eq!(trade.realized_pnl(), dec!(50.00));
//! assert!(ledger.list_open().is_empty());
//! # Ok::<(), tracker_core::LedgerError>(())
//! ```

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    domain::{ensure_positive_price, ClosedTrade, OpenPosition, Symbol},
    error::{LedgerError, Result, ValidationError},
    pnl::PnlEngine,
};

/// 보유 포지션과 청산 기록을 관리하는 원장.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ledger {
    /// 종목별 보유 포지션
    positions: HashMap<Symbol, OpenPosition>,
    /// 보유 포지션의 추가 순서
    open_order: Vec<Symbol>,
    /// 청산 기록 (청산 순서)
    closed_trades: Vec<ClosedTrade>,
    /// 손익 계산 엔진
    engine: PnlEngine,
}

impl Ledger {
    /// 기본 수수료 체계로 빈 원장 생성.
    pub fn new() -> Self {
        Self::default()
    }

    /// 지정한 엔진으로 빈 원장 생성.
    pub fn with_engine(engine: PnlEngine) -> Self {
        Self {
            engine,
            ..Self::default()
        }
    }

    /// 저장된 레코드로부터 원장 복원.
    ///
    /// `open_positions`의 순서가 보유 순서가 됩니다.
    ///
    /// # Errors
    ///
    /// 같은 종목의 보유 포지션이 둘 이상이면 `ValidationError::DuplicateSymbol`.
    pub fn restore(
        engine: PnlEngine,
        open_positions: Vec<OpenPosition>,
        closed_trades: Vec<ClosedTrade>,
    ) -> Result<Self> {
        let mut ledger = Self::with_engine(engine);
        for position in open_positions {
            ledger.insert(position)?;
        }
        ledger.closed_trades = closed_trades;
        Ok(ledger)
    }

    pub fn engine(&self) -> &PnlEngine {
        &self.engine
    }

    /// 새 포지션 매수 기록.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptySymbol` / `NonPositiveQuantity` / `NonPositivePrice`
    /// - `ValidationError::DuplicateSymbol`: 이미 보유 중인 종목
    pub fn open(&mut self, symbol: &str, quantity: i64, buy_price: Decimal) -> Result<OpenPosition> {
        let position = OpenPosition::new(symbol, quantity, buy_price)?;
        self.insert(position.clone())?;
        Ok(position)
    }

    /// 보유 포지션을 매도가로 청산하고 청산 기록에 추가.
    ///
    /// 청산 기록 추가와 보유 포지션 제거는 함께 일어나며,
    /// 에러가 반환되면 둘 다 일어나지 않습니다.
    ///
    /// # Errors
    ///
    /// - `ValidationError::EmptySymbol` / `NonPositivePrice`: 잘못된 입력
    /// - `LedgerError::NotFound`: 해당 종목의 보유 포지션 없음
    /// - `LedgerError::Overflow`: 실현 손익이 `Decimal` 범위 초과
    pub fn close(&mut self, symbol: &str, sell_price: Decimal) -> Result<ClosedTrade> {
        let symbol = Symbol::parse(symbol)?;
        let sell_price = ensure_positive_price("sell_price", sell_price)?;

        let position = self
            .positions
            .get(&symbol)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound {
                symbol: symbol.to_string(),
            })?;
        let realized_pnl =
            self.engine
                .realized_pnl(position.buy_price(), sell_price, position.quantity())?;

        // 여기부터 원장 변경. 이후로는 실패하지 않음
        self.positions.remove(&symbol);
        self.open_order.retain(|s| s != &symbol);
        let trade = ClosedTrade::from_position(position, sell_price, realized_pnl);
        self.closed_trades.push(trade.clone());

        Ok(trade)
    }

    /// 보유 포지션 스냅샷 (보유 순서).
    pub fn list_open(&self) -> Vec<OpenPosition> {
        self.open_positions().cloned().collect()
    }

    /// 청산 기록 스냅샷 (청산 순서).
    pub fn list_history(&self) -> Vec<ClosedTrade> {
        self.closed_trades.clone()
    }

    /// 보유 포지션 순회 (보유 순서).
    pub fn open_positions(&self) -> impl Iterator<Item = &OpenPosition> + '_ {
        self.open_order
            .iter()
            .filter_map(|symbol| self.positions.get(symbol))
    }

    /// 청산 기록 참조.
    pub fn closed_trades(&self) -> &[ClosedTrade] {
        &self.closed_trades
    }

    /// 보유 종목 수.
    pub fn open_count(&self) -> usize {
        self.open_order.len()
    }

    fn insert(&mut self, position: OpenPosition) -> Result<()> {
        if self.positions.contains_key(position.symbol()) {
            return Err(ValidationError::DuplicateSymbol {
                symbol: position.symbol().to_string(),
            }
            .into());
        }
        self.open_order.push(position.symbol().clone());
        self.positions.insert(position.symbol().clone(), position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn test_open_position() {
        let mut ledger = Ledger::new();
        let position = ledger.open("rhbbank.kl", 100, dec!(6.25)).unwrap();

        assert_eq!(position.symbol().as_str(), "RHBBANK.KL");
        assert_eq!(ledger.list_open(), vec![position]);
        assert_eq!(ledger.open_count(), 1);

        // 정규화 후 같은 종목이므로 청산 가능
        assert!(ledger.close(" rhbbank.kl ", dec!(6.50)).is_ok());
    }

    #[test]
    fn test_duplicate_position_fails() {
        let mut ledger = Ledger::new();
        ledger.open("ABC", 10, dec!(1.00)).unwrap();

        let result = ledger.open("abc", 20, dec!(2.00));
        assert_eq!(
            result,
            Err(LedgerError::Validation(ValidationError::DuplicateSymbol {
                symbol: "ABC".to_string()
            }))
        );

        let open = ledger.list_open();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].quantity(), 10);
        assert_eq!(open[0].buy_price(), dec!(1.00));
    }

    #[test]
    fn test_close_position() {
        let mut ledger = Ledger::new();
        ledger.open("ABC", 50, dec!(5.00)).unwrap();

        let trade = ledger.close("ABC", dec!(6.00)).unwrap();
        assert_eq!(trade.realized_pnl(), dec!(50.00));
        assert_eq!(trade.sell_price(), dec!(6.00));
        assert_eq!(ledger.open_count(), 0);
        assert_eq!(ledger.list_history(), vec![trade]);
    }

    #[test]
    fn test_close_missing_symbol() {
        let mut ledger = Ledger::new();
        ledger.open("ABC", 50, dec!(5.00)).unwrap();
        let before = ledger.clone();

        let result = ledger.close("XYZ", dec!(6.00));
        assert_eq!(
            result,
            Err(LedgerError::NotFound {
                symbol: "XYZ".to_string()
            })
        );
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_close_invalid_sell_price() {
        let mut ledger = Ledger::new();
        ledger.open("ABC", 50, dec!(5.00)).unwrap();
        let before = ledger.clone();

        let result = ledger.close("ABC", dec!(0));
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::NonPositivePrice {
                field: "sell_price",
                ..
            }))
        ));
        assert_eq!(ledger, before);
    }

    #[test]
    fn test_open_order_preserved_after_close() {
        let mut ledger = Ledger::new();
        ledger.open("CCC", 1, dec!(1)).unwrap();
        ledger.open("AAA", 1, dec!(1)).unwrap();
        ledger.open("BBB", 1, dec!(1)).unwrap();

        ledger.close("AAA", dec!(2)).unwrap();
        ledger.open("AAA", 2, dec!(3)).unwrap();

        let symbols: Vec<String> = ledger
            .list_open()
            .iter()
            .map(|p| p.symbol().to_string())
            .collect();
        assert_eq!(symbols, vec!["CCC", "BBB", "AAA"]);
    }

    #[test]
    fn test_close_overflow_leaves_ledger_unchanged() {
        let mut ledger = Ledger::new();
        ledger.open("BIG", i64::MAX, dec!(1)).unwrap();
        let before = ledger.clone();

        let result = ledger.close("BIG", dec!(1_000_000_000_000));
        assert_eq!(
            result,
            Err(LedgerError::Overflow {
                operation: "realized_pnl"
            })
        );
        assert_eq!(ledger, before);
        assert_eq!(ledger.open_count(), 1);
        assert!(ledger.closed_trades().is_empty());

        // 범위 안의 매도가로는 정상 청산
        let trade = ledger.close("BIG", dec!(2)).unwrap();
        assert_eq!(trade.realized_pnl(), Decimal::from(i64::MAX));
    }

    #[test]
    fn test_restore_rejects_duplicates() {
        let a = OpenPosition::new("AAA", 1, dec!(1)).unwrap();
        let b = OpenPosition::new("aaa", 2, dec!(2)).unwrap();

        let result = Ledger::restore(PnlEngine::default(), vec![a, b], Vec::new());
        assert!(matches!(
            result,
            Err(LedgerError::Validation(ValidationError::DuplicateSymbol { .. }))
        ));
    }
}

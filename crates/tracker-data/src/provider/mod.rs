//! 현재가 조회 제공자.
//!
//! 외부 시세 출처에서 종목별 최근 종가를 가져와 [`PriceSnapshot`]으로
//! 모읍니다. 원장은 스냅샷만 동기적으로 참조합니다.

mod yahoo;

use std::time::Duration;

use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};
use tracker_core::{PriceSnapshot, Symbol};

pub use yahoo::{close_to_decimal, YahooPriceProvider};

/// 시세 조회 에러
#[derive(Debug, Error)]
pub enum PriceError {
    #[error("Yahoo Finance 연결 실패: {0}")]
    ConnectionError(String),

    #[error("API 요청 실패 ({symbol}): {message}")]
    ApiError { symbol: String, message: String },

    #[error("데이터 파싱 실패 ({symbol}): {message}")]
    ParseError { symbol: String, message: String },

    #[error("데이터 없음: {symbol}")]
    NoData { symbol: String },
}

/// 현재가 제공자 트레잇.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// 종목의 가장 최근 종가 조회.
    async fn latest_price(&self, symbol: &Symbol) -> Result<Decimal, PriceError>;
}

/// 여러 종목의 현재가를 순차 조회해 스냅샷 생성.
///
/// 요청 사이에 `delay`만큼 대기합니다. 특정 종목 조회 실패는 경고 로그만
/// 남기고 건너뛰며, 해당 종목은 스냅샷에서 빠집니다.
pub async fn fetch_snapshot<P>(provider: &P, symbols: &[Symbol], delay: Duration) -> PriceSnapshot
where
    P: PriceProvider + ?Sized,
{
    let mut snapshot = PriceSnapshot::new();

    for (i, symbol) in symbols.iter().enumerate() {
        if i > 0 && !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        match provider.latest_price(symbol).await {
            Ok(price) => {
                if snapshot.insert(symbol.clone(), price) {
                    debug!(symbol = %symbol, price = %price, "현재가 조회 완료");
                } else {
                    warn!(symbol = %symbol, price = %price, "유효하지 않은 현재가, 건너뜀");
                }
            }
            Err(e) => {
                warn!(symbol = %symbol, error = %e, "현재가 조회 실패, 건너뜀");
            }
        }
    }

    debug!(requested = symbols.len(), priced = snapshot.len(), "현재가 스냅샷 생성");
    snapshot
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal_macros::dec;
    use tracker_core::PriceSource;

    use super::*;

    /// 고정된 가격표를 돌려주는 테스트용 제공자
    struct FixedProvider {
        prices: HashMap<String, Decimal>,
        calls: AtomicUsize,
    }

    impl FixedProvider {
        fn new(prices: &[(&str, Decimal)]) -> Self {
            Self {
                prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl PriceProvider for FixedProvider {
        async fn latest_price(&self, symbol: &Symbol) -> Result<Decimal, PriceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prices
                .get(symbol.as_str())
                .copied()
                .ok_or_else(|| PriceError::NoData {
                    symbol: symbol.to_string(),
                })
        }
    }

    fn symbols(raw: &[&str]) -> Vec<Symbol> {
        raw.iter().map(|s| Symbol::parse(s).unwrap()).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_snapshot_skips_failures() {
        let provider = FixedProvider::new(&[("AAA", dec!(1.5)), ("CCC", dec!(0))]);
        let symbols = symbols(&["AAA", "BBB", "CCC"]);

        let snapshot = fetch_snapshot(&provider, &symbols, Duration::from_millis(300)).await;

        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.price_of(&symbols[0]), Some(dec!(1.5)));
        assert_eq!(snapshot.price_of(&symbols[1]), None);
        assert_eq!(snapshot.price_of(&symbols[2]), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_snapshot_waits_between_requests() {
        let provider = FixedProvider::new(&[("AAA", dec!(1)), ("BBB", dec!(2))]);
        let symbols = symbols(&["AAA", "BBB"]);

        let started = tokio::time::Instant::now();
        fetch_snapshot(&provider, &symbols, Duration::from_millis(300)).await;

        assert!(started.elapsed() >= Duration::from_millis(300));
    }

    #[tokio::test]
    async fn test_fetch_snapshot_empty() {
        let provider = FixedProvider::new(&[]);
        let snapshot = fetch_snapshot(&provider, &[], Duration::ZERO).await;
        assert!(snapshot.is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }
}

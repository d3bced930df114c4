//! Yahoo Finance 현재가 제공자.
//!
//! 일봉 조회 결과의 마지막 종가를 현재가로 사용합니다.

use async_trait::async_trait;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::debug;
use tracker_core::Symbol;
use yahoo_finance_api as yahoo;

use super::{PriceError, PriceProvider};

/// 기본 조회 기간 (주말/휴장일 고려)
const DEFAULT_RANGE: &str = "5d";

/// Yahoo 종가의 유효 소수점 자리수
const PRICE_DECIMALS: u32 = 4;

/// Yahoo Finance 기반 현재가 제공자.
pub struct YahooPriceProvider {
    connector: yahoo::YahooConnector,
    range: String,
}

impl YahooPriceProvider {
    /// 기본 조회 기간(5d)으로 생성.
    pub fn new() -> Result<Self, PriceError> {
        Self::with_range(DEFAULT_RANGE)
    }

    /// 조회 기간을 지정해 생성 (예: "5d", "1mo").
    pub fn with_range(range: impl Into<String>) -> Result<Self, PriceError> {
        let connector = yahoo::YahooConnector::new()
            .map_err(|e| PriceError::ConnectionError(format!("{}", e)))?;

        Ok(Self {
            connector,
            range: range.into(),
        })
    }
}

#[async_trait]
impl PriceProvider for YahooPriceProvider {
    async fn latest_price(&self, symbol: &Symbol) -> Result<Decimal, PriceError> {
        debug!(symbol = %symbol, range = %self.range, "현재가 조회");

        let response = self
            .connector
            .get_quote_range(symbol.as_str(), "1d", &self.range)
            .await
            .map_err(|e| PriceError::ApiError {
                symbol: symbol.to_string(),
                message: format!("{}", e),
            })?;

        let quotes = response.quotes().map_err(|e| PriceError::ParseError {
            symbol: symbol.to_string(),
            message: format!("{}", e),
        })?;

        let last = quotes.last().ok_or_else(|| PriceError::NoData {
            symbol: symbol.to_string(),
        })?;

        close_to_decimal(symbol, last.close)
    }
}

/// Yahoo 종가(f64)를 Decimal로 변환.
///
/// 종가에는 f32 정밀도 잡음(예: 9.800000190734863)이 섞여 있으므로
/// 소수점 4자리로 반올림합니다. NaN, 무한대, 0 이하 값은 데이터 없음으로
/// 처리합니다.
pub fn close_to_decimal(symbol: &Symbol, close: f64) -> Result<Decimal, PriceError> {
    if !close.is_finite() {
        return Err(PriceError::ParseError {
            symbol: symbol.to_string(),
            message: format!("유효하지 않은 종가: {}", close),
        });
    }

    let price = Decimal::from_f64(close)
        .ok_or_else(|| PriceError::ParseError {
            symbol: symbol.to_string(),
            message: format!("종가 변환 실패: {}", close),
        })?
        .round_dp(PRICE_DECIMALS)
        .normalize();

    if price <= Decimal::ZERO {
        return Err(PriceError::NoData {
            symbol: symbol.to_string(),
        });
    }

    Ok(price)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).unwrap()
    }

    #[test]
    fn test_close_to_decimal_rounds_float_noise() {
        let price = close_to_decimal(&symbol("MAYBANK.KL"), 9.800000190734863).unwrap();
        assert_eq!(price, dec!(9.8));
        assert_eq!(price.to_string(), "9.8");
    }

    #[test]
    fn test_close_to_decimal_rejects_invalid() {
        let s = symbol("AAA");
        assert!(matches!(
            close_to_decimal(&s, f64::NAN),
            Err(PriceError::ParseError { .. })
        ));
        assert!(matches!(
            close_to_decimal(&s, f64::INFINITY),
            Err(PriceError::ParseError { .. })
        ));
        assert!(matches!(
            close_to_decimal(&s, 0.0),
            Err(PriceError::NoData { .. })
        ));
        assert!(matches!(
            close_to_decimal(&s, 0.00001),
            Err(PriceError::NoData { .. })
        ));
    }

    #[tokio::test]
    #[ignore] // 실제 API 호출 필요
    async fn test_latest_price_integration() {
        let provider = YahooPriceProvider::new().expect("Provider 생성 실패");
        let result = provider.latest_price(&symbol("1155.KL")).await;

        match result {
            Ok(price) => {
                println!("1155.KL: {}", price);
                assert!(price > Decimal::ZERO);
            }
            Err(e) => {
                println!("API 호출 실패 (네트워크 문제일 수 있음): {}", e);
            }
        }
    }
}

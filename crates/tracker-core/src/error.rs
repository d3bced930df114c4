//! 원장 및 손익 계산 에러 타입.
//!
//! 모든 에러는 동기적으로 반환되며, 에러가 발생한 연산은 원장 상태를
//! 변경하지 않습니다.

use rust_decimal::Decimal;
use thiserror::Error;

/// 입력 검증 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// 공백 제거 후 종목 코드가 비어 있음
    #[error("종목 코드가 비어 있습니다")]
    EmptySymbol,

    /// 수량이 0 이하
    #[error("수량은 양의 정수여야 합니다: {quantity}")]
    NonPositiveQuantity { quantity: i64 },

    /// 가격이 0 이하
    #[error("{field}은(는) 0보다 커야 합니다: {price}")]
    NonPositivePrice { field: &'static str, price: Decimal },

    /// 이미 보유 중인 종목을 다시 매수하려 함
    #[error("이미 보유 중인 종목입니다: {symbol}")]
    DuplicateSymbol { symbol: String },

    /// 수수료 체계 파라미터가 허용 범위를 벗어남
    #[error("잘못된 수수료 설정 {field}: {value}")]
    InvalidFeeParameter { field: &'static str, value: Decimal },
}

/// 원장(Ledger) 에러.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("입력 검증 실패: {0}")]
    Validation(#[from] ValidationError),

    #[error("보유 포지션을 찾을 수 없음: {symbol}")]
    NotFound { symbol: String },

    /// 매수가가 0인 상태에서 손익률 계산.
    #[error("0으로 나눌 수 없습니다 (매수가 0)")]
    Division,

    /// 금액 계산 결과가 `Decimal` 표현 범위를 벗어남
    #[error("계산 범위를 초과했습니다: {operation}")]
    Overflow { operation: &'static str },
}

impl LedgerError {
    /// 검증 에러 여부.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// NotFound 에러 여부.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// 계산 범위 초과 에러 여부.
    pub fn is_overflow(&self) -> bool {
        matches!(self, Self::Overflow { .. })
    }
}

/// Result 타입 별칭
pub type Result<T> = std::result::Result<T, LedgerError>;

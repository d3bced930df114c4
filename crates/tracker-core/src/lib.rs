//! 주식 포트폴리오 원장 및 손익 계산.
//!
//! 이 crate는 다음을 제공합니다:
//! - 종목별 보유 포지션과 청산 거래 기록을 관리하는 원장
//! - 수수료 및 미실현/실현 손익 계산 엔진
//! - 시세 출처 추상화 (`PriceSource`)
//! - 포트폴리오 평가와 거래 기록 요약
//!
//! 입출력(시세 조회, 파일 저장)은 포함하지 않으며 `tracker-data`가 담당합니다.
//!
//! # 예제
//!
//! ```rust
//! use rust_decimal_macros::dec;
//! use tracker_core::{Ledger, PortfolioReport, PriceSnapshot, Symbol};
//!
//! let mut ledger = Ledger::new();
//! ledger.open("MAYBANK.KL", 100, dec!(9.50))?;
//!
//! let prices: PriceSnapshot = [(Symbol::parse("MAYBANK.KL")?, dec!(9.80))]
//!     .into_iter()
//!     .collect();
//! let report = PortfolioReport::build(&ledger, &prices)?;
//! assert_eq!(report.totals.unrealized_pnl, dec!(30.00));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod domain;
pub mod error;
pub mod ledger;
pub mod pnl;
pub mod price;
pub mod report;

// 주요 타입 재내보내기
pub use domain::{ClosedTrade, OpenPosition, Symbol};
pub use error::{LedgerError, Result, ValidationError};
pub use ledger::Ledger;
pub use pnl::{FeeBreakdown, FeeSchedule, PnlEngine, UnrealizedPnl};
pub use price::{PriceSnapshot, PriceSource};
pub use report::{
    display_round, HistorySummary, PortfolioReport, ValuationRow, ValuationTotals,
    DISPLAY_DECIMALS,
};

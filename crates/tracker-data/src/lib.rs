//! 포트폴리오 추적기 외부 연동.
//!
//! 이 crate는 다음을 제공합니다:
//! - Yahoo Finance 현재가 조회 및 스냅샷 수집
//! - JSON 파일 원장 저장소
//!
//! # 예제
//!
//! ```rust,ignore
//! use std::time::Duration;
//! use tracker_data::{fetch_snapshot, LedgerStore, YahooPriceProvider};
//!
//! let store = LedgerStore::new("data/ledger.json");
//! let ledger = store.load(Default::default())?;
//!
//! let symbols: Vec<_> = ledger.open_positions().map(|p| p.symbol().clone()).collect();
//! let provider = YahooPriceProvider::new()?;
//! let prices = fetch_snapshot(&provider, &symbols, Duration::from_millis(300)).await;
//! ```

pub mod provider;
pub mod store;

// 주요 타입 재내보내기
pub use provider::{close_to_decimal, fetch_snapshot, PriceError, PriceProvider, YahooPriceProvider};
pub use store::{LedgerStore, StoreError};

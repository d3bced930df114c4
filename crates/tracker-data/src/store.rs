//! JSON 파일 기반 원장 저장소.
//!
//! 문서 형식:
//!
//! ```json
//! {
//!   "open_positions": [{ "symbol": "ABC", "quantity": 50, "buy_price": "5.00" }],
//!   "closed_trades": [
//!     { "symbol": "XYZ", "quantity": 10, "buy_price": "2.00",
//!       "sell_price": "2.50", "realized_pnl": "5.00" }
//!   ]
//! }
//! ```
//!
//! 저장은 임시 파일에 쓴 뒤 이름을 바꾸는 방식이라 중간에 실패해도 기존
//! 파일이 손상되지 않습니다.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use tracker_core::{ClosedTrade, Ledger, LedgerError, OpenPosition, PnlEngine};

/// 저장소 에러
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("원장 파일 입출력 실패 ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("원장 파일 형식 오류: {0}")]
    Serde(#[from] serde_json::Error),

    /// 레코드는 유효하지만 원장 불변식을 위반 (예: 중복 보유 종목)
    #[error("손상된 원장 파일 ({}): {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: LedgerError,
    },
}

/// 저장 문서
#[derive(Debug, Default, Serialize, Deserialize)]
struct LedgerDocument {
    #[serde(default)]
    open_positions: Vec<OpenPosition>,
    #[serde(default)]
    closed_trades: Vec<ClosedTrade>,
}

/// JSON 원장 저장소.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 원장 로드. 파일이 없으면 빈 원장을 반환합니다.
    pub fn load(&self, engine: PnlEngine) -> Result<Ledger, StoreError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "원장 파일 없음, 빈 원장으로 시작");
                return Ok(Ledger::with_engine(engine));
            }
            Err(source) => return Err(self.io_error(source)),
        };

        let document: LedgerDocument = serde_json::from_slice(&bytes)?;
        let ledger = Ledger::restore(engine, document.open_positions, document.closed_trades)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.clone(),
                source,
            })?;

        debug!(
            path = %self.path.display(),
            open = ledger.open_count(),
            closed = ledger.closed_trades().len(),
            "원장 로드 완료"
        );
        Ok(ledger)
    }

    /// 원장 저장 (임시 파일 + rename).
    pub fn save(&self, ledger: &Ledger) -> Result<(), StoreError> {
        let document = LedgerDocument {
            open_positions: ledger.list_open(),
            closed_trades: ledger.list_history(),
        };
        let json = serde_json::to_vec_pretty(&document)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| self.io_error(source))?;
        }

        let tmp_path = self.tmp_path();
        fs::write(&tmp_path, json).map_err(|source| self.io_error(source))?;
        fs::rename(&tmp_path, &self.path).map_err(|source| self.io_error(source))?;

        info!(
            path = %self.path.display(),
            open = document.open_positions.len(),
            closed = document.closed_trades.len(),
            "원장 저장 완료"
        );
        Ok(())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "ledger.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

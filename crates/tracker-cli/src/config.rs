//! 설정 로드 모듈.
//!
//! 우선순위 (뒤가 앞을 덮어씀):
//! 1. 기본값
//! 2. TOML 설정 파일 (`--config`, 기본 `config/tracker.toml`)
//! 3. `TRACKER__` 접두사 환경변수 (예: `TRACKER__FEES__MIN_FEE=10`)

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracker_core::{FeeSchedule, PnlEngine};

/// 기본 설정 파일 경로 (없으면 무시)
pub const DEFAULT_CONFIG_PATH: &str = "config/tracker.toml";

const ENV_PREFIX: &str = "TRACKER";
const ENV_SEPARATOR: &str = "__";

/// 추적기 전체 설정
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// 수수료 체계
    pub fees: FeeSchedule,
    /// 원장 저장 설정
    pub storage: StorageConfig,
    /// 시세 조회 설정
    pub market: MarketConfig,
}

/// 원장 저장 설정
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// 원장 JSON 파일 경로
    /// 기본값: data/ledger.json
    pub ledger_path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            ledger_path: PathBuf::from("data/ledger.json"),
        }
    }
}

/// 시세 조회 설정
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// 표시용 통화 단위
    /// 기본값: RM
    pub currency: String,
    /// Yahoo Finance 요청 간 딜레이 (밀리초)
    /// 기본값: 300ms
    pub request_delay_ms: u64,
    /// 일봉 조회 기간
    /// 기본값: 5d
    pub range: String,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            currency: "RM".to_string(),
            request_delay_ms: 300,
            range: "5d".to_string(),
        }
    }
}

impl MarketConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl TrackerConfig {
    /// 설정 파일과 환경변수에서 설정 로드.
    ///
    /// `path`를 지정하면 해당 파일이 반드시 있어야 하며, 생략하면
    /// [`DEFAULT_CONFIG_PATH`]가 있을 때만 읽습니다.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_env(path, None)
    }

    /// 환경변수 원본을 지정해 로드 (`None`이면 프로세스 환경변수).
    fn load_with_env(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let file = match path {
            Some(path) => ::config::File::from(path).required(true),
            None => ::config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .source(env),
            )
            .build()
            .context("설정 로드 실패")?;

        let config: Self = settings
            .try_deserialize()
            .context("설정 형식이 올바르지 않습니다")?;
        config.validate()?;
        Ok(config)
    }

    /// 설정값 검증.
    pub fn validate(&self) -> Result<()> {
        self.fees.validate().context("수수료 설정 오류")?;

        if self.storage.ledger_path.as_os_str().is_empty() {
            bail!("storage.ledger_path가 비어 있습니다");
        }
        if self.market.range.trim().is_empty() {
            bail!("market.range가 비어 있습니다");
        }
        Ok(())
    }

    /// 설정된 수수료 체계를 사용하는 손익 엔진.
    pub fn engine(&self) -> PnlEngine {
        PnlEngine::new(self.fees)
    }
}

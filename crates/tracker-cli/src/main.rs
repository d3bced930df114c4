//! 주식 포트폴리오 추적기 CLI.
//!
//! # 사용 예시
//!
//! ```bash
//! # 매수 기록
//! tracker buy RHBBANK.KL 100 6.25
//!
//! # 매도 및 실현 손익 기록
//! tracker sell RHBBANK.KL 6.50
//!
//! # 보유 포트폴리오 평가 (Yahoo Finance 현재가)
//! tracker portfolio
//!
//! # 수동 가격으로 오프라인 평가
//! tracker portfolio --offline --price MAYBANK.KL=9.80
//!
//! # 청산 기록 및 수수료 계산
//! tracker history
//! tracker fees 1000 2.35
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use tracker_core::Symbol;

mod commands;
mod config;

use commands::{
    fees::{render_fees, run_fees},
    history::{render_history, run_history},
    portfolio::{parse_price_override, render_portfolio, run_portfolio, PortfolioOptions},
    trade::{render_buy, render_sell, run_buy, run_sell},
};
use config::TrackerConfig;

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Stock portfolio tracker - 포지션 원장 및 손익 계산", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// 설정 파일 경로 (기본: config/tracker.toml, 없으면 기본값 사용)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// 로그 레벨 (trace, debug, info, warn, error)
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// 매수 포지션 추가
    Buy {
        /// 종목 코드 (예: RHBBANK.KL)
        symbol: String,

        /// 수량 (양의 정수)
        #[arg(allow_negative_numbers = true)]
        quantity: i64,

        /// 매수가
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
    },

    /// 보유 포지션 매도 및 청산 기록
    Sell {
        /// 종목 코드
        symbol: String,

        /// 매도가
        #[arg(allow_negative_numbers = true)]
        price: Decimal,
    },

    /// 보유 포트폴리오 평가
    Portfolio {
        /// 수동 현재가 (SYMBOL=PRICE, 반복 가능)
        #[arg(short, long = "price", value_parser = parse_price_override)]
        prices: Vec<(Symbol, Decimal)>,

        /// 시세 조회 없이 수동 현재가만 사용
        #[arg(long)]
        offline: bool,
    },

    /// 청산 거래 기록 조회
    History,

    /// 거래 금액에 대한 수수료 계산
    Fees {
        /// 수량
        quantity: i64,

        /// 가격
        price: Decimal,
    },
}

/// 로깅 초기화 (stdout은 명령 출력용이므로 stderr 사용).
fn init_tracing(log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("tracker_cli={},tracker_data={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일 로드 (없어도 에러 안남)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let config = TrackerConfig::load(cli.config.as_deref())?;
    tracing::debug!(
        ledger_path = %config.storage.ledger_path.display(),
        currency = %config.market.currency,
        "설정 로드 완료"
    );

    let currency = config.market.currency.as_str();
    let result = match cli.command {
        Commands::Buy {
            symbol,
            quantity,
            price,
        } => run_buy(&config, &symbol, quantity, price)
            .map(|position| print!("{}", render_buy(&position, currency))),

        Commands::Sell { symbol, price } => run_sell(&config, &symbol, price)
            .map(|trade| print!("{}", render_sell(&trade, currency))),

        Commands::Portfolio { prices, offline } => {
            let options = PortfolioOptions {
                manual_prices: prices,
                offline,
            };
            run_portfolio(&config, options)
                .await
                .map(|report| print!("{}", render_portfolio(&report, currency)))
        }

        Commands::History => {
            run_history(&config).map(|view| print!("{}", render_history(&view, currency)))
        }

        Commands::Fees { quantity, price } => run_fees(&config, quantity, price)
            .map(|breakdown| print!("{}", render_fees(&breakdown, currency))),
    };

    if let Err(e) = &result {
        tracing::error!("명령 실패: {:#}", e);
    }
    result
}

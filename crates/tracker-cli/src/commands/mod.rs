//! CLI 명령어 구현.

pub mod fees;
pub mod history;
pub mod portfolio;
pub mod trade;

use rust_decimal::Decimal;
use tracker_core::display_round;

/// 금액 표시 (소수점 2자리 고정).
pub(crate) fn money(value: Decimal) -> String {
    format!("{:.2}", display_round(value))
}

/// 부호 포함 금액 표시.
pub(crate) fn signed_money(value: Decimal) -> String {
    let rounded = display_round(value);
    if rounded > Decimal::ZERO {
        format!("+{:.2}", rounded)
    } else {
        format!("{:.2}", rounded)
    }
}

/// 부호 포함 퍼센트 표시.
pub(crate) fn signed_pct(value: Decimal) -> String {
    format!("{}%", signed_money(value))
}

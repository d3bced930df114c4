//! 도메인 타입.

mod position;
mod symbol;

pub(crate) use position::ensure_positive_price;
pub use position::{ClosedTrade, OpenPosition};
pub use symbol::Symbol;

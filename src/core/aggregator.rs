use crate::domain::model::{OrderSide, OrderUpdate};
use rust_decimal::Decimal;

/// Aggregate of the fills collected for one symbol during a flush window.
#[derive(Debug, Clone, PartialEq)]
pub struct FillSummary {
    pub symbol: String,
    /// Side of the first fill in the batch.
    pub side: OrderSide,
    pub reduce_only: bool,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub realized_pnl: Decimal,
}

/// Folds a batch of fills into one summary, scaling every amount by `multiplier`.
///
/// Returns `None` for an empty batch.
pub fn summarize(symbol: &str, fills: &[OrderUpdate], multiplier: Decimal) -> Option<FillSummary> {
    let first = fills.first()?;

    let mut quantity = Decimal::ZERO;
    let mut notional = Decimal::ZERO;
    let mut realized_pnl = Decimal::ZERO;

    for fill in fills {
        let q = fill.last_filled_qty * multiplier;
        let p = fill.average_price * multiplier;

        quantity += q;
        notional += p * q;
        realized_pnl += fill.realized_profit * multiplier;
    }

    let average_price = if quantity > Decimal::ZERO {
        notional / quantity
    } else {
        Decimal::ZERO
    };

    Some(FillSummary {
        symbol: symbol.to_string(),
        side: first.side,
        reduce_only: fills.iter().any(|f| f.reduce_only),
        quantity,
        average_price,
        realized_pnl,
    })
}

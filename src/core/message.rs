//! Classifies an aggregated batch of fills against the account position and
//! renders the chat message for it.

use crate::core::aggregator::FillSummary;
use crate::domain::model::{OrderSide, PositionSnapshot};
use crate::utils::format::grouped;
use rust_decimal::Decimal;
use std::fmt;

const AMOUNT_DP: u32 = 4;
const PNL_DP: u32 = 2;

/// Amounts below this are treated as a flat position.
fn dust() -> Decimal {
    Decimal::new(1, 5)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Long,
    Short,
}

impl Direction {
    fn label(self) -> &'static str {
        match self {
            Direction::Long => "롱",
            Direction::Short => "숏",
        }
    }

    fn colour(self) -> &'static str {
        match self {
            Direction::Long => "🟢",
            Direction::Short => "🔴",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseOutcome {
    Profit,
    Loss,
    Flat,
}

impl CloseOutcome {
    fn from_pnl(pnl: Decimal) -> Self {
        if pnl > Decimal::ZERO {
            CloseOutcome::Profit
        } else if pnl < Decimal::ZERO {
            CloseOutcome::Loss
        } else {
            CloseOutcome::Flat
        }
    }

    fn icon(self) -> &'static str {
        match self {
            CloseOutcome::Profit => "💰",
            CloseOutcome::Loss => "💧",
            CloseOutcome::Flat => "⚖️",
        }
    }

    fn label(self) -> &'static str {
        match self {
            CloseOutcome::Profit => "익절",
            CloseOutcome::Loss => "손절",
            CloseOutcome::Flat => "청산",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TradeKind {
    /// Position reduced or closed. `remaining` is `None` once fully closed.
    Close {
        outcome: CloseOutcome,
        remaining: Option<Decimal>,
    },
    /// First fills into a flat position.
    Entry,
    /// Fills added to an existing position.
    Add {
        final_entry_price: Decimal,
        final_amount: Decimal,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeReport {
    pub summary: FillSummary,
    pub direction: Direction,
    pub kind: TradeKind,
}

impl TradeReport {
    /// `position` is the account state seen at flush time, after the fills.
    pub fn classify(summary: FillSummary, position: PositionSnapshot) -> Self {
        let has_pnl = summary.realized_pnl != Decimal::ZERO;

        // Without realized PnL the side opened the position, otherwise it closed one.
        let direction = match (has_pnl, summary.side) {
            (false, OrderSide::Buy) | (true, OrderSide::Sell) => Direction::Long,
            (false, OrderSide::Sell) | (true, OrderSide::Buy) => Direction::Short,
        };

        let final_amount = position.amount.abs();

        let kind = if has_pnl || summary.reduce_only {
            TradeKind::Close {
                outcome: CloseOutcome::from_pnl(summary.realized_pnl),
                remaining: (final_amount >= dust()).then_some(final_amount),
            }
        } else if final_amount - summary.quantity < dust() {
            TradeKind::Entry
        } else {
            TradeKind::Add {
                final_entry_price: position.entry_price,
                final_amount,
            }
        };

        Self {
            summary,
            direction,
            kind,
        }
    }
}

impl fmt::Display for TradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.summary;
        let avg = grouped(s.average_price, AMOUNT_DP);
        let qty = grouped(s.quantity, AMOUNT_DP);
        let dir = self.direction.label();

        match &self.kind {
            TradeKind::Close { outcome, remaining } => {
                let (trade_type, detail) = match remaining {
                    None => (
                        outcome.label().to_string(),
                        format!("/ 수량: {} (전량 청산)", qty),
                    ),
                    Some(rest) => (
                        format!("부분 {}", outcome.label()),
                        format!("/ 수량: {} / 남은수량: {}", qty, grouped(*rest, AMOUNT_DP)),
                    ),
                };
                writeln!(
                    f,
                    "{} [{}] {} {} / 평단: {} {}",
                    outcome.icon(),
                    trade_type,
                    s.symbol,
                    dir,
                    avg,
                    detail
                )?;
                write!(f, "확정손익: ${}", grouped(s.realized_pnl, PNL_DP))
            }
            TradeKind::Entry => write!(
                f,
                "{}[진입] {} {} / 평단: {} / 수량: {}",
                self.direction.colour(),
                s.symbol,
                dir,
                avg,
                qty
            ),
            TradeKind::Add {
                final_entry_price,
                final_amount,
            } => {
                writeln!(
                    f,
                    "{}[추가매수] {} {} / 평단: {} / 수량: {}",
                    self.direction.colour(),
                    s.symbol,
                    dir,
                    avg,
                    qty
                )?;
                write!(
                    f,
                    "➡️ 최종평단: {} / 누적수량: {}",
                    grouped(*final_entry_price, AMOUNT_DP),
                    grouped(*final_amount, AMOUNT_DP)
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn summary(symbol: &str, side: OrderSide, qty: &str, avg: &str, pnl: &str, reduce_only: bool) -> FillSummary {
        FillSummary {
            symbol: symbol.to_string(),
            side,
            reduce_only,
            quantity: dec(qty),
            average_price: dec(avg),
            realized_pnl: dec(pnl),
        }
    }

    fn position(amount: &str, entry: &str) -> PositionSnapshot {
        PositionSnapshot {
            amount: dec(amount),
            entry_price: dec(entry),
        }
    }

    #[test]
    fn test_full_take_profit() {
        let report = TradeReport::classify(
            summary("BTCUSDT", OrderSide::Sell, "1", "65000", "50", false),
            position("0", "0"),
        );

        assert_eq!(report.direction, Direction::Long);
        assert_eq!(
            report.to_string(),
            "💰 [익절] BTCUSDT 롱 / 평단: 65,000.0000 / 수량: 1.0000 (전량 청산)\n확정손익: $50.00"
        );
    }

    #[test]
    fn test_partial_stop_loss_on_short() {
        let report = TradeReport::classify(
            summary("ETHUSDT", OrderSide::Buy, "1", "3210.5", "-12.5", false),
            position("-2", "3198"),
        );

        assert_eq!(
            report.kind,
            TradeKind::Close {
                outcome: CloseOutcome::Loss,
                remaining: Some(dec("2")),
            }
        );
        assert_eq!(
            report.to_string(),
            "💧 [부분 손절] ETHUSDT 숏 / 평단: 3,210.5000 / 수량: 1.0000 / 남은수량: 2.0000\n확정손익: $-12.50"
        );
    }

    #[test]
    fn test_reduce_only_without_pnl_is_flat_close() {
        let report = TradeReport::classify(
            summary("XRPUSDT", OrderSide::Sell, "10", "0.5", "0", true),
            position("0.000001", "0.5"),
        );

        // Zero PnL keeps the opening-side reading of the direction.
        assert_eq!(report.direction, Direction::Short);
        assert_eq!(
            report.to_string(),
            "⚖️ [청산] XRPUSDT 숏 / 평단: 0.5000 / 수량: 10.0000 (전량 청산)\n확정손익: $0.00"
        );
    }

    #[test]
    fn test_new_long_entry() {
        let report = TradeReport::classify(
            summary("SOLUSDT", OrderSide::Buy, "1", "100", "0", false),
            position("1", "100"),
        );

        assert_eq!(report.kind, TradeKind::Entry);
        assert_eq!(
            report.to_string(),
            "🟢[진입] SOLUSDT 롱 / 평단: 100.0000 / 수량: 1.0000"
        );
    }

    #[test]
    fn test_entry_before_account_update_arrives() {
        // The book still says flat, so previous amount goes negative.
        let report = TradeReport::classify(
            summary("SOLUSDT", OrderSide::Sell, "2", "100", "0", false),
            PositionSnapshot::default(),
        );
        assert_eq!(report.kind, TradeKind::Entry);
        assert!(report.to_string().starts_with("🔴[진입] SOLUSDT 숏"));
    }

    #[test]
    fn test_add_to_short() {
        let report = TradeReport::classify(
            summary("SOLUSDT", OrderSide::Sell, "1", "110", "0", false),
            position("-3", "105"),
        );

        assert_eq!(
            report.to_string(),
            "🔴[추가매수] SOLUSDT 숏 / 평단: 110.0000 / 수량: 1.0000\n➡️ 최종평단: 105.0000 / 누적수량: 3.0000"
        );
    }
}

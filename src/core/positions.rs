use crate::domain::model::{AccountUpdate, Position, PositionSnapshot};
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Latest known amount and entry price per symbol.
#[derive(Debug, Default, Clone)]
pub struct PositionBook {
    positions: HashMap<String, PositionSnapshot>,
}

impl PositionBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the book with the non-flat positions of a fresh account read.
    pub fn sync(&mut self, positions: Vec<Position>) {
        self.positions = positions
            .into_iter()
            .filter(|p| p.amount != Decimal::ZERO)
            .map(|p| {
                (
                    p.symbol,
                    PositionSnapshot {
                        amount: p.amount,
                        entry_price: p.entry_price,
                    },
                )
            })
            .collect();
    }

    pub fn apply(&mut self, update: &AccountUpdate) {
        for p in &update.positions {
            self.positions.insert(
                p.symbol.clone(),
                PositionSnapshot {
                    amount: p.amount,
                    entry_price: p.entry_price,
                },
            );
        }
    }

    pub fn get(&self, symbol: &str) -> PositionSnapshot {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

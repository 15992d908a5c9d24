use crate::domain::model::{Brand, DecodeResult, RateTable};

/// Supplies "units of foreign currency per 1 EUR". `None` is tolerated and
/// degrades every conversion to a zero rate.
pub trait RateSource: Send + Sync {
    fn rates(&self) -> Option<RateTable>;
}

/// Best-effort decoder consulted when the rule-based result is too weak.
/// Implementations typically call out to an AI service; whatever they return
/// replaces the rule-based result wholesale.
pub trait SerialDecodeFallback: Send + Sync {
    fn decode(&self, brand: Brand, serial: &str) -> Option<DecodeResult>;
}

/// Fixed rates, e.g. from the `[rates]` section of the engine config.
#[derive(Debug, Clone, Default)]
pub struct StaticRates {
    table: Option<RateTable>,
}

impl StaticRates {
    pub fn new(table: RateTable) -> Self {
        Self {
            table: (!table.is_empty()).then_some(table),
        }
    }

    pub fn unavailable() -> Self {
        Self { table: None }
    }
}

impl RateSource for StaticRates {
    fn rates(&self) -> Option<RateTable> {
        self.table.clone()
    }
}

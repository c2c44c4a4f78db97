use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Lower bound of a single refresh multiplier (a 5% drop).
pub const MIN_MULTIPLIER: Decimal = dec!(0.95);
/// Upper bound of a single refresh multiplier (a 5% rise).
pub const MAX_MULTIPLIER: Decimal = dec!(1.05);

/// Decimal places kept on a drawn multiplier.
const MULTIPLIER_DP: u32 = 6;

/// A source of price multipliers for `Market::refresh_prices`.
pub trait PriceShock {
    /// Returns the factor the next quote's price is multiplied by.
    fn next_multiplier(&mut self) -> Decimal;
}

/// Draws multipliers uniformly from `[0.95, 1.05)`.
#[derive(Debug, Clone)]
pub struct RandomShock<R> {
    rng: R,
}

impl<R: Rng> RandomShock<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomShock<StdRng> {
    /// A shock source seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    /// A reproducible shock source.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PriceShock for RandomShock<R> {
    fn next_multiplier(&mut self) -> Decimal {
        let draw: f64 = self.rng.gen_range(0.95..1.05);
        // The f64 bounds are not exactly 0.95 and 1.05, so clamp after conversion.
        let ceiling = MAX_MULTIPLIER - Decimal::new(1, MULTIPLIER_DP);
        Decimal::from_f64(draw)
            .map(|m| m.round_dp_with_strategy(MULTIPLIER_DP, RoundingStrategy::ToZero))
            .map(|m| m.clamp(MIN_MULTIPLIER, ceiling))
            .unwrap_or(Decimal::ONE)
    }
}

/// Replays a fixed list of multipliers, wrapping around at the end.
///
/// An empty script behaves as a flat market (every multiplier is 1).
#[derive(Debug, Clone, Default)]
pub struct ScriptedShock {
    multipliers: Vec<Decimal>,
    cursor: usize,
}

impl ScriptedShock {
    pub fn new(multipliers: impl Into<Vec<Decimal>>) -> Self {
        Self {
            multipliers: multipliers.into(),
            cursor: 0,
        }
    }
}

impl PriceShock for ScriptedShock {
    fn next_multiplier(&mut self) -> Decimal {
        if self.multipliers.is_empty() {
            return Decimal::ONE;
        }
        let m = self.multipliers[self.cursor % self.multipliers.len()];
        self.cursor += 1;
        m
    }
}

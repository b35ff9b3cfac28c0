use thiserror::Error;

use crate::promotion::{CoinFlip, DEFAULT_SEED};


/// Settings for building a [`SkipIndex`] whose promotion strategy is a [`CoinFlip`].
///
/// [`SkipIndex`]: crate::SkipIndex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SkipIndexOptions {
    /// Together with `promotion_denominator`, the probability that a newly inserted key is also
    /// linked into the next level up. Must be strictly between `0` and `1`.
    pub promotion_numerator:   u32,
    pub promotion_denominator: u32,
    /// Seed of the PRNG used for promotion decisions.
    pub seed:                  u64,
}

impl SkipIndexOptions {
    /// Build the [`CoinFlip`] described by these options.
    pub fn coin_flip(&self) -> Result<CoinFlip, OptionsError> {
        CoinFlip::with_bias(self.seed, self.promotion_numerator, self.promotion_denominator)
    }
}

impl Default for SkipIndexOptions {
    /// A fair coin seeded with [`DEFAULT_SEED`].
    #[inline]
    fn default() -> Self {
        Self {
            promotion_numerator:   1,
            promotion_denominator: 2,
            seed:                  DEFAULT_SEED,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsError {
    #[error("the promotion probability has a denominator of zero")]
    ZeroDenominator,
    /// A probability of `0` would never build an upper level, and a probability of `1` would
    /// replicate every key into every level.
    #[error(
        "the promotion probability {numerator}/{denominator} is not strictly between 0 and 1",
    )]
    BiasOutOfRange {
        numerator:   u32,
        denominator: u32,
    },
}

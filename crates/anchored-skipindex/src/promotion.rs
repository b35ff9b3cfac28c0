use oorandom::Rand32;

use crate::options::OptionsError;


/// The maximum number of levels a [`SkipIndex`] will grow to.
///
/// With the default promotion bias of `1/2`, a key is promoted past this many levels roughly once
/// per four billion insertions, so the cap almost never changes the shape of an index. It mostly
/// protects against strategies which always promote.
///
/// [`SkipIndex`]: crate::SkipIndex
pub const MAX_LEVELS: usize = 32;

/// The seed used by [`CoinFlip::default`] and by indices built without an explicit seed.
pub const DEFAULT_SEED: u64 = 0x_5EED_0F_1E_7E15;


/// Decides how far up the levels of a [`SkipIndex`] each newly inserted key is replicated.
///
/// After a new key is linked into `level`, [`promote`] is called with that level. Returning `true`
/// links the key into `level + 1` as well (creating that level if it does not exist yet);
/// returning `false` ends the insertion. The decision is made independently for every level of
/// every insertion.
///
/// Any `FnMut(usize) -> bool` closure is a `Promotion`, which is mostly useful for tests that
/// need a fully deterministic shape.
///
/// [`SkipIndex`]: crate::SkipIndex
/// [`promote`]: Promotion::promote
pub trait Promotion {
    /// Whether a key which was just linked into `level` should also be linked one level higher.
    #[must_use]
    fn promote(&mut self, level: usize) -> bool;
}

impl<F: FnMut(usize) -> bool> Promotion for F {
    #[inline]
    fn promote(&mut self, level: usize) -> bool {
        self(level)
    }
}

/// The default [`Promotion`] strategy: a biased coin, flipped once per level.
///
/// Each flip promotes with probability `numerator / denominator`, independent of the level, so
/// the number of levels a key reaches follows a geometric distribution. The coin is driven by a
/// seeded [`Rand32`], so two indices with the same seed and the same insertion sequence have the
/// same shape.
#[derive(Debug, Clone, Copy)]
pub struct CoinFlip {
    prng:        Rand32,
    numerator:   u32,
    denominator: u32,
}

impl CoinFlip {
    /// A fair coin with the given seed.
    #[inline]
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            prng:        Rand32::new(seed),
            numerator:   1,
            denominator: 2,
        }
    }

    /// A coin which promotes with probability `numerator / denominator`.
    ///
    /// The probability must be strictly between `0` and `1`.
    pub fn with_bias(seed: u64, numerator: u32, denominator: u32) -> Result<Self, OptionsError> {
        if denominator == 0 {
            return Err(OptionsError::ZeroDenominator);
        }
        if numerator == 0 || numerator >= denominator {
            return Err(OptionsError::BiasOutOfRange { numerator, denominator });
        }

        Ok(Self {
            prng: Rand32::new(seed),
            numerator,
            denominator,
        })
    }

    /// The promotion probability, as a `(numerator, denominator)` pair.
    #[inline]
    #[must_use]
    pub const fn bias(&self) -> (u32, u32) {
        (self.numerator, self.denominator)
    }
}

impl Default for CoinFlip {
    #[inline]
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl Promotion for CoinFlip {
    #[inline]
    fn promote(&mut self, _level: usize) -> bool {
        // `rand_range` is uniform over `0..denominator`, and exactly `numerator` of those
        // values are below `numerator`.
        self.prng.rand_range(0..self.denominator) < self.numerator
    }
}

/// The ordering contract for keys of a [`SkipIndex`].
///
/// `equal` and `less` must describe a strict total order over the keys stored in one index:
/// `less` must be irreflexive and transitive, and `equal` must hold exactly when neither key is
/// `less` than the other. A contract which breaks those rules will not cause memory unsafety,
/// but the resulting order of entries (and the success of lookups) is unspecified.
///
/// `near_match` is entirely separate from the order. It is only consulted by
/// [`SearchMode::Fuzzy`] lookups, which accept the first examined key that is a near match.
///
/// [`SkipIndex`]: crate::SkipIndex
/// [`SearchMode::Fuzzy`]: crate::SearchMode::Fuzzy
pub trait IndexKey {
    /// Whether `self` and `other` occupy the same position in the order.
    #[must_use]
    fn equal(&self, other: &Self) -> bool;

    /// Whether `self` sorts strictly before `other`.
    #[must_use]
    fn less(&self, other: &Self) -> bool;

    /// Whether the other key is close enough to `self` to satisfy a fuzzy lookup for `self`.
    ///
    /// Defaults to `false`, in which case fuzzy lookups behave exactly like exact lookups.
    #[inline]
    #[must_use]
    fn near_match(&self, _other: &Self) -> bool {
        false
    }
}

macro_rules! ord_index_key {
    ($($ty:ty),*$(,)?) => {
        $(
            impl IndexKey for $ty {
                #[inline]
                fn equal(&self, other: &Self) -> bool {
                    Ord::cmp(self, other).is_eq()
                }

                #[inline]
                fn less(&self, other: &Self) -> bool {
                    Ord::cmp(self, other).is_lt()
                }
            }
        )*
    };
}

ord_index_key!(
    u8, u16, u32, u64, u128, usize,
    i8, i16, i32, i64, i128, isize,
    char, bool, String,
);

impl IndexKey for &str {
    #[inline]
    fn equal(&self, other: &Self) -> bool {
        Ord::cmp(*self, *other).is_eq()
    }

    #[inline]
    fn less(&self, other: &Self) -> bool {
        Ord::cmp(*self, *other).is_lt()
    }
}

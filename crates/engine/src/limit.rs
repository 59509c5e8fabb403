/// Spending cap represented as **non-negative integer cents**.
///
/// Budgets and categories never carry a negative cap: whatever sign the
/// caller sends is dropped, so `-50` and `50` produce the same limit.
///
/// # Examples
///
/// ```rust
/// use engine::LimitCents;
///
/// assert_eq!(LimitCents::normalized(-50_00).cents(), 5000);
/// assert_eq!(LimitCents::normalized(i64::MIN).cents(), i64::MAX);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[repr(transparent)]
pub struct LimitCents(i64);

impl LimitCents {
    /// Builds a limit from signed cents, keeping only the magnitude.
    ///
    /// `i64::MIN` has no positive counterpart and saturates to `i64::MAX`.
    #[must_use]
    pub const fn normalized(cents: i64) -> Self {
        Self(cents.saturating_abs())
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_never_survives() {
        for raw in [0, 1, -1, 5000, -5000, i64::MAX, -i64::MAX] {
            let limit = LimitCents::normalized(raw);
            assert_eq!(limit.cents(), raw.abs());
        }
        assert_eq!(LimitCents::normalized(i64::MIN).cents(), i64::MAX);
    }
}

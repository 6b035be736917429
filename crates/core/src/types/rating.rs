//! Star rating type.

use core::fmt;

/// Error returned when a rating value falls outside the 1-5 star scale.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("rating must be between 1 and 5, got {value}")]
pub struct RatingOutOfRange {
    /// The rejected input value.
    pub value: i64,
}

/// A star rating on the closed 1-5 scale.
///
/// Out-of-range values are rejected at construction, never clamped, so a
/// `Rating` held anywhere in the system is valid by construction.
///
/// ## Examples
///
/// ```
/// use shoprate_core::Rating;
///
/// assert!(Rating::new(1).is_ok());
/// assert!(Rating::new(5).is_ok());
/// assert!(Rating::new(0).is_err());
/// assert!(Rating::new(6).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rating(u8);

impl Rating {
    /// Lowest possible rating.
    pub const MIN: u8 = 1;
    /// Highest possible rating.
    pub const MAX: u8 = 5;

    /// Validate a raw value into a `Rating`.
    ///
    /// Takes an `i64` because form input and database columns both surface
    /// the value as a wide integer.
    ///
    /// # Errors
    ///
    /// Returns [`RatingOutOfRange`] when the value is not in `1..=5`.
    pub const fn new(value: i64) -> Result<Self, RatingOutOfRange> {
        match value {
            1..=5 => {
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                Ok(Self(value as u8))
            }
            _ => Err(RatingOutOfRange { value }),
        }
    }

    /// Get the rating as a `u8` in `1..=5`.
    #[must_use]
    pub const fn as_u8(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for i64 {
    fn from(rating: Rating) -> Self {
        Self::from(rating.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_accepted() {
        assert_eq!(Rating::new(1).unwrap().as_u8(), 1);
        assert_eq!(Rating::new(5).unwrap().as_u8(), 5);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(Rating::new(0), Err(RatingOutOfRange { value: 0 }));
        assert_eq!(Rating::new(6), Err(RatingOutOfRange { value: 6 }));
        assert_eq!(Rating::new(-3), Err(RatingOutOfRange { value: -3 }));
        assert_eq!(
            Rating::new(i64::MAX),
            Err(RatingOutOfRange { value: i64::MAX })
        );
    }

    #[test]
    fn test_never_clamps() {
        // A rejected 6 must not come back as a 5.
        assert!(Rating::new(6).is_err());
        assert!(Rating::new(i64::MIN).is_err());
    }

    #[test]
    fn test_into_i64() {
        let rating = Rating::new(4).unwrap();
        assert_eq!(i64::from(rating), 4);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Rating::new(3).unwrap()), "3");
    }
}

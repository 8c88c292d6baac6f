//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored as [`Decimal`] so that summing many line totals never
//! drifts the way binary floating point does. The cart is single-currency;
//! the currency glyph is a presentation concern passed in at format time.

use core::iter::Sum;
use core::ops::Add;
use core::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Currency glyph shown after amounts when none is configured.
pub const DEFAULT_CURRENCY_GLYPH: &str = "₽";

/// Cyrillic Er, often typed in place of the rouble sign.
const CYRILLIC_ER: &str = "Р";

/// Errors that can occur when constructing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The label contained no number.
    #[error("price cannot be empty")]
    Empty,
    /// The label could not be parsed as a decimal amount.
    #[error("invalid price: {0}")]
    Invalid(String),
    /// The amount is below zero.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
}

/// A non-negative monetary amount.
///
/// Serialized as a decimal string (`"450.00"`). Deserialization also accepts
/// plain JSON numbers so carts written by older clients still load.
///
/// ```
/// use cheesecake_cart_core::Price;
///
/// let price = Price::parse_label("450₽").unwrap();
/// assert_eq!(price.format("₽"), "450.00₽");
/// assert_eq!(price.times(2).format("₽"), "900.00₽");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Price(Decimal);

impl Price {
    /// Zero amount.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::Negative`] if `amount` is below zero.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative(amount));
        }
        Ok(Self(amount))
    }

    /// Create a price from minor units (kopecks, cents).
    #[must_use]
    pub fn from_minor_units(units: u32) -> Self {
        Self(Decimal::new(i64::from(units), 2))
    }

    /// Parse a price label as shown on a product card.
    ///
    /// Equivalent to [`Price::parse_label_with`] using the default glyph.
    ///
    /// # Errors
    ///
    /// See [`Price::parse_label_with`].
    pub fn parse_label(label: &str) -> Result<Self, PriceError> {
        Self::parse_label_with(label, DEFAULT_CURRENCY_GLYPH)
    }

    /// Parse a price label, stripping `glyph` as well as `₽` and `Р`.
    ///
    /// Only whitespace and those glyphs may surround the number. Spaces inside
    /// the number are thousands separators and a decimal comma is accepted, so
    /// `"450₽"`, `"450.00 ₽"` and `"1 200,50 Р"` all parse, while `"1.5k₽"`
    /// and `"free"` do not.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Empty` if nothing but glyphs and whitespace is
    /// left, `PriceError::Invalid` for any other text or a malformed number,
    /// and `PriceError::Negative` for amounts below zero.
    pub fn parse_label_with(label: &str, glyph: &str) -> Result<Self, PriceError> {
        let glyphs = [glyph.trim(), DEFAULT_CURRENCY_GLYPH, CYRILLIC_ER];
        let mut rest = label.trim();
        while let Some(stripped) = strip_glyph(rest, &glyphs) {
            rest = stripped.trim();
        }

        if rest.is_empty() {
            return Err(PriceError::Empty);
        }

        let numeric = rest
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect::<String>();
        if !numeric
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
        {
            return Err(PriceError::Invalid(label.to_owned()));
        }

        let amount =
            Decimal::from_str(&numeric).map_err(|_| PriceError::Invalid(label.to_owned()))?;
        Self::new(amount)
    }

    /// Returns the underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Line total for `quantity` units at this price, saturating at
    /// `Decimal::MAX`.
    #[must_use]
    pub fn times(self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(Decimal::from(quantity)))
    }

    /// Line total for `quantity` units, or `None` on overflow.
    #[must_use]
    pub fn checked_times(self, quantity: u32) -> Option<Self> {
        self.0.checked_mul(Decimal::from(quantity)).map(Self)
    }

    /// Sum of two prices, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }

    /// Format for display with two decimals and a trailing glyph (e.g. `"450.00₽"`).
    #[must_use]
    pub fn format(&self, glyph: &str) -> String {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        format!("{rounded:.2}{glyph}")
    }
}

/// Strip one leading or trailing glyph from `label`.
fn strip_glyph<'a>(label: &'a str, glyphs: &[&str]) -> Option<&'a str> {
    glyphs
        .iter()
        .filter(|g| !g.is_empty())
        .find_map(|g| label.strip_suffix(g).or_else(|| label.strip_prefix(g)))
}

/// Saturates at `Decimal::MAX`; see [`Price::checked_add`].
impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for Decimal {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_label(s)
    }
}

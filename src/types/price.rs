use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Div, Sub};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Price(i64); // Fixed-point with 4 decimal places

impl Price {
    const MULTIPLIER: i64 = 10_000; // 10^4

    pub fn from_raw(value: i64) -> Self {
        Price(value)
    }

    pub fn raw_value(&self) -> i64 {
        self.0
    }

    pub fn from_f64(value: f64) -> Self {
        Price((value * Self::MULTIPLIER as f64).round() as i64)
    }

    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / Self::MULTIPLIER as f64
    }

    pub fn zero() -> Self {
        Price(0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Mean of a non-empty price slice, truncated to the fixed-point grid.
    pub fn mean(prices: &[Price]) -> Option<Price> {
        if prices.is_empty() {
            return None;
        }
        let sum: i64 = prices.iter().map(|p| p.0).sum();
        Some(Price(sum / prices.len() as i64))
    }
}

impl Add for Price {
    type Output = Price;
    fn add(self, other: Price) -> Price {
        Price(self.0 + other.0)
    }
}

impl Sub for Price {
    type Output = Price;
    fn sub(self, other: Price) -> Price {
        Price(self.0 - other.0)
    }
}

impl Div<i64> for Price {
    type Output = Price;
    fn div(self, scalar: i64) -> Price {
        Price(self.0 / scalar)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_f64() {
        let p = Price::from_f64(1299.99);
        assert_eq!(p.to_f64(), 1299.99);
        assert_eq!(p.raw_value(), 12_999_900);
    }

    #[test]
    fn arithmetic_stays_on_the_grid() {
        let a = Price::from_f64(120.0);
        let b = Price::from_f64(100.0);
        assert_eq!(a - b, Price::from_f64(20.0));
        assert_eq!(a + b, Price::from_f64(220.0));
        assert_eq!((a + b) / 2, Price::from_f64(110.0));
    }

    #[test]
    fn mean_of_readings() {
        let prices = [
            Price::from_f64(100.0),
            Price::from_f64(120.0),
            Price::from_f64(110.0),
        ];
        assert_eq!(Price::mean(&prices), Some(Price::from_f64(110.0)));
        assert_eq!(Price::mean(&[]), None);
    }

    #[test]
    fn ordering_follows_value() {
        assert!(Price::from_f64(1239.0) < Price::from_f64(1299.0));
        assert!(!Price::zero().is_positive());
        assert!(Price::from_f64(0.01).is_positive());
    }
}

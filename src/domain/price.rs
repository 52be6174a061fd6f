use std::fmt;

/// Where a displayed price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    Live,
    Snapshot,
}

/// The value shown for an asset. Derived at read time, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DisplayPrice {
    Available { price: f64, source: PriceSource },
    Unavailable,
}

impl DisplayPrice {
    pub const DECIMALS: usize = 8;
    pub const UNAVAILABLE: &'static str = "N/A";

    pub fn price(&self) -> Option<f64> {
        match self {
            Self::Available { price, .. } => Some(*price),
            Self::Unavailable => None,
        }
    }

    pub fn source(&self) -> Option<PriceSource> {
        match self {
            Self::Available { source, .. } => Some(*source),
            Self::Unavailable => None,
        }
    }
}

impl fmt::Display for DisplayPrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available { price, .. } => write!(f, "{:.*}", Self::DECIMALS, price),
            Self::Unavailable => f.write_str(Self::UNAVAILABLE),
        }
    }
}

use {
    serde::{Deserialize, Serialize},
    strum::IntoEnumIterator,
    strum_macros::{Display, EnumIter, EnumString, IntoStaticStr},
};

/// The fixed set of tracked assets. The canonical id doubles as the wire key
/// for both price sources.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AssetId {
    Bitcoin,
    Ethereum,
    Ripple,
    Dogecoin,
    Cardano,
}

impl AssetId {
    /// Canonical lowercase identifier, e.g. `"bitcoin"`.
    pub fn id(self) -> &'static str {
        self.into()
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Bitcoin => "Bitcoin",
            Self::Ethereum => "Ethereum",
            Self::Ripple => "Ripple",
            Self::Dogecoin => "Dogecoin",
            Self::Cardano => "Cardano",
        }
    }

    pub fn ticker(self) -> &'static str {
        match self {
            Self::Bitcoin => "BTC",
            Self::Ethereum => "ETH",
            Self::Ripple => "XRP",
            Self::Dogecoin => "DOGE",
            Self::Cardano => "ADA",
        }
    }

    /// Exact match on the canonical id. Anything else is not ours.
    pub fn from_id(id: &str) -> Option<Self> {
        id.parse().ok()
    }

    pub fn all() -> Vec<Self> {
        Self::iter().collect()
    }

    /// Comma-joined ids, as both endpoints expect them in the query string.
    pub fn joined_ids() -> String {
        Self::iter().map(Self::id).collect::<Vec<_>>().join(",")
    }

    /// Case-insensitive substring match on the canonical id.
    pub fn matches(self, filter: &str) -> bool {
        self.id().contains(&filter.to_lowercase())
    }
}

//! Tile identity: base kind plus power tier, and the asset-name translation used by front-ends.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Asset name of an empty cell.
pub const BLANK_ASSET: &str = "blank.png";

/// The flavour of a tile. Runs form between tiles of equal base regardless of tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Base {
    Base,
    Arbitrum,
    Optimism,
    Zksync,
    Ethereum,
    Solana,
}

impl Base {
    pub const ALL: [Self; 6] = [
        Self::Base,
        Self::Arbitrum,
        Self::Optimism,
        Self::Zksync,
        Self::Ethereum,
        Self::Solana,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Arbitrum => "arbitrum",
            Self::Optimism => "optimism",
            Self::Zksync => "zksync",
            Self::Ethereum => "ethereum",
            Self::Solana => "solana",
        }
    }

    /// Single-letter glyph for text boards.
    pub fn glyph(&self) -> char {
        match self {
            Self::Base => 'b',
            Self::Arbitrum => 'a',
            Self::Optimism => 'o',
            Self::Zksync => 'z',
            Self::Ethereum => 'e',
            Self::Solana => 's',
        }
    }
}

impl fmt::Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Base {
    type Err = TileParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.name() == s)
            .ok_or_else(|| TileParseError::UnknownBase(s.to_string()))
    }
}

/// Power level of a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tier {
    #[default]
    Normal,
    Super,
    Mega,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TileParseError {
    #[error("unknown base kind: {0}")]
    UnknownBase(String),
    #[error("not a tile asset name: {0}")]
    NotAnAsset(String),
}

/// A tile value. Base and tier are stored separately, so classification is a field read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub base: Base,
    pub tier: Tier,
}

impl Tile {
    pub const fn new(base: Base, tier: Tier) -> Self {
        Self { base, tier }
    }

    pub const fn normal(base: Base) -> Self {
        Self::new(base, Tier::Normal)
    }

    /// Same base, different tier (used when a run of four or five spawns a power tile).
    pub const fn promoted(self, tier: Tier) -> Self {
        Self::new(self.base, tier)
    }

    /// Splits the tile into its `(base, tier)` identity.
    pub const fn classify(self) -> (Base, Tier) {
        (self.base, self.tier)
    }

    pub fn same_base(self, other: Self) -> bool {
        self.base == other.base
    }

    /// Image file name a front-end would show for this tile, e.g. `arbitrum-super.png`.
    pub fn asset_name(self) -> String {
        match self.tier {
            Tier::Normal => format!("{}.png", self.base),
            Tier::Super => format!("{}-super.png", self.base),
            Tier::Mega => format!("{}-mega.png", self.base),
        }
    }

    /// Parse an asset path back into a tile. Directory prefixes and case are ignored.
    /// `blank.png` is not a tile; callers map it to an empty cell themselves.
    pub fn from_asset_name(path: &str) -> Result<Self, TileParseError> {
        let file = path.rsplit('/').next().unwrap_or(path).to_lowercase();
        let (stem, tier) = if let Some(stem) = file.strip_suffix("-super.png") {
            (stem, Tier::Super)
        } else if let Some(stem) = file.strip_suffix("-mega.png") {
            (stem, Tier::Mega)
        } else if let Some(stem) = file.strip_suffix(".png") {
            (stem, Tier::Normal)
        } else {
            return Err(TileParseError::NotAnAsset(path.to_string()));
        };
        if file == BLANK_ASSET {
            return Err(TileParseError::NotAnAsset(path.to_string()));
        }
        Ok(Self::new(stem.parse()?, tier))
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let g = self.base.glyph();
        match self.tier {
            Tier::Normal => write!(f, "{g}"),
            Tier::Super => write!(f, "{}", g.to_ascii_uppercase()),
            Tier::Mega => write!(f, "{}*", g.to_ascii_uppercase()),
        }
    }
}

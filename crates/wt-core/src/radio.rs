//! Frequency bands, channel widths, and the (band, width) → channel table.
//!
//! The table mirrors the channel blocks the experiments are run on.  A
//! (band, width) pair missing from it is a configuration error for the run
//! that asked for it.  There is no fallback channel.

use std::fmt;

use crate::ConfigError;

/// Spectral efficiency used to approximate channel capacity for utilization:
/// `capacity_mbps = width_mhz * SPECTRAL_EFFICIENCY_BPS_PER_HZ`.
pub const SPECTRAL_EFFICIENCY_BPS_PER_HZ: f64 = 10.0;

/// Operating band.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Band {
    Ghz5,
    Ghz6,
}

impl Band {
    /// Parse the numeric GHz form used on the command line and in configs.
    pub fn from_ghz(ghz: u32) -> Result<Band, ConfigError> {
        match ghz {
            5 => Ok(Band::Ghz5),
            6 => Ok(Band::Ghz6),
            other => Err(ConfigError::UnsupportedBand(other)),
        }
    }

    #[inline]
    pub fn ghz(self) -> u32 {
        match self {
            Band::Ghz5 => 5,
            Band::Ghz6 => 6,
        }
    }

    /// Band tag in the engine's channel-settings syntax.
    pub fn tag(self) -> &'static str {
        match self {
            Band::Ghz5 => "BAND_5GHZ",
            Band::Ghz6 => "BAND_6GHZ",
        }
    }

    /// Nominal centre frequency of the band's lower edge, used by the
    /// stand-in engine's path-loss estimate.
    pub fn reference_mhz(self) -> f64 {
        match self {
            Band::Ghz5 => 5_180.0,
            Band::Ghz6 => 5_955.0,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}GHz", self.ghz())
    }
}

/// Fully resolved channel encoding handed to the engine's PHY.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChannelSettings {
    pub number:    u8,
    pub width_mhz: u16,
    pub band:      Band,
    /// Index of the primary 20 MHz subchannel.
    pub primary20: u8,
}

impl ChannelSettings {
    /// Capacity estimate in Mbps (`width × 10 bps/Hz`).
    #[inline]
    pub fn capacity_mbps(&self) -> f64 {
        capacity_mbps(self.width_mhz)
    }
}

impl fmt::Display for ChannelSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{}, {}, {}, {}}}",
            self.number,
            self.width_mhz,
            self.band.tag(),
            self.primary20
        )
    }
}

/// `(band, width_mhz, channel_number)` rows of the lookup table.
const CHANNEL_TABLE: &[(Band, u16, u8)] = &[
    (Band::Ghz5, 20, 36),
    (Band::Ghz5, 40, 36),
    (Band::Ghz5, 80, 42),
    (Band::Ghz5, 160, 50),
    (Band::Ghz6, 80, 7),
    (Band::Ghz6, 160, 15),
];

/// Look up the channel encoding for `(band, width_mhz)`.
pub fn channel_settings(band: Band, width_mhz: u16) -> Result<ChannelSettings, ConfigError> {
    CHANNEL_TABLE
        .iter()
        .find(|&&(b, w, _)| b == band && w == width_mhz)
        .map(|&(band, width_mhz, number)| ChannelSettings {
            number,
            width_mhz,
            band,
            primary20: 0,
        })
        .ok_or(ConfigError::UnsupportedChannel { band: band.ghz(), width_mhz })
}

/// Capacity estimate for a channel `width_mhz` wide, in Mbps.
#[inline]
pub fn capacity_mbps(width_mhz: u16) -> f64 {
    width_mhz as f64 * SPECTRAL_EFFICIENCY_BPS_PER_HZ
}

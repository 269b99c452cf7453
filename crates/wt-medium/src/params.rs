//! Tunables of the fluid engine.

use wt_core::SimTime;

/// Physical and MAC constants of [`FluidMedium`][crate::FluidMedium].
///
/// The defaults approximate a single-stream 802.11be link at short range.
#[derive(Clone, Debug, PartialEq)]
pub struct FluidParams {
    /// Transmit power used for the path-loss signal estimate.
    pub tx_power_dbm:        f64,
    /// PHY bits per second per Hz of channel width.
    pub phy_bps_per_hz:      f64,
    /// Fixed per-frame cost: preamble, inter-frame spaces, acknowledgement,
    /// mean backoff.
    pub frame_overhead:      SimTime,
    /// IP/UDP/MAC header bytes added to every payload on air.
    pub header_bytes:        u32,
    /// Per-station MAC queue limit, in packets.  Sends into a full queue
    /// are lost.
    pub queue_limit:         usize,
    /// Station `i` associates at `(i + 1) * association_spacing`.
    pub association_spacing: SimTime,
    /// Cadence of per-station signal reports after association.
    pub signal_interval:     SimTime,
}

impl Default for FluidParams {
    fn default() -> Self {
        Self {
            tx_power_dbm:        20.0,
            phy_bps_per_hz:      12.0,
            frame_overhead:      SimTime::from_micros(60),
            header_bytes:        64,
            queue_limit:         500,
            association_spacing: SimTime::from_millis(5),
            signal_interval:     SimTime::from_millis(100),
        }
    }
}

impl FluidParams {
    /// Time on air for one `payload_bytes` frame on a `width_mhz` channel.
    pub fn airtime(&self, payload_bytes: u32, width_mhz: u16) -> SimTime {
        let bits = f64::from(payload_bytes + self.header_bytes) * 8.0;
        let rate = f64::from(width_mhz) * 1e6 * self.phy_bps_per_hz;
        let on_air = if rate > 0.0 { bits / rate } else { 0.0 };
        (self.frame_overhead + SimTime::from_secs_f64(on_air)).max(SimTime::from_nanos(1))
    }

    /// Received signal after free-space loss over `distance_m` at
    /// `freq_mhz`.  Distances under one metre are treated as one metre.
    pub fn signal_dbm(&self, distance_m: f64, freq_mhz: f64) -> f64 {
        let d = distance_m.max(1.0);
        let fspl = 20.0 * d.log10() + 20.0 * freq_mhz.log10() - 27.55;
        self.tx_power_dbm - fspl
    }
}

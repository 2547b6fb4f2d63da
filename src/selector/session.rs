/// Session-hours fallback: intraday while the exchange is open, swing otherwise.
///
/// Used when no index series is available to vote.

use crate::models::TradingMode;
use chrono::{DateTime, TimeZone, Timelike, Utc};

/// NSE market open/close as HHMM in exchange time
pub const SESSION_OPEN_HHMM: u32 = 915;
pub const SESSION_CLOSE_HHMM: u32 = 1530;

/// IST is a fixed UTC+05:30 offset with no DST
pub const EXCHANGE_UTC_OFFSET_SECS: u32 = 5 * 3600 + 30 * 60;

/// Exchange wall time as HHMM
pub fn exchange_hhmm<Tz: TimeZone>(now: &DateTime<Tz>) -> u32 {
    let utc_secs = now.with_timezone(&Utc).num_seconds_from_midnight();
    let local_secs = (utc_secs + EXCHANGE_UTC_OFFSET_SECS) % 86_400;
    (local_secs / 3600) * 100 + (local_secs % 3600) / 60
}

/// Mode by wall clock: intraday iff exchange time is within 09:15..=15:30
pub fn choose_mode_at<Tz: TimeZone>(now: &DateTime<Tz>) -> TradingMode {
    let hhmm = exchange_hhmm(now);

    if (SESSION_OPEN_HHMM..=SESSION_CLOSE_HHMM).contains(&hhmm) {
        TradingMode::Intraday
    } else {
        TradingMode::Swing
    }
}

//! Exchange time zone lookup by ticker suffix.

use chrono_tz::Tz;

/// NSE tickers carry a `.NS` suffix; everything else is treated as a US listing.
pub fn market_timezone(symbol: &str) -> Tz {
    if symbol.to_uppercase().ends_with(".NS") {
        chrono_tz::Asia::Kolkata
    } else {
        chrono_tz::America::New_York
    }
}

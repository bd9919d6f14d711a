//! Live air-quality readings

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A single pollution reading. Fetched per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub aqi_index: i64,
    pub pm2_5: f64,
}

impl AirQualityReading {
    /// PM2.5 as text; whole values keep one decimal (`55.0`, not `55`)
    pub fn pm2_5_text(&self) -> String {
        if self.pm2_5.is_finite() && self.pm2_5.fract() == 0.0 && self.pm2_5.abs() < 1e16 {
            format!("{:.1}", self.pm2_5)
        } else {
            self.pm2_5.to_string()
        }
    }
}

impl std::fmt::Display for AirQualityReading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{\"aqi_index\": {}, \"pm2_5\": {}}}", self.aqi_index, self.pm2_5_text())
    }
}

/// Source of live air-quality data.
///
/// Lookups never fail loudly: any problem is logged by the implementation
/// and reported as `None`.
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    async fn live_aqi(&self, lat: f64, lon: f64) -> Option<AirQualityReading>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_json_like() {
        let reading = AirQualityReading { aqi_index: 4, pm2_5: 55.3 };
        assert_eq!(reading.to_string(), r#"{"aqi_index": 4, "pm2_5": 55.3}"#);
    }

    #[test]
    fn test_whole_pm2_5_keeps_decimal() {
        let reading = AirQualityReading { aqi_index: 2, pm2_5: 55.0 };
        assert_eq!(reading.pm2_5_text(), "55.0");
        assert_eq!(reading.to_string(), r#"{"aqi_index": 2, "pm2_5": 55.0}"#);
    }
}

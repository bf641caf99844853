//! Power budget types
//!
//! A supply is judged against its safety capacity (rated × 0.8), not its
//! label rating. Margin is the share of safety capacity left after the
//! estimated worst-case draw.

pub mod estimator;
pub mod units;

pub use estimator::{gpu_draw_from_recommended, supply_capacity, PowerEstimator};
pub use units::{parse_power_value, parse_psu_wattage};

use serde::{Deserialize, Serialize};

use crate::config::PowerConfig;

/// Sustained-load derating applied to the rated capacity
pub const SAFETY_FACTOR: f64 = 0.8;

/// Where a component's draw figure came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawSource {
    Attribute,
    RecommendedSupply,
    NameTable,
    Default,
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PowerTier {
    /// Draw exceeds safety capacity, or capacity is unknown
    Insufficient,
    Thin,
    Low,
    Sufficient,
}

impl PowerTier {
    /// Tier for a raw margin. Zero capacity is always insufficient.
    pub fn classify(margin_pct: f64, safety_capacity_w: f64, config: &PowerConfig) -> Self {
        if safety_capacity_w <= 0.0 || margin_pct < 0.0 {
            PowerTier::Insufficient
        } else if margin_pct < config.thin_margin_pct {
            PowerTier::Thin
        } else if margin_pct < config.low_margin_pct {
            PowerTier::Low
        } else {
            PowerTier::Sufficient
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PowerEstimate {
    pub cpu_draw_w: u32,
    pub cpu_source: DrawSource,
    pub gpu_draw_w: u32,
    pub gpu_source: DrawSource,
    pub overhead_w: u32,
    pub total_draw_w: u32,
    pub rated_capacity_w: u32,
    pub safety_capacity_w: f64,
    /// Rounded to one decimal place; 0 when capacity is unknown
    pub margin_pct: f64,
    pub tier: PowerTier,
}

impl PowerEstimate {
    pub fn exceeds_safety_capacity(&self) -> bool {
        self.total_draw_w as f64 > self.safety_capacity_w
    }

    /// One-line numeric breakdown used in findings and arbiter requests
    pub fn breakdown(&self) -> String {
        format!(
            "CPU {}W + GPU {}W + other {}W = {}W total; supply {}W rated, {:.0}W safe (x{}); margin {:.1}%",
            self.cpu_draw_w,
            self.gpu_draw_w,
            self.overhead_w,
            self.total_draw_w,
            self.rated_capacity_w,
            self.safety_capacity_w,
            SAFETY_FACTOR,
            self.margin_pct
        )
    }
}

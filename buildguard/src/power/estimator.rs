//! Power Budget Estimator
//!
//! Worst-case draw is CPU + GPU + a fixed overhead. Each of CPU and GPU is
//! resolved from the most specific source available: rated attributes, then
//! (GPU only) a back-calculation from the recommended supply, then the
//! catalog's name table, then a flat default.

use crate::catalog::Catalog;
use crate::config::PowerConfig;
use crate::parser::schema::{Category, Combo, ComponentRecord};
use crate::power::units::{parse_power_value, parse_psu_wattage};
use crate::power::{DrawSource, PowerEstimate, PowerTier, SAFETY_FACTOR};

/// Sustained package power first, then peak turbo power
const CPU_POWER_KEYS: &[&str] = &["PPT", "PBP-MTP", "MTP", "max_turbo_power"];
const GPU_POWER_KEYS: &[&str] = &["사용전력", "board_power", "TBP", "TGP"];
const GPU_RECOMMENDED_PSU_KEYS: &[&str] = &["권장파워", "recommended_psu"];
const PSU_RATING_KEYS: &[&str] = &["정격출력", "rated_output"];

/// GPU draw ≈ recommended supply × 0.8 − 235 W, never below 100 W
const GPU_BACKCALC_FACTOR: f64 = 0.8;
const GPU_BACKCALC_OFFSET_W: f64 = 235.0;
const GPU_BACKCALC_FLOOR_W: u32 = 100;

pub struct PowerEstimator<'a> {
    catalog: &'a Catalog,
    config: &'a PowerConfig,
}

impl<'a> PowerEstimator<'a> {
    pub fn new(catalog: &'a Catalog, config: &'a PowerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn estimate(&self, combo: &Combo) -> PowerEstimate {
        let (cpu_draw_w, cpu_source) = match combo.get(Category::Cpu) {
            Some(cpu) => self.cpu_draw(cpu),
            None => (0, DrawSource::Absent),
        };
        let (gpu_draw_w, gpu_source) = match combo.get(Category::Gpu) {
            Some(gpu) => self.gpu_draw(gpu),
            None => (0, DrawSource::Absent),
        };

        let total_draw_w = cpu_draw_w
            .saturating_add(gpu_draw_w)
            .saturating_add(self.config.overhead_w);
        let rated_capacity_w = combo
            .get(Category::PowerSupply)
            .and_then(supply_capacity)
            .unwrap_or(0);
        if combo.get(Category::PowerSupply).is_some() && rated_capacity_w == 0 {
            tracing::warn!("Power supply wattage could not be parsed; treating capacity as 0W");
        }

        let safety_capacity_w = rated_capacity_w as f64 * SAFETY_FACTOR;
        let raw_margin = if safety_capacity_w > 0.0 {
            (safety_capacity_w - total_draw_w as f64) / safety_capacity_w * 100.0
        } else {
            0.0
        };
        let tier = PowerTier::classify(raw_margin, safety_capacity_w, self.config);

        tracing::debug!(
            "Power estimate: cpu={}W ({:?}) gpu={}W ({:?}) total={}W capacity={}W tier={:?}",
            cpu_draw_w,
            cpu_source,
            gpu_draw_w,
            gpu_source,
            total_draw_w,
            rated_capacity_w,
            tier
        );

        PowerEstimate {
            cpu_draw_w,
            cpu_source,
            gpu_draw_w,
            gpu_source,
            overhead_w: self.config.overhead_w,
            total_draw_w,
            rated_capacity_w,
            safety_capacity_w,
            margin_pct: (raw_margin * 10.0).round() / 10.0,
            tier,
        }
    }

    fn cpu_draw(&self, cpu: &ComponentRecord) -> (u32, DrawSource) {
        for key in CPU_POWER_KEYS {
            if let Some(watts) = cpu.attribute(&[*key]).and_then(parse_power_value) {
                return (watts, DrawSource::Attribute);
            }
        }
        self.name_fallback(cpu)
    }

    fn gpu_draw(&self, gpu: &ComponentRecord) -> (u32, DrawSource) {
        if let Some(watts) = gpu.attribute(GPU_POWER_KEYS).and_then(parse_power_value) {
            return (watts, DrawSource::Attribute);
        }
        if let Some(recommended) = gpu
            .attribute(GPU_RECOMMENDED_PSU_KEYS)
            .and_then(parse_power_value)
        {
            return (
                gpu_draw_from_recommended(recommended),
                DrawSource::RecommendedSupply,
            );
        }
        self.name_fallback(gpu)
    }

    fn name_fallback(&self, record: &ComponentRecord) -> (u32, DrawSource) {
        match self.catalog.known_power(&record.name) {
            Some(watts) => (watts, DrawSource::NameTable),
            None => (self.catalog.default_power_w(), DrawSource::Default),
        }
    }
}

/// Back-calculate board power from a "recommended supply" figure
pub fn gpu_draw_from_recommended(recommended_w: u32) -> u32 {
    let derived = recommended_w as f64 * GPU_BACKCALC_FACTOR - GPU_BACKCALC_OFFSET_W;
    (derived.max(0.0) as u32).max(GPU_BACKCALC_FLOOR_W)
}

/// Rated output of a supply: explicit attribute, else the wattage in its name
pub fn supply_capacity(psu: &ComponentRecord) -> Option<u32> {
    psu.attribute(PSU_RATING_KEYS)
        .and_then(|v| parse_psu_wattage(v).or_else(|| parse_power_value(v)))
        .or_else(|| parse_psu_wattage(&psu.name))
        .filter(|w| *w > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn combo(records: Vec<ComponentRecord>) -> Combo {
        records.into_iter().collect()
    }

    #[test]
    fn test_power_additivity() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let estimate = PowerEstimator::new(&catalog, &config).estimate(&combo(vec![
            ComponentRecord::new(Category::Cpu, "CPU X").with_attribute("PPT", "200W"),
            ComponentRecord::new(Category::Gpu, "GPU Y").with_attribute("사용전력", "300W"),
            ComponentRecord::new(Category::PowerSupply, "Acme 1000W"),
        ]));

        assert_eq!(estimate.cpu_draw_w, 200);
        assert_eq!(estimate.gpu_draw_w, 300);
        assert_eq!(estimate.total_draw_w, 585);
        assert_eq!(estimate.cpu_source, DrawSource::Attribute);
    }

    #[test]
    fn test_total_saturates_instead_of_wrapping() {
        let catalog = Catalog::builtin();
        let config = PowerConfig {
            overhead_w: u32::MAX,
            ..PowerConfig::default()
        };
        let estimate = PowerEstimator::new(&catalog, &config).estimate(&combo(vec![
            ComponentRecord::new(Category::Cpu, "CPU X").with_attribute("PPT", "4000000000W"),
            ComponentRecord::new(Category::Gpu, "GPU Y").with_attribute("사용전력", "4000000000W"),
            ComponentRecord::new(Category::PowerSupply, "Acme 850W"),
        ]));

        assert_eq!(estimate.total_draw_w, u32::MAX);
        assert_eq!(estimate.tier, PowerTier::Insufficient);
    }

    #[test]
    fn test_cpu_prefers_ppt_then_mtp() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let estimator = PowerEstimator::new(&catalog, &config);

        let cpu = ComponentRecord::new(Category::Cpu, "Intel Core i7-14700K")
            .with_attribute("PBP-MTP", "125-253W");
        assert_eq!(estimator.cpu_draw(&cpu), (253, DrawSource::Attribute));

        let cpu = cpu.with_attribute("PPT", "142W");
        assert_eq!(estimator.cpu_draw(&cpu), (142, DrawSource::Attribute));
    }

    #[test]
    fn test_name_table_and_default_fallback() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let estimator = PowerEstimator::new(&catalog, &config);

        let cpu = ComponentRecord::new(Category::Cpu, "AMD 라이젠7 7800X3D");
        assert_eq!(estimator.cpu_draw(&cpu), (160, DrawSource::NameTable));

        let cpu = ComponentRecord::new(Category::Cpu, "Mystery Chip");
        assert_eq!(estimator.cpu_draw(&cpu), (100, DrawSource::Default));
    }

    #[test]
    fn test_gpu_recommended_supply_backcalc() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let estimator = PowerEstimator::new(&catalog, &config);

        let gpu = ComponentRecord::new(Category::Gpu, "Some Card")
            .with_attribute("권장파워", "정격파워 1000W 이상");
        assert_eq!(estimator.gpu_draw(&gpu), (565, DrawSource::RecommendedSupply));

        // Small recommendations clamp to the floor
        assert_eq!(gpu_draw_from_recommended(400), 100);
        assert_eq!(gpu_draw_from_recommended(0), 100);
    }

    #[test]
    fn test_margin_and_tier() {
        let catalog = Catalog::builtin();
        let config = PowerConfig {
            overhead_w: 0,
            ..PowerConfig::default()
        };
        let estimate = PowerEstimator::new(&catalog, &config).estimate(&combo(vec![
            ComponentRecord::new(Category::Cpu, "CPU X").with_attribute("PPT", "200W"),
            ComponentRecord::new(Category::Gpu, "GPU Y").with_attribute("사용전력", "300W"),
            ComponentRecord::new(Category::PowerSupply, "Acme 750W"),
        ]));

        assert_eq!(estimate.total_draw_w, 500);
        assert_eq!(estimate.rated_capacity_w, 750);
        assert!((estimate.safety_capacity_w - 600.0).abs() < 1e-9);
        assert!((estimate.margin_pct - 16.67).abs() < 0.05);
        assert_eq!(estimate.tier, PowerTier::Low);
    }

    #[test]
    fn test_unparsable_supply_is_zero_capacity() {
        let catalog = Catalog::builtin();
        let config = PowerConfig::default();
        let estimate = PowerEstimator::new(&catalog, &config).estimate(&combo(vec![
            ComponentRecord::new(Category::Cpu, "CPU X"),
            ComponentRecord::new(Category::PowerSupply, "마이크로닉스 Classic II"),
        ]));

        assert_eq!(estimate.rated_capacity_w, 0);
        assert_eq!(estimate.safety_capacity_w, 0.0);
        assert_eq!(estimate.margin_pct, 0.0);
        assert_eq!(estimate.tier, PowerTier::Insufficient);
    }

    #[test]
    fn test_supply_capacity_attribute_wins() {
        let psu = ComponentRecord::new(Category::PowerSupply, "Acme 650W")
            .with_attribute("정격출력", "700W");
        assert_eq!(supply_capacity(&psu), Some(700));
    }
}

//! Component Catalog Lookup Tables
//!
//! Every synonym list, socket/chipset allow-list, known power draw and
//! form-factor marker used by the engine lives here as data. The rules ask
//! the catalog questions; they never embed product names themselves.
//!
//! # Tables
//!
//! | File                | Purpose                                         |
//! |---------------------|-------------------------------------------------|
//! | `categories.json`   | Free-text labels → component category           |
//! | `sockets.json`      | Brand markers, socket generations, chipsets     |
//! | `power_table.json`  | Fallback power draw by model substring          |
//! | `form_factors.json` | Board / case format markers and defaults        |

pub mod builtin;
pub mod schema;

pub use builtin::{builtin_catalog, load_catalog_from_directory};
pub use schema::*;

use crate::parser::schema::Category;

/// All lookup tables used by one engine instance
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub categories: CategoryTable,
    pub sockets: SocketTable,
    pub power: PowerTable,
    pub form_factors: FormFactorTable,
}

impl Catalog {
    /// Catalog backed by the embedded tables
    pub fn builtin() -> Self {
        builtin_catalog()
    }

    /// Resolve a free-text label ("그래픽카드", "VGA", ...) to its category
    pub fn category_for_label(&self, label: &str) -> Option<Category> {
        let wanted = normalize_label(label);
        if wanted.is_empty() {
            return None;
        }
        self.categories
            .markers
            .iter()
            .find(|m| m.labels.iter().any(|l| normalize_label(l) == wanted))
            .map(|m| m.category)
    }

    /// First brand whose marker appears in `text`
    pub fn manufacturer_in(&self, text: &str) -> Option<Manufacturer> {
        let upper = text.to_uppercase();
        self.sockets
            .brands
            .iter()
            .find(|b| b.markers.iter().any(|m| upper.contains(&m.to_uppercase())))
            .map(|b| b.manufacturer)
    }

    /// Resolve a CPU's socket generation from a generation attribute or its name.
    ///
    /// Explicit markers win over the model-number series. When the vendor is
    /// known only that vendor's generations are considered.
    pub fn generation_for_cpu(
        &self,
        manufacturer: Option<Manufacturer>,
        text: &str,
    ) -> Option<&SocketGeneration> {
        let upper = text.to_uppercase();
        let candidates = || {
            self.sockets
                .generations
                .iter()
                .filter(move |g| manufacturer.map_or(true, |m| g.manufacturer == m))
        };

        if let Some(gen) = candidates().find(|g| {
            g.markers.iter().any(|m| upper.contains(&m.to_uppercase()))
        }) {
            return Some(gen);
        }

        // Without a vendor the bare model number is too ambiguous
        manufacturer?;
        let series = model_series(&upper)?;
        candidates().find(|g| g.model_series.iter().any(|s| *s == series))
    }

    /// Generation whose chipset allow-list matches `text`
    pub fn generation_for_chipset(&self, text: &str) -> Option<&SocketGeneration> {
        self.sockets.generations.iter().find(|g| g.allows_chipset(text))
    }

    /// Known power draw for a product name, first matching pattern wins
    pub fn known_power(&self, name: &str) -> Option<u32> {
        let upper = name.to_uppercase();
        self.power
            .entries
            .iter()
            .find(|e| upper.contains(&e.pattern.to_uppercase()))
            .map(|e| e.watts)
    }

    pub fn default_power_w(&self) -> u32 {
        self.power.default_w
    }

    /// Board format inferred from name markers, in table precedence order.
    /// Returns `None` when nothing matched; callers apply the default.
    pub fn board_form_factor(&self, text: &str) -> Option<FormFactor> {
        let upper = text.to_uppercase();
        for entry in &self.form_factors.board_markers {
            if entry.markers.iter().any(|m| upper.contains(&m.to_uppercase())) {
                return Some(entry.form_factor);
            }
            if entry.form_factor == FormFactor::MicroAtx && self.has_micro_chipset_suffix(&upper) {
                return Some(FormFactor::MicroAtx);
            }
        }
        None
    }

    pub fn default_board_form_factor(&self) -> FormFactor {
        self.form_factors.default_board
    }

    /// Supported board formats inferred from a case name
    pub fn case_support(&self, text: &str) -> Option<Vec<FormFactor>> {
        let upper = text.to_uppercase();
        self.form_factors
            .case_markers
            .iter()
            .find(|c| c.markers.iter().any(|m| upper.contains(&m.to_uppercase())))
            .map(|c| c.supports.clone())
    }

    pub fn default_case_support(&self) -> Vec<FormFactor> {
        self.form_factors.default_case.clone()
    }

    /// "B550M", "B760M-A" style names mark a micro-ATX board
    fn has_micro_chipset_suffix(&self, upper: &str) -> bool {
        self.sockets.generations.iter().any(|g| {
            g.chipsets
                .iter()
                .any(|c| upper.contains(&format!("{}M", c.to_uppercase())))
        })
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

/// Leading digits of the first 4–5 digit model number in `text`.
///
/// "7800X3D" → "7", "14700K" → "14". Runs of other lengths are skipped.
pub fn model_series(text: &str) -> Option<String> {
    let mut run = String::new();
    let mut runs = Vec::new();
    for ch in text.chars() {
        if ch.is_ascii_digit() {
            run.push(ch);
        } else if !run.is_empty() {
            runs.push(std::mem::take(&mut run));
        }
    }
    if !run.is_empty() {
        runs.push(run);
    }

    runs.into_iter().find_map(|r| match r.len() {
        4 => Some(r[..1].to_string()),
        5 => Some(r[..2].to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_labels() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.category_for_label("그래픽카드"), Some(Category::Gpu));
        assert_eq!(catalog.category_for_label("vga"), Some(Category::Gpu));
        assert_eq!(catalog.category_for_label(" GPU "), Some(Category::Gpu));
        assert_eq!(catalog.category_for_label("파워"), Some(Category::PowerSupply));
        assert_eq!(catalog.category_for_label("MAINBORD"), Some(Category::Motherboard));
        assert_eq!(catalog.category_for_label("cpu  cooler"), Some(Category::Cooler));
        assert_eq!(catalog.category_for_label("총 가격"), None);
        assert_eq!(catalog.category_for_label(""), None);
    }

    #[test]
    fn test_model_series() {
        assert_eq!(model_series("AMD 라이젠7 7800X3D"), Some("7".to_string()));
        assert_eq!(model_series("INTEL CORE I7-14700K"), Some("14".to_string()));
        assert_eq!(model_series("RYZEN 5 5600"), Some("5".to_string()));
        assert_eq!(model_series("CORE ULTRA 7 265K"), None);
    }

    #[test]
    fn test_generation_for_cpu() {
        let catalog = Catalog::builtin();
        let gen = catalog
            .generation_for_cpu(Some(Manufacturer::Amd), "AMD 라이젠7 7800X3D")
            .unwrap();
        assert_eq!(gen.family, "AM5");

        let gen = catalog
            .generation_for_cpu(Some(Manufacturer::Amd), "AMD Ryzen 5 5600")
            .unwrap();
        assert_eq!(gen.family, "AM4");

        let gen = catalog
            .generation_for_cpu(Some(Manufacturer::Intel), "인텔 코어i7 14세대 14700K")
            .unwrap();
        assert_eq!(gen.family, "LGA1700");

        let gen = catalog
            .generation_for_cpu(Some(Manufacturer::Intel), "Intel Core Ultra 7 265K")
            .unwrap();
        assert_eq!(gen.family, "LGA1851");

        assert!(catalog
            .generation_for_cpu(Some(Manufacturer::Intel), "Intel Core i9-9900K")
            .is_none());
        assert!(catalog.generation_for_cpu(None, "Mystery 7800").is_none());
    }

    #[test]
    fn test_board_form_factor_precedence() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.board_form_factor("MSI MAG B650M MORTAR"),
            Some(FormFactor::MicroAtx)
        );
        assert_eq!(
            catalog.board_form_factor("ASUS ROG STRIX B650E-I GAMING WIFI MINI-ITX"),
            Some(FormFactor::MiniItx)
        );
        assert_eq!(
            catalog.board_form_factor("ASUS PRIME B550M-A micro"),
            Some(FormFactor::MicroAtx)
        );
        assert_eq!(catalog.board_form_factor("GIGABYTE X870E AORUS MASTER"), None);
        assert_eq!(
            catalog.board_form_factor("ASUS ProArt E-ATX X670E"),
            Some(FormFactor::ExtendedAtx)
        );
    }

    #[test]
    fn test_case_support() {
        let catalog = Catalog::builtin();
        assert_eq!(
            catalog.case_support("Cooler Master NR200P ITX"),
            Some(vec![FormFactor::MiniItx])
        );
        assert_eq!(catalog.case_support("ABKO 화이트"), None);
    }

    #[test]
    fn test_known_power_order() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.known_power("RTX 4070 Ti SUPER"), Some(285));
        assert_eq!(catalog.known_power("RTX 4070"), Some(200));
        assert_eq!(catalog.known_power("unknown widget"), None);
        assert_eq!(catalog.default_power_w(), 100);
    }
}

//! Catalog table schemas
//!
//! Serde shapes of the JSON lookup tables shipped in `catalog/` plus the small
//! enums the tables refer to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::parser::schema::Category;

/// CPU / platform vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Manufacturer {
    #[serde(rename = "AMD")]
    Amd,
    #[serde(rename = "INTEL")]
    Intel,
}

impl fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Manufacturer::Amd => write!(f, "AMD"),
            Manufacturer::Intel => write!(f, "INTEL"),
        }
    }
}

/// Motherboard physical format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormFactor {
    ExtendedAtx,
    Atx,
    MicroAtx,
    MiniItx,
}

impl FormFactor {
    /// Strict parse of a single declared format name such as "M-ATX" or "Mini ITX".
    pub fn parse(text: &str) -> Option<Self> {
        let compact: String = text
            .to_uppercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_' | '.'))
            .collect();

        match compact.as_str() {
            "EATX" | "EXTENDEDATX" => Some(FormFactor::ExtendedAtx),
            "ATX" | "STANDARDATX" | "표준ATX" => Some(FormFactor::Atx),
            "MATX" | "MICROATX" | "MICRO" | "UATX" | "ΜATX" => Some(FormFactor::MicroAtx),
            "ITX" | "MINIITX" => Some(FormFactor::MiniItx),
            _ => None,
        }
    }
}

impl fmt::Display for FormFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FormFactor::ExtendedAtx => "E-ATX",
            FormFactor::Atx => "ATX",
            FormFactor::MicroAtx => "M-ATX",
            FormFactor::MiniItx => "Mini-ITX",
        };
        write!(f, "{}", label)
    }
}

/// Surface forms that identify one component category in free text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryMarker {
    pub category: Category,
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryTable {
    #[serde(default)]
    pub markers: Vec<CategoryMarker>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandMarker {
    pub manufacturer: Manufacturer,
    pub markers: Vec<String>,
}

/// One CPU socket generation and the board chipsets that carry it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocketGeneration {
    /// Socket family name, e.g. "AM5"
    pub family: String,
    pub manufacturer: Manufacturer,
    /// Name or attribute substrings that pin a CPU to this generation
    #[serde(default)]
    pub markers: Vec<String>,
    /// Leading digits of the model number, e.g. "7" for 7800X3D or "14" for 14700K
    #[serde(default)]
    pub model_series: Vec<String>,
    /// Chipset substrings allowed for this generation
    pub chipsets: Vec<String>,
    /// Memory generations the platform supports
    #[serde(default)]
    pub memory: Vec<String>,
}

impl SocketGeneration {
    pub fn allows_chipset(&self, text: &str) -> bool {
        let upper = text.to_uppercase();
        self.chipsets
            .iter()
            .any(|c| !c.trim().is_empty() && upper.contains(&c.trim().to_uppercase()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SocketTable {
    #[serde(default)]
    pub brands: Vec<BrandMarker>,
    #[serde(default)]
    pub generations: Vec<SocketGeneration>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerEntry {
    pub pattern: String,
    pub watts: u32,
}

/// Ordered name → draw table; the first matching pattern wins
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerTable {
    pub default_w: u32,
    #[serde(default)]
    pub entries: Vec<PowerEntry>,
}

impl Default for PowerTable {
    fn default() -> Self {
        Self {
            default_w: 100,
            entries: vec![],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardMarker {
    pub form_factor: FormFactor,
    pub markers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseMarker {
    pub markers: Vec<String>,
    pub supports: Vec<FormFactor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormFactorTable {
    /// Checked in order; earlier entries take precedence
    #[serde(default)]
    pub board_markers: Vec<BoardMarker>,
    pub default_board: FormFactor,
    #[serde(default)]
    pub case_markers: Vec<CaseMarker>,
    pub default_case: Vec<FormFactor>,
}

impl Default for FormFactorTable {
    fn default() -> Self {
        Self {
            board_markers: vec![],
            default_board: FormFactor::Atx,
            case_markers: vec![],
            default_case: vec![FormFactor::Atx, FormFactor::MicroAtx, FormFactor::MiniItx],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_form_factor_parse() {
        assert_eq!(FormFactor::parse("M-ATX"), Some(FormFactor::MicroAtx));
        assert_eq!(FormFactor::parse("Mini-ITX"), Some(FormFactor::MiniItx));
        assert_eq!(FormFactor::parse(" atx "), Some(FormFactor::Atx));
        assert_eq!(FormFactor::parse("E-ATX"), Some(FormFactor::ExtendedAtx));
        assert_eq!(FormFactor::parse("Micro ATX"), Some(FormFactor::MicroAtx));
        assert_eq!(FormFactor::parse("XL-ATX"), None);
    }

    #[test]
    fn test_allows_chipset() {
        let gen = SocketGeneration {
            family: "AM5".to_string(),
            manufacturer: Manufacturer::Amd,
            markers: vec![],
            model_series: vec!["7".to_string()],
            chipsets: vec!["B650".to_string(), "X670".to_string()],
            memory: vec!["DDR5".to_string()],
        };
        assert!(gen.allows_chipset("b650m"));
        assert!(gen.allows_chipset("AMD X670E"));
        assert!(!gen.allows_chipset("B550"));
    }

    #[test]
    fn test_allows_chipset_ignores_entry_case() {
        let gen = SocketGeneration {
            family: "AM5".to_string(),
            manufacturer: Manufacturer::Amd,
            markers: vec![],
            model_series: vec![],
            chipsets: vec!["b650".to_string(), " ".to_string()],
            memory: vec![],
        };
        assert!(gen.allows_chipset("ASRock B650M PRO RS"));
        assert!(!gen.allows_chipset("ASUS PRIME A620M-K"));
    }
}

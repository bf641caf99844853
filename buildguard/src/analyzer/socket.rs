//! CPU socket / motherboard chipset compatibility

use crate::analyzer::rules::{Finding, Rule, RuleContext};
use crate::catalog::{Catalog, Manufacturer, SocketGeneration};
use crate::parser::schema::{Category, ComponentRecord};

const CPU_MANUFACTURER_KEYS: &[&str] = &["제조사", "manufacturer"];
const CPU_GENERATION_KEYS: &[&str] = &["세대 구분", "generation"];
const BOARD_PLATFORM_KEYS: &[&str] = &["제품 분류", "platform"];
const BOARD_CHIPSET_KEYS: &[&str] = &["세부 칩셋", "chipset"];

pub struct SocketChipsetRule;

impl Rule for SocketChipsetRule {
    fn id(&self) -> &str {
        "socket_chipset"
    }

    fn name(&self) -> &str {
        "CPU Socket / Chipset"
    }

    fn description(&self) -> &str {
        "CPU and motherboard vendors must match and the board chipset must carry the CPU's socket generation"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let (Some(cpu), Some(board)) = (
            ctx.combo.get(Category::Cpu),
            ctx.combo.get(Category::Motherboard),
        ) else {
            return Vec::new();
        };

        let Some(cpu_vendor) = cpu_manufacturer(ctx.catalog, cpu) else {
            tracing::debug!("CPU vendor of '{}' unknown; socket check skipped", cpu.name);
            return Vec::new();
        };

        let (chipset_text, declared) = match board.attribute(BOARD_CHIPSET_KEYS) {
            Some(chipset) => (chipset, true),
            None => (board.name.as_str(), false),
        };

        if let Some(board_vendor) = board_manufacturer(ctx.catalog, board, chipset_text) {
            if board_vendor != cpu_vendor {
                return vec![Finding::issue(
                    self.id(),
                    format!(
                        "Socket/chipset mismatch: CPU '{}' is a {} processor but motherboard '{}' is built for {} processors",
                        cpu.name, cpu_vendor, board.name, board_vendor
                    ),
                )
                .about(board)];
            }
        }

        let Some(generation) = cpu_generation(ctx.catalog, cpu_vendor, cpu) else {
            tracing::debug!("Socket generation of '{}' unknown; chipset check skipped", cpu.name);
            return Vec::new();
        };

        if generation.allows_chipset(chipset_text) {
            return Vec::new();
        }

        let elsewhere = ctx
            .catalog
            .sockets
            .generations
            .iter()
            .filter(|g| g.family != generation.family)
            .find_map(|g| matched_chipset(g, chipset_text).map(|c| (g, c)));

        let message = match (declared, elsewhere) {
            (_, Some((other, chipset))) => format!(
                "Socket/chipset mismatch: motherboard '{}' uses the {} chipset ({} socket), which cannot run {} CPU '{}' (supported chipsets: {})",
                board.name,
                chipset,
                other.family,
                generation.family,
                cpu.name,
                generation.chipsets.join(", ")
            ),
            (true, None) => format!(
                "Socket/chipset mismatch: chipset '{}' is not among the chipsets supporting {} CPU '{}' (supported chipsets: {})",
                chipset_text,
                generation.family,
                cpu.name,
                generation.chipsets.join(", ")
            ),
            (false, None) => {
                // Board name carries no recognizable chipset token
                tracing::debug!("No chipset recognized in '{}'; left unflagged", board.name);
                return Vec::new();
            }
        };

        vec![Finding::issue(self.id(), message).about(board)]
    }
}

fn cpu_manufacturer(catalog: &Catalog, cpu: &ComponentRecord) -> Option<Manufacturer> {
    cpu.attribute(CPU_MANUFACTURER_KEYS)
        .and_then(|v| catalog.manufacturer_in(v))
        .or_else(|| catalog.manufacturer_in(&cpu.name))
}

/// Platform attribute first, else the vendor of whichever generation lists the chipset
fn board_manufacturer(
    catalog: &Catalog,
    board: &ComponentRecord,
    chipset_text: &str,
) -> Option<Manufacturer> {
    board
        .attribute(BOARD_PLATFORM_KEYS)
        .and_then(|v| catalog.manufacturer_in(v))
        .or_else(|| catalog.generation_for_chipset(chipset_text).map(|g| g.manufacturer))
}

fn cpu_generation<'c>(
    catalog: &'c Catalog,
    vendor: Manufacturer,
    cpu: &ComponentRecord,
) -> Option<&'c SocketGeneration> {
    cpu.attribute(CPU_GENERATION_KEYS)
        .and_then(|v| catalog.generation_for_cpu(Some(vendor), v))
        .or_else(|| catalog.generation_for_cpu(Some(vendor), &cpu.name))
}

fn matched_chipset<'g>(generation: &'g SocketGeneration, text: &str) -> Option<&'g str> {
    let upper = text.to_uppercase();
    generation
        .chipsets
        .iter()
        .find(|c| !c.trim().is_empty() && upper.contains(&c.trim().to_uppercase()))
        .map(|c| c.trim())
}

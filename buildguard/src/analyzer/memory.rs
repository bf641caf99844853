//! Memory generation compatibility

use crate::analyzer::rules::{contains_upper, Finding, Rule, RuleContext};
use crate::catalog::Catalog;
use crate::parser::schema::{Category, ComponentRecord};

const MEMORY_GENERATIONS: &[&str] = &["DDR5", "DDR4"];

const MODULE_TYPE_KEYS: &[&str] = &["메모리 규격", "memory_type"];
const CPU_SUPPORT_KEYS: &[&str] = &["메모리 규격", "memory_support"];
const CPU_MANUFACTURER_KEYS: &[&str] = &["제조사", "manufacturer"];
const CPU_GENERATION_KEYS: &[&str] = &["세대 구분", "generation"];
const BOARD_MEMORY_KEYS: &[&str] = &["메모리 종류", "memory_type"];

pub struct MemoryGenerationRule;

impl Rule for MemoryGenerationRule {
    fn id(&self) -> &str {
        "memory_generation"
    }

    fn name(&self) -> &str {
        "Memory Generation"
    }

    fn description(&self) -> &str {
        "The memory module's DDR generation must be supported by the CPU and the motherboard"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let Some(memory) = ctx.combo.get(Category::Memory) else {
            return Vec::new();
        };

        let Some(module_gen) = module_generation(memory) else {
            return vec![Finding::uncertain(
                self.id(),
                format!(
                    "Memory generation of '{}' could not be determined from its name",
                    memory.name
                ),
            )
            .about(memory)];
        };

        let mut findings = Vec::new();

        if let Some(cpu) = ctx.combo.get(Category::Cpu) {
            match cpu_supported_generations(ctx.catalog, cpu) {
                Some(supported) if !supported.iter().any(|g| *g == module_gen) => {
                    findings.push(
                        Finding::issue(
                            self.id(),
                            format!(
                                "Memory generation mismatch: CPU '{}' supports {} but memory '{}' is {}",
                                cpu.name,
                                supported.join("/"),
                                memory.name,
                                module_gen
                            ),
                        )
                        .about(memory),
                    );
                }
                Some(_) => {}
                None => {
                    tracing::debug!("Memory support of '{}' unknown; CPU side skipped", cpu.name);
                }
            }
        }

        if let Some(board) = ctx.combo.get(Category::Motherboard) {
            if let Some(declared) = board.attribute(BOARD_MEMORY_KEYS) {
                let supported = generations_in(declared);
                if !supported.is_empty() && !supported.contains(&module_gen) {
                    findings.push(
                        Finding::issue(
                            self.id(),
                            format!(
                                "Memory generation mismatch: motherboard '{}' takes {} memory but '{}' is {}",
                                board.name,
                                supported.join("/"),
                                memory.name,
                                module_gen
                            ),
                        )
                        .about(memory),
                    );
                }
            }
        }

        findings
    }
}

/// Exactly one generation named in the module's name (or declared type)
fn module_generation(memory: &ComponentRecord) -> Option<&'static str> {
    let from_name = generations_in(&memory.name);
    if from_name.len() == 1 {
        return Some(from_name[0]);
    }
    let declared = memory.attribute(MODULE_TYPE_KEYS).map(generations_in)?;
    (declared.len() == 1).then(|| declared[0])
}

/// Declared support first, else the default of the CPU's socket generation
fn cpu_supported_generations(catalog: &Catalog, cpu: &ComponentRecord) -> Option<Vec<&'static str>> {
    if let Some(declared) = cpu.attribute(CPU_SUPPORT_KEYS) {
        let supported = generations_in(declared);
        if !supported.is_empty() {
            return Some(supported);
        }
    }

    let vendor = cpu
        .attribute(CPU_MANUFACTURER_KEYS)
        .and_then(|v| catalog.manufacturer_in(v))
        .or_else(|| catalog.manufacturer_in(&cpu.name));
    let generation = cpu
        .attribute(CPU_GENERATION_KEYS)
        .and_then(|v| catalog.generation_for_cpu(vendor, v))
        .or_else(|| catalog.generation_for_cpu(vendor, &cpu.name))?;

    let supported: Vec<&'static str> = MEMORY_GENERATIONS
        .iter()
        .copied()
        .filter(|g| generation.memory.iter().any(|m| m.eq_ignore_ascii_case(g)))
        .collect();
    (!supported.is_empty()).then_some(supported)
}

fn generations_in(text: &str) -> Vec<&'static str> {
    MEMORY_GENERATIONS
        .iter()
        .copied()
        .filter(|g| contains_upper(text, g))
        .collect()
}

//! Motherboard / case form factor compatibility

use crate::analyzer::rules::{Finding, Rule, RuleContext};
use crate::catalog::{Catalog, FormFactor};
use crate::parser::schema::{Category, ComponentRecord};

const BOARD_FORM_FACTOR_KEYS: &[&str] = &["폼팩터", "form_factor"];
const CASE_SUPPORT_KEYS: &[&str] = &["메인보드 지원", "supported_boards"];

pub struct FormFactorRule;

impl Rule for FormFactorRule {
    fn id(&self) -> &str {
        "form_factor"
    }

    fn name(&self) -> &str {
        "Board / Case Form Factor"
    }

    fn description(&self) -> &str {
        "The case must accept the motherboard's format; clearances are always left for review"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Finding> {
        let (Some(board), Some(case)) = (
            ctx.combo.get(Category::Motherboard),
            ctx.combo.get(Category::Case),
        ) else {
            return Vec::new();
        };

        let board_format = board_form_factor(ctx.catalog, board);
        let supported = case_support(ctx.catalog, case);

        if !supported.contains(&board_format) {
            let supported_list = supported
                .iter()
                .map(|f| f.to_string())
                .collect::<Vec<_>>()
                .join(", ");
            return vec![Finding::issue(
                self.id(),
                format!(
                    "Form factor mismatch: {} motherboard '{}' does not fit case '{}' (supports {}); physically impossible to assemble",
                    board_format, board.name, case.name, supported_list
                ),
            )
            .about(case)];
        }

        vec![Finding::uncertain(
            self.id(),
            format!(
                "{} motherboard '{}' fits case '{}'; GPU length and cooler height clearance need confirmation",
                board_format, board.name, case.name
            ),
        )
        .about(case)]
    }
}

/// Declared format, else name markers, else the catalog default
fn board_form_factor(catalog: &Catalog, board: &ComponentRecord) -> FormFactor {
    board
        .attribute(BOARD_FORM_FACTOR_KEYS)
        .and_then(|v| FormFactor::parse(v).or_else(|| catalog.board_form_factor(v)))
        .or_else(|| catalog.board_form_factor(&board.name))
        .unwrap_or_else(|| catalog.default_board_form_factor())
}

/// Declared support list, else name markers, else all standard formats
fn case_support(catalog: &Catalog, case: &ComponentRecord) -> Vec<FormFactor> {
    if let Some(declared) = case.attribute(CASE_SUPPORT_KEYS) {
        let parsed = parse_format_list(declared);
        if !parsed.is_empty() {
            return parsed;
        }
        if let Some(from_markers) = catalog.case_support(declared) {
            return from_markers;
        }
    }
    catalog
        .case_support(&case.name)
        .unwrap_or_else(|| catalog.default_case_support())
}

/// "ATX, M-ATX, Mini-ITX" / "ATX/M-ATX" style lists
fn parse_format_list(text: &str) -> Vec<FormFactor> {
    let mut formats: Vec<FormFactor> = text
        .split([',', '/', '|', '·'])
        .filter_map(|part| FormFactor::parse(part.trim()))
        .collect();
    formats.sort();
    formats.dedup();
    formats
}

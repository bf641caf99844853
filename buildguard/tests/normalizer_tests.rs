//! Input normalization tests

use buildguard::parser::ComboNormalizer;
use buildguard::prelude::*;
use buildguard::{split_candidates, Catalog};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_price_is_split_from_name() {
    let catalog = Catalog::builtin();
    let normalizer = ComboNormalizer::new(&catalog);

    let record = normalizer
        .parse_line("그래픽카드: MSI RTX 4060 (1,000원)")
        .expect("line should be recognized");
    assert_eq!(record.category, Category::Gpu);
    assert_eq!(record.name, "MSI RTX 4060");
    assert_eq!(record.price, Some(1_000));
}

#[test]
fn test_case_folding_price_suffix_keeps_name() {
    let catalog = Catalog::builtin();
    let normalizer = ComboNormalizer::new(&catalog);

    let record = normalizer
        .parse_line("CPU: AMD 라이젠5 7600 (189000 \u{212A}RW)")
        .expect("line should be recognized");
    assert_eq!(record.category, Category::Cpu);
    assert_eq!(record.name, "AMD 라이젠5 7600 (189000 \u{212A}RW)");
    assert_eq!(record.price, None);

    let record = normalizer.parse_line("RAM: 삼성전자 DDR5-5600 (89000 krw)").unwrap();
    assert_eq!(record.price, Some(89_000));
}

#[test]
fn test_case_folding_price_suffix_through_evaluation() {
    let verdict = buildguard::check_offline(
        "CPU: AMD 라이젠5 7600 (189000 \u{212A}RW)\n메인보드: ASRock B650M PRO RS (\u{212A}\u{212A}\u{212A}원)\nRAM: 삼성전자 DDR5-5600 16GB",
    )
    .unwrap();
    assert!(verdict.compatible, "issues: {:?}", verdict.issues);
}

#[test]
fn test_bullets_and_fullwidth_colon() {
    let catalog = Catalog::builtin();
    let normalizer = ComboNormalizer::new(&catalog);

    let record = normalizer.parse_line("  • 파워： 마이크로닉스 Classic II 700W").unwrap();
    assert_eq!(record.category, Category::PowerSupply);
    assert_eq!(record.name, "마이크로닉스 Classic II 700W");
    assert_eq!(record.price, None);

    assert!(normalizer.parse_line("총 가격: 1,223,000원").is_none());
    assert!(normalizer.parse_line("CPU:").is_none());
}

#[test]
fn test_free_text_fixture_recovers_all_lines() {
    let catalog = Catalog::builtin();
    let text = std::fs::read_to_string(fixture_path("valid_build.txt")).unwrap();
    let combo = ComboNormalizer::new(&catalog)
        .normalize(&ComboInput::from(text))
        .unwrap();

    assert_eq!(combo.len(), 7);
    let cpu = combo.get(Category::Cpu).unwrap();
    assert_eq!(cpu.name, "AMD 라이젠5-6세대 7600 (라파엘)");
    assert_eq!(cpu.price, Some(259_000));
    assert!(combo.get(Category::Cooler).is_none());
}

#[test]
fn test_structured_encoded_attributes() {
    let catalog = Catalog::builtin();
    let json = std::fs::read_to_string(fixture_path("structured_build.json")).unwrap();
    let combo = ComboNormalizer::new(&catalog)
        .normalize(&ComboInput::from_json_str(&json).unwrap())
        .unwrap();

    // The cooler has no name and is dropped
    assert_eq!(combo.len(), 6);
    assert!(combo.get(Category::Cooler).is_none());

    let cpu = combo.get(Category::Cpu).unwrap();
    assert_eq!(cpu.attribute(&["PPT"]), Some("162W"));
    assert_eq!(cpu.attribute(&["세대 구분"]), Some("5세대 (Zen4)"));
    assert_eq!(cpu.price, Some(453_000));

    let board = combo.get(Category::Motherboard).unwrap();
    assert_eq!(board.attribute(&["세부 칩셋"]), Some("AMD B650"));
    assert_eq!(board.price, Some(229_000));

    // Fields beside the name are folded into the attributes
    let gpu = combo.get(Category::Gpu).unwrap();
    assert_eq!(gpu.attribute(&["권장파워"]), Some("정격파워 650W 이상"));
}

#[test]
fn test_detect_input_kind() {
    assert!(matches!(
        ComboInput::detect(r#"{"CPU": {"name": "AMD 라이젠5 7600"}}"#),
        ComboInput::Structured(_)
    ));
    assert!(matches!(
        ComboInput::detect("CPU: AMD 라이젠5 7600"),
        ComboInput::FreeText(_)
    ));
    // Malformed JSON falls back to text scanning
    assert!(matches!(
        ComboInput::detect("{ not json"),
        ComboInput::FreeText(_)
    ));
}

#[test]
fn test_insufficient_input_reports_recovered_count() {
    let catalog = Catalog::builtin();
    let err = ComboNormalizer::new(&catalog)
        .normalize(&ComboInput::from("CPU: AMD 라이젠5 7600\n메모: 견적 미완성"))
        .unwrap_err();
    assert_eq!(err.recovered, 1);
}

#[test]
fn test_split_candidate_fixture_in_order() {
    let text = std::fs::read_to_string(fixture_path("candidates.txt")).unwrap();
    let candidates = split_candidates(&text);

    assert_eq!(candidates.len(), 3);
    assert!(candidates[0].starts_with("조합 1"));
    assert!(candidates[1].starts_with("조합 2"));
    assert!(candidates[2].starts_with("조합 3"));
}

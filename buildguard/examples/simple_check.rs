//! Simple example: evaluate one combination offline and print the verdict.

use buildguard::prelude::*;
use std::path::Path;

fn main() -> Result<(), BuildGuardError> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "tests/fixtures/valid_build.txt".to_string());
    let path = Path::new(&path);

    if !path.exists() {
        eprintln!("File not found: {}", path.display());
        eprintln!("Usage: cargo run --example simple_check [path/to/build.txt|build.json]");
        std::process::exit(1);
    }

    let text = std::fs::read_to_string(path)?;
    let core = BuildGuardCore::new(EngineConfig::default())?;
    let verdict = core.evaluate_offline(&ComboInput::detect(&text));

    println!("Compatibility for: {}", path.display());
    println!("Compatible: {}", verdict.compatible);
    for issue in &verdict.issues {
        println!("  ISSUE   {}", issue);
    }
    for warning in &verdict.warnings {
        println!("  WARNING {}", warning);
    }
    if let Some(power) = &verdict.power {
        println!("\n{}", power.breakdown());
    }

    if !verdict.compatible {
        std::process::exit(1);
    }
    Ok(())
}

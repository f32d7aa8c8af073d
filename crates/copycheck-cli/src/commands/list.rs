//! List command - show the scenario catalogue

use anyhow::Result;
use colored::*;
use copycheck_harness::{builtin_registry, Registry};

pub fn run(json: bool) -> Result<()> {
    let registry = builtin_registry()?;
    if json {
        println!("{}", json_listing(&registry));
    } else {
        print_listing(&registry);
    }
    Ok(())
}

fn print_listing(registry: &Registry) {
    let width = registry.names().map(str::len).max().unwrap_or(0);
    for scenario in registry.iter() {
        println!(
            "{:<width$}  {}{}",
            scenario.name().bold(),
            scenario.shape(),
            if scenario.has_checker() {
                " [checked]".cyan().to_string()
            } else {
                String::new()
            },
            width = width
        );
        println!("{:<width$}  {}", "", scenario.summary().dimmed(), width = width);
    }
    println!();
    println!("{} scenarios", registry.len().to_string().bold());
}

fn json_listing(registry: &Registry) -> serde_json::Value {
    let scenarios: Vec<_> = registry
        .iter()
        .map(|s| {
            let shape = s.shape();
            serde_json::json!({
                "name": s.name(),
                "summary": s.summary(),
                "element": shape.element().to_string(),
                "source": shape.source().to_string(),
                "passes_source": shape.passes_source(),
                "dest": shape.dest().to_string(),
                "extra_args": shape.extra_args(),
                "reduces": shape.reduces(),
                "checker": s.has_checker(),
            })
        })
        .collect();
    serde_json::json!({
        "count": registry.len(),
        "scenarios": scenarios,
    })
}

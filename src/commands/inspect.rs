use std::path::Path;

use anyhow::{Context, Result};
use cadence_config::CadenceConfig;
use cadence_markup::PageMarkup;

pub fn run(page: &Path, config: &CadenceConfig) -> Result<()> {
    let markup = PageMarkup::from_file(page, config)
        .with_context(|| format!("failed to scan {}", page.display()))?;
    let manifest = markup.manifest();

    println!("page: {} ({:?})", page.display(), manifest.kind);
    println!("tracked elements: {}", manifest.elements.len());

    println!("animatables:");
    for spec in &manifest.animatables {
        let role = if spec.hero {
            "hero"
        } else if spec.in_any_hero {
            "unobserved"
        } else {
            "lazy"
        };
        println!(
            "  {:<4} {:<28} delay {:>5}ms  {role}",
            spec.id.to_string(),
            manifest.label(spec.id),
            spec.reveal_delay_ms
        );
    }

    println!("counters:");
    for counter in &manifest.counters {
        println!(
            "  {:<4} {:<28} target {}",
            counter.id.to_string(),
            manifest.label(counter.id),
            counter.target
        );
    }

    println!("parallax:");
    for pair in &manifest.parallax {
        println!(
            "  {} in {}",
            manifest.label(pair.inner),
            manifest.label(pair.frame)
        );
    }

    println!("hover targets: {}", manifest.hover_targets.len());
    Ok(())
}

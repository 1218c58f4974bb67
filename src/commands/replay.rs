use std::path::Path;

use anyhow::{Context, Result};
use cadence_config::CadenceConfig;
use cadence_markup::{PageManifest, PageMarkup};
use cadence_scene::{StampedMutation, Target};
use clap::ValueEnum;

use crate::replay::replay;
use crate::scenario::Scenario;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One aligned line per mutation
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

pub fn run(page: &Path, scenario: &Path, config: &CadenceConfig, format: OutputFormat) -> Result<()> {
    let markup = PageMarkup::from_file(page, config)
        .with_context(|| format!("failed to scan {}", page.display()))?;
    let scenario = Scenario::load_from_file(scenario)?;
    let report = replay(markup, &scenario, config)?;

    match format {
        OutputFormat::Text => {
            for stamped in &report.mutations {
                println!("{}", describe(&report.manifest, stamped));
            }
            println!();
            println!(
                "{} mutations over {} frames; stage {:?}; {}/{} elements revealed",
                report.mutations.len(),
                report.frames,
                report.final_stage,
                report.revealed,
                report.manifest.animatables.len()
            );
        }
        OutputFormat::Json => {
            for stamped in &report.mutations {
                println!("{}", serde_json::to_string(stamped)?);
            }
        }
    }
    Ok(())
}

fn describe(manifest: &PageManifest, stamped: &StampedMutation) -> String {
    let line = stamped.mutation.to_string();
    // Swap the numeric handle for something a reader recognises.
    let line = match stamped.mutation.target() {
        Target::Element(id) => {
            let handle = id.to_string();
            let rest = line.strip_prefix(&handle).unwrap_or(&line);
            format!("{}{rest}", manifest.label(id))
        }
        _ => line,
    };
    format!("{:>9.1}  {line}", stamped.at_ms)
}

/// Example program to print the loaded configuration
///
/// Run with: cargo run -p cadence-config --example print_config

fn main() {
    let config = cadence_config::CadenceConfig::load();

    println!("=== Cadence Configuration ===\n");

    println!("Page:");
    println!("  Kind: {:?}", config.page.kind);
    println!();

    println!("Timing:");
    println!("  Loader delay (landing): {}ms", config.timing.loader_delay_landing_ms);
    println!("  Loader delay (secondary): {}ms", config.timing.loader_delay_secondary_ms);
    println!("  Hero stage delay: {}ms", config.timing.hero_stage_delay_ms);
    println!("  Counter duration: {}ms", config.timing.counter_duration_ms);
    println!("  Follower smoothing: {}", config.timing.follower_smoothing);
    println!();

    println!("Observers:");
    println!("  Reveal threshold: {}", config.observers.reveal_threshold);
    println!("  Reveal bottom inset: {}px", config.observers.reveal_bottom_inset_px);
    println!("  Counter threshold: {}", config.observers.counter_threshold);
    println!();

    if let Err(e) = config.validate() {
        eprintln!("Configuration is invalid: {}", e);
    }

    match toml::to_string_pretty(&config) {
        Ok(toml_str) => {
            println!("=== Serialized Configuration ===");
            println!("{}", toml_str);
        }
        Err(e) => {
            eprintln!("Failed to serialize config: {}", e);
        }
    }
}

/// Example program to print the loaded configuration
///
/// Run with: cargo run -p cadence-config --example print_config

fn main() {
    let config = cadence_config::CadenceConfig::load();

    println!("=== Cadence Configuration ===\n");

    println!("Timing Settings:");
    println!("  Default Curve: {}", config.timing.default_curve);
    println!();

    println!("Clock Settings:");
    println!("  Frame Rate: {}", config.clock.frame_rate);
    println!("  Frame Interval: {:?}", config.frame_interval());
    println!("  Fixed Step: {}", config.clock.fixed_step);
    println!("  Max Frames: {:?}", config.clock.max_frames);
    println!();

    println!("Event Settings:");
    println!("  Record Positions: {}", config.events.record_positions);
    println!();

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

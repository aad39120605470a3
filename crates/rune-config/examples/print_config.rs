/// Example program to print the loaded animation configuration
///
/// Run with: cargo run -p rune-config --example print_config

fn main() {
    // Load configuration from rune.toml plus RUNE_ANIM_* overrides
    let config = rune_config::AnimationConfig::load();

    println!("=== Rune Animation Configuration ===\n");

    println!("Scheduler Settings:");
    println!("  Jump When Offscreen: {}", config.scheduler.jump_when_offscreen);
    println!("  Frame Interval (ms): {}", config.scheduler.frame_interval_ms);
    println!();

    println!("Animator Defaults:");
    println!("  Duration (s): {}", config.defaults.duration);
    println!("  Delay (s): {}", config.defaults.delay);
    println!("  Easing: {}", config.defaults.easing);
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

//! valentine — interactive entry point.

use std::io::{self, Write};

use track_session::theme_tracks;
use valentine_app::app::{run, AppConfig};
use valentine_app::pages::COLOR_PRESETS;

fn main() {
    env_logger::init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 For Kayla — a Valentine site                 ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Tracking: hand-capture hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Tracking: mouse simulation  (use --features leap for hardware)");
    println!();

    let cfg = if std::env::args().any(|a| a == "--quick") {
        println!("  Quick-start: first track, cherry blossom, intensity 0.5\n");
        AppConfig::default()
    } else {
        configure_interactively()
    };

    println!();
    println!("  Opening window…");
    println!();

    if let Err(e) = run(cfg) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn configure_interactively() -> AppConfig {
    println!("  Theme track:");
    for (i, t) in theme_tracks().iter().enumerate() {
        println!("    {}. {} — {}", i + 1, t.title, t.artist);
    }
    let start_track = read_line("  Choice (default 1): ")
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|n| *n < theme_tracks().len())
        .unwrap_or(0);

    println!("  Particle color:");
    for (i, p) in COLOR_PRESETS.iter().enumerate() {
        println!("    {}. {}", i + 1, p.name);
    }
    let color_preset = read_line("  Choice (default 1): ")
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .filter(|n| *n < COLOR_PRESETS.len())
        .unwrap_or(0);

    let intensity = read_line("  Particle intensity 0.0–1.0 (default 0.5): ")
        .trim()
        .parse::<f32>()
        .map(|v| v.clamp(0.0, 1.0))
        .unwrap_or(0.5);

    AppConfig {
        start_track,
        color_preset,
        intensity,
    }
}

fn read_line(prompt: &str) -> String {
    print!("{}", prompt);
    io::stdout().flush().ok();
    let mut buf = String::new();
    io::stdin().read_line(&mut buf).ok();
    buf
}

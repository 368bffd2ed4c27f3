//! Terrarium walkthrough: generate a planet, release some nibbles, place a
//! landmark, and watch them gather.
//!
//! Run with `RUST_LOG=terrarium_nav=debug` for generation and pathing logs.

use terrarium_nav::*;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const STEP_MS: f32 = 16.0;

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "terrarium_nav=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== terrarium_nav demo ===\n");

    let config = PlanetConfigBuilder::new()
        .seed(2024)
        .subdivision_level(3)?
        .noise_magnitude(0.3)?
        .build()?;

    let mut terrarium = Terrarium::generate(config, SteeringConfig::default())?;
    let planet = terrarium.planet();
    let dry = (0..planet.nav().node_count())
        .filter(|&f| planet.nav().is_traversable(f))
        .count();
    println!("Planet seed {}:", config.seed);
    println!("  {} faces, {} dry", planet.mesh().face_count(), dry);
    println!("  {}", planet.nav());

    let spawn_points = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::Z, Vec3::new(0.5, 0.5, -0.7)];
    for point in spawn_points {
        let index = terrarium.spawn_nibble(point)?;
        println!("  nibble {} spawned on face {}", index, terrarium.nibbles()[index].position().face());
    }

    println!("\nWandering for 5 s...");
    run(&mut terrarium, 5_000.0);
    report(&terrarium);

    match terrarium.send_to_random(0) {
        Some(face) => println!("\nnibble 0 heads for face {}", face),
        None => println!("\nnibble 0 found nowhere reachable to go"),
    }
    run(&mut terrarium, 5_000.0);
    report(&terrarium);

    let target = terrarium.nibbles()[1].position().cartesian();
    terrarium.place_landmark(target)?;
    println!("\nLandmark placed on face {}; orbiting for 20 s...", terrarium.landmarks()[0].position().face());
    run(&mut terrarium, 20_000.0);
    report(&terrarium);

    let center = terrarium.landmarks()[0].position().cartesian();
    for (i, nibble) in terrarium.nibbles().iter().enumerate() {
        println!("  nibble {} is {:.3} from the landmark", i, nibble.position().cartesian().distance(center));
    }

    println!("\nRegenerating with seed {}...", config.seed + 1);
    terrarium.regenerate(config.seed + 1)?;
    run(&mut terrarium, 2_000.0);
    report(&terrarium);

    println!("\n=== Demo Complete ===");
    Ok(())
}

fn run(terrarium: &mut Terrarium, duration_ms: f32) {
    let steps = (duration_ms / STEP_MS) as usize;
    for _ in 0..steps {
        terrarium.step(STEP_MS);
    }
}

fn report(terrarium: &Terrarium) {
    let mesh = terrarium.planet().mesh();
    for (i, nibble) in terrarium.nibbles().iter().enumerate() {
        let pos = nibble.position();
        println!(
            "  nibble {}: face {:4}  speed {:.4}{}",
            i,
            pos.face(),
            nibble.last_velocity().length(),
            if mesh.is_submerged(pos.cartesian()) { "  (swimming)" } else { "" }
        );
    }
    println!("  grass on {} faces", mesh.grass_count());
}

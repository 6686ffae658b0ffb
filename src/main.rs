//! Space Collision Demo
//!
//! Drives the collision engine through a short scripted scene and logs
//! what the delegates observe. Pass a JSON config path as the first
//! argument to override the defaults; set `RUST_LOG` for more detail.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Context;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use space_collision::{
    FRAME_RATE, VERSION,
    CollisionConfig, CollisionWorld, HazardEntry, HazardInfo, PassReport, PlayerEntry,
    PowerupEntry, ProjectileEntry, SceneNode, TransformNode, Vec2,
};

/// Number of frames to simulate.
const DEMO_FRAMES: u32 = 600;

/// Outline of the rock hazards, shared by every instance.
static ROCK: [Vec2; 6] = [
    Vec2::new(-8.0, -4.0),
    Vec2::new(-2.0, -9.0),
    Vec2::new(7.0, -6.0),
    Vec2::new(9.0, 2.0),
    Vec2::new(3.0, 8.0),
    Vec2::new(-6.0, 6.0),
];

/// What the player's delegates accumulate.
#[derive(Debug, Default)]
struct PlayerStats {
    health: i32,
    score: i32,
    shield: i32,
    hazards_destroyed: u32,
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Space Collision v{}", VERSION);
    info!("Frame Rate: {} Hz", FRAME_RATE);

    let config = match std::env::args().nth(1) {
        Some(path) => CollisionConfig::from_json_file(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => CollisionConfig::default(),
    };
    info!("Config: {:?}", config);

    demo_scene(config)
}

/// Scripted scene: hazards drift towards the ship while it fires forward.
fn demo_scene(config: CollisionConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Scene ===");

    let root = TransformNode::new("scene");
    let mut world = CollisionWorld::with_config(config);
    let stats = Rc::new(RefCell::new(PlayerStats {
        health: 100,
        shield: 20,
        ..PlayerStats::default()
    }));

    // Player
    let ship = TransformNode::at("ship", Vec2::new(0.0, 0.0));
    root.add_child(&ship);
    let on_hit = Rc::clone(&stats);
    let on_projectile = Rc::clone(&stats);
    world.set_player(PlayerEntry::circle(
        ship.clone(),
        Vec2::ZERO,
        12.0,
        move |hazard| {
            let info = hazard.info();
            let mut stats = on_hit.borrow_mut();
            if stats.shield > 0 && !info.penetrates_shield {
                stats.shield -= info.damage;
            } else {
                stats.health -= info.damage;
            }
            if info.delete_anyway {
                hazard.detach_all();
            }
        },
        move |hazard| {
            let Some(score) = hazard.info().projectile_score else {
                return false;
            };
            let mut stats = on_projectile.borrow_mut();
            stats.score += score;
            stats.hazards_destroyed += 1;
            hazard.detach_all();
            true
        },
    )?);

    // Moving entities and their per-frame velocity
    let mut movers: Vec<(Rc<TransformNode>, Vec2)> = Vec::new();

    // Asteroid field drifting in from the right
    for i in 0..12 {
        let lane = (i % 5) as f32 * 12.0 - 24.0;
        let asteroid = TransformNode::at("asteroid", Vec2::new(150.0 + 40.0 * i as f32, lane));
        root.add_child(&asteroid);
        let info = HazardInfo::new(5).with_projectile_score(25);
        if i % 3 == 0 {
            asteroid.set_scale(1.5);
            world.add_hazard(HazardEntry::polygon(asteroid.clone(), Vec2::ZERO, &ROCK[..], info)?);
        } else {
            let info = info.with_delete_anyway();
            world.add_hazard(HazardEntry::circle(asteroid.clone(), Vec2::ZERO, 6.0, info)?);
        }
        movers.push((asteroid, Vec2::new(-1.5, 0.0)));
    }

    // Electric fence between two pylons, indestructible
    let pylon_top = TransformNode::at("pylon_top", Vec2::new(400.0, 40.0));
    let pylon_bottom = TransformNode::at("pylon_bottom", Vec2::new(400.0, -40.0));
    root.add_child(&pylon_top);
    root.add_child(&pylon_bottom);
    world.add_hazard(HazardEntry::two_node_capsule(
        pylon_top.clone(),
        pylon_bottom.clone(),
        Vec2::ZERO,
        2.0,
        HazardInfo::new(15).with_shield_penetration(),
    )?);
    movers.push((pylon_top, Vec2::new(-1.0, 0.0)));
    movers.push((pylon_bottom, Vec2::new(-1.0, 0.0)));

    // Spinning laser arm
    let laser = TransformNode::at("laser", Vec2::new(250.0, 80.0));
    root.add_child(&laser);
    world.add_hazard(HazardEntry::two_offset_capsule(
        laser.clone(),
        Vec2::ZERO,
        Vec2::new(90.0, 0.0),
        1.5,
        HazardInfo::new(10),
    )?);

    // Power-ups
    for i in 0..3 {
        let crystal = TransformNode::at("crystal", Vec2::new(80.0 + 120.0 * i as f32, 0.0));
        root.add_child(&crystal);
        let pickup = Rc::clone(&stats);
        world.add_powerup(PowerupEntry::new(crystal.clone(), Vec2::ZERO, 4.0, move |_| {
            pickup.borrow_mut().shield += 10;
        })?);
        movers.push((crystal, Vec2::new(-1.0, 0.0)));
    }

    info!("Running {} frames...", DEMO_FRAMES);

    let mut totals = PassReport::default();
    let mut bullets: Vec<Rc<TransformNode>> = Vec::new();
    let registrar = world.registrar();

    for frame in 0..DEMO_FRAMES {
        // Fire every quarter second
        if frame % (FRAME_RATE / 4) == 0 {
            let bullet = TransformNode::at("bullet", ship.position() + Vec2::new(14.0, 0.0));
            root.add_child(&bullet);
            registrar.add_projectile(ProjectileEntry::new(bullet.clone(), Vec2::ZERO, 2.0)?);
            bullets.push(bullet);
        }

        for (node, velocity) in &movers {
            node.translate(*velocity);
        }
        for bullet in &bullets {
            bullet.translate(Vec2::new(6.0, 0.0));
            if bullet.position().x > 600.0 {
                bullet.detach();
            }
        }
        bullets.retain(|bullet| bullet.is_attached());
        laser.set_rotation(frame as f32 * 0.03);
        ship.set_position(Vec2::new(0.0, (frame as f32 * 0.02).sin() * 30.0));

        let report = world.update();
        totals.merge(&report);

        // Report every second
        if frame % FRAME_RATE == 0 {
            let stats = stats.borrow();
            info!(
                "Frame {}: health {}, shield {}, score {}, {} hazards / {} projectiles registered",
                frame,
                stats.health,
                stats.shield,
                stats.score,
                world.hazard_count(),
                world.projectile_count()
            );
        }

        if stats.borrow().health <= 0 {
            info!("Ship destroyed at frame {}", frame);
            break;
        }
    }

    // Print final results
    info!("=== Demo Results ===");
    let stats = stats.borrow();
    info!("Health: {}  Shield: {}  Score: {}", stats.health, stats.shield, stats.score);
    info!("Hazards destroyed: {}", stats.hazards_destroyed);
    info!(
        "Totals: {} hazard hits, {} projectile hits, {} pickups, {} stale entries pruned",
        totals.hazard_hits,
        totals.projectile_hits,
        totals.pickups,
        totals.pruned()
    );
    info!("Report: {}", serde_json::to_string(&totals)?);

    Ok(())
}

//! Fixed-step entity motion integration
//!
//! Advances the player and every dynamic entity by one time step: applies
//! gravity and movement-pattern forces, hands each body to the neighborhood
//! collision search, and writes the corrected state back. Emits gameplay
//! events for the orchestration layer instead of reaching into it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entity::{Entity, MovementPattern, Player};
use super::grid::{LevelDef, SpawnKind, TileGrid};
use super::rect::Rect;
use super::search::resolve_against_terrain;
use crate::consts::{COLLISION_EPSILON, MAX_FRAME_DT_MS, REST_SPEED_EPSILON};
use crate::tuning::Tuning;

/// Input commands for a single step (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Ambulation axis in [-1, 1] (left/right)
    pub move_axis: f32,
    /// Jump requested this step
    pub jump: bool,
}

/// Gameplay notifications produced by one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    PlayerJumped,
    PlayerLanded,
    PlayerDamaged { amount: f32 },
    EntityHopped { id: u32 },
    EntityLanded { id: u32 },
}

/// Deterministic RNG state, serializable with the rest of the sim.
/// Draws are derived from the seed plus a counter so replaying the same
/// input sequence replays the same jitter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RngState {
    pub seed: u64,
    pub draws: u64,
}

impl RngState {
    pub fn new(seed: u64) -> Self {
        Self { seed, draws: 0 }
    }

    /// Next value in [0, 1)
    pub fn next_unit(&mut self) -> f32 {
        self.draws += 1;
        Pcg32::seed_from_u64(self.seed.wrapping_add(self.draws)).random::<f32>()
    }
}

/// Complete simulation state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub grid: TileGrid,
    pub player: Player,
    /// Sorted by id for deterministic iteration
    pub entities: Vec<Entity>,
    pub rng_state: RngState,
    /// Accumulated simulation time, milliseconds
    pub time_ms: f64,
    next_id: u32,
}

impl World {
    /// Build a world from a parsed level: terrain plus whatever the start
    /// and dynamic-element markers place in it.
    pub fn from_level(def: &LevelDef, tuning: &Tuning, seed: u64) -> Self {
        let grid = def.build();
        let spawns = grid.spawn_points();
        let rng_state = RngState::new(seed);

        let player_pos = spawns
            .iter()
            .find_map(|s| matches!(s.kind, SpawnKind::PlayerStart).then_some(s.pos))
            .unwrap_or_else(|| {
                log::warn!("level has no start marker, spawning player at origin cell");
                Vec2::new(grid.tile_size() / 2.0, grid.tile_size() * 1.5)
            });

        let mut world = Self {
            grid,
            player: Player::spawn(player_pos, tuning),
            entities: Vec::new(),
            rng_state,
            time_ms: 0.0,
            next_id: 1,
        };
        for spawn in &spawns {
            let SpawnKind::Dynamic { pattern } = spawn.kind else {
                continue;
            };
            let id = world.next_entity_id();
            let mut entity = Entity::new(id, pattern, spawn.pos, tuning);
            match pattern {
                MovementPattern::Linear | MovementPattern::Bounce => {
                    let dir = if world.rng_state.next_unit() < 0.5 { -1.0 } else { 1.0 };
                    entity.velocity.x = dir * tuning.patrol_speed;
                }
                MovementPattern::PeriodicJump => {
                    entity.hop_timer_ms = tuning.hop_interval_ms
                        + world.rng_state.next_unit() * tuning.hop_interval_jitter_ms;
                }
            }
            world.entities.push(entity);
        }
        log::info!(
            "World ready: {}x{} tiles, {} entities, seed {}",
            world.grid.width(),
            world.grid.height(),
            world.entities.len(),
            seed
        );
        world
    }

    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Advance the simulation by one step.
///
/// Precondition: `dt_ms` is positive and already clamped by the caller to at
/// most `consts::MAX_FRAME_DT_MS`. The core does not clamp; an oversized
/// delta can tunnel bodies through tiles.
pub fn tick(world: &mut World, input: &TickInput, tuning: &Tuning, dt_ms: f32) -> Vec<GameEvent> {
    debug_assert!(dt_ms > 0.0 && dt_ms <= MAX_FRAME_DT_MS);

    let mut events = Vec::new();
    world.time_ms += dt_ms as f64;

    let World {
        grid,
        player,
        entities,
        rng_state,
        ..
    } = world;

    step_player(player, grid, input, tuning, dt_ms, &mut events);
    for entity in entities.iter_mut() {
        step_entity(entity, grid, rng_state, tuning, dt_ms, &mut events);
    }

    events
}

/// Reduce a velocity component toward zero by `amount`, never crossing it
fn decelerate(v: f32, amount: f32) -> f32 {
    if v > 0.0 {
        (v - amount).max(0.0)
    } else {
        (v + amount).min(0.0)
    }
}

fn step_player(
    player: &mut Player,
    grid: &TileGrid,
    input: &TickInput,
    tuning: &Tuning,
    dt_ms: f32,
    events: &mut Vec<GameEvent>,
) {
    let support = grid.support_under(&player.bounds);
    let grounded = support.is_some();
    let settled = grounded && player.velocity.y.abs() < REST_SPEED_EPSILON;

    // Ambulation: accelerate along the input axis, or bleed speed off
    // through surface friction when idle and resting.
    let axis = input.move_axis.clamp(-1.0, 1.0);
    if axis.abs() > f32::EPSILON {
        player.velocity.x += axis * tuning.run_accel * dt_ms;
    } else if settled {
        let friction = support.map_or(1.0, |a| a.friction);
        player.velocity.x = decelerate(player.velocity.x, tuning.ground_decel * friction * dt_ms);
    }
    let cap = player.max_run_speed(tuning);
    player.velocity.x = player.velocity.x.clamp(-cap, cap);

    // One-shot jump impulse, only from the ground
    if input.jump && grounded {
        player.velocity.y = tuning.jump_speed;
        events.push(GameEvent::PlayerJumped);
    }
    player.velocity.y -= tuning.gravity * dt_ms;

    let mut body = player.body();
    body.bounds = body.bounds.translated(body.velocity * dt_ms);
    let corrected = resolve_against_terrain(&body, grid);
    player.apply(&corrected);

    if !grounded
        && player.velocity.y.abs() < REST_SPEED_EPSILON
        && grid.support_under(&player.bounds).is_some()
    {
        events.push(GameEvent::PlayerLanded);
    }

    let damage = contact_damage(grid, &player.bounds);
    if damage > 0.0 {
        events.push(GameEvent::PlayerDamaged { amount: damage });
    }
}

fn step_entity(
    entity: &mut Entity,
    grid: &TileGrid,
    rng_state: &mut RngState,
    tuning: &Tuning,
    dt_ms: f32,
    events: &mut Vec<GameEvent>,
) {
    let support = grid.support_under(&entity.bounds);
    let grounded = support.is_some();
    let settled = grounded && entity.velocity.y.abs() < REST_SPEED_EPSILON;

    match entity.pattern {
        // Constant velocity until something external re-triggers it; walls
        // reverse it through full restitution.
        MovementPattern::Linear => {}
        MovementPattern::PeriodicJump => {
            if settled {
                let friction = support.map_or(1.0, |a| a.friction);
                entity.velocity.x =
                    decelerate(entity.velocity.x, tuning.ground_decel * friction * dt_ms);
                entity.hop_timer_ms -= dt_ms;
                if entity.hop_timer_ms <= 0.0 {
                    entity.velocity.y = tuning.hop_speed;
                    entity.hop_timer_ms = tuning.hop_interval_ms
                        + rng_state.next_unit() * tuning.hop_interval_jitter_ms;
                    events.push(GameEvent::EntityHopped { id: entity.id });
                }
            }
            entity.velocity.y -= tuning.gravity * dt_ms;
        }
        MovementPattern::Bounce => {
            if settled {
                let friction = support.map_or(1.0, |a| a.friction);
                entity.velocity.x =
                    decelerate(entity.velocity.x, tuning.ground_decel * friction * dt_ms);
            }
            entity.velocity.y -= tuning.gravity * dt_ms;
        }
    }

    let mut body = entity.body();
    body.bounds = body.bounds.translated(body.velocity * dt_ms);
    let corrected = resolve_against_terrain(&body, grid);
    entity.apply(&corrected);

    if !grounded
        && entity.velocity.y.abs() < REST_SPEED_EPSILON
        && grid.support_under(&entity.bounds).is_some()
    {
        events.push(GameEvent::EntityLanded { id: entity.id });
    }
}

/// Strongest contact damage among physical tiles the rectangle is touching.
/// Resolved bodies sit one epsilon away from their obstacles, so the probe
/// is inflated past that gap.
fn contact_damage(grid: &TileGrid, bounds: &Rect) -> f32 {
    let probe = bounds.inflated(COLLISION_EPSILON * 4.0);
    // Scan every cell the probe overlaps; a body larger than a tile spans
    // several columns, so the range comes from the probe's corners, not a
    // fixed window around its center.
    let (row_min, col_min) = grid.cell_at(Vec2::new(probe.left, probe.bottom()));
    let (row_max, col_max) = grid.cell_at(Vec2::new(probe.right(), probe.top));
    let mut worst: f32 = 0.0;
    for row in row_min..=row_max {
        for col in col_min..=col_max {
            let Some(attrs) = grid.attributes_at(row, col) else {
                continue;
            };
            if attrs.is_physical()
                && attrs.contact_damage > 0.0
                && grid.tile_rect(row, col).intersects(&probe)
            {
                worst = worst.max(attrs.contact_damage);
            }
        }
    }
    worst
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::grid::TileAttributes;

    const DT: f32 = 16.0;

    fn init_logging() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    /// Flat floor level: bottom row solid with the given friction, three
    /// rows of air above, start marker in the second row.
    fn flat_level(friction: f32) -> LevelDef {
        LevelDef {
            tiles: vec![
                vec![1, 1, 1, 1, 1, 1],
                vec![0, 2, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
                vec![0, 0, 0, 0, 0, 0],
            ],
            attributes: vec![
                TileAttributes::empty(),
                TileAttributes {
                    friction,
                    ..TileAttributes::solid()
                },
                TileAttributes {
                    start_marker: true,
                    empty_space: false,
                    ..TileAttributes::empty()
                },
            ],
            tile_size: 1.0,
        }
    }

    fn settle(world: &mut World, tuning: &Tuning, steps: usize) {
        for _ in 0..steps {
            tick(world, &TickInput::default(), tuning, DT);
        }
    }

    #[test]
    fn test_spawn_from_level() {
        init_logging();
        let tuning = Tuning::default();
        let world = World::from_level(&flat_level(1.0), &tuning, 1);
        // Start marker is at cell (1, 1), center (1.5, 1.5)
        assert!((world.player.bounds.center().x - 1.5).abs() < 1e-6);
        assert!(world.entities.is_empty());
    }

    #[test]
    fn test_player_falls_and_lands() {
        init_logging();
        let tuning = Tuning::default();
        let mut world = World::from_level(&flat_level(1.0), &tuning, 1);

        let mut landed = false;
        for _ in 0..60 {
            let events = tick(&mut world, &TickInput::default(), &tuning, DT);
            landed |= events.contains(&GameEvent::PlayerLanded);
        }
        assert!(landed);
        // Resting on the floor (tile tops at y = 1), not inside it
        assert!(world.player.bounds.bottom() >= 1.0);
        assert!(world.player.bounds.bottom() < 1.1);
        assert_eq!(world.player.velocity.y, 0.0);
    }

    #[test]
    fn test_friction_decelerates_resting_body() {
        init_logging();
        let tuning = Tuning::default();
        let mut world = World::from_level(&flat_level(0.5), &tuning, 1);
        settle(&mut world, &tuning, 60);

        world.player.velocity.x = 0.002;
        let before = world.player.velocity.x.abs();
        tick(&mut world, &TickInput::default(), &tuning, DT);
        let after = world.player.velocity.x.abs();
        assert!(after < before);
        assert!(after > 0.0);

        // Full friction bleeds speed twice as fast as friction 0.5
        let mut slick = World::from_level(&flat_level(1.0), &tuning, 1);
        settle(&mut slick, &tuning, 60);
        slick.player.velocity.x = 0.002;
        tick(&mut slick, &TickInput::default(), &tuning, DT);
        assert!(slick.player.velocity.x < world.player.velocity.x);
    }

    #[test]
    fn test_jump_requires_ground() {
        init_logging();
        let tuning = Tuning::default();
        let mut world = World::from_level(&flat_level(1.0), &tuning, 1);

        // Airborne right after spawn: jump input is ignored
        let events = tick(
            &mut world,
            &TickInput {
                jump: true,
                ..Default::default()
            },
            &tuning,
            DT,
        );
        assert!(!events.contains(&GameEvent::PlayerJumped));

        settle(&mut world, &tuning, 60);
        let events = tick(
            &mut world,
            &TickInput {
                jump: true,
                ..Default::default()
            },
            &tuning,
            DT,
        );
        assert!(events.contains(&GameEvent::PlayerJumped));
        assert!(world.player.velocity.y > 0.0);
    }

    #[test]
    fn test_run_speed_cap_and_boost() {
        init_logging();
        let tuning = Tuning::default();
        let mut world = World::from_level(&flat_level(1.0), &tuning, 1);
        settle(&mut world, &tuning, 60);

        let input = TickInput {
            move_axis: 1.0,
            ..Default::default()
        };
        for _ in 0..120 {
            tick(&mut world, &input, &tuning, DT);
        }
        assert!(world.player.velocity.x <= tuning.run_speed + 1e-9);

        world.player.speed_boost = true;
        for _ in 0..120 {
            tick(&mut world, &input, &tuning, DT);
        }
        assert!(world.player.velocity.x > tuning.run_speed);
        assert!(world.player.velocity.x <= tuning.run_speed * tuning.boost_multiplier + 1e-9);
    }

    #[test]
    fn test_linear_entity_ignores_gravity() {
        init_logging();
        let tuning = Tuning::default();
        let mut def = flat_level(1.0);
        // Replace the start marker's neighbor with a linear spawner at (2, 4)
        def.tiles[2][4] = 3;
        def.attributes.push(TileAttributes {
            spawn_marker: true,
            empty_space: false,
            spawn_pattern: Some(MovementPattern::Linear),
            ..TileAttributes::empty()
        });
        let mut world = World::from_level(&def, &tuning, 1);
        assert_eq!(world.entities.len(), 1);
        // Ids come from the world's allocator, starting at 1 and continuing
        // past whatever the level spawned
        assert_eq!(world.entities[0].id, 1);
        assert_eq!(world.next_entity_id(), 2);

        let top_before = world.entities[0].bounds.top;
        settle(&mut world, &tuning, 30);
        let e = &world.entities[0];
        assert_eq!(e.bounds.top, top_before);
        assert!(e.velocity.x.abs() > 0.0);
        assert_eq!(e.velocity.y, 0.0);
    }

    #[test]
    fn test_bounce_entity_falls_and_rebounds() {
        init_logging();
        let tuning = Tuning::default();
        let mut def = flat_level(1.0);
        def.tiles[3][4] = 3;
        def.attributes.push(TileAttributes {
            spawn_marker: true,
            empty_space: false,
            spawn_pattern: Some(MovementPattern::Bounce),
            ..TileAttributes::empty()
        });
        let mut world = World::from_level(&def, &tuning, 1);

        // Falls under gravity
        tick(&mut world, &TickInput::default(), &tuning, DT);
        assert!(world.entities[0].velocity.y < 0.0);

        // Eventually rebounds off the floor with upward velocity
        let mut rebounded = false;
        for _ in 0..80 {
            tick(&mut world, &TickInput::default(), &tuning, DT);
            if world.entities[0].velocity.y > 0.0 {
                rebounded = true;
                break;
            }
        }
        assert!(rebounded);
    }

    #[test]
    fn test_periodic_jump_hops_on_timer() {
        init_logging();
        let tuning = Tuning::default();
        let mut def = flat_level(1.0);
        def.tiles[1][4] = 3;
        def.attributes.push(TileAttributes {
            spawn_marker: true,
            empty_space: false,
            spawn_pattern: Some(MovementPattern::PeriodicJump),
            ..TileAttributes::empty()
        });
        let mut world = World::from_level(&def, &tuning, 42);
        let id = world.entities[0].id;

        let mut hopped = false;
        for _ in 0..400 {
            let events = tick(&mut world, &TickInput::default(), &tuning, DT);
            if events.contains(&GameEvent::EntityHopped { id }) {
                hopped = true;
                assert!(world.entities[0].velocity.y > 0.0);
                break;
            }
        }
        assert!(hopped);
    }

    #[test]
    fn test_contact_damage_event() {
        init_logging();
        let tuning = Tuning::default();
        // Spike tile right beneath the start marker's landing spot
        let def = LevelDef {
            tiles: vec![vec![1, 2, 1], vec![0, 3, 0], vec![0, 0, 0]],
            attributes: vec![
                TileAttributes::empty(),
                TileAttributes::solid(),
                TileAttributes {
                    contact_damage: 1.0,
                    ..TileAttributes::solid()
                },
                TileAttributes {
                    start_marker: true,
                    empty_space: false,
                    ..TileAttributes::empty()
                },
            ],
            tile_size: 1.0,
        };
        let mut world = World::from_level(&def, &tuning, 1);

        let mut damaged = false;
        for _ in 0..60 {
            let events = tick(&mut world, &TickInput::default(), &tuning, DT);
            if events
                .iter()
                .any(|e| matches!(e, GameEvent::PlayerDamaged { amount } if *amount == 1.0))
            {
                damaged = true;
                break;
            }
        }
        assert!(damaged);
    }

    #[test]
    fn test_contact_damage_spans_small_tiles() {
        init_logging();
        // Tiles an eighth of the body's width: the damaging cell sits under
        // the body's left edge, several columns away from its center cell,
        // and must still be consulted.
        let spike = TileAttributes {
            contact_damage: 2.0,
            ..TileAttributes::solid()
        };
        let grid = TileGrid::new(
            vec![vec![2, 1, 1, 1, 1, 1]],
            vec![TileAttributes::empty(), TileAttributes::solid(), spike],
            0.125,
        );
        // Body resting on the row, left edge over the spike at (0, 0)
        let bounds = Rect::new(0.0, 0.125 + COLLISION_EPSILON + 0.95, 0.75, 0.95);
        assert_eq!(contact_damage(&grid, &bounds), 2.0);

        // Shifted clear of the spike column, the same body takes no damage
        let clear = bounds.translated(Vec2::new(0.25, 0.0));
        assert_eq!(contact_damage(&grid, &clear), 0.0);
    }

    #[test]
    fn test_same_seed_same_outcome() {
        init_logging();
        let tuning = Tuning::default();
        let mut def = flat_level(1.0);
        def.tiles[1][3] = 3;
        def.attributes.push(TileAttributes {
            spawn_marker: true,
            empty_space: false,
            spawn_pattern: Some(MovementPattern::PeriodicJump),
            ..TileAttributes::empty()
        });

        let mut a = World::from_level(&def, &tuning, 7);
        let mut b = World::from_level(&def, &tuning, 7);
        let input = TickInput {
            move_axis: 0.6,
            ..Default::default()
        };
        for _ in 0..300 {
            tick(&mut a, &input, &tuning, DT);
            tick(&mut b, &input, &tuning, DT);
        }
        assert_eq!(a.player.bounds, b.player.bounds);
        assert_eq!(a.player.velocity, b.player.velocity);
        assert_eq!(a.entities[0].bounds, b.entities[0].bounds);
        assert_eq!(a.entities[0].velocity, b.entities[0].velocity);
    }
}

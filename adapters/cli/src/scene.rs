//! Scene population from simulation queries.

use path_defence_core::TICKS_PER_SECOND;
use path_defence_rendering::{
    Color, FieldPresentation, Hud, PathPresentation, RenderingError, Scene, SceneBullet,
    SceneEnemy, SceneExplosion, SceneTower,
};
use path_defence_simulation::Simulation;
use path_defence_world::query;

const GROUND: Color = Color::from_rgb_u8(40, 100, 40);
const ROAD: Color = Color::from_rgb_u8(140, 140, 140);
const ROAD_WIDTH: f32 = 18.0;

/// Creates the initial scene for a simulation.
pub(crate) fn build_scene(simulation: &Simulation) -> Result<Scene, RenderingError> {
    let field = FieldPresentation::new(
        FieldPresentation::STANDARD_WIDTH,
        FieldPresentation::STANDARD_HEIGHT,
        GROUND,
    )?;
    let points = query::path(simulation.world())
        .points()
        .iter()
        .map(|point| point.to_vec2())
        .collect();
    let path = PathPresentation::new(points, ROAD_WIDTH, ROAD);

    let mut scene = Scene::new(
        field,
        path,
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Vec::new(),
        Hud::default(),
    );
    populate_scene(simulation, &mut scene);
    Ok(scene)
}

/// Refreshes the dynamic parts of `scene` from the current simulation state.
pub(crate) fn populate_scene(simulation: &Simulation, scene: &mut Scene) {
    let world = simulation.world();
    let rules = query::rules(world);
    let enemy_size = rules.enemy.size as f32;

    scene.enemies.clear();
    scene.enemies.extend(
        query::enemy_view(world)
            .iter()
            .filter(|enemy| !enemy.reached_end)
            .map(|enemy| {
                SceneEnemy::new(
                    enemy.position.to_vec2(),
                    enemy_size,
                    enemy.health.fraction_of(enemy.max_health),
                )
            }),
    );

    let hovered = simulation.hovered();
    scene.towers.clear();
    scene
        .towers
        .extend(query::tower_view(world).iter().map(|tower| {
            SceneTower::new(
                tower.id,
                tower.position.to_vec2(),
                tower.size as f32,
                tower.range as f32,
                hovered == Some(tower.id),
            )
        }));

    scene.bullets.clear();
    scene.bullets.extend(
        query::bullets(world)
            .iter()
            .map(|bullet| SceneBullet::new(bullet.position, bullet.size as f32)),
    );

    scene.explosions.clear();
    scene
        .explosions
        .extend(query::explosions(world).iter().map(|explosion| {
            SceneExplosion::new(explosion.position, explosion.radius as f32, explosion.alpha)
        }));

    let session = simulation.session();
    scene.hud = Hud::new(
        session.money,
        session.lives,
        session.wave,
        simulation
            .next_wave_in()
            .map(|ticks| ticks / TICKS_PER_SECOND),
        session.phase.outcome(),
    );
}

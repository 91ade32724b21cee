use bevy::prelude::*;
use bevy::sprite::{MaterialMesh2dBundle, Mesh2dHandle};
use bevy::math::primitives::Circle;
use bevy::window::WindowResolution;
use log::info;

use crate::configuration::config::{TriangleConfig, ViewConfig};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::{BodyId, NVec2, Rgb};
use crate::visualization::overlay::{dashed_segments, triangle_corners, triangle_visible, DASH_LENGTH};

/// Ties a circle entity to the body it draws
#[derive(Component)]
struct BodyTag {
    id: BodyId,
    radius: f64, // radius the mesh was built with
}

#[derive(Resource)]
struct Overlay(TriangleConfig);

/// Physics ticks per second, one `advance()` each
const TICK_HZ: f64 = 60.0;

const TRIANGLE_COLOR: Rgb = Rgb::RED;

pub fn run_2d(scenario: Scenario) {
    let resolution = WindowResolution::new(scenario.view.width as f32, scenario.view.height as f32);
    let triangle = scenario.view.triangle_or_default(scenario.parameters.num_dt);

    App::new()
        .insert_resource(scenario)
        .insert_resource(Overlay(triangle))
        .insert_resource(Time::<Fixed>::from_hz(TICK_HZ))
        .insert_resource(ClearColor(Color::BLACK))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Orbiting Bodies Verlet Simulation".into(),
                resolution,
                ..default()
            }),
            ..default()
        }))
        .add_systems(Startup, setup_bodies_system)
        .add_systems(FixedUpdate, physics_step_system)
        .add_systems(Update, (sync_bodies_system, draw_triangle_system))
        .run();
}

/// World coordinates grow downward from `view.origin` at the top-left corner;
/// Bevy's 2D camera is centered and y-up
fn to_screen(p: NVec2, view: &ViewConfig) -> Vec2 {
    let x = (p.x - view.origin[0]) as f32 - view.width as f32 / 2.0;
    let y = view.height as f32 / 2.0 - (p.y - view.origin[1]) as f32;
    Vec2::new(x, y)
}

fn to_color(c: Rgb) -> Color {
    Color::srgb_u8(c.r, c.g, c.b)
}

fn setup_bodies_system(mut commands: Commands, scenario: Res<Scenario>, mut meshes: ResMut<Assets<Mesh>>, mut materials: ResMut<Assets<ColorMaterial>>) {
    info!("starting 2D viewer with {} bodies", scenario.bodies().len());

    // 2D camera
    commands.spawn(Camera2dBundle::default());

    for body in scenario.bodies() {
        let p = to_screen(body.x, &scenario.view);

        commands.spawn((
            MaterialMesh2dBundle {
                mesh: Mesh2dHandle(meshes.add(Circle::new(body.radius as f32))),
                material: materials.add(ColorMaterial::from(to_color(body.color))),
                transform: Transform::from_xyz(p.x, p.y, 0.0),
                ..Default::default()
            },
            BodyTag {
                id: body.id,
                radius: body.radius,
            },
        ));
    }
}

fn physics_step_system(mut scenario: ResMut<Scenario>, mut exit: EventWriter<AppExit>) {
    if scenario.is_finished() {
        exit.send(AppExit::Success);
        return;
    }

    scenario.advance();

    if scenario.is_finished() {
        info!(
            "run finished after {} steps, {} bodies left",
            scenario.tick(),
            scenario.bodies().len()
        );
    }
}

/// Follow body positions and drop circles whose body was absorbed
fn sync_bodies_system(mut commands: Commands, scenario: Res<Scenario>, mut query: Query<(Entity, &BodyTag, &mut Transform)>) {
    for (entity, tag, mut transform) in &mut query {
        match scenario.system.get(tag.id) {
            Some(b) => {
                let p = to_screen(b.x, &scenario.view);
                transform.translation.x = p.x;
                transform.translation.y = p.y;
                transform.scale = Vec3::splat((b.radius / tag.radius) as f32);
            }
            None => commands.entity(entity).despawn(),
        }
    }
}

fn draw_triangle_system(scenario: Res<Scenario>, overlay: Res<Overlay>, mut gizmos: Gizmos) {
    // index of the step that produced the current state
    let Some(tick_index) = scenario.tick().checked_sub(1) else {
        return;
    };
    if !triangle_visible(tick_index, scenario.bodies().len(), &overlay.0) {
        return;
    }
    let Some(corners) = triangle_corners(scenario.bodies(), &overlay.0) else {
        return;
    };

    for k in 0..3 {
        let (a, b) = (corners[k], corners[(k + 1) % 3]);
        for (start, end) in dashed_segments(a, b, DASH_LENGTH) {
            gizmos.line_2d(
                to_screen(start, &scenario.view),
                to_screen(end, &scenario.view),
                to_color(TRIANGLE_COLOR),
            );
        }
    }
}

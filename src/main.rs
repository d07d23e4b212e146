//! Seawater - Main Entry
//!
//! A boat and a few crates rocking on a mass-spring sea.

use bevy::{prelude::*, render::camera::ScalingMode};
use seawater::render::WaterRenderPlugin;
use seawater::simulation::{SimulationPlugin, VIEWPORT_HEIGHT, VIEWPORT_WIDTH};

fn main() {
    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Seawater".into(),
                resolution: (1280.0, 720.0).into(),
                ..default()
            }),
            ..default()
        }))
        .insert_resource(ClearColor(Color::srgb(0.55, 0.75, 0.95)))
        .add_plugins(SimulationPlugin)
        .add_plugins(WaterRenderPlugin)
        .add_systems(Startup, setup_camera)
        .add_systems(Update, log_frame)
        .run();
}

/// Set up the 2D main camera over the fixed world viewport
fn setup_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        OrthographicProjection {
            scaling_mode: ScalingMode::FixedVertical {
                viewport_height: VIEWPORT_HEIGHT,
            },
            ..OrthographicProjection::default_2d()
        },
        Transform::from_xyz(VIEWPORT_WIDTH / 2.0, VIEWPORT_HEIGHT / 2.0, 0.0),
    ));
    commands.insert_resource(FrameCounter(0));
}

/// Frame counter for logging
#[derive(Resource)]
struct FrameCounter(u32);

/// Log every N frames
fn log_frame(mut counter: ResMut<FrameCounter>) {
    counter.0 += 1;
    if counter.0 % 60 == 0 {
        info!("Frame {}: Simulation running...", counter.0);
    }
}

//! Input handling for the sea.
//!
//! Mouse click disturbs the surface under the cursor. Keyboard toggles:
//! F1 debug overlay, W wave emitter, D drag, L lift, V fake current,
//! F12 reset the scene.

use bevy::prelude::*;

use super::setup::Sea;

/// Resource tracking the debug overlay switches.
#[derive(Resource, Debug)]
pub struct DebugToggles {
    /// Draw spring columns, water fixtures and applied forces
    pub overlay: bool,
    /// Draw the water surface mesh
    pub water_mesh: bool,
}

impl Default for DebugToggles {
    fn default() -> Self {
        Self {
            overlay: false,
            water_mesh: true,
        }
    }
}

/// System to handle keyboard toggles.
pub fn handle_keyboard_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut toggles: ResMut<DebugToggles>,
    sea: Option<ResMut<Sea>>,
) {
    if keyboard.just_pressed(KeyCode::F1) {
        toggles.overlay = !toggles.overlay;
        info!("Debug overlay {}", on_off(toggles.overlay));
    }
    if toggles.overlay && keyboard.just_pressed(KeyCode::F2) {
        toggles.water_mesh = !toggles.water_mesh;
    }

    let Some(mut sea) = sea else {
        return;
    };

    if keyboard.just_pressed(KeyCode::KeyW) {
        let enabled = !sea.emitter.is_enabled();
        sea.emitter.set_enabled(enabled);
        info!("Wave emitter {}", on_off(enabled));
    }
    if keyboard.just_pressed(KeyCode::KeyD) {
        let params = sea.water.params_mut();
        params.drag_enabled = !params.drag_enabled;
        info!("Water drag {}", on_off(params.drag_enabled));
    }
    if keyboard.just_pressed(KeyCode::KeyL) {
        let params = sea.water.params_mut();
        params.lift_enabled = !params.lift_enabled;
        info!("Water lift {}", on_off(params.lift_enabled));
    }
    if keyboard.just_pressed(KeyCode::KeyV) {
        let params = sea.water.params_mut();
        params.fake_velocity_enabled = !params.fake_velocity_enabled;
        info!("Fake water current {}", on_off(params.fake_velocity_enabled));
    }
    if keyboard.just_pressed(KeyCode::F12) {
        if let Err(e) = sea.reset() {
            error!("Sea reset failed: {}", e);
        }
    }
}

/// System to disturb the water where the user clicks.
pub fn handle_mouse_input(
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    sea: Option<ResMut<Sea>>,
) {
    if !mouse.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(mut sea) = sea else {
        return;
    };
    let Ok(window) = windows.get_single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.get_single() else {
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };
    let Ok(world_pos) = camera.viewport_to_world_2d(camera_transform, cursor) else {
        return;
    };

    if sea.water.handle_input(world_pos.x) {
        debug!("Surface disturbed at x={:.2}", world_pos.x);
    }
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}

use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::input::mouse::{MouseMotion, MouseWheel};
use bevy::prelude::*;
use bevy_flow_field::{
    draw_bounds_gizmo, FlowFieldConfig, FlowFieldPlugin, ParticleCount, SimMode,
};

#[derive(Component)]
struct CameraControl {
    speed: f32,
}

fn main() {
    App::new()
        .add_plugins((DefaultPlugins, FrameTimeDiagnosticsPlugin::default()))
        .insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.05)))
        .insert_resource(FlowFieldConfig {
            bounds_extent: Vec3::splat(12.0),
            cell_size: 0.75, // 16^3 = 4096 field samples
            particle_count: ParticleCount::P65k,
            ..default()
        })
        .add_plugins(FlowFieldPlugin)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (camera_control, tune_simulation, draw_bounds_gizmo, log_fps),
        )
        .run();
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Camera3d::default(),
        Transform::from_xyz(14.0, 11.0, 16.0).looking_at(Vec3::ZERO, Vec3::Y),
        CameraControl { speed: 6.0 },
    ));
}

// M cycles the mode, R reseeds; either mutation makes the plugin tear the
// device state down and rebuild it.
fn tune_simulation(keys: Res<ButtonInput<KeyCode>>, mut config: ResMut<FlowFieldConfig>) {
    if keys.just_pressed(KeyCode::KeyM) {
        let next = match config.mode {
            SimMode::Both => SimMode::FieldOnly,
            SimMode::FieldOnly => SimMode::ParticlesOnly,
            SimMode::ParticlesOnly => SimMode::Both,
        };
        config.mode = next;
        info!("simulation mode: {:?}", config.mode);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        config.seed = config.seed.wrapping_add(1);
        info!("reseeded with {}", config.seed);
    }
}

fn camera_control(
    time: Res<Time>,
    config: Res<FlowFieldConfig>,
    keys: Res<ButtonInput<KeyCode>>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut evr_motion: EventReader<MouseMotion>,
    mut evr_scroll: EventReader<MouseWheel>,
    mut query: Query<(&mut Transform, &CameraControl)>,
) {
    let dt = time.delta_secs();
    let center = config.bounds_position;

    for (mut transform, control) in &mut query {
        let mut direction = Vec3::ZERO;
        let forward = transform.forward();
        let right = transform.right();
        let speed_multiplier =
            if keys.pressed(KeyCode::ShiftLeft) || keys.pressed(KeyCode::ShiftRight) {
                2.0
            } else {
                1.0
            };

        // WASD movement
        if keys.pressed(KeyCode::KeyW) {
            direction += *forward;
        }
        if keys.pressed(KeyCode::KeyS) {
            direction -= *forward;
        }
        if keys.pressed(KeyCode::KeyA) {
            direction -= *right;
        }
        if keys.pressed(KeyCode::KeyD) {
            direction += *right;
        }
        if direction != Vec3::ZERO {
            transform.translation += direction.normalize() * control.speed * speed_multiplier * dt;
        }

        // middle-drag orbits the bounds center
        if mouse_button.pressed(MouseButton::Middle) {
            for ev in evr_motion.read() {
                let mouse_sensitivity: f32 = 0.005;
                let yaw = Quat::from_axis_angle(Vec3::Y, -ev.delta.x * mouse_sensitivity);
                let pitch = Quat::from_axis_angle(*right, -ev.delta.y * mouse_sensitivity);

                let offset = transform.translation - center;
                transform.translation = center + yaw * pitch * offset;
                transform.look_at(center, Vec3::Y);
            }
        }

        // scroll zooms along the view axis
        for ev in evr_scroll.read() {
            let zoom_speed: f32 = 10.0;
            let offset = transform.translation - center;
            transform.translation -= offset.normalize() * ev.y * zoom_speed * dt;
            transform.look_at(center, Vec3::Y);
        }
    }
}

fn log_fps(diagnostics: Res<DiagnosticsStore>, mut counter: Local<u32>) {
    *counter += 1;
    if *counter >= 120 {
        *counter = 0;

        if let Some(fps_diag) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(avg) = fps_diag.average() {
                info!("==== Average FPS over last ~2 s: {:.1} ====", avg);
            }
        }
    }
}

//! Startup scene: ground, lights, the player body and its free-look camera.
//!
//! Only spawns entities; `arcstep::controller::initialize` checks them afterwards.
use arcstep::camera::FreeLookRig;
use arcstep::player::{KinematicMotor, Player, PlayerState, ReleasePoint};
use arcstep::settings::Settings;
use arcstep::trajectory::TrajectoryLine;
use bevy::prelude::*;

const GROUND_SIZE: f32 = 400.0;
const PLAYER_RADIUS: f32 = 0.5;
const PLAYER_HALF_HEIGHT: f32 = 1.0;

/// Spawn the demo scene.
#[allow(clippy::needless_pass_by_value)]
pub fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    settings: Res<Settings>,
) {
    commands.spawn(PbrBundle {
        mesh: meshes.add(Plane3d::default().mesh().size(GROUND_SIZE, GROUND_SIZE)),
        material: materials.add(StandardMaterial {
            base_color: Color::srgb(0.32, 0.46, 0.28),
            perceptual_roughness: 0.9,
            ..default()
        }),
        ..default()
    });

    // Scattered boxes give the jump arc something to be judged against.
    let crate_mesh = meshes.add(Cuboid::new(2.0, 2.0, 2.0));
    let crate_material = materials.add(Color::srgb(0.6, 0.45, 0.3));
    for i in 0..12 {
        let angle = i as f32 * std::f32::consts::TAU / 12.0;
        let dist = 20.0 + (i % 3) as f32 * 15.0;
        commands.spawn(PbrBundle {
            mesh: crate_mesh.clone(),
            material: crate_material.clone(),
            transform: Transform::from_xyz(angle.cos() * dist, 1.0, angle.sin() * dist),
            ..default()
        });
    }

    commands.spawn(DirectionalLightBundle {
        directional_light: DirectionalLight {
            shadows_enabled: true,
            illuminance: 8000.0,
            ..default()
        },
        transform: Transform::from_rotation(Quat::from_euler(EulerRot::XYZ, -0.9, 0.4, 0.0)),
        ..default()
    });
    commands.insert_resource(AmbientLight { color: Color::WHITE, brightness: 300.0 });

    commands
        .spawn((
            PbrBundle {
                mesh: meshes.add(Capsule3d::new(PLAYER_RADIUS, PLAYER_HALF_HEIGHT * 2.0 - PLAYER_RADIUS * 2.0)),
                material: materials.add(Color::srgb(0.85, 0.3, 0.25)),
                transform: Transform::from_xyz(0.0, PLAYER_HALF_HEIGHT, 0.0),
                ..default()
            },
            Player,
            PlayerState::default(),
            KinematicMotor::new(0.0, PLAYER_HALF_HEIGHT),
            TrajectoryLine::default(),
            Name::new("Player"),
        ))
        .with_children(|p| {
            p.spawn((
                TransformBundle::from_transform(Transform::from_xyz(0.0, 0.6, -PLAYER_RADIUS - 0.1)),
                ReleasePoint,
                Name::new("ReleasePoint"),
            ));
        });

    let mut camera = commands.spawn((
        Camera3dBundle {
            transform: Transform::from_xyz(0.0, 5.0, 12.0).looking_at(Vec3::Y, Vec3::Y),
            ..default()
        },
        FreeLookRig::default(),
        Name::new("FreeLookCamera"),
    ));
    if settings.atmosphere.enabled {
        camera.insert(bevy_atmosphere::prelude::AtmosphereCamera::default());
    }
}

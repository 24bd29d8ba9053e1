use bevy::prelude::*;
use bevy::render::mesh::VertexAttributeValues;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::PrimitiveTopology;
use bevy::window::CursorMoved;

use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::shape::mode::Mode;
use crate::shape::raster::{GlyphRaster, StaticRaster, SwashRaster};
use crate::simulation::integrator::{group_rotation_delta, tick};
use crate::simulation::scenario::Scenario;

/// Component tagging the single point-cloud entity
#[derive(Component)]
struct FieldPoints;

/// Distance of the camera from the origin along +Z
const CAMERA_DISTANCE: f32 = 18.0;

/// Rasterization backend, kept off the `Scenario` resource because the
/// scaler context is not thread-safe; lives as a non-send resource instead.
pub struct RasterBackend(pub Box<dyn GlyphRaster>);

/// Channel carrying festive phrases back from worker threads, tagged with
/// the mode they were requested for so stale answers can be discarded.
#[derive(Resource)]
struct FestiveInbox {
    tx: Mutex<Sender<(Mode, String)>>,
    rx: Mutex<Receiver<(Mode, String)>>,
}

impl FestiveInbox {
    fn new() -> Self {
        let (tx, rx) = channel();
        Self {
            tx: Mutex::new(tx),
            rx: Mutex::new(rx),
        }
    }
}

/// Convenience entrypoint: build the raster backend, seed the initial
/// target buffer, and hand everything to Bevy.
pub fn run_view(mut scenario: Scenario) {
    println!(
        "run_view: starting viewer with {} particles (keys 0-4 select the mode)",
        scenario.field.len()
    );

    let mut backend: Box<dyn GlyphRaster> = match SwashRaster::for_engine(&scenario.engine) {
        Ok(raster) => Box::new(raster),
        Err(e) => {
            // Blank backend renders zero ink, so every shaped mode degrades
            // to the ambient cloud instead of failing
            warn!(error = %e, "no font backend, shaped modes degrade to ambient");
            Box::new(StaticRaster::blank())
        }
    };

    {
        let Scenario {
            targets,
            rng,
            engine,
            mode,
            ..
        } = &mut scenario;
        targets.targets(*mode, engine.count, backend.as_mut(), rng);
    }

    App::new()
        .insert_resource(scenario)
        .insert_resource(FestiveInbox::new())
        .insert_non_send_resource(RasterBackend(backend))
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup)
        .add_systems(
            Update,
            (
                track_pointer,
                select_mode,
                physics_step,
                sync_points,
                rotate_group,
                poll_festive,
            )
                .chain(),
        )
        .run();
}

/// Startup system: spawn camera and the one point-cloud mesh. Colors are
/// written once here and never touched again.
fn setup(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.02, 0.02, 0.02)),
            ..Default::default()
        },
        projection: Projection::Perspective(PerspectiveProjection {
            fov: 65f32.to_radians(),
            ..Default::default()
        }),
        transform: Transform::from_xyz(0.0, 0.0, CAMERA_DISTANCE).looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    let positions: Vec<[f32; 3]> = scenario
        .field
        .particles
        .iter()
        .map(|p| [p.x.x, p.x.y, p.x.z])
        .collect();
    let colors: Vec<[f32; 4]> = scenario
        .field
        .particles
        .iter()
        .map(|p| [p.color[0], p.color[1], p.color[2], 1.0])
        .collect();

    let mesh = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default())
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors);

    commands.spawn((
        PbrBundle {
            mesh: meshes.add(mesh),
            material: materials.add(StandardMaterial {
                base_color: Color::WHITE,
                unlit: true,
                ..Default::default()
            }),
            ..Default::default()
        },
        FieldPoints,
    ));
}

/// Mouse position -> normalized window fraction -> pointer cell. Touch or a
/// future tracking source would write the same cell; the core never knows
/// which input is live.
fn track_pointer(
    mut moves: EventReader<CursorMoved>,
    windows: Query<&Window>,
    scenario: Res<Scenario>,
) {
    let Ok(window) = windows.get_single() else {
        return;
    };
    if let Some(event) = moves.read().last() {
        scenario.pointer.set(
            event.position.x / window.width(),
            event.position.y / window.height(),
        );
    }
}

/// Number keys select the mode. A change recomputes the target buffer
/// through the cache (the one-time rasterization cost is paid here, off the
/// tick path) and kicks off a festive phrase fetch on a worker thread.
fn select_mode(
    keys: Res<ButtonInput<KeyCode>>,
    mut scenario: ResMut<Scenario>,
    mut raster: NonSendMut<RasterBackend>,
    inbox: Res<FestiveInbox>,
) {
    const BINDINGS: [(KeyCode, usize); 5] = [
        (KeyCode::Digit0, 0),
        (KeyCode::Digit1, 1),
        (KeyCode::Digit2, 2),
        (KeyCode::Digit3, 3),
        (KeyCode::Digit4, 4),
    ];

    let mut selected = None;
    for (key, index) in BINDINGS {
        if keys.just_pressed(key) {
            selected = Some(Mode::from_index(index));
        }
    }
    let Some(mode) = selected else {
        return;
    };
    if mode == scenario.mode {
        return;
    }

    scenario.mode = mode;
    let Scenario {
        targets,
        rng,
        engine,
        festive,
        ..
    } = &mut *scenario;
    targets.targets(mode, engine.count, raster.0.as_mut(), rng);

    if let Ok(tx) = inbox.tx.lock() {
        let tx = tx.clone();
        let client = festive.clone();
        std::thread::spawn(move || {
            let _ = tx.send((mode, client.line(mode)));
        });
    }
}

/// Per-frame integration of the particle field
fn physics_step(time: Res<Time>, mut scenario: ResMut<Scenario>) {
    let t = time.elapsed_seconds_f64();
    let Scenario {
        field,
        parameters,
        mode,
        targets,
        pointer,
        ..
    } = &mut *scenario;

    let Some(buffer) = targets.current() else {
        return;
    };
    tick(field, *mode, buffer.as_slice(), pointer.get(), t, parameters);
}

/// Copy particle positions into the mesh attribute in place; no
/// reallocation, the buffer layout never changes.
fn sync_points(
    scenario: Res<Scenario>,
    mut meshes: ResMut<Assets<Mesh>>,
    query: Query<&Handle<Mesh>, With<FieldPoints>>,
) {
    let Ok(handle) = query.get_single() else {
        return;
    };
    let Some(mesh) = meshes.get_mut(handle) else {
        return;
    };
    let Some(VertexAttributeValues::Float32x3(positions)) =
        mesh.attribute_mut(Mesh::ATTRIBUTE_POSITION)
    else {
        return;
    };

    for (slot, p) in positions.iter_mut().zip(&scenario.field.particles) {
        *slot = [p.x.x, p.x.y, p.x.z];
    }
}

/// Rigid whole-cloud spin, applied to the group transform rather than the
/// per-particle positions.
fn rotate_group(
    time: Res<Time>,
    scenario: Res<Scenario>,
    mut query: Query<&mut Transform, With<FieldPoints>>,
) {
    let t = time.elapsed_seconds_f64();
    let delta = group_rotation_delta(scenario.mode, t, &scenario.parameters);
    for mut transform in &mut query {
        transform.rotate_y(delta);
    }
}

/// Deliver festive phrases; a phrase requested for a mode that is no longer
/// active is discarded, not applied.
fn poll_festive(
    inbox: Res<FestiveInbox>,
    scenario: Res<Scenario>,
    mut windows: Query<&mut Window>,
) {
    let Ok(rx) = inbox.rx.lock() else {
        return;
    };
    while let Ok((mode, line)) = rx.try_recv() {
        if mode != scenario.mode {
            debug!(?mode, "discarding stale festive phrase");
            continue;
        }
        if let Ok(mut window) = windows.get_single_mut() {
            window.title = format!("glyphfield | {line}");
        }
    }
}

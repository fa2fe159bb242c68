use diorama::render::{RecordingBackend, RenderCommand};
use diorama::scene::Demo;
use diorama::*;

fn drive(demo: Demo, ticks: usize) -> (FrameDriver, RecordingBackend) {
    let mut driver = FrameDriver::new(demo.build().unwrap());
    let mut backend = RecordingBackend::new().with_aspect(1.0);
    for _ in 0..ticks {
        backend.clear();
        driver.tick(&mut backend);
    }
    (driver, backend)
}

#[test]
fn village_frame_draws_terrain_buildings_and_car() {
    let (driver, backend) = drive(Demo::Village, 1);

    let terrain = 2 * 39 * 39;
    let buildings = 12 + 12 + 8;
    let road = 1;
    let car = 12 + 4 * 4 * 16;
    assert_eq!(backend.primitive_count(), terrain + buildings + road + car);
    assert_eq!(backend.frame_count(), 1);
    assert_eq!(driver.phase(), FramePhase::Idle);

    let lights = backend
        .commands()
        .iter()
        .filter(|c| matches!(c, RenderCommand::SetLight(..)))
        .count();
    assert_eq!(lights, 2);
}

#[test]
fn car_bounces_between_its_bounds() {
    let (driver, _) = drive(Demo::Village, 400);

    let mover = driver.scene().vehicle().unwrap().mover();
    let (low, high) = mover.bounds();
    let overshoot = mover.speed().abs() + 1e-3;
    assert!(mover.position() >= low - overshoot && mover.position() <= high + overshoot);
    assert_eq!(driver.frame_count(), 400);
}

#[test]
fn input_zooms_and_redraws_without_animating() {
    let mut driver = FrameDriver::new(Demo::Village.build().unwrap());
    let mut backend = RecordingBackend::new();
    let before = driver.scene().vehicle().unwrap().mover().position();
    let distance = driver.scene().camera().current_distance();

    driver.handle_input(InputEvent::ZoomIn, &mut backend);
    driver.redraw(&mut backend);

    let zoom = driver.scene().config().zoom_step;
    assert_eq!(driver.scene().camera().current_distance(), distance - zoom);
    assert_eq!(driver.scene().vehicle().unwrap().mover().position(), before);
    assert_eq!(backend.redraw_requests(), 1);
    assert_eq!(backend.frame_count(), 1);
}

#[test]
fn every_vertex_of_a_frame_is_finite() {
    for demo in Demo::ALL {
        let (_, backend) = drive(demo, 3);
        for (_, vertices) in backend.primitives() {
            assert!(vertices.iter().all(|v| v.is_finite()), "{} emitted a NaN", demo);
        }
    }
}

#[test]
fn terrain_demo_fogs_the_frame() {
    let (_, backend) = drive(Demo::Terrain, 1);
    let fog = backend.commands().iter().find_map(|c| match c {
        RenderCommand::SetFog(fog) => Some(*fog),
        _ => None,
    });
    assert!(fog.flatten().is_some());
}

#[test]
fn hand_built_scene_with_empty_terrain_still_presents() {
    let ground = TerrainGenerator::new(-10.0, 10.0, 1)
        .build(&HeightField::Flat)
        .unwrap();
    let scene = SceneBuilder::new("bare")
        .terrain(Drawable::new(ground))
        .object_at("marker", Drawable::new(Mesh::cuboid(Vec3::ONE)), Vec3::ZERO)
        .build()
        .unwrap();

    let backend = run_headless(&AppConfig::new(), scene, 1);
    assert_eq!(backend.primitive_count(), 12);
    assert_eq!(backend.frame_count(), 1);
}

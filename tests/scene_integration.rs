//! Scene loading from descriptor files and frame-loop integration tests.

use std::path::{Path, PathBuf};
use std::rc::Rc;

use beer::events::input::KeyCode;
use beer::native::headless::{HeadlessRenderer, NativeCall, ScriptedKeyboard};
use beer::resources::descriptors::{CharacterDescriptor, TileMapDescriptor};
use beer::resources::spritesheet::Rect;
use beer::resources::texture::ResourceCreationError;
use beer::scene::{Scene, SceneError, SceneSignal};

fn fixture_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&dir).unwrap();
    image::RgbaImage::from_pixel(64, 128, image::Rgba([200, 100, 50, 255]))
        .save(dir.join("tiles.png"))
        .unwrap();
    image::RgbaImage::from_pixel(32, 128, image::Rgba([0, 0, 255, 255]))
        .save(dir.join("characters.png"))
        .unwrap();
    std::fs::write(
        dir.join("map.json"),
        r#"{
  "tiles": [
    { "image": "tiles.png", "source": { "x": 0, "y": 0, "w": 16, "h": 16 }, "column": 0, "row": 0, "width": 16, "height": 16 },
    { "image": "tiles.png", "source": { "x": 0, "y": 0, "w": 16, "h": 16 }, "column": 1, "row": 0, "width": 16, "height": 16 },
    { "image": "tiles.png", "source": { "x": 16, "y": 0, "w": 16, "h": 16 }, "column": 0, "row": 1, "width": 16, "height": 16 }
  ]
}"#,
    )
    .unwrap();
    std::fs::write(
        dir.join("hero.json"),
        r#"{ "image": "characters.png", "source": { "x": 0, "y": 102, "w": 16, "h": 16 }, "speed": 64.0, "x": 32.0, "y": 32.0 }"#,
    )
    .unwrap();
    dir
}

fn load(dir: &Path, headless: &Rc<HeadlessRenderer>) -> Scene {
    let map = TileMapDescriptor::load_from_file(dir.join("map.json")).unwrap();
    let hero = CharacterDescriptor::load_from_file(dir.join("hero.json")).unwrap();
    Scene::load(headless.clone(), &map, Some(&hero), 16.0).unwrap()
}

#[test]
fn load_shares_textures_and_sheets() {
    let dir = fixture_dir("beer_scene_load_shares");
    let headless = Rc::new(HeadlessRenderer::new());
    let scene = load(&dir, &headless);

    assert_eq!(scene.tiles().len(), 3);
    assert_eq!(scene.texture_count(), 2);
    // two distinct tile frames plus the hero frame
    assert_eq!(scene.sheet_count(), 3);
    assert_eq!(headless.live_textures(), 2);
    // three tiles and the hero
    assert_eq!(headless.live_nodes(), 4);

    let player = scene.player().unwrap();
    assert_eq!(player.sprite.position(), (32.0, 32.0));
    assert_eq!(player.mob.speed(), 64.0);

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn present_draws_every_visible_sprite() {
    let dir = fixture_dir("beer_scene_present");
    let headless = Rc::new(HeadlessRenderer::new());
    let scene = load(&dir, &headless);

    let commands = headless.present();
    assert_eq!(commands.len(), 4);
    assert_eq!(commands[2].source, Rect::new(16, 0, 16, 16));
    assert_eq!((commands[2].x, commands[2].y), (0.0, 16.0));
    assert_eq!((commands[3].x, commands[3].y), (32.0, 32.0));

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn player_walks_a_tile_in_quarter_second_at_64_steps_per_second() {
    let dir = fixture_dir("beer_scene_walk");
    let headless = Rc::new(HeadlessRenderer::new());
    let mut scene = load(&dir, &headless);
    let keys = ScriptedKeyboard::new();

    keys.press(KeyCode::S);
    scene.update(&keys, 0.125).unwrap();
    let halfway = scene.player().unwrap().sprite.position();
    assert_eq!(halfway, (32.0, 40.0));

    keys.release(KeyCode::S);
    for _ in 0..8 {
        scene.update(&keys, 1.0 / 64.0).unwrap();
    }
    assert_eq!(scene.player().unwrap().sprite.position(), (32.0, 48.0));

    // the render graph reads the moved position
    let commands = headless.present();
    assert_eq!((commands[3].x, commands[3].y), (32.0, 48.0));

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn time_scale_slows_movement() {
    let dir = fixture_dir("beer_scene_time_scale");
    let headless = Rc::new(HeadlessRenderer::new());
    let mut scene = load(&dir, &headless);
    scene.set_time_scale(0.5);
    let keys = ScriptedKeyboard::new();

    keys.press(KeyCode::D);
    scene.update(&keys, 0.125).unwrap();
    assert_eq!(scene.player().unwrap().sprite.position(), (36.0, 32.0));
    assert_eq!(scene.time().elapsed, 0.0625);

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn esc_ends_the_loop() {
    let dir = fixture_dir("beer_scene_esc");
    let headless = Rc::new(HeadlessRenderer::new());
    let mut scene = load(&dir, &headless);
    let keys = ScriptedKeyboard::new();

    assert_eq!(scene.update(&keys, 0.016).unwrap(), SceneSignal::Continue);
    keys.press(KeyCode::Esc);
    assert_eq!(scene.update(&keys, 0.016).unwrap(), SceneSignal::Quit);

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn dropping_the_scene_releases_everything_nodes_first() {
    let dir = fixture_dir("beer_scene_teardown");
    let headless = Rc::new(HeadlessRenderer::new());
    let scene = load(&dir, &headless);
    headless.clear_journal();

    drop(scene);

    let journal = headless.journal();
    let first_destroy = journal
        .iter()
        .position(|c| matches!(c, NativeCall::TextureDestroy(_)))
        .unwrap();
    let last_detach = journal
        .iter()
        .rposition(|c| matches!(c, NativeCall::Detach(_)))
        .unwrap();
    assert!(last_detach < first_destroy);
    assert_eq!(headless.live_nodes(), 0);
    assert_eq!(headless.live_textures(), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn missing_image_aborts_the_load_and_releases_partial_state() {
    let dir = fixture_dir("beer_scene_missing_image");
    std::fs::remove_file(dir.join("characters.png")).unwrap();
    let headless = Rc::new(HeadlessRenderer::new());

    let map = TileMapDescriptor::load_from_file(dir.join("map.json")).unwrap();
    let hero = CharacterDescriptor::load_from_file(dir.join("hero.json")).unwrap();
    let result = Scene::load(headless.clone(), &map, Some(&hero), 16.0);

    assert!(matches!(
        result,
        Err(SceneError::Resource(ResourceCreationError::Decode { .. }))
    ));
    assert_eq!(headless.live_nodes(), 0);
    assert_eq!(headless.live_textures(), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn attach_failure_aborts_the_load() {
    let dir = fixture_dir("beer_scene_attach_failure");
    let headless = Rc::new(HeadlessRenderer::with_capacity(2));

    let map = TileMapDescriptor::load_from_file(dir.join("map.json")).unwrap();
    let result = Scene::load(headless.clone(), &map, None, 16.0);

    assert!(matches!(result, Err(SceneError::Render(_))));
    assert_eq!(headless.live_nodes(), 0);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn replacing_the_player_releases_its_old_image() {
    let dir = fixture_dir("beer_scene_replace_player");
    let headless = Rc::new(HeadlessRenderer::new());
    let mut scene = load(&dir, &headless);
    assert_eq!(headless.live_textures(), 2);

    let mut on_tiles = CharacterDescriptor::load_from_file(dir.join("hero.json")).unwrap();
    on_tiles.image = dir.join("tiles.png");
    scene.spawn_player(&on_tiles).unwrap();

    // characters.png had no other user
    assert_eq!(headless.live_textures(), 1);
    assert_eq!(scene.texture_count(), 1);
    assert_eq!(headless.live_nodes(), 4);

    drop(scene);
    std::fs::remove_dir_all(&dir).ok();
}

use cgmath::Point3;
use voxel_world::engine_state::{
    rendering::HeadlessBackend,
    voxels::{
        block::{
            is_air_id,
            registry::{BlockDefinition, BlockRegistry, BlockRegistryBuilder, Mod},
        },
        chunk::CHUNK_DIMENSION,
        terrain::TerrainGenerator,
        world::World,
    },
    EngineState, PlayerAction, WorldConfig,
};
use web_time::{Duration, Instant};

fn engine(config: WorldConfig) -> EngineState<HeadlessBackend> {
    EngineState::new(config, BlockRegistry::builtin(), HeadlessBackend::new()).unwrap()
}

#[test]
fn start_map_matches_the_terrain_function() {
    let mut engine = engine(WorldConfig::default());
    assert_eq!(engine.init_start_map().unwrap(), 25);

    let world = engine.world().get();
    let generator = TerrainGenerator::default();
    assert_eq!(world.get_ground_height(0.0, 0.0), generator.height_at(0, 0));

    for (coordinate, chunk) in world.chunks() {
        let position = chunk.position();
        assert_eq!((coordinate.x, coordinate.y), (position.x, position.z));
        assert_eq!(position.y, 0);
    }

    for (x, z) in [(0, 0), (-1, -1), (17, -30), (-30, 39)] {
        let height = generator.height_at(x, z);
        let (x, z) = (x as f32 + 0.5, z as f32 + 0.5);
        assert!(!is_air_id(world.get_block_at(x, height as f32 - 0.5, z)));
        assert!(is_air_id(world.get_block_at(x, height as f32 + 0.5, z)));
    }
}

#[test]
fn every_start_chunk_is_drawn_at_its_world_offset() {
    let mut engine = engine(WorldConfig::default());
    engine.init_start_map().unwrap();
    engine.render_frame(Instant::now()).unwrap();

    let backend = engine.renderer().backend();
    assert_eq!(backend.live_count(), 25);
    assert_eq!(backend.draws().len(), 25);

    let size = CHUNK_DIMENSION as f32;
    let first = &backend.draws()[0];
    assert_eq!(first.model_offset.x, -2.0 * size);
    assert_eq!(first.model_offset.y, 0.0);
    assert_eq!(first.model_offset.z, -2.0 * size);
    assert!(engine.renderer().has_renderable(Point3::new(2, 0, 2)));
}

#[test]
fn seam_culling_and_greedy_meshing_shrink_the_geometry() {
    let total_vertices = |config: WorldConfig| {
        let mut engine = engine(config);
        engine.init_start_map().unwrap();
        engine
            .renderer()
            .backend()
            .uploads()
            .iter()
            .map(|upload| upload.vertex_count)
            .sum::<usize>()
    };

    let isolated = total_vertices(WorldConfig {
        cull_chunk_seams: false,
        ..WorldConfig::default()
    });
    let culled = total_vertices(WorldConfig::default());
    let greedy = total_vertices(WorldConfig {
        greedy_meshing: true,
        ..WorldConfig::default()
    });

    assert!(culled < isolated);
    assert!(greedy < culled);
}

#[test]
fn worker_count_does_not_change_the_result() {
    let uploads = |worker_threads| {
        let mut engine = engine(WorldConfig {
            worker_threads,
            start_radius: 1,
            ..WorldConfig::default()
        });
        engine.init_start_map().unwrap();
        let backend = engine.renderer().backend();
        let mut meshes: Vec<Vec<f32>> = backend
            .uploads()
            .iter()
            .map(|upload| backend.buffer(upload.handle_id).unwrap().to_vec())
            .collect();
        meshes.sort_by(|a, b| a.partial_cmp(b).unwrap());
        meshes
    };

    assert_eq!(uploads(1), uploads(4));
}

#[test]
fn configured_terrain_uses_mod_blocks() {
    struct MarbleMod;

    impl Mod for MarbleMod {
        fn name(&self) -> &str {
            "marble"
        }

        fn register_blocks(&self, builder: &mut BlockRegistryBuilder) {
            builder.register("marble", "marble", BlockDefinition::new("Marble", [0.9, 0.9, 0.95]));
        }
    }

    let mut builder = BlockRegistryBuilder::new();
    builder.load_mods(&[Box::new(MarbleMod) as Box<dyn Mod>]);
    let registry = builder.build();
    let marble = registry.id_of("marble:marble").unwrap();

    let config = WorldConfig::from_json_str(
        r#"{ "terrain": { "grass": "marble:marble" }, "start_radius": 0, "tint_by_block": true }"#,
    )
    .unwrap();
    let mut engine = EngineState::new(config, registry, HeadlessBackend::new()).unwrap();
    engine.init_start_map().unwrap();

    let height = engine.world().get().get_ground_height(0.0, 0.0);
    let world = engine.world().get();
    assert_eq!(world.get_block_at(0.5, height as f32 - 0.5, 0.5), marble);
}

#[test]
fn player_lands_and_walks_on_the_start_map() {
    let mut engine = engine(WorldConfig::default());
    engine.init_start_map().unwrap();

    let dt = 1.0 / 60.0;
    for _ in 0..300 {
        engine.update(&PlayerAction::default(), dt);
    }
    assert!(engine.player().is_grounded());
    let ground = engine.world().get().get_ground_height(0.0, 0.0);
    assert_eq!(engine.player().position.y, ground as f32);

    let start = Instant::now();
    let walk = PlayerAction {
        move_forward: true,
        ..Default::default()
    };
    let mut reports = 0;
    for frame in 1..=120u32 {
        engine.update(&walk, dt);
        let now = start + Duration::from_millis(u64::from(frame) * 17);
        if engine.render_frame(now).unwrap().is_some() {
            reports += 1;
        }
    }

    assert!(reports >= 1);
    assert!(engine.player().position.x < 0.0);
    assert_eq!(engine.renderer().backend().draws().len(), 25);
}

#[test]
fn world_without_chunks_is_all_air() {
    let world = World::new(TerrainGenerator::default());
    assert!(is_air_id(world.get_block_at(0.0, 3.0, 0.0)));
    assert_eq!(world.chunk_count(), 0);
}

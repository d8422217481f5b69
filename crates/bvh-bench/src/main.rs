use bvh_bench::{compare, phantom_scene, sphere_grid, timed, UniformRaySource};
use clap::Parser;
use clap::builder::RangedU64ValueParser;
use log::{info, warn};
use nalgebra::{Point3, Vector3};
use tissue_bvh::{
    find_all, FastIntersectionFinder, Scene, SimpleIntersectionFinder, SpatialTree, SplitterKind, TreeConfig,
};

#[derive(Parser, Debug)]
#[command(name = "bvh-bench")]
#[command(about = "Build and query timings for every tree preset", long_about = None)]
struct Cli {
    /// Spheres per side of the sphere grid scene
    #[arg(default_value_t = 4, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    grid: usize,
}

fn presets() -> Vec<(&'static str, TreeConfig)> {
    vec![
        ("no-split-one-axis", TreeConfig::no_split_one_axis()),
        ("no-split-three-axes", TreeConfig::no_split_three_axes()),
        ("split-three-axes", TreeConfig::split_three_axes()),
        ("sah-wide-axis", TreeConfig::sah_wide_axis()),
        (
            "soft-sah-wide-axis",
            TreeConfig {
                splitter: SplitterKind::SoftSah,
                ..TreeConfig::sah_wide_axis()
            },
        ),
    ]
}

fn run(label: &str, scene: &Scene, source: &UniformRaySource) {
    let rays = source.rays();
    info!("{label}: {} solids, {} polygons, {} rays", scene.solids().len(), scene.polygon_count(), rays.len());

    let simple = SimpleIntersectionFinder::new(scene);
    let (reference, elapsed) = timed(|| find_all(&simple, &rays));
    let hits = reference.iter().filter(|hit| hit.is_some()).count();
    info!("  brute force: {hits} hits in {elapsed:?}");

    for (name, config) in presets() {
        let tree = match timed(|| SpatialTree::from_scene(scene, &config)) {
            (Ok(tree), elapsed) => {
                let stats = tree.stats();
                info!(
                    "  {name}: built in {elapsed:?}, depth {}, {} leaves, {:.1} polygons per leaf (max {})",
                    stats.depth, stats.leaves, stats.mean_leaf_size, stats.largest_leaf
                );
                tree
            }
            (Err(err), _) => {
                warn!("  {name}: build failed: {err}");
                continue;
            }
        };

        let fast = FastIntersectionFinder::from_tree(tree);
        let (_, elapsed) = timed(|| find_all(&fast, &rays));
        info!("  {name}: queries in {elapsed:?}");

        let agreement = compare(&simple, &fast, &rays, 1e-6);
        if !agreement.is_exact() {
            warn!(
                "  {name}: {} of {} rays disagree with brute force (first: {:?})",
                agreement.mismatches.len(),
                agreement.rays,
                agreement.mismatches.first()
            );
        }
    }
}

fn main() {
    let Cli { grid } = Cli::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let phantom = phantom_scene();
    let source = UniformRaySource::new(Point3::new(0.0, 4.0, 0.0), -Vector3::z(), 170.0, 120.0, 200, 100);
    run("phantom", &phantom, &source);

    let spheres = sphere_grid(grid, 2);
    let center = 1.5 * (grid - 1) as f64;
    let source = UniformRaySource::new(
        Point3::new(center, center, -10.0),
        Vector3::z(),
        60.0,
        60.0,
        200,
        200,
    );
    run(&format!("sphere grid {grid}x{grid}x{grid}"), &spheres, &source);
}

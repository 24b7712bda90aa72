//! Scene inspector demo application
//!
//! Loads RON scene templates from an asset directory, instantiates the
//! configured scene into the in-memory world, walks it with the typed
//! collectors, then queues and flushes a subtree removal.

use scene_tools::foundation::logging;
use scene_tools::prelude::*;
use serde::{Deserialize, Serialize};

/// Application configuration, read from `inspector.toml` when present
#[derive(Debug, Clone, Serialize, Deserialize)]
struct InspectorConfig {
    /// Directory scanned for `*.scene.ron` and `*.mat.ron` files
    assets_dir: String,
    /// Library key of the scene to instantiate
    scene: String,
    /// Default log filter (RUST_LOG overrides)
    log_level: String,
}

impl Default for InspectorConfig {
    fn default() -> Self {
        Self {
            assets_dir: "inspector_app/resources/scenes".to_string(),
            scene: "main.scene.ron".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config for InspectorConfig {}

/// Load the config from the first location that exists
///
/// Applications get run both from the workspace root and from their own
/// directory, so both spots are tried before falling back to defaults.
fn load_config() -> InspectorConfig {
    let candidates = ["inspector.toml", "inspector_app/inspector.toml"];
    for path in candidates {
        if std::path::Path::new(path).exists() {
            match InspectorConfig::load_from_file(path) {
                Ok(config) => return config,
                Err(e) => {
                    eprintln!("Ignoring unreadable config {}: {}", path, e);
                }
            }
        }
    }
    InspectorConfig::default()
}

fn print_tree(root: &WorldNode) {
    // Depth-first with an explicit stack, children reversed so the first
    // child prints first.
    let mut stack = vec![(root.clone(), 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let name = node.name().unwrap_or_default();
        let label = node.kind().map_or("?", |kind| kind.label());
        println!("{}{} ({})", "  ".repeat(depth), name, label);
        for index in (0..node.child_count()).rev() {
            if let Some(child) = node.child(index) {
                stack.push((child, depth + 1));
            }
        }
    }
}

fn run(config: &InspectorConfig) -> Result<(), Box<dyn std::error::Error>> {
    let mut library = AssetLibrary::new();
    library.load_dir(&config.assets_dir)?;

    let world = SceneWorld::new();
    let root: WorldNode = instantiate_scene(&library, &world, &config.scene)?;
    log::info!(
        "Instantiated '{}': {} nodes",
        config.scene,
        world.node_count()
    );

    println!("Scene tree:");
    print_tree(&root);

    let spatials: Vec<SpatialNode> = collect_descendants(Some(&root));
    log::info!("{} spatial nodes", spatials.len());
    for spatial in &spatials {
        let position = spatial.transform().position;
        log::debug!(
            "  {} at ({:.1}, {:.1}, {:.1})",
            spatial.node().name().unwrap_or_default(),
            position.x,
            position.y,
            position.z
        );
    }

    let cameras: Vec<CameraNode> = collect_descendants(Some(&root));
    for camera in &cameras {
        log::info!(
            "camera '{}', fov {:.0} deg",
            camera.node().name().unwrap_or_default(),
            camera.fov_y_deg()
        );
    }

    let lights: Vec<LightNode> = collect_descendants(Some(&root));
    log::info!("{} lights in scene", lights.len());

    // Immediate children only, for contrast with the recursive walk above.
    let top_level: Vec<SpatialNode> = collect_children(Some(&root));
    log::info!("{} spatial nodes directly under the root", top_level.len());

    if let Ok(material) = load_resource::<_, std::rc::Rc<MaterialDef>>(&library, "crate.mat.ron")
    {
        log::info!(
            "crate material: color ({:.1}, {:.1}, {:.1}), roughness {:.1}",
            material.color[0],
            material.color[1],
            material.color[2],
            material.roughness
        );
    }

    // Clear out the props group: queue each child, then let the world's
    // flush play the part of the host's end-of-frame point.
    let props = root
        .children()
        .find(|child| child.name().as_deref() == Some("Props"));
    match props {
        Some(props) => {
            let queued = queue_free_children(Some(&props))?;
            let dropped = world.flush_deferred();
            log::info!("Removed {} prop subtrees ({} nodes)", queued, dropped);

            println!("\nScene tree after removing props:");
            print_tree(&root);
        }
        None => log::warn!("Scene has no 'Props' group, skipping removal demo"),
    }

    Ok(())
}

fn main() {
    let config = load_config();
    logging::init_with_default(&config.log_level);
    log::debug!("Config: {:?}", config);

    if let Err(e) = run(&config) {
        log::error!("Inspector failed: {}", e);
        std::process::exit(1);
    }
}

mod scene;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use rs_shape::{
    Model, ModelKind, ShapeCatalog, ShapeError, ShapeRegistry, StairModelBuilder, StairTemplate,
    UnitBox, register_stairs,
};
use rs_sim::BlockShapes;
use rs_utils::{BlockState, MAX_BLOCK_ID};
use serde::Serialize;
use tracing::{info, warn};

use crate::scene::Scene;

/// Stair block ids of the 1.8 block table.
const STAIR_BLOCK_IDS: [u16; 13] = [53, 67, 108, 109, 114, 128, 134, 135, 136, 156, 163, 164, 180];

#[derive(Parser)]
#[command(name = "rs-client", about = "Builds and inspects conditional block shapes")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every published model as JSON.
    Dump {
        #[arg(long)]
        template: Option<PathBuf>,
        /// Stair block ids to build; defaults to all stair blocks.
        #[arg(long = "block-id", value_parser = clap::value_parser!(u16).range(..=MAX_BLOCK_ID as i64))]
        block_ids: Vec<u16>,
    },
    /// Print the resolved boxes of every block in a scene.
    Probe {
        #[arg(long)]
        scene: PathBuf,
        #[arg(long)]
        template: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct GroupDump {
    name: String,
    members: Vec<BlockState>,
}

#[derive(Serialize)]
struct ModelDump<'a> {
    state: BlockState,
    kind: ModelKind,
    model: &'a Model,
}

#[derive(Serialize)]
struct InventoryDump<'a> {
    state: BlockState,
    boxes: &'a [UnitBox],
}

#[derive(Serialize)]
struct CatalogDump<'a> {
    groups: Vec<GroupDump>,
    models: Vec<ModelDump<'a>>,
    inventory: Vec<InventoryDump<'a>>,
}

#[derive(Serialize)]
struct ProbedBlock {
    pos: [i32; 3],
    state: BlockState,
    render: Vec<UnitBox>,
    collision: Vec<[[f32; 3]; 2]>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .without_time()
        .compact()
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Dump {
            template,
            block_ids,
        } => {
            let template = load_template(template.as_deref())?;
            let ids = if block_ids.is_empty() {
                STAIR_BLOCK_IDS.to_vec()
            } else {
                block_ids
            };
            let catalog = build_catalog(&template, &ids)?;
            println!("{}", serde_json::to_string_pretty(&dump_catalog(&catalog, &ids))?);
        }
        Command::Probe { scene, template } => {
            let template = load_template(template.as_deref())?;
            let catalog = build_catalog(&template, &STAIR_BLOCK_IDS)?;
            let scene = Scene::load(&scene)?;
            println!("{}", serde_json::to_string_pretty(&probe_scene(&catalog, &scene))?);
        }
    }
    Ok(())
}

fn load_template(path: Option<&Path>) -> Result<StairTemplate, ShapeError> {
    let Some(path) = path else {
        return Ok(StairTemplate::default());
    };
    StairTemplate::load(path).inspect_err(|err| {
        warn!(path = %path.display(), %err, "failed to load stair template");
    })
}

fn build_catalog(template: &StairTemplate, block_ids: &[u16]) -> Result<ShapeCatalog, ShapeError> {
    let builder = StairModelBuilder::from_template(template)?;
    let mut registry = ShapeRegistry::new();
    for &block_id in block_ids {
        register_stairs(&mut registry, &builder, block_id)?;
    }
    let catalog = registry.finish();
    info!(
        blocks = block_ids.len(),
        groups = catalog.groups().len(),
        "shape catalog ready"
    );
    Ok(catalog)
}

fn dump_catalog<'a>(catalog: &'a ShapeCatalog, block_ids: &[u16]) -> CatalogDump<'a> {
    let groups = catalog
        .groups()
        .iter()
        .map(|(_, group)| GroupDump {
            name: group.name().to_string(),
            members: group.members(),
        })
        .collect();
    let models = catalog
        .models()
        .into_iter()
        .map(|(state, kind, model)| ModelDump { state, kind, model })
        .collect();
    let inventory = block_ids
        .iter()
        .map(|&id| BlockState::new(id, 0))
        .filter_map(|state| {
            catalog
                .inventory_model(state)
                .map(|boxes| InventoryDump { state, boxes })
        })
        .collect();
    CatalogDump {
        groups,
        models,
        inventory,
    }
}

fn probe_scene(catalog: &ShapeCatalog, scene: &Scene) -> Vec<ProbedBlock> {
    let world = scene.to_world();
    let shapes = BlockShapes::new(&world, catalog);
    scene
        .blocks
        .iter()
        .filter_map(|block| {
            let pos = block.pos();
            let state = world.block_at(pos.x, pos.y, pos.z)?;
            let render = if state.is_air() {
                Vec::new()
            } else {
                catalog
                    .resolve(ModelKind::Render, state, pos, &world)
                    .unwrap_or_else(|| vec![UnitBox::FULL])
            };
            let collision = shapes
                .block_boxes(ModelKind::Collision, pos)
                .into_iter()
                .map(|bb| [bb.min.to_array(), bb.max.to_array()])
                .collect();
            Some(ProbedBlock {
                pos: block.pos,
                state,
                render,
                collision,
            })
        })
        .collect()
}

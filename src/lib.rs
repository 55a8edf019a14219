#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Mesh Engine
//!
//! Chunk and mesh lifecycle for a voxel world engine that runs natively and in
//! the browser (WebAssembly).
//!
//! The world is a sparse grid of cubic chunks. Each chunk is greedy meshed into
//! a renderable that lives in an in-memory scene graph, and a chunk's mesh is
//! rebuilt synchronously whenever one of its voxels changes. Besides the world
//! grid, groups of chunks can be *detached*: they get their own node hierarchy
//! and move and rotate as a single rigid body.
//!
//! ## Key Modules
//!
//! * `core` - Single-threaded shared handles used throughout the engine
//! * `engine_state` - The engine context, world registry, detached groups,
//!   meshing and scene graph
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Vector3;
//! use voxel_mesh_engine::{EngineConfig, EngineState};
//!
//! let engine = EngineState::new(EngineConfig { chunk_distance: 0, ..EngineConfig::default() }).unwrap();
//! let mut group = engine.create_detached(None).unwrap();
//! group.set((0, 0, 0), 0, 1).unwrap();
//! group.set_position(Vector3::new(0.0, 100.0, 0.0)).unwrap();
//! ```
//!
//! The native binary and [`run_web`] (wasm only) build an engine from a JSON
//! configuration and assemble a small detached group.

use cgmath::{Deg, Euler, Rad, Vector3};
use log::info;

pub mod core;
pub mod engine_state;

pub use engine_state::{
    config::EngineConfig,
    error::{EngineError, Result},
    EngineState,
};

#[cfg(target_family = "wasm")]
use wasm_bindgen::prelude::*;

cfg_if::cfg_if! {
    if #[cfg(target_family = "wasm")] {
        /// Routes `log` output to the browser console and panics to `console.error`.
        pub fn init_logging() {
            std::panic::set_hook(Box::new(console_error_panic_hook::hook));
            if console_log::init_with_level(log::Level::Info).is_ok() {
                info!("Logger initialized");
            }
        }
    } else {
        /// Logs to stdout, filtered by `RUST_LOG`.
        pub fn init_logging() {
            let initialized = env_logger::Builder::new()
                .target(env_logger::Target::Stdout)
                .parse_env("RUST_LOG")
                .try_init();
            if initialized.is_ok() {
                info!("Logger initialized");
            }
        }
    }
}

/// Builds an engine and a two-chunk detached group, then turns the group a
/// quarter turn about its pivot. The group is dropped, and with it removed from
/// the scene, before the engine is returned.
pub fn run_demo(config: EngineConfig) -> Result<EngineState> {
    let engine = EngineState::new(config)?;
    let size = engine.config().chunk_size;

    let mut group = engine.create_detached(None)?;
    for x in 0..size {
        group.set((0, 0, 0), x, 1)?;
        group.set((1, 0, 0), x, 2)?;
    }
    group.set_position(Vector3::new(0.0, engine.config().chunk_world_size() * 2.0, 0.0))?;
    group.set_rotation(Euler::new(Rad(0.0), Deg(90.0).into(), Rad(0.0)))?;

    for (coord, mesh) in group.meshes() {
        let position = engine.scene().world_position(mesh.object)?;
        info!(
            "Group chunk {} has {} faces, origin at {:?}",
            coord, mesh.face_count, position
        );
    }
    info!(
        "Scene holds {} renderables",
        engine.scene().renderables_in_scene().len()
    );
    Ok(engine)
}

/// Native entry point: loads the configuration at `config_path`, or the
/// defaults, and runs the demo.
#[cfg(not(target_family = "wasm"))]
pub fn run(config_path: Option<&std::path::Path>) -> Result<()> {
    init_logging();
    let config = match config_path {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    run_demo(config)?;
    Ok(())
}

/// Browser entry point. `config_json` is an optional JSON engine configuration.
#[cfg(target_family = "wasm")]
#[wasm_bindgen]
pub fn run_web(config_json: Option<String>) -> std::result::Result<(), JsValue> {
    init_logging();
    let config = match config_json {
        Some(json) => EngineConfig::from_json_str(&json),
        None => Ok(EngineConfig::default()),
    };
    config
        .and_then(run_demo)
        .map(|_| ())
        .map_err(|err| JsValue::from_str(&err.to_string()))
}

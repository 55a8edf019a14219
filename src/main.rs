//! # Voxel Mesh Engine Demo
//!
//! Native entry point. Builds an engine from an optional JSON configuration
//! file and assembles a small detached group, logging what ends up in the
//! scene.
//!
//! For web applications, see the `run_web()` function in the library.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- config.json
//! ```

fn main() {
    #[cfg(not(target_family = "wasm"))]
    {
        let config_path = std::env::args().nth(1).map(std::path::PathBuf::from);
        if let Err(err) = voxel_mesh_engine::run(config_path.as_deref()) {
            log::error!("{err}");
            eprintln!("error: {err}");
            std::process::exit(1);
        }
    }
}

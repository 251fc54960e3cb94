use anyhow::Context;
use clap::Parser;
use wasm_bindgen::prelude::*;

mod game;
mod storage;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    game: game::GameProps,
}

#[wasm_bindgen(start)]
pub fn run_app() {
    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    if let Err(err) = run() {
        gloo::console::error!(format!("Could not start: {err:#}"));
    }
}

/// Reads settings from the location hash, e.g. `#-vv&--difficulty=expert&--seed=42`.
fn run() -> anyhow::Result<()> {
    use gloo::utils::{document, window};

    let location_hash = window().location().hash().unwrap_or_default();

    let args = Args::try_parse_from(location_hash.split(['#', '&'])).context("Could not parse args")?;
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level)
            .map_err(|err| anyhow::anyhow!("Error initializing logger: {err}"))?;
    }
    log::debug!("args: {:?}", args);

    let config = args.game.config()?;
    log::debug!("board: {:?}", config);

    let root = document()
        .get_element_by_id("game")
        .context("Could not find id=\"game\" element")?;

    log::debug!("App started");
    yew::Renderer::<game::GameView>::with_root_and_props(root, args.game).render();
    Ok(())
}

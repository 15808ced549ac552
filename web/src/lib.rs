use clap::Parser;
use wasm_bindgen::prelude::*;

mod canvas;
mod lottery;
mod puzzle;
mod utils;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    #[command(flatten)]
    view: utils::ViewProps,
}

impl Args {
    /// Parses `#-v&--seed=42`-style fragments, `&` separating arguments.
    fn from_hash(hash: &str) -> Result<Self, clap::Error> {
        Self::try_parse_from(hash.split(['#', '&']))
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    use gloo::utils::{document, window};

    #[cfg(feature = "console_error_panic_hook")]
    {
        console_error_panic_hook::set_once();
    }

    let location_hash = window()
        .location()
        .hash()
        .unwrap_or_else(|_| "".to_string());

    let args = Args::from_hash(&location_hash).expect("Could not parse args");
    if let Some(log_level) = args.verbose.log_level() {
        console_log::init_with_level(log_level).expect("Error initializing logger");
    }
    log::debug!("seed: {:?}, images: {}", args.view.seed, args.view.image_dir);

    if let Some(root) = document().get_element_by_id("puzzle") {
        log::debug!("mounting puzzle");
        yew::Renderer::<puzzle::PuzzleView>::with_root_and_props(root, args.view.clone()).render();
    }

    if let Some(root) = document().get_element_by_id("lottery") {
        log::debug!("mounting lottery");
        yew::Renderer::<lottery::LotteryView>::with_root_and_props(root, args.view).render();
    }
}

use clap::Args;
use gloo::timers::callback::Interval;
use yew::prelude::*;

/// Frame rate of the render loop.
pub(crate) const FPS: u32 = 30;

#[derive(Args, Properties, Debug, Clone, PartialEq)]
pub(crate) struct ViewProps {
    /// Force a seed instead of random
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Where the tile and egg images are served from
    #[arg(long, default_value = "images")]
    pub image_dir: String,
}

impl ViewProps {
    pub(crate) fn seed_or_random(&self) -> u64 {
        self.seed.unwrap_or_else(js_random_seed)
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

/// Fixed-rate tick driving the per-frame engine step and redraw.
pub(crate) fn create_ticker(tick: Callback<()>) -> Interval {
    Interval::new(1000 / FPS, move || tick.emit(()))
}

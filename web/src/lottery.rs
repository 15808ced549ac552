use crate::canvas::*;
use crate::utils::*;
use gloo::timers::callback::Interval;
use hocotate_core as game;
use web_sys::HtmlImageElement;
use yew::prelude::*;

/// Horizontal position of the tally captions.
const TALLY_X: f64 = 480.;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Tick,
    Break,
    Reset,
    Save,
}

#[derive(Debug)]
pub(crate) struct LotteryView {
    engine: game::RevealEngine,
    canvas: NodeRef,
    images: Vec<(game::Hatch, Option<HtmlImageElement>)>,
    _ticker: Interval,
}

impl LotteryView {
    fn image_for(&self, hatch: game::Hatch) -> Option<&HtmlImageElement> {
        self.images
            .iter()
            .find(|(candidate, _)| *candidate == hatch)
            .and_then(|(_, image)| image.as_ref())
    }

    fn draw(&self) {
        let Some(painter) = Painter::new(&self.canvas) else {
            return;
        };

        painter.clear();
        for (coords, &hatch) in self.engine.board().iter() {
            if let Some(image) = self.image_for(hatch) {
                painter.cell_image(image, coords);
            }
        }

        for (row, (hatch, count)) in self.engine.tallies().enumerate() {
            painter.text(
                &format!("{} : {}", hatch.label(), count),
                "16px Arial",
                (TALLY_X, 30. * (row as f64 + 1.)),
            );
        }
    }
}

impl Component for LotteryView {
    type Message = Msg;
    type Properties = ViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        use game::Hatch;

        let props = ctx.props();
        let images = [Hatch::Egg]
            .into_iter()
            .chain(Hatch::CONTENTS)
            .map(|hatch| {
                let src = format!("{}/{}.png", props.image_dir, hatch.asset_name());
                (hatch, load_image(&src))
            })
            .collect();

        Self {
            engine: game::RevealEngine::new(props.seed_or_random()),
            canvas: NodeRef::default(),
            images,
            _ticker: create_ticker(ctx.link().callback(|()| Msg::Tick)),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Tick => {
                self.engine.reveal_next();
                self.draw();
                false
            }
            Break => self.engine.start_breaking().has_update(),
            Reset => self.engine.reset().has_update(),
            Save => {
                save_canvas(&self.canvas, &self.engine);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        let (width, height) = self.engine.size();
        let canvas_width = (IMAGE_SIZE * f64::from(width) + 160.).to_string();
        let canvas_height = (IMAGE_SIZE * f64::from(height)).to_string();
        let idle = self.engine.state() == game::RevealState::Idle;

        html! {
            <div class="lottery">
                <canvas ref={self.canvas.clone()} width={canvas_width} height={canvas_height}/>
                <nav>
                    <button disabled={!idle} onclick={ctx.link().callback(|_| Msg::Break)}>
                        {"Break"}
                    </button>
                    <button onclick={ctx.link().callback(|_| Msg::Reset)}>{"Reset"}</button>
                    <button onclick={ctx.link().callback(|_| Msg::Save)}>{"Save"}</button>
                </nav>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        self.draw();
    }
}

use crate::canvas::*;
use crate::utils::*;
use gloo::events::EventListener;
use gloo::timers::callback::Interval;
use hocotate_core as game;
use wasm_bindgen::JsCast;
use web_sys::{HtmlImageElement, KeyboardEvent};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Tick,
    Start,
    Reset,
    Move(game::Direction),
    Save,
}

#[derive(Debug)]
pub(crate) struct PuzzleView {
    engine: game::PuzzleEngine,
    canvas: NodeRef,
    parts: Vec<Option<HtmlImageElement>>,
    _ticker: Interval,
    _keys: EventListener,
}

impl PuzzleView {
    fn listen_keys(ctx: &Context<Self>) -> EventListener {
        let link = ctx.link().clone();
        EventListener::new(&gloo::utils::window(), "keydown", move |event| {
            let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
                return;
            };
            if let Some(direction) = game::Direction::from_key(&event.key()) {
                log::trace!("key {:?} -> {:?}", event.key(), direction);
                // arrow keys would otherwise scroll the page
                event.prevent_default();
                link.send_message(Msg::Move(direction));
            }
        })
    }

    fn draw(&self) {
        let Some(painter) = Painter::new(&self.canvas) else {
            return;
        };
        let snapshot = self.engine.snapshot();
        let (width, _) = snapshot.board.size();

        painter.clear();
        for (coords, &tile) in snapshot.board.iter() {
            if let Some(Some(image)) = self.parts.get(usize::from(tile)) {
                painter.cell_image(image, coords);
            }

            let number = tile + 1;
            let (x, y) = cell_origin(coords);
            let inset = if number < 10 { 3. / 8. } else { 1. / 4. };
            painter.text(
                &number.to_string(),
                "24px Arial",
                (x + inset * IMAGE_SIZE, y + 5. / 8. * IMAGE_SIZE),
            );
        }

        painter.text(
            &format!("Time: {}", snapshot.time),
            "16px Arial",
            (IMAGE_SIZE * f64::from(width) + 16., 30.),
        );
        painter.cell_frame(snapshot.blank, "red");
    }

    fn arrow_button(&self, ctx: &Context<Self>, direction: game::Direction, label: &str) -> Html {
        let movable = self.engine.movable_directions();
        let class = classes!("arrow", format!("{:?}", direction).to_lowercase());
        html! {
            <button
                {class}
                disabled={!movable.contains(direction.flag())}
                onclick={ctx.link().callback(move |_| Msg::Move(direction))}
            >
                {label}
            </button>
        }
    }
}

impl Component for PuzzleView {
    type Message = Msg;
    type Properties = ViewProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let parts = game::PART_NAMES
            .iter()
            .map(|name| load_image(&format!("{}/{}.jpg", props.image_dir, name)))
            .collect();

        Self {
            engine: game::PuzzleEngine::new(game::PuzzleConfig::default(), props.seed_or_random()),
            canvas: NodeRef::default(),
            parts,
            _ticker: create_ticker(ctx.link().callback(|()| Msg::Tick)),
            _keys: Self::listen_keys(ctx),
        }
    }

    fn update(&mut self, _ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        match msg {
            Tick => {
                let won = self.engine.check_win().has_update();
                self.draw();
                won
            }
            Start => self.engine.start().has_update(),
            Reset => self.engine.reset().has_update(),
            Move(direction) => self.engine.move_blank(direction).has_update(),
            Save => {
                save_canvas(&self.canvas, &self.engine);
                false
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use game::Direction::*;
        use game::Exportable;

        let (width, height) = self.engine.size();
        let canvas_width = (IMAGE_SIZE * f64::from(width) + 160.).to_string();
        let canvas_height = (IMAGE_SIZE * f64::from(height)).to_string();
        let state = self.engine.state();

        html! {
            <div class="puzzle">
                <canvas ref={self.canvas.clone()} width={canvas_width} height={canvas_height}/>
                <nav>
                    <button
                        disabled={state != game::PuzzleState::NotStarted}
                        onclick={ctx.link().callback(|_| Msg::Start)}
                    >
                        {"Start"}
                    </button>
                    <button
                        disabled={state == game::PuzzleState::NotStarted}
                        onclick={ctx.link().callback(|_| Msg::Reset)}
                    >
                        {"Reset"}
                    </button>
                    <button
                        disabled={self.engine.export_filename().is_none()}
                        onclick={ctx.link().callback(|_| Msg::Save)}
                    >
                        {"Save"}
                    </button>
                </nav>
                <nav class="arrows">
                    {self.arrow_button(ctx, Up, "↑")}
                    {self.arrow_button(ctx, Left, "←")}
                    {self.arrow_button(ctx, Right, "→")}
                    {self.arrow_button(ctx, Down, "↓")}
                </nav>
            </div>
        }
    }

    fn rendered(&mut self, _ctx: &Context<Self>, _first_render: bool) {
        self.draw();
    }
}

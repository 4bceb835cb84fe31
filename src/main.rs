mod components;
mod config;
mod error;
mod feed;
mod model;
mod render;
mod state;
mod store;
mod util;

use components::app::App;

fn main() {
    yew::Renderer::<App>::new().render();
}

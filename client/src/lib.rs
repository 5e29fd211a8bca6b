mod app;
mod desktop;
mod dom;
mod persistence;
mod render;
mod state;
mod terminal;
mod util;

pub use app::run;

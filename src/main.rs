mod app;
mod error;
mod group;
mod lightbox;
mod loader;
mod media;
mod message;
mod page;
mod settings;
mod state;
mod thumbs;
mod transition;
mod trigger;
mod ui;

use std::cell::RefCell;
use std::path::PathBuf;

use state::App;

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = pico_args::Arguments::from_env();
    let page_path: Option<PathBuf> = args
        .finish()
        .into_iter()
        .next()
        .map(PathBuf::from);

    // iced calls the boot function through `Fn`, the page path is consumed once
    let boot_state = RefCell::new(Some(page_path));
    let boot = move || App::new(boot_state.borrow_mut().take().flatten());

    iced::application(boot, App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .run()
}

use pixel_skeleton::{Config, StateManager};

fn main() -> miette::Result<()> {
    // Allows the setting of the log level through RUST_LOG env var
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Crashes of the game loop thread should end up in the log as well
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        log::error!("{info}");
        default_hook(info);
    }));

    let config = Config::default();
    let states = StateManager::new(config.initial_state);

    pixel_skeleton::window::run(config, states)
}

mod game;
mod input;
use macroquad::prelude::*;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

fn window_conf() -> Conf {
    Conf {
        window_title: "Silhouettes".to_string(),
        window_width: 816,
        window_height: 624,
        fullscreen: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    game::run().await;
}

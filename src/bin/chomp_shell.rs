use anyhow::{Context, Result};
use chomp_shell::backend::{self, window_conf};
use chomp_shell::optimizer::{DefaultOptimizer, Optimizer};
use chomp_shell::{Session, SessionConfig};
use macroquad::prelude::Conf;
use std::collections::HashMap;

const TITLE: &str = "chomp";

fn conf() -> Conf {
    window_conf(TITLE)
}

fn build_session() -> Result<Session> {
    let mut optimizer = DefaultOptimizer::new();
    let mut params = HashMap::new();
    params.insert("eta".to_string(), 100.0);
    params.insert("lambda".to_string(), 1.0);
    params.insert("obstacle_gain".to_string(), 0.5);
    optimizer
        .configure(&params)
        .context("failed to configure optimizer")?;

    log::info!("Using optimizer: {}", optimizer.name());
    Session::new(SessionConfig::default(), Box::new(optimizer)).context("failed to set up session")
}

#[macroquad::main(conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut session = match build_session() {
        Ok(session) => session,
        Err(e) => {
            log::error!("{:#}", e);
            std::process::exit(1);
        }
    };

    log::info!("drag obstacles with the left button, right-click to add one");
    log::info!("space: run/pause, s: step, j: jumble, escape: quit");

    if let Err(e) = backend::run(TITLE, &mut session).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

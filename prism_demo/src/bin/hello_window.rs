//! Empty window cleared to the background colour; Escape closes it

use prism_demo::run_demo;
use prism_engine::prism::{Config, Result};

fn main() -> Result<()> {
    run_demo(Config::from_env(), |_ctx| Ok(Vec::new()))
}

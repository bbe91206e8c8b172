use clap::Parser;
use simple_logger::SimpleLogger;

mod animation;
mod app;
mod args;
mod config;

use app::App;
use args::Args;
use config::DemoConfig;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    if let Err(e) = SimpleLogger::new()
        .with_level(args.log_level.into())
        .init()
    {
        eprintln!("Could not set up logging: {e}");
    }

    let config = match DemoConfig::from_args(&args) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Could not read config: {e}");
            std::process::exit(-1);
        }
    };

    let app = match App::new(&config, &args.shader, args.texture.as_deref()) {
        Ok(v) => v,
        Err(e) => {
            log::error!("Could not start: {e}");
            std::process::exit(-1);
        }
    };

    app.run();
}

use std::str::FromStr;

use diorama::scene::Demo;
use diorama::AppConfig;

const USAGE: &str = "usage: diorama [cube|house|village|terrain] [--headless <frames>]";

fn setup_logger() -> Result<(), fern::InitError> {
    let level = std::env::var("DIORAMA_LOG")
        .ok()
        .and_then(|level| log::LevelFilter::from_str(&level).ok())
        .unwrap_or(log::LevelFilter::Info);

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}:{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.level(),
                record.target(),
                record.line().unwrap_or(0),
                message
            ))
        })
        .level(level)
        // wgpu is chatty at info
        .level_for("wgpu_core", log::LevelFilter::Warn)
        .level_for("wgpu_hal", log::LevelFilter::Warn)
        .level_for("naga", log::LevelFilter::Warn)
        .chain(std::io::stdout())
        .apply()?;
    Ok(())
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<(Demo, AppConfig), String> {
    let mut demo = Demo::Village;
    let mut config = AppConfig::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--headless" => {
                let frames = args
                    .next()
                    .ok_or_else(|| "--headless needs a frame count".to_string())?;
                let frames = frames
                    .parse()
                    .map_err(|_| format!("invalid frame count '{}'", frames))?;
                config = config.headless(frames);
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            name => demo = name.parse().map_err(|e| format!("{}\n{}", e, USAGE))?,
        }
    }

    Ok((demo, config.title(demo.title())))
}

fn main() {
    if let Err(why) = setup_logger() {
        panic!("{}", why);
    }

    let (demo, config) = match parse_args(std::env::args().skip(1)) {
        Ok(parsed) => parsed,
        Err(message) => {
            eprintln!("{}", message);
            std::process::exit(2);
        }
    };

    let result = demo
        .build()
        .map_err(diorama::AppError::from)
        .and_then(|scene| diorama::run(config, scene));

    if let Err(err) = result {
        log::error!("{}", err);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn defaults_to_the_village() {
        let (demo, config) = parse_args(args(&[])).unwrap();
        assert_eq!(demo, Demo::Village);
        assert_eq!(config.headless_frames, None);
        assert_eq!(config.title, Demo::Village.title());
    }

    #[test]
    fn parses_demo_and_headless_frames() {
        let (demo, config) = parse_args(args(&["terrain", "--headless", "30"])).unwrap();
        assert_eq!(demo, Demo::Terrain);
        assert_eq!(config.headless_frames, Some(30));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(parse_args(args(&["castle"])).is_err());
        assert!(parse_args(args(&["--headless"])).is_err());
        assert!(parse_args(args(&["--headless", "many"])).is_err());
    }
}

use std::path::Path;

use anyhow::Result;
use clap::{App, Arg, ArgMatches, SubCommand};
use log::{debug, info};

use crate::config::{Config, Overrides};
use crate::error::ErrorKind;
use crate::resource::Resource;
use crate::youtube::YoutubeAPI;

/// Fetch a video and write its document
fn video(api: &YoutubeAPI, id: &str, output: Option<&Path>) -> Result<()> {
    let video = api.get_video(id).map_err(explain)?;
    info!("Video {:?}: {:?}", id, video.metadata().title);
    let path = video.save(output)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Fetch a channel and write its document
fn channel(api: &YoutubeAPI, id: &str, output: Option<&Path>) -> Result<()> {
    let chan = api.get_channel(id).map_err(explain)?;
    info!("Channel {:?}: {:?}", id, chan.metadata().title);
    debug!("Uploads playlist: {:?}", chan.uploads_playlist());
    let path = chan.save(output)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Fetch the video and channel named in the config file
fn run(api: &YoutubeAPI, cfg: &Config) -> Result<()> {
    if cfg.video_id.is_none() && cfg.channel_id.is_none() {
        anyhow::bail!("Neither \"video_id\" nor \"channel_id\" set in config file");
    }
    if let Some(id) = &cfg.video_id {
        video(api, id, None)?;
    }
    if let Some(id) = &cfg.channel_id {
        channel(api, id, None)?;
    }
    Ok(())
}

/// Add a hint to not-found errors, which are usually a mistyped ID
fn explain(e: crate::error::ApiError) -> anyhow::Error {
    let hint = match e.kind() {
        ErrorKind::NotFound => Some("check the ID is correct and the resource is public"),
        _ => None,
    };
    let e = anyhow::Error::new(e);
    match hint {
        Some(h) => e.context(h),
        None => e,
    }
}

fn config_logging(verbosity: u64) -> Result<()> {
    // Level for this application
    let internal_level = match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,  // -v
        2 => log::LevelFilter::Debug, // -vv
        _ => log::LevelFilter::Trace, // -vvv
    };

    // Show log output for 3rd party library at -vvv
    let thirdparty_level = match verbosity {
        0..=2 => log::LevelFilter::Warn,
        _ => log::LevelFilter::Debug,
    };

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}[{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(thirdparty_level)
        .level_for("ytdump", internal_level)
        .chain(std::io::stderr())
        .apply()?;

    Ok(())
}

fn output_arg<'a, 'b>() -> Arg<'a, 'b> {
    Arg::with_name("output")
        .short("o")
        .long("output")
        .takes_value(true)
        .value_name("FILE")
        .help("File to write (replaced if it exists)")
}

/// Global flags may come before or after the subcommand
fn overrides(app_m: &ArgMatches, sub_m: &ArgMatches) -> Overrides {
    let value = |name: &str| {
        sub_m
            .value_of(name)
            .or_else(|| app_m.value_of(name))
            .map(String::from)
    };
    Overrides {
        api_key: value("api-key"),
        api_url: value("api-url"),
    }
}

pub fn main() -> Result<()> {
    let sc_video = SubCommand::with_name("video")
        .about("Save a video's metadata and all comments (default video_data.json)")
        .arg(Arg::with_name("id").required(true))
        .arg(output_arg());

    let sc_channel = SubCommand::with_name("channel")
        .about("Save a channel's metadata and all playlists with their videos (default channel_data.json)")
        .arg(Arg::with_name("id").required(true))
        .arg(output_arg());

    let sc_run = SubCommand::with_name("run")
        .about("Save the video_id and channel_id given in the config file");

    let app = App::new("ytdump")
        .about("Dump Youtube video comments and channel playlists to JSON")
        .subcommand(sc_video)
        .subcommand(sc_channel)
        .subcommand(sc_run)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .takes_value(false)
                .global(true),
        )
        .arg(
            Arg::with_name("api-key")
                .long("api-key")
                .takes_value(true)
                .global(true)
                .help("Youtube Data API key (or set YTDUMP_API_KEY)"),
        )
        .arg(
            Arg::with_name("api-url")
                .long("api-url")
                .takes_value(true)
                .global(true)
                .help("Base URL of the API (or set YTDUMP_API_URL)"),
        );

    // Parse
    let app_m = app.get_matches();

    let (name, sub_m) = app_m.subcommand();

    // Logging levels, with -v allowed either side of the subcommand
    let verbosity = std::cmp::max(
        app_m.occurrences_of("verbose"),
        sub_m.map_or(0, |m| m.occurrences_of("verbose")),
    );
    config_logging(verbosity)?;

    let sub_m = match sub_m {
        Some(m) => m,
        None => anyhow::bail!("No subcommand given (try --help)"),
    };

    debug!("Loading config");
    let cfg = Config::load(&overrides(&app_m, sub_m))?;
    let api = YoutubeAPI::from_config(&cfg);

    match name {
        "video" => video(
            &api,
            sub_m.value_of("id").expect("required arg id missing"),
            sub_m.value_of("output").map(Path::new),
        )?,
        "channel" => channel(
            &api,
            sub_m.value_of("id").expect("required arg id missing"),
            sub_m.value_of("output").map(Path::new),
        )?,
        "run" => run(&api, &cfg)?,
        _ => {
            return Err(anyhow::anyhow!("Unhandled subcommand"));
        }
    };

    Ok(())
}

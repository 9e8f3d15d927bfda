//! KI-Autogui - Main Entry Point
//!
//! Command-line front end for the input synthesis engine. It handles CLI
//! argument parsing, configuration loading and backend selection, then runs a
//! single pointer or keyboard command.

use anyhow::{anyhow, Context, Result};
use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ki_autogui::{
    config::{AutomationSettings, CliArgs},
    engine::{ClickOptions, Engine, Motion},
    input::{
        keyboard::NAMED_KEYS, open_backend, tween, BackendKind, ButtonArg, PlatformBackend, Point,
        VirtualBackend,
    },
    NAME, VERSION,
};

/// ANSI color codes for terminal output
mod colors {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const BLUE: &str = "\x1b[34m";
}

/// Print configuration summary
fn print_config_summary(settings: &AutomationSettings) {
    println!(
        "{bold}{blue}Configuration:{reset}",
        bold = colors::BOLD,
        blue = colors::BLUE,
        reset = colors::RESET
    );
    println!(
        "  {dim}Backend:{reset}        {}",
        settings.backend,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Screen:{reset}         {}",
        settings.screen(),
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Fail-safe:{reset}      {}",
        if settings.failsafe {
            format!("{green}enabled{reset}", green = colors::GREEN, reset = colors::RESET)
        } else {
            format!("{yellow}disabled{reset}", yellow = colors::YELLOW, reset = colors::RESET)
        },
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!(
        "  {dim}Pause:{reset}          {}s",
        settings.pause_seconds,
        dim = colors::DIM,
        reset = colors::RESET
    );
    println!();
}

fn coordinate(name: &'static str, value_name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .value_name(value_name)
        .help(help)
        .value_parser(clap::value_parser!(i32))
}

fn duration_arg() -> Arg {
    Arg::new("duration")
        .short('d')
        .long("duration")
        .value_name("SECONDS")
        .help("Length of the motion; at or below the minimum duration it is instant")
        .value_parser(clap::value_parser!(f64))
        .default_value("0")
}

fn button_arg() -> Arg {
    Arg::new("button")
        .short('b')
        .long("button")
        .value_name("BUTTON")
        .help("left, middle, right, primary, secondary, or a button number")
        .default_value("primary")
}

fn relative_arg() -> Arg {
    Arg::new("relative")
        .short('r')
        .long("relative")
        .help("Treat X and Y as an offset from the current position")
        .action(ArgAction::SetTrue)
}

/// Build the CLI command parser
fn build_cli() -> Command {
    Command::new(NAME)
        .version(VERSION)
        .author("KI-Autogui Team")
        .about("Synthesizes mouse and keyboard input with a corner-of-screen fail-safe")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to configuration file (TOML or JSON)")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new("backend")
                .long("backend")
                .value_name("BACKEND")
                .help("Input backend: virtual or native")
                .value_parser(["virtual", "native"])
                .global(true),
        )
        .arg(
            Arg::new("screen")
                .long("screen")
                .value_name("WxH")
                .help("Virtual display size, e.g. 1920x1080")
                .global(true),
        )
        .arg(
            Arg::new("no-failsafe")
                .long("no-failsafe")
                .help("Disable the corner-of-screen fail-safe")
                .action(ArgAction::SetTrue)
                .global(true),
        )
        .arg(
            Arg::new("pause")
                .long("pause")
                .value_name("SECONDS")
                .help("Pause after each operation (default: 0.1)")
                .value_parser(clap::value_parser!(f64))
                .global(true),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::Count)
                .global(true),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .help("Suppress output except errors")
                .action(ArgAction::SetTrue)
                .conflicts_with("verbose")
                .global(true),
        )
        .subcommand(Command::new("position").about("Print the cursor position"))
        .subcommand(Command::new("size").about("Print the display size"))
        .subcommand(
            Command::new("move")
                .about("Move the cursor")
                .allow_negative_numbers(true)
                .arg(coordinate("x", "X", "Target X").required(true))
                .arg(coordinate("y", "Y", "Target Y").required(true))
                .arg(duration_arg())
                .arg(
                    Arg::new("tween")
                        .short('t')
                        .long("tween")
                        .value_name("NAME")
                        .help("Easing function, e.g. linear, easeInOutQuad, easeOutBounce")
                        .default_value("linear"),
                )
                .arg(relative_arg()),
        )
        .subcommand(
            Command::new("drag")
                .about("Drag with a button held")
                .allow_negative_numbers(true)
                .arg(coordinate("x", "X", "Target X").required(true))
                .arg(coordinate("y", "Y", "Target Y").required(true))
                .arg(button_arg())
                .arg(duration_arg())
                .arg(relative_arg()),
        )
        .subcommand(
            Command::new("click")
                .about("Click, optionally at a position")
                .arg(coordinate("x", "X", "Target X").requires("y"))
                .arg(coordinate("y", "Y", "Target Y"))
                .arg(button_arg())
                .arg(
                    Arg::new("clicks")
                        .short('n')
                        .long("clicks")
                        .value_name("COUNT")
                        .help("Number of clicks")
                        .value_parser(clap::value_parser!(u32))
                        .default_value("1"),
                )
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Sleep between clicks")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0"),
                ),
        )
        .subcommand(
            Command::new("scroll")
                .about("Scroll the wheel; positive is up (or right)")
                .allow_negative_numbers(true)
                .arg(
                    Arg::new("amount")
                        .value_name("AMOUNT")
                        .required(true)
                        .value_parser(clap::value_parser!(i32)),
                )
                .arg(
                    Arg::new("horizontal")
                        .long("horizontal")
                        .help("Scroll horizontally")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("press")
                .about("Press and release keys one after another")
                .arg(Arg::new("keys").value_name("KEY").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("hotkey")
                .about("Press keys as a chord, releasing in reverse order")
                .arg(Arg::new("keys").value_name("KEY").required(true).num_args(1..)),
        )
        .subcommand(
            Command::new("write")
                .about("Type text one character at a time")
                .arg(Arg::new("text").value_name("TEXT").required(true))
                .arg(
                    Arg::new("interval")
                        .short('i')
                        .long("interval")
                        .value_name("SECONDS")
                        .help("Sleep between characters")
                        .value_parser(clap::value_parser!(f64))
                        .default_value("0"),
                ),
        )
        .subcommand(Command::new("keys").about("List the named keys and whether the backend supports them"))
}

/// Parse a `WIDTHxHEIGHT` string
fn parse_screen(value: &str) -> Result<(i32, i32)> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| anyhow!("screen size must look like 1920x1080, got '{}'", value))?;
    let width = w.trim().parse().context("invalid screen width")?;
    let height = h.trim().parse().context("invalid screen height")?;
    Ok((width, height))
}

/// Parse CLI arguments into CliArgs struct
fn parse_cli_args(matches: &ArgMatches) -> Result<CliArgs> {
    let mut args = CliArgs::default();

    args.config_file = matches.get_one::<PathBuf>("config").cloned();
    args.pause_seconds = matches.get_one::<f64>("pause").copied();

    if let Some(backend) = matches.get_one::<String>("backend") {
        args.backend = Some(backend.parse::<BackendKind>()?);
    }

    if let Some(screen) = matches.get_one::<String>("screen") {
        let (width, height) = parse_screen(screen)?;
        args.screen_width = Some(width);
        args.screen_height = Some(height);
    }

    if matches.get_flag("no-failsafe") {
        args.failsafe = Some(false);
    }

    Ok(args)
}

/// Initialize the tracing/logging subsystem
fn init_tracing(verbosity: u8, quiet: bool) {
    let level = if quiet {
        Level::ERROR
    } else {
        match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        }
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_thread_ids(false))
        .with(filter)
        .init();
}

fn seconds(value: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(value).with_context(|| format!("invalid duration: {}", value))
}

fn button(matches: &ArgMatches) -> ButtonArg {
    let raw = matches
        .get_one::<String>("button")
        .map(String::as_str)
        .unwrap_or("primary");
    match raw.parse::<i64>() {
        Ok(number) => ButtonArg::Number(number),
        Err(_) => ButtonArg::from(raw),
    }
}

fn target(matches: &ArgMatches) -> Option<Point> {
    match (matches.get_one::<i32>("x"), matches.get_one::<i32>("y")) {
        (Some(x), Some(y)) => Some(Point::new(*x, *y)),
        _ => None,
    }
}

fn keys(matches: &ArgMatches) -> Vec<String> {
    matches
        .get_many::<String>("keys")
        .map(|keys| keys.cloned().collect())
        .unwrap_or_default()
}

/// Run one subcommand against the engine
fn run_command(engine: &mut Engine, name: &str, matches: &ArgMatches) -> Result<()> {
    debug!("Running command '{}'", name);

    match name {
        "position" => {
            let p = engine.position()?;
            println!("{} {}", p.x, p.y);
        }
        "size" => {
            let size = engine.size()?;
            println!("{} {}", size.width, size.height);
        }
        "move" => {
            let point = target(matches).context("missing coordinates")?;
            let tween_name = matches
                .get_one::<String>("tween")
                .map(String::as_str)
                .unwrap_or("linear");
            let tween = tween::by_name(tween_name).ok_or_else(|| {
                anyhow!(
                    "unknown tween '{}'; available: {}",
                    tween_name,
                    tween::NAMES.join(", ")
                )
            })?;
            let duration = seconds(*matches.get_one::<f64>("duration").unwrap_or(&0.0))?;
            let motion = Motion::over(duration).with_tween(tween);

            if matches.get_flag("relative") {
                engine.move_rel(point.x, point.y, motion)?;
            } else {
                engine.move_to(point, motion)?;
            }
        }
        "drag" => {
            let point = target(matches).context("missing coordinates")?;
            let duration = seconds(*matches.get_one::<f64>("duration").unwrap_or(&0.0))?;
            let motion = Motion::over(duration);

            if matches.get_flag("relative") {
                engine.drag_rel(point.x, point.y, button(matches), motion)?;
            } else {
                engine.drag_to(point, button(matches), motion)?;
            }
        }
        "click" => {
            let mut options = ClickOptions::new()
                .button(button(matches))
                .clicks(*matches.get_one::<u32>("clicks").unwrap_or(&1))
                .interval(seconds(*matches.get_one::<f64>("interval").unwrap_or(&0.0))?);
            if let Some(point) = target(matches) {
                options = options.at(point);
            }
            engine.click(options)?;
        }
        "scroll" => {
            let amount = *matches.get_one::<i32>("amount").unwrap_or(&0);
            if matches.get_flag("horizontal") {
                engine.hscroll(amount, None)?;
            } else {
                engine.scroll(amount, None)?;
            }
        }
        "press" => {
            engine.press_many(&keys(matches), 1, Duration::ZERO)?;
        }
        "hotkey" => {
            engine.hotkey(&keys(matches))?;
        }
        "write" => {
            let text = matches
                .get_one::<String>("text")
                .map(String::as_str)
                .unwrap_or("");
            let interval = seconds(*matches.get_one::<f64>("interval").unwrap_or(&0.0))?;
            engine.write(text, interval)?;
        }
        "keys" => {
            for name in NAMED_KEYS {
                if engine.is_valid_key(name) {
                    println!("{}", name);
                } else {
                    println!(
                        "{dim}{} (unsupported){reset}",
                        name,
                        dim = colors::DIM,
                        reset = colors::RESET
                    );
                }
            }
        }
        other => return Err(anyhow!("unknown command '{}'", other)),
    }

    Ok(())
}

/// Main application entry point
fn main() -> Result<()> {
    let matches = build_cli().get_matches();

    let verbosity = matches.get_count("verbose");
    let quiet = matches.get_flag("quiet");

    init_tracing(verbosity, quiet);

    let cli_args = parse_cli_args(&matches)?;

    // Load configuration with full precedence chain
    let settings = cli_args
        .load_settings()
        .context("Failed to load configuration")?;

    if verbosity > 0 && !quiet {
        print_config_summary(&settings);
    }

    let screen = settings.screen();
    let (backend, observer): (Box<dyn PlatformBackend>, Option<VirtualBackend>) =
        match settings.backend {
            BackendKind::Virtual => {
                let desktop = VirtualBackend::new(screen);
                (Box::new(desktop.clone()), Some(desktop))
            }
            kind => (
                open_backend(kind, screen).context("Failed to open input backend")?,
                None,
            ),
        };

    let config = settings
        .to_engine_config()
        .context("Invalid engine configuration")?;
    let mut engine = Engine::new(backend, config).context("Failed to start input engine")?;
    if let Some(ref points) = settings.failsafe_points {
        engine.set_safety_zones(points.iter().copied());
    }

    let (name, sub_matches) = matches
        .subcommand()
        .ok_or_else(|| anyhow!("no command given"))?;
    run_command(&mut engine, name, sub_matches)
        .with_context(|| format!("Command '{}' failed", name))?;

    if let Some(desktop) = observer {
        if !quiet {
            for event in desktop.events() {
                println!(
                    "{dim}{}{reset}",
                    event,
                    dim = colors::DIM,
                    reset = colors::RESET
                );
            }
        }
    }

    Ok(())
}

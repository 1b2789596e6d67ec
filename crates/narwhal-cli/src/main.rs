use narwhal::render::SvgSurface;
use narwhal::{GraphDocument, MindMap, MindMapOptions};
use serde::Serialize;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    Io(std::io::Error),
    Narwhal(narwhal::Error),
    Json(serde_json::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Narwhal(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<narwhal::Error> for CliError {
    fn from(value: narwhal::Error) -> Self {
        Self::Narwhal(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Render,
    Layout,
}

#[derive(Debug)]
struct Args {
    command: Command,
    input: Option<String>,
    pretty: bool,
    ticks: u64,
    config: Option<String>,
    seed: Option<u64>,
    viewport_width: Option<f64>,
    viewport_height: Option<f64>,
    out: Option<String>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            command: Command::Render,
            input: None,
            pretty: false,
            ticks: 300,
            config: None,
            seed: None,
            viewport_width: None,
            viewport_height: None,
            out: None,
        }
    }
}

fn usage() -> &'static str {
    "narwhal-cli\n\
\n\
USAGE:\n\
  narwhal-cli [render] [--ticks <n>] [--config <path>] [--seed <n>] [--viewport-width <w>] [--viewport-height <h>] [--out <path>] [<path>|-]\n\
  narwhal-cli layout [--pretty] [--ticks <n>] [--config <path>] [--seed <n>] [--viewport-width <w>] [--viewport-height <h>] [--out <path>] [<path>|-]\n\
\n\
NOTES:\n\
  - Input is a JSON graph document: {\"vertices\": [...], \"edges\": [{\"source\", \"verb\", \"target\", \"properties\"}]}.\n\
  - If <path> is omitted or '-', input is read from stdin.\n\
  - render prints SVG of the last tick to stdout by default; use --out to write a file.\n\
  - layout prints the settled positions and edge routes as JSON.\n\
  - --config takes a JSON options object; missing keys keep their defaults.\n\
  - NARWHAL_LOG sets the log filter (default: warn).\n\
"
}

fn next_value<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<&'a String, CliError> {
    it.next().ok_or(CliError::Usage(usage()))
}

fn parse_number<T: std::str::FromStr>(value: &str) -> Result<T, CliError> {
    value.parse::<T>().map_err(|_| CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args::default();

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "render" => args.command = Command::Render,
            "layout" => args.command = Command::Layout,
            "--pretty" => args.pretty = true,
            "--ticks" => args.ticks = parse_number(next_value(&mut it)?)?,
            "--config" => args.config = Some(next_value(&mut it)?.clone()),
            "--seed" => args.seed = Some(parse_number(next_value(&mut it)?)?),
            "--viewport-width" => {
                let w: f64 = parse_number(next_value(&mut it)?)?;
                if !(w.is_finite() && w > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.viewport_width = Some(w);
            }
            "--viewport-height" => {
                let h: f64 = parse_number(next_value(&mut it)?)?;
                if !(h.is_finite() && h > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
                args.viewport_height = Some(h);
            }
            "--out" => args.out = Some(next_value(&mut it)?.clone()),
            "--" => {
                if let Some(rest) = it.next() {
                    if args.input.is_some() {
                        return Err(CliError::Usage(usage()));
                    }
                    args.input = Some(rest.clone());
                }
                if it.next().is_some() {
                    return Err(CliError::Usage(usage()));
                }
            }
            other if other.starts_with('-') && other != "-" => {
                return Err(CliError::Usage(usage()));
            }
            path => {
                if args.input.is_some() {
                    return Err(CliError::Usage(usage()));
                }
                args.input = Some(path.to_string());
            }
        }
    }

    Ok(args)
}

fn read_input(input: Option<&str>) -> Result<String, CliError> {
    match input {
        None | Some("-") => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
        Some(path) => Ok(std::fs::read_to_string(path)?),
    }
}

fn write_text(text: &str, out: Option<&str>) -> Result<(), CliError> {
    match out {
        None => {
            print!("{text}");
            Ok(())
        }
        Some(path) => {
            std::fs::write(path, text)?;
            Ok(())
        }
    }
}

fn to_json(value: &impl Serialize, pretty: bool) -> Result<String, CliError> {
    let mut text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    text.push('\n');
    Ok(text)
}

fn load_options(args: &Args) -> Result<MindMapOptions, CliError> {
    let mut options = match args.config.as_deref() {
        Some(path) => MindMapOptions::from_json_str(&std::fs::read_to_string(path)?)?,
        None => MindMapOptions::default(),
    };
    if let Some(seed) = args.seed {
        options.model.random_seed = seed;
    }
    if let Some(w) = args.viewport_width {
        options.model.viewport_width = w;
    }
    if let Some(h) = args.viewport_height {
        options.model.viewport_height = h;
    }
    Ok(options)
}

fn run(args: Args) -> Result<(), CliError> {
    let options = load_options(&args)?;
    let doc = GraphDocument::from_json_str(&read_input(args.input.as_deref())?)?;

    let mut map = MindMap::new(options);
    map.load_document(&doc)?;
    map.run();

    let settle = match args.command {
        Command::Render => args.ticks.saturating_sub(1),
        Command::Layout => args.ticks,
    };
    for _ in 0..settle {
        map.advance();
    }
    tracing::info!(
        ticks = map.tick_count(),
        vertices = map.model().vertex_count(),
        edges = map.model().edges().len(),
        "layout settled"
    );

    match args.command {
        Command::Render => {
            let viewport = map.options().model.viewport();
            let mut svg =
                SvgSurface::new(viewport).with_background(map.options().background.clone());
            if args.ticks == 0 {
                map.draw(&mut svg);
            } else {
                map.tick(&mut svg);
            }
            write_text(&svg.finish(), args.out.as_deref())
        }
        Command::Layout => {
            let json = to_json(&map.snapshot(), args.pretty)?;
            write_text(&json, args.out.as_deref())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("NARWHAL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_tracing();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

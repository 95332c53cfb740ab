//! cvprog-bench: drive a CV programming session from a script.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  script ──▶ EventQueue ──▶ CvService ──▶ LogDisplay          │
//! │                 ▲              │      ──▶ LogEventSink       │
//! │                 │              ▼                             │
//! │             SimStation ◀── request channel                   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Reads the script from a file or stdin, runs it against a simulated
//! decoder and prints the final screen and session on stdout.  Logging goes
//! to stderr, level from `CVPROG_LOG`.

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, ValueEnum};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::Channel;
use log::info;
use tracing_subscriber::EnvFilter;

use cvprog::adapters::channel_programmer::{ChannelProgrammer, RequestChannel};
use cvprog::adapters::console_display::LogDisplay;
use cvprog::adapters::log_sink::LogEventSink;
use cvprog::adapters::script::{ScriptLine, parse_script};
use cvprog::adapters::sim_station::SimStation;
use cvprog::app::service::CvService;
use cvprog::config::{CvConfig, TargetProfile};
use cvprog::events::{CvResult, EventQueue};

#[derive(Copy, Clone, Debug, ValueEnum)]
enum Profile {
    /// CV numbers up to 255 in direct mode.
    Constrained,
    /// CV numbers up to 1024 in direct mode.
    Extended,
}

#[derive(Parser, Debug)]
#[command(version, about = "Run a CV programming script against a simulated decoder")]
struct Args {
    /// JSON configuration file; overrides --profile.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "extended")]
    profile: Profile,
    /// Reads answer busy this many times before completing.
    #[arg(long, default_value_t = 0)]
    busy_polls: u8,
    /// Script file; stdin when omitted.
    script: Option<PathBuf>,
}

/// Environment variable holding the log filter, e.g. `debug` or `cvprog=trace`.
const LOG_ENV: &str = "CVPROG_LOG";

fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn load_config(args: &Args) -> Result<CvConfig> {
    let config = match &args.config {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str::<CvConfig>(&text)
                .map_err(|e| anyhow!("parsing config {}: {e}", path.display()))?
        }
        None => CvConfig::for_profile(match args.profile {
            Profile::Constrained => TargetProfile::Constrained,
            Profile::Extended => TargetProfile::Extended,
        }),
    };
    config.validate().map_err(|e| anyhow!("config: {e}"))?;
    Ok(config)
}

fn load_script(args: &Args) -> Result<Vec<ScriptLine>> {
    let text = match &args.script {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading script {}", path.display()))?,
        None => {
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .context("reading script from stdin")?;
            text
        }
    };
    Ok(parse_script(&text)?)
}

fn main() -> Result<()> {
    let directives = std::env::var(LOG_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("installing logger: {e}"))?;
    let args = Args::parse();

    let config = load_config(&args)?;
    let script = load_script(&args)?;
    info!(
        "cvprog-bench v{}: {} script lines, {:?} profile",
        env!("CARGO_PKG_VERSION"),
        script.len(),
        config.profile
    );

    // ── Wiring ────────────────────────────────────────────────
    let channel: RequestChannel<NoopRawMutex> = Channel::new();
    let mut programmer = ChannelProgrammer::new(&channel);
    let mut display = LogDisplay::new();
    let mut sink = LogEventSink::new();
    let mut station = SimStation::new();
    station.set_busy_polls(args.busy_polls);
    let mut queue: EventQueue = EventQueue::new();

    let mut service = CvService::new(config);
    service.start(&mut sink);

    // ── Script ────────────────────────────────────────────────
    // Each script event runs to quiescence: the service drains the queue,
    // the station answers whatever was sent, and so on until nothing moves.
    let mut pump = |queue: &mut EventQueue,
                    service: &mut CvService,
                    station: &mut SimStation,
                    display: &mut LogDisplay,
                    sink: &mut LogEventSink| {
        loop {
            service.process_queue(queue, display, &mut programmer, sink);
            while let Ok(request) = channel.try_receive() {
                station.handle(request, queue);
            }
            if queue.is_empty() {
                break;
            }
        }
    };

    for line in script {
        match line {
            ScriptLine::Event(event) => {
                queue.push(event);
                pump(&mut queue, &mut service, &mut station, &mut display, &mut sink);
            }
            ScriptLine::Tick(count) => {
                for _ in 0..count {
                    queue.push(CvResult::Update.into());
                    pump(&mut queue, &mut service, &mut station, &mut display, &mut sink);
                }
            }
            ScriptLine::Station(mode) => station.set_mode(mode),
        }
    }

    // ── Summary ───────────────────────────────────────────────
    let session = service.session();
    let screen = display.screen();
    println!("state:        {:?}", service.state());
    println!("mode:         {:?}", session.mode);
    println!("cv number:    {}", session.cv_number);
    println!("cv value:     {}", session.cv_value);
    println!("pom address:  {}", session.pom_address);
    println!("screen:       {:?}", screen);
    if let Some(request) = service.last_request() {
        println!("last request: {}", request);
    }
    println!("faults:       {}", sink.faults());
    Ok(())
}

//! armscope command-line tool

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use futures::StreamExt;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use armscope::{
    Armscope, BrokerConfig, ConnectionStatus, Phis, PlotConfig, PlotMode, ScopeConfig, ScopeError,
    SegmentSeries, UpdateRate,
};

#[derive(Parser, Debug)]
#[command(version, about = "Robot-arm telemetry and lines-file debugging tools")]
struct Cli {
    /// YAML config file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every joint-angle message published on the topic
    Subscribe {
        #[command(flatten)]
        broker: BrokerArgs,

        /// Print at most this many messages per second (latest wins)
        #[arg(long)]
        max_rate: Option<u32>,
    },

    /// Publish a fixed joint-angle payload at an interval
    Publish {
        #[command(flatten)]
        broker: BrokerArgs,

        /// Four values to send
        #[arg(
            long,
            num_args = 4,
            value_names = ["A", "B", "C", "D"],
            allow_negative_numbers = true,
            default_values_t = vec![0.1f32; 4]
        )]
        phis: Vec<f32>,

        /// Milliseconds between messages
        #[arg(long, default_value_t = 1000)]
        interval_ms: u64,

        /// Stop after this many messages
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        count: Option<u64>,
    },

    /// Show the segments of a lines file in a plot window
    Plot {
        /// Lines file [default: sample_lines.json]
        path: Option<PathBuf>,

        /// Key of the segment array [default: contour]
        #[arg(long)]
        key: Option<String>,

        /// series: start and end polylines; segments: each segment on its own
        #[arg(long)]
        mode: Option<PlotMode>,

        /// Window title
        #[arg(long)]
        title: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
struct BrokerArgs {
    /// Broker host [default: syhub]
    #[arg(long)]
    host: Option<String>,

    /// Broker port [default: 1883]
    #[arg(long)]
    port: Option<u16>,

    #[arg(long)]
    username: Option<String>,

    #[arg(long)]
    password: Option<String>,

    /// Topic [default: pos/phis]
    #[arg(long)]
    topic: Option<String>,

    /// Fixed client id instead of a random one
    #[arg(long)]
    client_id: Option<String>,
}

impl BrokerArgs {
    fn apply(self, config: &mut BrokerConfig) {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(username) = self.username {
            config.username = username;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(topic) = self.topic {
            config.topic = topic;
        }
        if let Some(client_id) = self.client_id {
            config.client_id = Some(client_id);
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "armscope=info",
        1 => "armscope=debug",
        _ => "armscope=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stdout is reserved for the user-facing lines
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = ScopeConfig::load(cli.config.as_deref()).context("loading configuration")?;
    debug!("Configuration: {:?}", config);

    match cli.command {
        Command::Subscribe { broker, max_rate } => {
            broker.apply(&mut config.broker);
            runtime()?.block_on(subscribe(config.broker, UpdateRate::from_max_hz(max_rate)))
        }
        Command::Publish { broker, phis, interval_ms, count } => {
            broker.apply(&mut config.broker);
            let values: [f32; 4] = phis
                .try_into()
                .map_err(|_| anyhow::anyhow!("--phis takes exactly four values"))?;
            let interval = Duration::from_millis(interval_ms.max(1));
            runtime()?.block_on(publish(config.broker, Phis(values), interval, count))
        }
        Command::Plot { path, key, mode, title } => {
            if let Some(path) = path {
                config.plot.path = path;
            }
            if let Some(key) = key {
                config.plot.key = key;
            }
            if let Some(mode) = mode {
                config.plot.mode = mode;
            }
            if let Some(title) = title {
                config.plot.title = title;
            }
            plot(config.plot)
        }
    }
}

fn runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting tokio runtime")
}

fn print_status(status: &ConnectionStatus) {
    // The initial Connecting is announced before the subscription starts
    if *status != ConnectionStatus::Connecting {
        println!("{}", status);
    }
}

async fn subscribe(config: BrokerConfig, rate: UpdateRate) -> anyhow::Result<()> {
    println!("{}", ConnectionStatus::Connecting);

    let subscription = Armscope::subscribe(&config).await.context("starting subscriber")?;
    let mut messages = subscription.messages::<Phis>(rate);
    let mut status = subscription.status_updates();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            Some(update) = status.next() => print_status(&update),
            message = messages.next() => match message {
                Some(Ok(message)) => {
                    println!("Received `{}` from `{}` topic", message.value, message.topic);
                }
                Some(Err(err @ ScopeError::Payload { .. })) => {
                    warn!("{}", err);
                    println!("Dropped malformed payload ({})", err);
                }
                Some(Err(err)) => warn!("{}", err),
                None => break,
            },
        }
    }

    subscription.close();
    Ok(())
}

async fn publish(
    config: BrokerConfig,
    phis: Phis,
    interval: Duration,
    count: Option<u64>,
) -> anyhow::Result<()> {
    println!("{}", ConnectionStatus::Connecting);

    let publisher = Armscope::publisher(&config).context("starting publisher")?;
    let mut status = publisher.status();
    let mut ticker = tokio::time::interval(interval);
    let mut sent = 0u64;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                info!("Interrupted");
                break;
            }
            changed = status.changed() => {
                if changed.is_err() {
                    break;
                }
                let update = status.borrow_and_update().clone();
                print_status(&update);
            }
            _ = ticker.tick() => {
                if !status.borrow().is_connected() {
                    debug!("Not connected, skipping publish");
                    continue;
                }

                match publisher.push_phis(&phis) {
                    Ok(()) => {
                        sent += 1;
                        println!("Sent `{}` to `{}` topic", phis, publisher.topic());
                    }
                    Err(err) => warn!("{}", err),
                }

                if count.is_some_and(|count| sent >= count) {
                    break;
                }
            }
        }
    }

    if let Err(err) = publisher.disconnect().await {
        warn!("{}", err);
    }
    Ok(())
}

fn plot(config: PlotConfig) -> anyhow::Result<()> {
    let series = Armscope::load_lines(&config)
        .with_context(|| format!("loading lines from {}", config.path.display()))?;

    println!("Loaded {} lines", series.len());
    show(&series, &config)
}

#[cfg(feature = "viewer")]
fn show(series: &SegmentSeries, config: &PlotConfig) -> anyhow::Result<()> {
    use armscope::plot::{PlotBackend, WindowBackend};

    let mut backend = WindowBackend::new(config.title.as_str(), config.mode);
    backend.render(series)?;
    Ok(())
}

#[cfg(not(feature = "viewer"))]
fn show(series: &SegmentSeries, _config: &PlotConfig) -> anyhow::Result<()> {
    anyhow::bail!("built without the `viewer` feature, cannot display {} segments", series.len())
}

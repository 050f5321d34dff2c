use std::path::PathBuf;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use dhcp_discover::{Config, Discovery, Event, Result, Transport, format_packet, hardware_address};

#[derive(Parser)]
#[command(name = "dhcp-discover")]
#[command(author, version, about = "Broadcasts a DHCPDISCOVER and prints the offers", long_about = None)]
struct Cli {
    /// Network interface to use
    #[arg(short, long)]
    interface: Option<String>,

    /// Timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    if config.interface.is_none() {
        let _ = Cli::command().write_help(&mut std::io::stderr());
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            debug!("Discovery failed: {:?}", error);
            eprintln!("{}", error);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(interface) = &cli.interface {
        config.interface = Some(interface.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_seconds = timeout;
    }

    config.validate()?;
    Ok(config)
}

async fn run(config: Config) -> Result<()> {
    let interface = config.interface.as_deref().unwrap_or_default();
    let mac = hardware_address(interface)?;

    println!("Interface: {} [{}]", interface, mac);

    let transport = Transport::from_config(&config)?;
    let discovery = Discovery::new(transport, mac, config.timeout());

    let offers = discovery
        .run(|event| match event {
            Event::Sent(packet) => {
                println!("\n>>> Send DHCP discover");
                print!("{}", format_packet(packet));
            }
            Event::Offer(offer) => {
                println!("\n<<< Receive DHCP offer from {}", offer.source.ip());
                print!("{}", format_packet(&offer.packet));
            }
        })
        .await?;

    println!("No more offers ({} received).", offers.len());

    Ok(())
}

use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};
use rand::Rng;

use quic_fec::config::FecConfig;
use quic_fec::fec::{FecEncoder, FecRecoverer, RepairPacketSink, RepairSymbol, SourceSymbol};
use quic_fec::packet::{CryptoContext, NullCrypto};

/// Captures repair payloads as they're emitted, instead of handing them
/// to a real `PacketBuilder`, so the simulation can apply its own loss
/// model to repair symbols just like it does to source packets.
#[derive(Default)]
struct RepairCollector {
    emitted: Vec<RepairSymbol>,
}

impl RepairPacketSink for RepairCollector {
    fn build_repair_packet(
        &mut self,
        _crypto: &mut dyn CryptoContext,
        fss_esi: u64,
        nss: u8,
        repair_key: u8,
        payload: &[u8],
    ) {
        self.emitted.push(RepairSymbol {
            fss_esi,
            nss,
            repair_key,
            data: payload.to_vec(),
        });
    }
}

fn init_logger() {
    let env = Env::default().default_filter_or("info");
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .format_module_path(false)
        .try_init();
}

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[clap(short, long, global = true)]
    verbose: bool,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs a lossy send/receive simulation over the FEC layer
    Simulate {
        /// Path to a TOML file with FEC settings
        #[clap(long, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Number of source packets to send
        #[clap(long, default_value_t = 30)]
        packets: u32,

        /// Fraction of source packets to drop, between 0.0 and 1.0
        #[clap(long, default_value_t = 0.2)]
        loss_rate: f64,

        /// Size in bytes of each source payload
        #[clap(long, default_value_t = 64)]
        payload_size: usize,
    },
}

fn main() {
    let cli = Cli::parse();
    if cli.verbose {
        std::env::set_var("RUST_LOG", "debug");
    }
    init_logger();

    match &cli.command {
        Commands::Simulate {
            config,
            packets,
            loss_rate,
            payload_size,
        } => run_simulation(config.as_deref(), *packets, *loss_rate, *payload_size),
    }
}

fn run_simulation(
    config_path: Option<&std::path::Path>,
    packets: u32,
    loss_rate: f64,
    payload_size: usize,
) {
    let fec_cfg = match config_path {
        Some(path) => match FecConfig::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("failed to load config {}: {}", path.display(), e);
                FecConfig::default()
            }
        },
        None => FecConfig::default(),
    };

    info!(
        "starting simulation: packets={} loss_rate={:.2} payload_size={}",
        packets, loss_rate, payload_size
    );

    let mut crypto = NullCrypto;
    let mut encoder = FecEncoder::new(fec_cfg);
    let mut recoverer = FecRecoverer::new(fec_cfg);
    let mut sink = RepairCollector::default();

    let mut rng = rand::thread_rng();
    let mut sent = 0u32;
    let mut dropped = 0u32;
    let mut repairs_dropped = 0u32;
    let mut recovered_total = 0u32;

    for packet_number in 0..(packets as u64) {
        let payload: Vec<u8> = (0..payload_size)
            .map(|_| (packet_number as u8).wrapping_add(1))
            .collect();
        encoder.on_short_header_packet(packet_number, &payload, &mut sink, &mut crypto);
        sent += 1;

        if rng.gen_bool(loss_rate) {
            dropped += 1;
        } else {
            recoverer.add_source_symbol(SourceSymbol {
                packet_number,
                data: payload,
            });
        }

        for repair in sink.emitted.drain(..) {
            if rng.gen_bool(loss_rate) {
                repairs_dropped += 1;
                continue;
            }
            recoverer.add_repair_symbol(repair);
        }

        if let Some(recovered) = recoverer.recover() {
            recovered_total += recovered.len() as u32;
            for symbol in recovered {
                info!("recovered packet_number={}", symbol.packet_number);
            }
        }
    }

    info!(
        "simulation finished: sent={} dropped={} repairs_dropped={} recovered={}",
        sent, dropped, repairs_dropped, recovered_total
    );
}

use clap::{Args, Parser, Subcommand};
use hound::WavSpec;
use log::info;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use v17tx_core::{AllOnes, Backend, BitBuffer, BitSource, Fixed, Float, TxConfig, TxStatus, V17Tx};

#[derive(Parser)]
#[command(name = "v17tx")]
#[command(about = "ITU-T V.17 fax modem transmitter: renders data to a WAV file")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Transmit the contents of a file: training, data, then the shutdown sequence
    Encode {
        /// Input binary file
        #[arg(value_name = "INPUT.BIN")]
        input: PathBuf,

        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        #[command(flatten)]
        tx: TxArgs,
    },

    /// Render training followed by a run of scrambled ones, with no shutdown
    Training {
        /// Output WAV file
        #[arg(value_name = "OUTPUT.WAV")]
        output: PathBuf,

        /// Length of the recording in seconds
        #[arg(short, long, default_value = "3.0")]
        seconds: f32,

        #[command(flatten)]
        tx: TxArgs,
    },
}

#[derive(Args)]
struct TxArgs {
    /// Data rate: 7200, 9600, 12000 or 14400 bps
    #[arg(short, long, default_value = "9600")]
    bit_rate: u32,

    /// Send the talker echo protection tone before training
    #[arg(long)]
    tep: bool,

    /// Use the short training sequence
    #[arg(long)]
    short_train: bool,

    /// Transmit level in dBm0
    #[arg(short, long, default_value = "-14.0", allow_hyphen_values = true)]
    power: f32,

    /// Use the fixed point signal path
    #[arg(long)]
    fixed_point: bool,

    /// Samples generated per call into the transmitter
    #[arg(long, default_value = "160")]
    chunk: usize,
}

impl TxArgs {
    fn config(&self) -> TxConfig {
        TxConfig {
            bit_rate: self.bit_rate,
            tep: self.tep,
            short_train: self.short_train,
            power_dbm0: self.power,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Encode { input, output, tx } => encode_command(&input, &output, &tx)?,
        Commands::Training { output, seconds, tx } => training_command(&output, seconds, &tx)?,
    }

    Ok(())
}

fn encode_command(input_path: &Path, output_path: &Path, args: &TxArgs) -> Result<(), Box<dyn std::error::Error>> {
    let data = std::fs::read(input_path)?;
    println!("Read {} bytes from {}", data.len(), input_path.display());

    let source = BitBuffer::from_bytes(&data);
    let samples = if args.fixed_point {
        transmit::<Fixed>(args, source, None)?
    } else {
        transmit::<Float>(args, source, None)?
    };
    println!(
        "Encoded {} bits at {} bps to {} samples ({:.2} s)",
        data.len() * 8,
        args.bit_rate,
        samples.len(),
        samples.len() as f32 / v17tx_core::SAMPLE_RATE as f32
    );

    write_wav(output_path, &samples)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

fn training_command(output_path: &Path, seconds: f32, args: &TxArgs) -> Result<(), Box<dyn std::error::Error>> {
    if !(seconds.is_finite() && seconds > 0.0) {
        return Err(format!("Recording length must be positive, got {}", seconds).into());
    }
    let limit = (seconds * v17tx_core::SAMPLE_RATE as f32).round() as usize;
    let samples = if args.fixed_point {
        transmit::<Fixed>(args, AllOnes, Some(limit))?
    } else {
        transmit::<Float>(args, AllOnes, Some(limit))?
    };
    println!("Generated {} samples of training at {} bps", samples.len(), args.bit_rate);

    write_wav(output_path, &samples)?;
    println!("Wrote {}", output_path.display());
    Ok(())
}

/// Run a transmitter until it shuts down, or until `limit` samples
fn transmit<B: Backend>(
    args: &TxArgs,
    source: impl BitSource + 'static,
    limit: Option<usize>,
) -> Result<Vec<i16>, Box<dyn std::error::Error>> {
    if args.chunk == 0 {
        return Err("Chunk size must be at least one sample".into());
    }
    let mut tx: V17Tx<B> = V17Tx::with_config(&args.config(), source)?;
    tx.set_status_sink(|status: TxStatus| info!("transmitter status: {:?}", status));

    let mut samples = Vec::new();
    let mut amp = vec![0i16; args.chunk];
    loop {
        let want = match limit {
            Some(limit) => args.chunk.min(limit - samples.len()),
            None => args.chunk,
        };
        if want == 0 {
            break;
        }
        let produced = tx.produce(&mut amp[..want]);
        samples.extend_from_slice(&amp[..produced]);
        if produced < want {
            break;
        }
    }
    tx.release();
    Ok(samples)
}

fn write_wav(output_path: &Path, samples: &[i16]) -> Result<(), Box<dyn std::error::Error>> {
    let spec = WavSpec {
        channels: 1,
        sample_rate: v17tx_core::SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let file = BufWriter::new(File::create(output_path)?);
    let mut writer = hound::WavWriter::new(file, spec)?;
    for &sample in samples {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

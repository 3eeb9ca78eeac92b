//! A command-line interface for the classical cipher engines.

use cipher_core::alphabet::ARABIC_LETTERS;
use cipher_core::byte_otp::{self, DecodedText};
use cipher_core::{Direction, Script, StepTrace, poly_otp, rail_fence, rsa};
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::{error, info};
use std::error::Error;
use std::fs;
use std::path::PathBuf;

type CliResult = Result<(), Box<dyn Error>>;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(
    after_help = "EXAMPLES:\n  \n# XOR one-time pad with a generated key\ncipher-cli otp encrypt --text \"hello\"\n\n# Polyalphabetic pad, trace as JSON\ncipher-cli --format json poly encrypt --text \"A B\" --key KEY\n\n# Rail Fence with three rails\ncipher-cli rail encrypt --text WEAREDISCOVEREDFLEEATONCE --rails 3\n\n# Derive RSA keys, then decrypt an exported cipher file\ncipher-cli rsa keys --p 61 --q 53\ncipher-cli rsa decrypt --input-file cipher.txt -d 1783 --n 3233"
)]
struct Cli {
    /// How to print the step trace.
    #[arg(long, global = true, value_enum, default_value_t = TraceFormat::Table)]
    format: TraceFormat,

    /// Print only the result, without the step trace.
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum TraceFormat {
    Table,
    Json,
}

#[derive(Clone, Copy, ValueEnum)]
enum ScriptArg {
    Latin,
    Arabic,
    Mixed,
}

impl From<ScriptArg> for Script {
    fn from(arg: ScriptArg) -> Self {
        match arg {
            ScriptArg::Latin => Self::Latin,
            ScriptArg::Arabic => Self::Arabic,
            ScriptArg::Mixed => Self::Mixed,
        }
    }
}

#[derive(Args)]
#[group(required = true, multiple = false)]
struct InputArgs {
    /// The text to process
    #[arg(long)]
    text: Option<String>,

    /// Read the text to process from a file
    #[arg(long, value_name = "FILE")]
    input_file: Option<PathBuf>,
}

impl InputArgs {
    fn read(&self) -> Result<String, Box<dyn Error>> {
        match (&self.text, &self.input_file) {
            (Some(text), _) => Ok(text.clone()),
            (None, Some(path)) => {
                info!("Reading input from '{}'", path.display());
                let content = fs::read_to_string(path)
                    .map_err(|e| format!("failed to read '{}': {e}", path.display()))?;
                Ok(content.trim_end_matches(['\r', '\n']).to_string())
            }
            (None, None) => Err("either --text or --input-file is required".into()),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Byte-wise XOR one-time pad (base64 at the boundary)
    Otp {
        #[command(subcommand)]
        command: OtpCommands,
    },
    /// Polyalphabetic one-time pad over Latin, Arabic or mixed alphabets
    Poly {
        #[command(subcommand)]
        command: PolyCommands,
    },
    /// Rail Fence transposition
    Rail {
        #[command(subcommand)]
        command: RailCommands,
    },
    /// Toy RSA with one character per block
    Rsa {
        #[command(subcommand)]
        command: RsaCommands,
    },
}

#[derive(Subcommand)]
enum OtpCommands {
    /// Encrypt text; a key is generated when none is given
    Encrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Base64 key, at least as long as the plaintext bytes
        #[arg(long)]
        key: Option<String>,
    },
    /// Decrypt base64 ciphertext
    Decrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Base64 key used for encryption
        #[arg(long)]
        key: String,
    },
    /// Generate a random base64 key
    Keygen {
        /// Key length in bytes
        #[arg(short, long)]
        length: usize,
    },
}

#[derive(Subcommand)]
enum PolyCommands {
    /// Encrypt text
    Encrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Key symbols, at least as many as the text
        #[arg(long)]
        key: String,
        /// Use this alphabet instead of detecting it from the input
        #[arg(long, value_enum)]
        script: Option<ScriptArg>,
    },
    /// Decrypt text
    Decrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Key symbols used for encryption
        #[arg(long)]
        key: String,
        /// Use this alphabet instead of detecting it from the input
        #[arg(long, value_enum)]
        script: Option<ScriptArg>,
    },
    /// Generate a random key over an alphabet
    Keygen {
        /// Alphabet to draw from
        #[arg(long, value_enum)]
        script: ScriptArg,
        /// Number of symbols
        #[arg(short, long)]
        length: usize,
    },
}

#[derive(Subcommand)]
enum RailCommands {
    /// Encrypt text
    Encrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Number of rails, an integer greater than 1
        #[arg(long)]
        rails: String,
    },
    /// Decrypt text
    Decrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Number of rails used for encryption
        #[arg(long)]
        rails: String,
    },
}

#[derive(Subcommand)]
enum RsaCommands {
    /// Derive e, d and n from two primes
    Keys {
        /// First prime
        #[arg(long)]
        p: u64,
        /// Second prime
        #[arg(long)]
        q: u64,
        /// Fixed public exponent
        #[arg(short)]
        e: Option<u64>,
        /// Fixed private exponent
        #[arg(short)]
        d: Option<u64>,
    },
    /// Encrypt text, one character per block
    Encrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Public exponent
        #[arg(short)]
        e: u64,
        /// Modulus
        #[arg(long)]
        n: u64,
    },
    /// Decrypt integers found anywhere in the input
    Decrypt {
        #[command(flatten)]
        input: InputArgs,
        /// Private exponent
        #[arg(short)]
        d: u64,
        /// Modulus
        #[arg(long)]
        n: u64,
    },
    /// Check whether a number is prime
    IsPrime {
        /// The number to test
        number: u64,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> CliResult {
    match &cli.command {
        Commands::Otp { command } => run_otp(cli, command),
        Commands::Poly { command } => run_poly(cli, command),
        Commands::Rail { command } => run_rail(cli, command),
        Commands::Rsa { command } => run_rsa(cli, command),
    }
}

fn run_otp(cli: &Cli, command: &OtpCommands) -> CliResult {
    match command {
        OtpCommands::Encrypt { input, key } => {
            let plain = input.read()?;
            let (cipher, key) = byte_otp::encrypt_text(&plain, key.as_deref())?;
            println!("Cipher (base64): {cipher}");
            println!("Key (base64): {key}");
            print_trace(cli, &byte_otp::trace(&plain, &key, Direction::Encrypt)?)
        }
        OtpCommands::Decrypt { input, key } => {
            let cipher = input.read()?;
            match byte_otp::decrypt_text(&cipher, key)? {
                DecodedText::Utf8(text) => println!("Plaintext: {text}"),
                DecodedText::Hex(hex) => println!("Plaintext (hex, not valid UTF-8): {hex}"),
            }
            print_trace(cli, &byte_otp::trace(&cipher, key, Direction::Decrypt)?)
        }
        OtpCommands::Keygen { length } => {
            println!("{}", byte_otp::generate_key_b64(*length)?);
            Ok(())
        }
    }
}

fn run_poly(cli: &Cli, command: &PolyCommands) -> CliResult {
    let outcome = match command {
        PolyCommands::Encrypt { input, key, script } => {
            let text = input.read()?;
            match script {
                Some(script) => poly_otp::encrypt_as(&text, key, (*script).into())?,
                None => poly_otp::encrypt(&text, key)?,
            }
        }
        PolyCommands::Decrypt { input, key, script } => {
            let text = input.read()?;
            match script {
                Some(script) => poly_otp::decrypt_as(&text, key, (*script).into())?,
                None => poly_otp::decrypt(&text, key)?,
            }
        }
        PolyCommands::Keygen { script, length } => {
            println!("{}", poly_otp::generate_key((*script).into(), *length));
            return Ok(());
        }
    };
    println!("Script: {}", outcome.script);
    println!("Result: {}", outcome.text);
    print_trace(cli, &outcome.trace)
}

fn run_rail(cli: &Cli, command: &RailCommands) -> CliResult {
    let outcome = match command {
        RailCommands::Encrypt { input, rails } => {
            rail_fence::encrypt_with_trace(&input.read()?, rail_fence::parse_rails(rails)?)?
        }
        RailCommands::Decrypt { input, rails } => {
            rail_fence::decrypt_with_trace(&input.read()?, rail_fence::parse_rails(rails)?)?
        }
    };
    println!("Result: {}", outcome.text);
    if !cli.quiet {
        for line in outcome.rail_lines() {
            println!("{line}");
        }
    }
    print_trace(cli, &outcome.trace)
}

fn run_rsa(cli: &Cli, command: &RsaCommands) -> CliResult {
    match command {
        RsaCommands::Keys { p, q, e, d } => {
            let keys = rsa::derive_keys(*p, *q, *e, *d)?;
            match cli.format {
                TraceFormat::Json => println!("{}", serde_json::to_string_pretty(&keys)?),
                TraceFormat::Table => {
                    println!("n = {}", keys.n);
                    println!("phi = {}", keys.phi);
                    println!("e = {}", keys.e);
                    println!("d = {}", keys.d);
                    let status = if keys.supports_text(ARABIC_LETTERS) {
                        "Arabic supported"
                    } else {
                        "English only"
                    };
                    println!("Status: {status}");
                }
            }
            Ok(())
        }
        RsaCommands::Encrypt { input, e, n } => {
            let (cipher, trace) = rsa::encrypt_with_trace(&input.read()?, *e, *n)?;
            println!("Cipher: {}", rsa::format_cipher(&cipher));
            if !cli.quiet && matches!(cli.format, TraceFormat::Table) {
                println!("Encryption formula: C = (M ^ {e}) mod {n}");
            }
            print_trace(cli, &trace)
        }
        RsaCommands::Decrypt { input, d, n } => {
            let (plain, trace) = rsa::decrypt_with_trace(&input.read()?, *d, *n)?;
            println!("Plaintext: {plain}");
            if !cli.quiet && matches!(cli.format, TraceFormat::Table) {
                println!("Decryption formula: M = (C ^ {d}) mod {n}");
            }
            print_trace(cli, &trace)
        }
        RsaCommands::IsPrime { number } => {
            if rsa::is_prime(*number) {
                println!("{number} is prime");
            } else {
                println!("{number} is not prime");
            }
            Ok(())
        }
    }
}

fn print_trace(cli: &Cli, trace: &StepTrace) -> CliResult {
    if cli.quiet {
        return Ok(());
    }
    match cli.format {
        TraceFormat::Table => print!("{}", trace.render_table()),
        TraceFormat::Json => println!("{}", trace.to_json()?),
    }
    Ok(())
}

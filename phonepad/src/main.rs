//! phonepad - multi-tap keypad entry with autocorrection
//!
//! Usage:
//!   phonepad type 222 w 666 w 666 w '#'
//!   phonepad --dict words.txt correct hellp world --json
//!   phonepad compile words.txt words.bin
//!   phonepad --timeout-ms 600 interactive

use anyhow::Context;
use clap::{Parser, Subcommand};
use phonepad::{
    create_engine, create_keypad, logging, parse_script, run_script, Correction, KeyRole,
    PhoneConfig,
};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "phonepad")]
#[command(about = "Multi-tap phone keypad entry with keypad-aware word correction")]
struct Args {
    /// Dictionary file (newline-delimited words, or a .bin snapshot)
    #[arg(short, long, global = true)]
    dict: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Commit timeout in milliseconds
    #[arg(long, global = true)]
    timeout_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replay a key script on a virtual clock
    Type {
        /// Key groups (e.g. 222, #) and waits (w, wait, wait:1500)
        #[arg(required = true)]
        keys: Vec<String>,

        /// Commit the open key at the end of the script
        #[arg(long)]
        flush: bool,

        /// Print a JSON transcript
        #[arg(long)]
        json: bool,
    },

    /// Correct words against the dictionary
    Correct {
        #[arg(required = true)]
        text: Vec<String>,

        /// Print per-word corrections as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compile a text word list into a bincode snapshot
    Compile { input: PathBuf, output: PathBuf },

    /// Read lines of keys from stdin and type them with the live timer
    Interactive,
}

fn load_config(args: &Args) -> anyhow::Result<PhoneConfig> {
    let mut config = match &args.config {
        Some(path) => PhoneConfig::load_toml(path)?,
        None => PhoneConfig::default(),
    };
    if let Some(dict) = &args.dict {
        config.dictionary = dict.clone();
    }
    if let Some(ms) = args.timeout_ms {
        config
            .base_mut()
            .set_commit_timeout(Duration::from_millis(ms));
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;
    logging::init_tracing(&config.log_filter);

    match args.command {
        Command::Type { keys, flush, json } => {
            let mut engine = create_engine(&config)?;
            let steps = parse_script(&keys);
            let transcript = run_script(&mut engine, &steps, flush);
            if json {
                println!("{}", serde_json::to_string_pretty(&transcript)?);
            } else {
                match transcript.pending {
                    Some(ch) => println!("{}[{}]", transcript.text, ch),
                    None => println!("{}", transcript.text),
                }
            }
        }
        Command::Correct { text, json } => {
            let engine = create_engine(&config)?;
            let text = text.join(" ");
            if json {
                let corrections = engine.corrector().correct_words(&text);
                println!("{}", serde_json::to_string_pretty(&corrections)?);
            } else {
                println!("{}", engine.corrector().correct(&text));
            }
        }
        Command::Compile { input, output } => {
            if !input.is_file() {
                anyhow::bail!("word list {} does not exist", input.display());
            }
            let dictionary = multitap_core::Dictionary::load_text(&input)
                .with_context(|| format!("failed to read {}", input.display()))?;
            dictionary
                .save_bincode(&output)
                .with_context(|| format!("failed to write {}", output.display()))?;
            println!(
                "Compiled {} words into {}",
                dictionary.len(),
                output.display()
            );
        }
        Command::Interactive => run_interactive(&config)?,
    }

    Ok(())
}

fn run_interactive(config: &PhoneConfig) -> anyhow::Result<()> {
    let keypad = create_keypad(config)?;
    let updates = keypad.subscribe();

    // Timer commits happen between lines; report them as they arrive.
    std::thread::Builder::new()
        .name("phonepad-echo".to_string())
        .spawn(move || {
            for text in updates.iter() {
                eprintln!("  text: {}", text);
            }
        })
        .context("failed to start output thread")?;

    println!("Type keys and press Enter. Empty line or Ctrl-D quits.");
    let stdin = io::stdin();
    let mut out = io::stdout();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }
        for key in line.chars().filter(|c| !c.is_whitespace()) {
            // Finalize inside the engine lock so the per-word results can be shown.
            let corrections = keypad.with_engine(|engine| {
                (engine.key_role(key) == Some(KeyRole::Finalize)).then(|| engine.finalize())
            });
            match corrections {
                Some(corrections) => report_corrections(&corrections),
                None => {
                    keypad.press(key);
                }
            }
        }
        writeln!(out, "{}", keypad.display_text())?;
        out.flush()?;
    }

    keypad.force_commit();
    println!("{}", keypad.text());
    Ok(())
}

fn report_corrections(corrections: &[Correction]) {
    for c in corrections {
        if let Correction::Replaced {
            original,
            replacement,
            distance,
        } = c
        {
            eprintln!("  {} -> {} (distance {})", original, replacement, distance);
        }
    }
}

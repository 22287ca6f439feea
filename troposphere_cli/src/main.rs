// Copyright 2025 the Troposphere Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless word cloud layout.
//!
//! Reads a JSON array of `{ "word": ..., "size": ... }` objects (from a file or
//! stdin), lays the words out on the software surface and writes the placed
//! glyphs as JSON.

mod output;

use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{debug, info, warn};
use troposphere::{CloudEvent, CloudLayout, Config, TextAngle, Word};
use troposphere_raster::RasterSurface;

use crate::output::LayoutReport;

/// Lay out a word cloud and print the placements as JSON.
#[derive(Parser, Debug)]
#[command(name = "troposphere")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON word list; reads stdin when omitted
    words: Option<PathBuf>,

    /// JSON configuration file; options given on the command line win
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Canvas width in pixels
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    height: Option<u32>,

    /// Keep at most this many words
    #[arg(short = 'n', long)]
    max_words: Option<usize>,

    /// Spiral spread, 1 to 100
    #[arg(long)]
    spread: Option<f64>,

    /// Place by inked pixels instead of bounding boxes
    #[arg(long)]
    cuddle: bool,

    /// Word rotation mode
    #[arg(long, value_enum)]
    angle: Option<Angle>,

    /// Debug level, 0 to 3
    #[arg(long)]
    debug: Option<u8>,

    /// Random seed; picked from the clock when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the layout here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Angle {
    Horizontal,
    Tetris,
    Jumble,
    Shatter,
}

impl From<Angle> for TextAngle {
    fn from(angle: Angle) -> Self {
        match angle {
            Angle::Horizontal => Self::Horizontal,
            Angle::Tetris => Self::Tetris,
            Angle::Jumble => Self::Jumble,
            Angle::Shatter => Self::Shatter,
        }
    }
}

impl Args {
    /// The configuration file (or defaults) with command line overrides applied.
    fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading config {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing config {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(max_words) = self.max_words {
            config.max_words = max_words;
        }
        if let Some(spread) = self.spread {
            config.spread = spread;
        }
        if self.cuddle {
            config.cuddle = true;
        }
        if let Some(angle) = self.angle {
            config.text_angle = angle.into();
        }
        if let Some(debug) = self.debug {
            config.debug = debug;
        }
        Ok(config.sanitized())
    }

    fn words(&self) -> Result<Vec<Word>> {
        let text = match &self.words {
            Some(path) => fs::read_to_string(path)
                .with_context(|| format!("reading words {}", path.display()))?,
            None => {
                let mut text = String::new();
                io::stdin()
                    .read_to_string(&mut text)
                    .context("reading words from stdin")?;
                text
            }
        };
        parse_words(&text)
    }

    fn seed(&self) -> u64 {
        self.seed.unwrap_or_else(|| {
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map_or(0, |d| d.as_secs() ^ u64::from(d.subsec_nanos()))
        })
    }
}

fn parse_words(text: &str) -> Result<Vec<Word>> {
    serde_json::from_str(text).context("parsing word list")
}

/// Lay `words` out and serialize the result.
fn lay_out(config: Config, words: Vec<Word>, seed: u64, pretty: bool) -> Result<String> {
    if words.is_empty() {
        warn!("the word list is empty, writing an empty layout");
    }
    info!(words = words.len(), seed, cuddle = config.cuddle, "laying out");

    let surface = RasterSurface::new(config.width, config.height)
        .context("creating the drawing surface")?;
    let mut cloud = CloudLayout::new(config, surface, SmallRng::seed_from_u64(seed));
    cloud.start(words);

    let mut warnings = 0_usize;
    for event in cloud.run_to_completion() {
        match event {
            CloudEvent::Progress(p) => debug!(progress = p, "progress"),
            CloudEvent::Warning(w) => {
                warnings += 1;
                warn!(word = %w.text, advances = w.advances, "placed with a guard tripped");
            }
            CloudEvent::Started | CloudEvent::Finished | CloudEvent::Cancelled => {}
        }
    }
    info!(placed = cloud.layout().len(), warnings, "done");

    let report = LayoutReport::new(cloud.config(), seed, cloud.layout(), warnings);
    if pretty {
        serde_json::to_string_pretty(&report)
    } else {
        serde_json::to_string(&report)
    }
    .context("serializing layout")
}

fn run(args: &Args) -> Result<()> {
    let config = args.config()?;
    let words = args.words()?;
    let json = lay_out(config, words, args.seed(), args.pretty)?;

    match &args.output {
        Some(path) => fs::write(path, json + "\n")
            .with_context(|| format!("writing {}", path.display()))?,
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{json}").context("writing layout")?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    run(&Args::parse())
}

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand};
use loota_core::{Bearing, PinRecord, ProximityRadius, ProximityWidget, codec, share};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

mod display;

#[derive(Parser)]
#[command(name = "loota", version, about = "Build and inspect Loota treasure hunt links")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Encode a JSON array of pins into a hunt token.
    Encode {
        /// JSON file holding the pins (reads stdin when omitted).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print a full shareable link instead of the bare token.
        #[arg(long)]
        link: bool,

        /// Base URL of the Loota site, used with --link.
        #[arg(long, env = "LOOTA_BASE_URL", default_value = "http://localhost:3000")]
        base_url: String,
    },

    /// Decode a hunt token or link and list its pins.
    Decode {
        /// A bare token or a full hunt link.
        token: String,

        /// Print the pins as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Turn a click on the proximity widget into a marker.
    Mark {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,

        #[arg(long, allow_negative_numbers = true)]
        y: f64,

        #[command(flatten)]
        widget: WidgetArgs,
    },

    /// List the reference rings drawn inside the proximity widget.
    Rings {
        #[command(flatten)]
        widget: WidgetArgs,

        #[arg(long, env = "LOOTA_RING_INTERVALS", default_value_t = 5)]
        intervals: u32,
    },

    /// Pixel position of a stored proximity pin on the widget.
    Locate {
        #[arg(long)]
        distance_ft: f64,

        /// Bearing such as N, E30S or W80N.
        #[arg(long)]
        direction: Bearing,

        #[command(flatten)]
        widget: WidgetArgs,
    },
}

#[derive(Args)]
struct WidgetArgs {
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_x: f64,

    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    center_y: f64,

    /// Radius of the widget's circle in pixels.
    #[arg(long)]
    radius_px: f64,

    /// Real-world radius of the circle: 10, 50 or 100 feet.
    #[arg(long, env = "LOOTA_RADIUS_FT", default_value = "50")]
    radius_ft: ProximityRadius,
}

impl WidgetArgs {
    fn widget(&self) -> anyhow::Result<ProximityWidget> {
        if !(self.radius_px.is_finite() && self.radius_px > 0.0) {
            bail!("--radius-px must be a positive number, got {}", self.radius_px);
        }
        Ok(ProximityWidget::new(
            self.center_x,
            self.center_y,
            self.radius_px,
            self.radius_ft,
        ))
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    debug!("loota v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Encode {
            input,
            link,
            base_url,
        } => run_encode(input.as_deref(), link.then_some(base_url.as_str())),
        Command::Decode { token, json } => run_decode(&token, json),
        Command::Mark { x, y, widget } => run_mark(x, y, &widget.widget()?),
        Command::Rings { widget, intervals } => {
            let widget = widget.widget()?;
            display::print_rings(&widget.rings(intervals), widget.radius);
            Ok(())
        }
        Command::Locate {
            distance_ft,
            direction,
            widget,
        } => {
            let (x, y) = widget.widget()?.position_of(distance_ft, direction);
            display::print_position(x, y);
            Ok(())
        }
    }
}

fn run_encode(input: Option<&Path>, link_base: Option<&str>) -> anyhow::Result<()> {
    let raw = match input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading pins from {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading pins from stdin")?;
            buf
        }
    };

    let pins = parse_pins(&raw)?;
    let token = codec::encode(&pins);
    info!(pins = pins.len(), token_len = token.len(), "encoded hunt");
    match link_base {
        Some(base_url) => println!("{}", share::hunt_link(base_url, &token)),
        None => println!("{token}"),
    }
    Ok(())
}

/// Parse a hunt's pins and check them the way they will be stored.
///
/// Validation runs on the rounded pin, since that is what the token holds.
fn parse_pins(raw: &str) -> anyhow::Result<Vec<PinRecord>> {
    let pins: Vec<PinRecord> = serde_json::from_str(raw).context("parsing pins JSON")?;
    if pins.is_empty() {
        bail!("a hunt needs at least one pin");
    }
    for (i, pin) in pins.iter().enumerate() {
        pin.rounded()
            .validate()
            .with_context(|| format!("pin {}", i + 1))?;
    }
    Ok(pins)
}

fn run_decode(input: &str, json: bool) -> anyhow::Result<()> {
    let input = input.trim();
    let token = if input.contains('?') {
        share::token_from_link(input).context("link carries no readable pins parameter")?
    } else {
        input.to_string()
    };

    let pins = match codec::decode(&token) {
        Ok(pins) => pins,
        Err(e) => {
            warn!(kind = %e.kind(), error = %e, "rejected hunt token");
            bail!("could not load hunt data, the link may be corrupted ({e})");
        }
    };
    info!(pins = pins.len(), "decoded hunt");

    if json {
        println!("{}", serde_json::to_string_pretty(&pins)?);
    } else {
        display::print_hunt(&pins);
    }
    Ok(())
}

fn run_mark(x: f64, y: f64, widget: &ProximityWidget) -> anyhow::Result<()> {
    match widget.place(x, y) {
        Ok(marker) => {
            println!("{}", serde_json::to_string_pretty(&marker)?);
            Ok(())
        }
        Err(e) => {
            warn!(x, y, distance_px = e.distance_px, "marker not placed");
            bail!("place the pin inside the circle: {e}");
        }
    }
}

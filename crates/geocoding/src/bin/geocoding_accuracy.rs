//! Accuracy report for one forward/inverse coding pair.
//!
//! Builds a synthetic swath, geocodes every pixel center forward and back and
//! prints the error against the analytic ground truth.

use anyhow::{bail, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use geocoding::testdata::SwathModel;
use geocoding::util::distance_m;
use geocoding::{AntiMeridianMode, ComponentFactory, ComponentGeoCoding, ForwardKey, GeoCodingConfig, InverseKey, PixelPos};

#[derive(Parser, Debug)]
#[command(name = "geocoding-accuracy")]
#[command(about = "Measure forward and round-trip accuracy of a geo-coding on a synthetic swath")]
struct Args {
    /// Scene width in pixels
    #[arg(long, default_value_t = 400)]
    width: usize,

    /// Scene height in pixels
    #[arg(long, default_value_t = 300)]
    height: usize,

    /// Nominal pixel size in km
    #[arg(long, default_value_t = 1.1)]
    resolution_km: f64,

    /// Tie-point spacing in pixels; ignored for dense forward keys
    #[arg(long, default_value_t = 8)]
    subsampling: usize,

    /// Center the swath on the antimeridian
    #[arg(long)]
    anti_meridian: bool,

    /// Forward coding key
    #[arg(long, default_value = "FWD_TIE_POINT_BILINEAR")]
    forward: ForwardKey,

    /// Inverse coding key
    #[arg(long, default_value = "INV_TIE_POINT")]
    inverse: InverseKey,

    /// Evaluate every n-th pixel along each axis
    #[arg(long, default_value_t = 1)]
    step: usize,

    /// Log level
    #[arg(long, default_value = "info", env = "GEOCODING_LOG_LEVEL")]
    log_level: String,
}

#[derive(Debug, Default)]
struct ErrorStats {
    count: usize,
    invalid: usize,
    sum: f64,
    max: f64,
}

impl ErrorStats {
    fn add(&mut self, error: f64) {
        if error.is_nan() {
            self.invalid += 1;
            return;
        }
        self.count += 1;
        self.sum += error;
        self.max = self.max.max(error);
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            f64::NAN
        } else {
            self.sum / self.count as f64
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    if args.forward.is_dense() != args.inverse.is_dense() {
        bail!(
            "{} and {} need different raster kinds",
            args.forward,
            args.inverse
        );
    }
    if args.width < 2 || args.height < 2 {
        bail!("scene must be at least 2x2 pixels");
    }

    let mut model = SwathModel::new(args.width, args.height, args.resolution_km);
    if args.anti_meridian {
        model = model.crossing_anti_meridian();
    }

    let raster = if args.forward.is_dense() {
        model.dense_raster()?
    } else {
        model.tie_point_raster(args.subsampling)?
    };
    info!(
        width = args.width,
        height = args.height,
        raster_width = raster.raster_width(),
        raster_height = raster.raster_height(),
        anti_meridian = raster.crosses_anti_meridian(),
        "built synthetic swath"
    );

    let config = GeoCodingConfig::from_env();
    let mut coding = ComponentGeoCoding::new(
        raster,
        ComponentFactory::create_forward(args.forward),
        ComponentFactory::create_inverse(args.inverse, &config),
        AntiMeridianMode::Auto,
    );
    coding.initialize()?;

    let mut forward_stats = ErrorStats::default();
    let mut round_trip_stats = ErrorStats::default();
    let step = args.step.max(1);

    for y in (0..args.height).step_by(step) {
        for x in (0..args.width).step_by(step) {
            let pixel = PixelPos::new(x as f64 + 0.5, y as f64 + 0.5);
            let truth = model.geo_at(pixel.x, pixel.y);

            let geo = coding.get_geo_pos(&pixel);
            forward_stats.add(distance_m(geo.lon, geo.lat, truth.lon, truth.lat));

            let back = coding.get_pixel_pos(&truth);
            round_trip_stats.add((back.x - pixel.x).hypot(back.y - pixel.y));
        }
    }

    println!("forward:    {}", args.forward);
    println!("inverse:    {}", args.inverse);
    println!(
        "forward error   mean {:>10.3} m   max {:>10.3} m   invalid {}",
        forward_stats.mean(),
        forward_stats.max,
        forward_stats.invalid
    );
    println!(
        "round trip      mean {:>10.4} px  max {:>10.4} px  invalid {}",
        round_trip_stats.mean(),
        round_trip_stats.max,
        round_trip_stats.invalid
    );

    coding.dispose();
    Ok(())
}

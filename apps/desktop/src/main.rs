use std::process::ExitCode;
use std::time::{Duration, Instant};

use antipode::helpers::FrameClock;
use antipode::scene::TRAVELER_MARKER;
use antipode::{
    get_config, sample_location, GeoPoint, HeadlessScene, JourneyPhase, Visualizer,
    VisualizerEvent, SAMPLE_LOCATIONS,
};
use tracing::{event, Level};

const FRAME: Duration = Duration::from_millis(16);
// Generous upper bound so a misconfigured run cannot spin forever.
const MAX_FRAMES: u64 = 60 * 60 * 5;

fn usage() -> String {
    let names: Vec<&str> = SAMPLE_LOCATIONS.iter().map(|s| s.name).collect();
    format!(
        "usage: antipode_desktop <lat> <lng> | <sample>\n  samples: {}",
        names.join(", ")
    )
}

fn parse_start(args: &[String]) -> Result<GeoPoint, String> {
    if args.is_empty() {
        return Ok(SAMPLE_LOCATIONS[0].point);
    }
    // Sample names come first so two-word names such as "New York" are not
    // taken for coordinates.
    let name = args.join(" ");
    if let Some(sample) = sample_location(&name) {
        return Ok(sample.point);
    }

    match args {
        [lat, lng] => {
            let lat: f64 = lat.parse().map_err(|e| format!("bad latitude '{lat}': {e}"))?;
            let lng: f64 = lng.parse().map_err(|e| format!("bad longitude '{lng}': {e}"))?;
            GeoPoint::new_checked(lat, lng).map_err(|e| e.to_string())
        }
        _ => Err(format!("unknown sample location '{name}'")),
    }
}

fn print_event(event: &VisualizerEvent) {
    match event {
        VisualizerEvent::StatusUpdate {
            message,
            progress_percent,
        } => println!("[{:>5.1}%] {}", progress_percent, message),
        other => println!("{}", other.to_json()),
    }
}

pub fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init();
    event!(Level::INFO, "Starting antipode desktop runner...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let start = match parse_start(&args) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("{e}\n{}", usage());
            return ExitCode::from(2);
        }
    };

    let (mut vis, events) = match Visualizer::new(HeadlessScene::new(), get_config()) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("failed to create visualizer: {e}");
            return ExitCode::FAILURE;
        }
    };

    match vis.start_journey(start) {
        Ok(true) => {}
        Ok(false) => {
            eprintln!("journey did not start");
            return ExitCode::FAILURE;
        }
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let mut clock = FrameClock::default();
    let origin = Instant::now();
    let mut completed_at = None;

    for frame in 0..MAX_FRAMES {
        let tick = clock.tick_at(origin.elapsed());
        vis.tick(tick.dt);

        for event in events.drain() {
            print_event(&event);
            if matches!(event, VisualizerEvent::JourneyComplete) {
                completed_at = Some(frame);
            }
        }

        // Keep running until the traveler has been cleared away.
        if completed_at.is_some() && !vis.markers().contains(TRAVELER_MARKER) {
            break;
        }
        std::thread::sleep(FRAME);
    }

    if vis.phase() != JourneyPhase::Complete {
        eprintln!("journey stopped in {:?}", vis.phase());
        return ExitCode::FAILURE;
    }

    event!(
        Level::INFO,
        visuals = vis.scene().live_count(),
        created = vis.scene().created_total(),
        destroyed = vis.scene().destroyed_total(),
        "Journey finished"
    );
    ExitCode::SUCCESS
}

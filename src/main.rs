use verdant_rasterizer::api::AppState;
use verdant_rasterizer::config::Config;
use verdant_rasterizer::pipeline;

/// Runs the pipeline once over a GeoJSON geometry file and prints the
/// produced asset locations. Useful as a smoke check without the server.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "aoi.geojson".to_string());
    println!("verdant-rasterizer - NDVI from {}\n", path);

    let raw = match std::fs::read_to_string(&path) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Cannot read {}: {}", path, e);
            std::process::exit(1);
        }
    };
    let document: serde_json::Value = match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Cannot parse {}: {}", path, e);
            std::process::exit(1);
        }
    };
    // accept either a bare geometry or a { "geometry": ... } wrapper
    let geometry = document.get("geometry").unwrap_or(&document).clone();

    let config = Config::from_env();
    let state = match AppState::from_config(config) {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    match pipeline::run(&state.config, state.live.as_ref(), &geometry).await {
        Ok(output) => {
            println!("Band source: {}", output.band_source);
            println!("Raster:  {}", output.record.raster_path.display());
            println!("Overlay: {}", output.record.overlay_path.display());

            let [south, west, north, east] = output.bounds.to_array();
            println!("Bounds:  [{}, {}, {}, {}]", south, west, north, east);

            match (
                output.statistics.min,
                output.statistics.max,
                output.statistics.mean,
            ) {
                (Some(min), Some(max), Some(mean)) => {
                    println!("NDVI:    min={:.4} max={:.4} mean={:.4}", min, max, mean);
                }
                _ => println!("NDVI:    no valid pixels"),
            }
        }
        Err(e) => {
            eprintln!("Pipeline failed: {}", e);
            std::process::exit(1);
        }
    }
}

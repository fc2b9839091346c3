use axum::http::HeaderValue;
use clap::Parser;
use log::{info, warn};
use needs_core::StoragePaths;
use std::net::SocketAddr;
use std::path::PathBuf;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};

/// Server settings, from flags or the environment
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about = "User needs management API server")]
pub struct ServerConfig {
    /// Address to listen on
    #[clap(long, env = "NEEDS_BIND", default_value = "0.0.0.0:8000")]
    pub bind: SocketAddr,

    /// Directory holding data.json and the demo template data.example.json
    #[clap(long, env = "NEEDS_DATA_DIR", default_value = ".")]
    pub data_dir: PathBuf,

    /// Directory holding the demo data file
    #[clap(long, env = "DEMO_STORAGE_DIR", default_value = "demo-storage")]
    pub demo_storage_dir: PathBuf,

    /// Pin demo mode on; clients cannot switch it off
    #[clap(long, env = "DEMO_MODE_ONLY")]
    pub demo_mode_only: bool,

    /// Origins allowed to call the API (comma separated)
    #[clap(
        long,
        env = "CORS_ORIGINS",
        value_delimiter = ',',
        default_values = [
            "http://localhost:5173",
            "http://localhost:3000",
            "http://localhost:3011",
        ]
    )]
    pub cors_origins: Vec<String>,
}

impl ServerConfig {
    pub fn storage_paths(&self) -> StoragePaths {
        StoragePaths::new(&self.data_dir, &self.demo_storage_dir)
    }

    /// CORS policy for the configured origins. Origins that are not valid
    /// header values are skipped. A `*` entry allows any origin by echoing
    /// it back, since credentials rule out a literal wildcard.
    pub fn cors_layer(&self) -> CorsLayer {
        let origins: Vec<&str> = self
            .cors_origins
            .iter()
            .map(|o| o.trim())
            .filter(|o| !o.is_empty())
            .collect();

        let allow_origin = if origins.contains(&"*") {
            info!("CORS allows any origin");
            AllowOrigin::mirror_request()
        } else {
            let values: Vec<HeaderValue> = origins
                .into_iter()
                .filter_map(|o| match HeaderValue::from_str(o) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!("Ignoring invalid CORS origin: {}", o);
                        None
                    }
                })
                .collect();
            AllowOrigin::list(values)
        };

        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_credentials(true)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
    }
}

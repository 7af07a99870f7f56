use cutplan_core::CuttingConfig;
use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use tracing::warn;

/// API server configuration, loaded from environment variables or defaults.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    pub bind_ip: IpAddr,
    pub port: u16,
    /// Shared secret expected in the `x-api-key` header
    pub api_key: Option<String>,
    pub data_dir: PathBuf,
    pub cutting: CuttingConfig,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 3000;
    const DEFAULT_DATA_DIR: &'static str = "data";

    const HOST_VAR: &'static str = "CUTPLAN_API_HOST";
    const PORT_VAR: &'static str = "CUTPLAN_API_PORT";
    const API_KEY_VAR: &'static str = "API_KEY";
    const DATA_DIR_VAR: &'static str = "CUTPLAN_DATA_DIR";
    const MAX_MACHINE_SIZE_VAR: &'static str = "CUTPLAN_MAX_MACHINE_SIZE";
    const INFINITE_WIDTH_VAR: &'static str = "CUTPLAN_INFINITE_MATERIAL_WIDTH";
    const PADDING_VAR: &'static str = "CUTPLAN_PADDING";
    const MAX_UNIT_PARTS_VAR: &'static str = "CUTPLAN_MAX_UNIT_PARTS";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_ip = match var(Self::HOST_VAR) {
            Some(raw) => raw.parse::<IpAddr>().unwrap_or_else(|err| {
                warn!(
                    "Could not parse {} ('{}'): {}. Using {}.",
                    Self::HOST_VAR,
                    raw,
                    err,
                    Self::DEFAULT_HOST
                );
                default_ip()
            }),
            None => default_ip(),
        };

        let port = match var(Self::PORT_VAR) {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                _ => {
                    warn!(
                        "{} must be a port between 1 and 65535, got '{}'. Using {}.",
                        Self::PORT_VAR,
                        raw,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        let defaults = CuttingConfig::default();
        let cutting = CuttingConfig {
            max_machine_size: positive_f64(
                Self::MAX_MACHINE_SIZE_VAR,
                var(Self::MAX_MACHINE_SIZE_VAR),
                defaults.max_machine_size,
            ),
            infinite_material_width: positive_f64(
                Self::INFINITE_WIDTH_VAR,
                var(Self::INFINITE_WIDTH_VAR),
                defaults.infinite_material_width,
            ),
            padding: match var(Self::PADDING_VAR) {
                Some(raw) => match raw.parse::<f64>() {
                    Ok(value) if value.is_finite() && value >= 0.0 => value,
                    _ => {
                        warn!(
                            "{} must be a non-negative number, got '{}'. Using {}.",
                            Self::PADDING_VAR,
                            raw,
                            defaults.padding
                        );
                        defaults.padding
                    }
                },
                None => defaults.padding,
            },
            max_unit_parts: match var(Self::MAX_UNIT_PARTS_VAR) {
                Some(raw) => match raw.parse::<usize>() {
                    Ok(value) if value > 0 => value,
                    _ => {
                        warn!(
                            "{} must be a positive integer, got '{}'. Using {}.",
                            Self::MAX_UNIT_PARTS_VAR,
                            raw,
                            defaults.max_unit_parts
                        );
                        defaults.max_unit_parts
                    }
                },
                None => defaults.max_unit_parts,
            },
            ..defaults
        };

        Self {
            bind_ip,
            port,
            api_key: var(Self::API_KEY_VAR),
            data_dir: var(Self::DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(Self::DEFAULT_DATA_DIR)),
            cutting,
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }
}

fn default_ip() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn positive_f64(name: &str, raw: Option<String>, default: f64) -> f64 {
    let Some(raw) = raw else {
        return default;
    };
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => value,
        _ => {
            warn!(
                "{} must be a positive number, got '{}'. Using {}.",
                name, raw, default
            );
            default
        }
    }
}

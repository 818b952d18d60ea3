use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::blocking::Client;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::repository::traits::{project_row, Destination, OrderSink, SinkError};

pub const CREDENTIALS_ENV: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";

const SCOPES: &str = "https://www.googleapis.com/auth/spreadsheets https://www.googleapis.com/auth/drive";
const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";
const DRIVE_FILES_URL: &str = "https://www.googleapis.com/drive/v3/files";
const SHEETS_BASE_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";
const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";
const ASSERTION_TTL_SECS: usize = 3600;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Destination names starting with this prefix are used as spreadsheet IDs
/// instead of being looked up by name.
pub const SPREADSHEET_ID_PREFIX: &str = "id:";

#[derive(Deserialize, Clone)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

/// Environment JSON blob first, credential file second.
pub fn resolve_credentials(env_json: Option<&str>, file: Option<&Path>) -> Result<ServiceAccountKey, SinkError> {
    if let Some(blob) = env_json.filter(|b| !b.trim().is_empty()) {
        debug!("using credentials from {}", CREDENTIALS_ENV);
        return serde_json::from_str(blob)
            .map_err(|e| SinkError::Credentials(format!("could not parse {}: {}", CREDENTIALS_ENV, e)));
    }

    match file {
        Some(path) => {
            debug!(path = %path.display(), "using credentials file");
            let content = fs::read_to_string(path)
                .map_err(|e| SinkError::Credentials(format!("could not read {}: {}", path.display(), e)))?;
            serde_json::from_str(&content)
                .map_err(|e| SinkError::Credentials(format!("could not parse {}: {}", path.display(), e)))
        }
        None => Err(SinkError::Credentials(format!(
            "set {} or a credentials file",
            CREDENTIALS_ENV
        ))),
    }
}

#[derive(Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: usize,
    exp: usize,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Deserialize)]
struct Sheet {
    properties: SheetProperties,
}

#[derive(Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<Sheet>,
}

#[derive(Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

/// Google Sheets backed order sheet, authenticated as a service account.
pub struct GoogleSheetsSink {
    client: Client,
    key: ServiceAccountKey,
}

impl GoogleSheetsSink {
    pub fn new(key: ServiceAccountKey) -> Result<Self, SinkError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self { client, key })
    }

    fn access_token(&self) -> Result<String, SinkError> {
        let now = Utc::now().timestamp() as usize;
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: SCOPES,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + ASSERTION_TTL_SECS,
        };
        let signing_key = EncodingKey::from_rsa_pem(self.key.private_key.as_bytes())
            .map_err(|e| SinkError::Credentials(e.to_string()))?;
        let assertion = encode(&Header::new(Algorithm::RS256), &claims, &signing_key)
            .map_err(|e| SinkError::Credentials(e.to_string()))?;

        let resp = self.client
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .map_err(transport)?;
        if !resp.status().is_success() {
            return Err(SinkError::Credentials(format!("token exchange failed with {}", resp.status())));
        }
        let token: TokenResponse = resp.json().map_err(transport)?;
        Ok(token.access_token)
    }

    fn find_spreadsheet(&self, token: &str, name: &str) -> Result<String, SinkError> {
        if let Some(id) = name.strip_prefix(SPREADSHEET_ID_PREFIX) {
            return Ok(id.to_string());
        }

        let list: DriveFileList = self.client
            .get(DRIVE_FILES_URL)
            .bearer_auth(token)
            .query(&[("q", drive_query(name).as_str()), ("fields", "files(id,name)")])
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(transport)?;

        list.files.into_iter().next()
            .map(|f| f.id)
            .ok_or_else(|| SinkError::SpreadsheetNotFound(name.to_string()))
    }

    fn ensure_worksheet(&self, token: &str, spreadsheet_id: &str, destination: &Destination) -> Result<(), SinkError> {
        let url = spreadsheet_url(spreadsheet_id, &[])?;
        let resp = self.client
            .get(url)
            .bearer_auth(token)
            .query(&[("fields", "sheets.properties.title")])
            .send()
            .map_err(transport)?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Err(SinkError::SpreadsheetNotFound(destination.spreadsheet.clone()));
        }
        let meta: SpreadsheetMeta = resp.error_for_status()
            .and_then(|r| r.json())
            .map_err(transport)?;

        if meta.sheets.iter().any(|s| s.properties.title == destination.worksheet) {
            Ok(())
        } else {
            Err(SinkError::WorksheetNotFound {
                spreadsheet: destination.spreadsheet.clone(),
                worksheet: destination.worksheet.clone(),
            })
        }
    }

    fn header_row(&self, token: &str, spreadsheet_id: &str, worksheet: &str) -> Result<Vec<String>, SinkError> {
        let url = spreadsheet_url(spreadsheet_id, &["values", &format!("{}!1:1", quote_sheet(worksheet))])?;
        let range: ValueRange = self.client
            .get(url)
            .bearer_auth(token)
            .send()
            .and_then(|r| r.error_for_status())
            .and_then(|r| r.json())
            .map_err(transport)?;

        match range.values.into_iter().next() {
            Some(headers) if !headers.is_empty() => Ok(headers),
            _ => Err(SinkError::MissingHeaders),
        }
    }
}

impl OrderSink for GoogleSheetsSink {
    fn try_append(&self, record: &BTreeMap<String, String>, destination: &Destination) -> Result<(), SinkError> {
        let token = self.access_token()?;
        let spreadsheet_id = self.find_spreadsheet(&token, &destination.spreadsheet)?;
        self.ensure_worksheet(&token, &spreadsheet_id, destination)?;

        let headers = self.header_row(&token, &spreadsheet_id, &destination.worksheet)?;
        let row = project_row(&headers, record);

        let url = spreadsheet_url(
            &spreadsheet_id,
            &["values", &format!("{}!A1:append", quote_sheet(&destination.worksheet))],
        )?;
        self.client
            .post(url)
            .bearer_auth(&token)
            .query(&[("valueInputOption", "USER_ENTERED"), ("insertDataOption", "INSERT_ROWS")])
            .json(&json!({ "values": [row] }))
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(transport)?;

        info!(spreadsheet = %destination.spreadsheet, columns = headers.len(), "row appended to Google Sheet");
        Ok(())
    }
}

fn transport(e: reqwest::Error) -> SinkError {
    SinkError::Transport(e.to_string())
}

fn drive_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name = '{}' and mimeType = '{}' and trashed = false", escaped, SPREADSHEET_MIME)
}

/// A1-notation sheet name, quoted so names with spaces work.
fn quote_sheet(worksheet: &str) -> String {
    format!("'{}'", worksheet.replace('\'', "''"))
}

fn spreadsheet_url(spreadsheet_id: &str, segments: &[&str]) -> Result<Url, SinkError> {
    let mut url = Url::parse(SHEETS_BASE_URL).map_err(|e| SinkError::Transport(e.to_string()))?;
    url.path_segments_mut()
        .map_err(|_| SinkError::Transport("invalid Sheets base URL".to_string()))?
        .push(spreadsheet_id)
        .extend(segments);
    Ok(url)
}

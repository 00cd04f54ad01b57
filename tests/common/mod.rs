#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use serde_json::{json, Value};

use rental_kpi_api::config::AppConfig;
use rental_kpi_api::dataset::{Cell, Dataset, RawTable, COLUMN_MAP};
use rental_kpi_api::{app, AppState};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "admin-password";

/// Router served in-process on an ephemeral port, backed by a temp dir and in-memory SQLite.
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub client: Client,
    _dir: tempfile::TempDir,
}

impl TestServer {
    pub async fn start() -> Result<Self> {
        let dir = tempfile::tempdir().context("failed to create temp dir")?;

        let mut config = AppConfig::development();
        config.storage.dataset_path = dir.path().join("bookings.xlsx");
        config.storage.settings_path = dir.path().join("config.json");
        config.storage.database_url = "sqlite::memory:".to_string();
        config.security.jwt_secret = "integration-test-secret".to_string();
        config.security.bcrypt_cost = 4;
        config.bootstrap.admin_email = Some(ADMIN_EMAIL.to_string());
        config.bootstrap.admin_password = Some(ADMIN_PASSWORD.to_string());

        let state = AppState::new(config).await?;
        state.bootstrap_admin().await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url: format!("http://{}", addr),
            state,
            client: Client::new(),
            _dir: dir,
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/login"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["access_token"]
            .as_str()
            .map(str::to_string)
            .context("login response has no access_token")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.login(ADMIN_EMAIL, ADMIN_PASSWORD).await
    }

    /// Register a plain user and return its token.
    pub async fn register(&self, email: &str, password: &str) -> Result<String> {
        let res = self
            .client
            .post(self.url("/auth/register"))
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let body: Value = res.json().await?;
        body["data"]["access_token"]
            .as_str()
            .map(str::to_string)
            .context("register response has no access_token")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.get(self.url(path)).bearer_auth(token).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .post(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .put(self.url(path))
            .bearer_auth(token)
            .json(&body)
            .send()
            .await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<(StatusCode, Value)> {
        let res = self.client.delete(self.url(path)).bearer_auth(token).send().await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// Upload workbook bytes through the multipart endpoint.
    pub async fn upload(&self, token: &str, file_name: &str, bytes: Vec<u8>) -> Result<(StatusCode, Value)> {
        let form = Form::new().part("file", Part::bytes(bytes).file_name(file_name.to_string()));
        let res = self
            .client
            .post(self.url("/api/upload"))
            .bearer_auth(token)
            .multipart(form)
            .send()
            .await?;
        let status = res.status();
        Ok((status, res.json().await?))
    }

    /// Swap a dataset built from `rows` into the running server.
    pub async fn install_rows(&self, rows: Vec<Vec<Cell>>) -> Result<()> {
        let dataset = Dataset::from_table(&RawTable::new(canonical_headers(), rows), "fixture".to_string())?;
        self.state.datasets.install(dataset).await;
        Ok(())
    }
}

/// Booking row in canonical column order: listing, channel, check-in, check-out,
/// nights, invoice, commission, cleaning.
pub fn booking(
    listing: &str,
    channel: &str,
    check_in: &str,
    check_out: &str,
    nights: f64,
    invoice: f64,
    commission: f64,
    cleaning: f64,
) -> Vec<Cell> {
    vec![
        Cell::Text(listing.to_string()),
        Cell::Text(channel.to_string()),
        Cell::Text(check_in.to_string()),
        Cell::Text(check_out.to_string()),
        Cell::Number(nights),
        Cell::Number(invoice),
        Cell::Number(commission),
        Cell::Number(cleaning),
    ]
}

/// Canonical header row, one source name per required column.
pub fn canonical_headers() -> Vec<String> {
    COLUMN_MAP.iter().map(|m| m.sources[0].to_string()).collect()
}

/// Serialize a sheet to `.xlsx` bytes. Text cells that parse as dates are written as
/// native date cells so the upload path sees real Excel dates.
pub fn workbook(headers: &[String], rows: &[Vec<Cell>]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    let date_format = Format::new().set_num_format("yyyy-mm-dd hh:mm");

    for (col, header) in headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Text(s) => match ExcelDateTime::parse_from_str(s) {
                    Ok(date) => {
                        sheet.write_datetime_with_format(r, col, &date, &date_format)?;
                    }
                    Err(_) => {
                        sheet.write_string(r, col, s)?;
                    }
                },
                Cell::Number(n) => {
                    sheet.write_number(r, col, *n)?;
                }
                _ => {}
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}

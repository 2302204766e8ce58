use super::error::{classify_failure, ApiError, ApiResult};
use super::types::*;
use super::FarmApi;
use crate::livestock::types::{Animal, LactationPeriod, NewAnimal, ReproductiveEvent};
use crate::production::{DailyProduction, DailyRevenue};
use crate::session::Session;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// reqwest client for the farm backend. One attempt per call, no retries.
pub struct FarmRest {
    client: Client,
    session: Session,
    base_url: String,
}

impl FarmRest {
    pub fn new(session: Session, base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let client = Client::builder()
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            session,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authed(&self, req: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    /// Exchange credentials for an access token and keep it in the session.
    pub async fn login(&self, username: &str, password: &str) -> anyhow::Result<()> {
        let body = LoginRequest { username, password };
        let resp: LoginResponse = self
            .send(self.client.post(self.url("/api/auth/login/")).json(&body), "/api/auth/login/")
            .await?;
        self.session.set_token(&resp.access_token)?;
        tracing::info!(username, "signed in");
        Ok(())
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let req = self.authed(self.client.get(self.url(path)));
        self.send(req, path).await
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> ApiResult<Vec<T>> {
        let list: ListResponse<T> = self.get(path).await?;
        Ok(list.into_vec())
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let req = self.authed(self.client.post(self.url(path)).json(body));
        self.send(req, path).await
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, path: &str) -> ApiResult<T> {
        let resp = req.send().await.map_err(|e| {
            tracing::warn!(path, error = %e, "request failed");
            ApiError::Transport(e)
        })?;
        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            let err = classify_failure(status, &body);
            tracing::warn!(path, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }
        // Empty 2xx bodies (201/204 without content) decode as JSON null.
        let body = if body.trim().is_empty() { "null" } else { body.as_str() };
        serde_json::from_str(body).map_err(ApiError::from)
    }
}

#[async_trait]
impl FarmApi for FarmRest {
    async fn list_farms(&self) -> ApiResult<Vec<Farm>> {
        self.get_list("/api/farms/").await
    }

    async fn list_animals(&self, farm_id: i64) -> ApiResult<Vec<Animal>> {
        self.get_list(&format!("/api/farms/{}/animals/", farm_id)).await
    }

    async fn get_animal(&self, animal_id: i64) -> ApiResult<Animal> {
        self.get(&format!("/api/animals/{}/", animal_id)).await
    }

    async fn create_animal(&self, animal: &NewAnimal) -> ApiResult<Animal> {
        let created: Animal = self.post("/api/animals/", animal).await?;
        tracing::info!(id = created.id, tag = %created.tag, "animal registered");
        Ok(created)
    }

    async fn daily_totals(&self, farm_id: i64) -> ApiResult<Vec<DailyProduction>> {
        self.get_list(&format!("/api/farms/{}/daily-totals/", farm_id)).await
    }

    async fn revenue_series(&self, farm_id: i64) -> ApiResult<Vec<DailyRevenue>> {
        self.get_list(&format!("/api/farms/{}/revenue/", farm_id)).await
    }

    async fn lactation_periods(&self, animal_id: i64) -> ApiResult<Vec<LactationPeriod>> {
        self.get_list(&format!("/api/animals/{}/lactation-periods/", animal_id)).await
    }

    async fn reproductive_events(&self, animal_id: i64) -> ApiResult<Vec<ReproductiveEvent>> {
        self.get_list(&format!("/api/animals/{}/reproductive-records/", animal_id)).await
    }

    async fn add_health_record(&self, animal_id: i64, record: &NewHealthRecord) -> ApiResult<()> {
        let _: serde_json::Value = self
            .post(&format!("/api/animals/{}/health-records/", animal_id), record)
            .await?;
        Ok(())
    }

    async fn list_feeds(&self, farm_id: i64) -> ApiResult<Vec<Feed>> {
        self.get_list(&format!("/api/farms/{}/feeds/", farm_id)).await
    }

    async fn list_tasks(&self, farm_id: i64) -> ApiResult<Vec<FarmTask>> {
        self.get_list(&format!("/api/farms/{}/tasks/", farm_id)).await
    }
}

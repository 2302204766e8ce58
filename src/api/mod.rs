pub mod error;
pub mod rest;
pub mod types;

pub use error::{ApiError, ApiResult};
pub use rest::FarmRest;

use crate::livestock::types::{Animal, LactationPeriod, NewAnimal, ReproductiveEvent};
use crate::production::{DailyProduction, DailyRevenue};
use async_trait::async_trait;
use types::{Farm, FarmTask, Feed, NewHealthRecord};

/// The farm backend's REST resources used by the dashboard.
#[async_trait]
pub trait FarmApi: Send + Sync {
    async fn list_farms(&self) -> ApiResult<Vec<Farm>>;
    async fn list_animals(&self, farm_id: i64) -> ApiResult<Vec<Animal>>;
    async fn get_animal(&self, animal_id: i64) -> ApiResult<Animal>;
    async fn create_animal(&self, animal: &NewAnimal) -> ApiResult<Animal>;
    async fn daily_totals(&self, farm_id: i64) -> ApiResult<Vec<DailyProduction>>;
    async fn revenue_series(&self, farm_id: i64) -> ApiResult<Vec<DailyRevenue>>;
    async fn lactation_periods(&self, animal_id: i64) -> ApiResult<Vec<LactationPeriod>>;
    async fn reproductive_events(&self, animal_id: i64) -> ApiResult<Vec<ReproductiveEvent>>;
    async fn add_health_record(&self, animal_id: i64, record: &NewHealthRecord) -> ApiResult<()>;
    async fn list_feeds(&self, farm_id: i64) -> ApiResult<Vec<Feed>>;
    async fn list_tasks(&self, farm_id: i64) -> ApiResult<Vec<FarmTask>>;
}

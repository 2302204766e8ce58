use crate::api::types::Farm;
use crate::api::{ApiError, ApiResult, FarmApi};
use crate::clock::Clock;
use crate::livestock::herd::{age_in_months, classify};
use crate::livestock::{Animal, Gender, GestationStatus, HerdSummary};
use crate::production::{chart_series, ChartPoint, DailyProduction, MonthFilter, MonthlyOverview};
use crate::tui::state::{AnimalRow, DashboardState};
use anyhow::{Context, Result};
use futures_util::future::try_join;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use tokio::sync::watch;

/// Animals whose history is fetched at once. Each one issues up to two requests.
pub const HISTORY_CONCURRENCY: usize = 8;

/// Everything one refresh derives for the dashboard.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub herd: HerdSummary,
    pub overview: MonthlyOverview,
    pub milk_chart: Vec<ChartPoint>,
    pub animals: Vec<AnimalRow>,
}

/// Pick the configured farm, or the first one the account can see.
pub async fn resolve_farm(api: &dyn FarmApi, configured: Option<i64>) -> Result<Farm> {
    let farms = api.list_farms().await.context("failed to list farms")?;
    let farm = match configured {
        Some(id) => farms.into_iter().find(|f| f.id == id),
        None => farms.into_iter().next(),
    };
    match (farm, configured) {
        (Some(f), _) => Ok(f),
        (None, Some(id)) => anyhow::bail!("farm {} is not visible to this account", id),
        (None, None) => anyhow::bail!("no farms available for this account"),
    }
}

/// Reproductive history is only fetched for females.
async fn gestation_for(
    api: &dyn FarmApi,
    animal: &Animal,
    today: chrono::NaiveDate,
) -> ApiResult<Option<GestationStatus>> {
    if animal.gender != Gender::Female {
        return Ok(None);
    }
    let events = api.reproductive_events(animal.id);
    let status = if animal.lactation_periods.is_empty() {
        let (periods, events) = try_join(api.lactation_periods(animal.id), events).await?;
        GestationStatus::derive(&periods, &events, today)
    } else {
        let events = events.await?;
        GestationStatus::derive(&animal.lactation_periods, &events, today)
    };
    Ok(Some(status))
}

fn animal_row(
    animal: &Animal,
    gestation: Option<&GestationStatus>,
    today: chrono::NaiveDate,
) -> AnimalRow {
    let bucket = classify(animal, today);
    AnimalRow {
        tag: animal.tag.clone(),
        name: animal.name.clone(),
        bucket: bucket.label().to_string(),
        age_months: age_in_months(animal.birth_date(), today),
        pregnant: animal.is_pregnant || gestation.is_some_and(|g| g.pregnant),
        sick: animal.is_sick(),
        status: gestation.map_or_else(|| "-".to_string(), GestationStatus::summary_label),
        dry_period: gestation
            .and_then(|g| g.dry_period)
            .map(|(start, end)| {
                format!("{} .. {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }),
    }
}

/// Fetch a farm's data and derive the dashboard snapshot.
///
/// Requests that belong together are joined; any single failure fails the load.
/// Per-animal history is fetched in order, `HISTORY_CONCURRENCY` animals at a time.
pub async fn load_snapshot(
    api: &dyn FarmApi,
    farm_id: i64,
    clock: &dyn Clock,
    enforce_year: bool,
) -> ApiResult<Snapshot> {
    let today = clock.today();

    let (animals, production) =
        try_join(api.list_animals(farm_id), api.daily_totals(farm_id)).await?;
    let revenue = api.revenue_series(farm_id).await?;

    let gestation: Vec<Option<GestationStatus>> = stream::iter(&animals)
        .map(|a| gestation_for(api, a, today))
        .buffered(HISTORY_CONCURRENCY)
        .boxed()
        .try_collect()
        .await?;

    let filter = MonthFilter::current(clock, enforce_year);
    let herd = HerdSummary::tally(&animals, today);
    let overview = MonthlyOverview::build(&production, &revenue, &filter);
    let fields: [fn(&DailyProduction) -> f64; 2] =
        [|r| r.total_milk_yield, |r| r.total_feed_consumption];
    let milk_chart = chart_series(&production, &fields);
    let rows = animals
        .iter()
        .zip(gestation.iter())
        .map(|(a, g)| animal_row(a, g.as_ref(), today))
        .collect();

    tracing::info!(
        farm_id,
        animals = herd.total,
        days = production.len(),
        milk_month = overview.milk_yield.total,
        "snapshot loaded"
    );

    Ok(Snapshot {
        herd,
        overview,
        milk_chart,
        animals: rows,
    })
}

/// Reload into the shared state. On failure the previous data stays on screen.
pub async fn refresh(
    api: &dyn FarmApi,
    farm_id: i64,
    clock: &dyn Clock,
    enforce_year: bool,
    state_tx: &watch::Sender<DashboardState>,
) -> ApiResult<()> {
    state_tx.send_modify(|s| s.loading = true);

    match load_snapshot(api, farm_id, clock, enforce_year).await {
        Ok(snapshot) => {
            let stamp = clock.now().format("%Y-%m-%d %H:%M").to_string();
            state_tx.send_modify(|s| {
                s.loading = false;
                s.herd = snapshot.herd;
                s.overview = snapshot.overview;
                s.milk_chart = snapshot.milk_chart;
                s.animals = snapshot.animals;
                s.last_error = None;
                s.last_refresh = Some(stamp);
                s.push_log("INFO", format!("refreshed: {} animals", s.herd.total));
            });
            Ok(())
        }
        Err(e) => {
            tracing::error!(farm_id, error = %e, "refresh failed");
            let message = e.user_message();
            state_tx.send_modify(|s| {
                s.loading = false;
                s.last_error = Some(message);
                s.push_log("ERROR", e.to_string());
            });
            if matches!(e, ApiError::Unauthorized) {
                tracing::warn!(farm_id, "access token rejected, sign in again");
            }
            Err(e)
        }
    }
}

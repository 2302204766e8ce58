pub mod overview;
pub mod series;

pub use overview::MonthlyOverview;
pub use series::{
    chart_series, period_totals, ChartPoint, DailyPoint, DailyProduction, DailyRevenue,
    MonthFilter, PeriodTotals,
};

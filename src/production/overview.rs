use super::series::{period_totals, DailyProduction, DailyRevenue, MonthFilter, PeriodTotals};

/// Current-month figures shown on the production view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MonthlyOverview {
    pub milk_yield: PeriodTotals,
    pub feed_consumption: PeriodTotals,
    pub milk_revenue: PeriodTotals,
    pub feed_cost: PeriodTotals,
}

impl MonthlyOverview {
    pub fn build(
        production: &[DailyProduction],
        revenue: &[DailyRevenue],
        filter: &MonthFilter,
    ) -> Self {
        Self {
            milk_yield: period_totals(production, filter, |r| r.total_milk_yield),
            feed_consumption: period_totals(production, filter, |r| r.total_feed_consumption),
            milk_revenue: period_totals(revenue, filter, |r| r.milk_revenue),
            feed_cost: period_totals(revenue, filter, |r| r.feed_cost),
        }
    }

    pub fn net_margin(&self) -> f64 {
        self.milk_revenue.total - self.feed_cost.total
    }

    /// Feed cost per unit of milk revenue, 0 when there is no revenue.
    pub fn feed_cost_ratio(&self) -> f64 {
        if self.milk_revenue.total == 0.0 {
            0.0
        } else {
            self.feed_cost.total / self.milk_revenue.total
        }
    }
}

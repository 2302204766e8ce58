use super::state::{DashboardState, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Cell, Paragraph, Row, Table, Tabs},
    Frame,
};

/// Most recent days shown in the milk chart.
const CHART_DAYS: usize = 14;

pub fn draw(f: &mut Frame, state: &DashboardState, view: View) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_header(f, state, view, chunks[0]);
    match view {
        View::Herd => draw_herd(f, state, chunks[1]),
        View::Production => draw_production(f, state, chunks[1]),
        View::Animals => draw_animals(f, state, chunks[1]),
        View::Logs => draw_logs(f, state, chunks[1]),
    }
    draw_footer(f, state, chunks[2]);
}

fn draw_header(f: &mut Frame, state: &DashboardState, view: View, area: Rect) {
    let farm = state.farm_name.as_deref().unwrap_or("(no farm)");
    let titles: Vec<String> = View::ALL
        .iter()
        .enumerate()
        .map(|(i, v)| format!("{} {}", i + 1, v.title()))
        .collect();
    let selected = View::ALL.iter().position(|v| *v == view).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} | up {} ", farm, state.uptime())),
        );
    f.render_widget(tabs, area);
}

fn draw_herd(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let herd = &state.herd;
    let totals = Line::from(vec![
        Span::raw(" Total: "),
        Span::styled(herd.total.to_string(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" | Pregnant: ", Style::default().fg(Color::DarkGray)),
        Span::styled(herd.pregnant.to_string(), Style::default().fg(Color::Magenta)),
        Span::styled(" | Sick: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            herd.sick.to_string(),
            Style::default().fg(if herd.sick > 0 { Color::Red } else { Color::Green }),
        ),
    ]);
    f.render_widget(
        Paragraph::new(totals).block(Block::default().borders(Borders::ALL).title(" Herd ")),
        chunks[0],
    );

    let occupied = herd.occupied();
    if occupied.is_empty() {
        let para = Paragraph::new(Line::from(Span::styled(
            "No animals recorded",
            Style::default().fg(Color::Yellow),
        )))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Categories "));
        f.render_widget(para, chunks[1]);
        return;
    }

    let rows: Vec<Row> = occupied
        .iter()
        .map(|(bucket, n)| {
            let pct = *n as f64 * 100.0 / herd.total.max(1) as f64;
            Row::new(vec![
                Cell::from(bucket.label().to_string()),
                Cell::from(n.to_string()),
                Cell::from(format!("{:.0}%", pct)),
            ])
        })
        .collect();
    let table = Table::new(
        rows,
        [Constraint::Min(18), Constraint::Length(7), Constraint::Length(6)],
    )
    .header(
        Row::new(vec!["Category", "Count", "Share"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(" Categories "));
    f.render_widget(table, chunks[1]);
}

fn draw_production(f: &mut Frame, state: &DashboardState, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(0)])
        .split(area);

    let o = &state.overview;
    let margin = o.net_margin();
    let margin_color = if margin >= 0.0 { Color::Green } else { Color::Red };
    let lines = vec![
        Line::from(format!(
            " Milk yield:   {:>10.1} L   (avg {:.1} L/day over {} days)",
            o.milk_yield.total, o.milk_yield.average, o.milk_yield.count
        )),
        Line::from(format!(
            " Feed used:    {:>10.1} kg  (avg {:.1} kg/day)",
            o.feed_consumption.total, o.feed_consumption.average
        )),
        Line::from(format!(" Milk revenue: {:>10.2}", o.milk_revenue.total)),
        Line::from(format!(
            " Feed cost:    {:>10.2}   ({:.0}% of revenue)",
            o.feed_cost.total,
            o.feed_cost_ratio() * 100.0
        )),
        Line::from(vec![
            Span::raw(" Net margin:   "),
            Span::styled(format!("{:>10.2}", margin), Style::default().fg(margin_color)),
        ]),
    ];
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" This Month ")),
        chunks[0],
    );

    let start = state.milk_chart.len().saturating_sub(CHART_DAYS);
    let data: Vec<(&str, u64)> = state.milk_chart[start..]
        .iter()
        .map(|p| {
            let milk = p.values.first().copied().unwrap_or(0.0).max(0.0);
            (p.label.as_str(), milk.round() as u64)
        })
        .collect();
    let chart = BarChart::default()
        .block(Block::default().borders(Borders::ALL).title(" Daily Milk Yield (L) "))
        .data(data.as_slice())
        .bar_width(6)
        .bar_gap(1)
        .bar_style(Style::default().fg(Color::Cyan))
        .value_style(Style::default().fg(Color::Black).bg(Color::Cyan));
    f.render_widget(chart, chunks[1]);
}

fn draw_animals(f: &mut Frame, state: &DashboardState, area: Rect) {
    let rows: Vec<Row> = state
        .animals
        .iter()
        .map(|a| {
            let age = a.age_months.map_or_else(|| "?".to_string(), |m| format!("{}m", m));
            let flags = match (a.pregnant, a.sick) {
                (true, true) => "P S",
                (true, false) => "P",
                (false, true) => "S",
                (false, false) => "",
            };
            let style = if a.sick {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(a.tag.clone()),
                Cell::from(a.name.clone()),
                Cell::from(a.bucket.clone()),
                Cell::from(age),
                Cell::from(flags),
                Cell::from(a.status.clone()),
                Cell::from(a.dry_period.clone().unwrap_or_default()),
            ])
            .style(style)
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(10),
            Constraint::Min(10),
            Constraint::Length(16),
            Constraint::Length(5),
            Constraint::Length(4),
            Constraint::Length(10),
            Constraint::Length(24),
        ],
    )
    .header(
        Row::new(vec!["Tag", "Name", "Category", "Age", "Flg", "Status", "Dry period"])
            .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Animals ({}) ", state.animals.len())),
    );
    f.render_widget(table, area);
}

fn draw_logs(f: &mut Frame, state: &DashboardState, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.logs.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .logs
        .iter()
        .skip(skip)
        .map(|entry| {
            let color = match entry.level.as_str() {
                "ERROR" => Color::Red,
                "WARN" => Color::Yellow,
                _ => Color::DarkGray,
            };
            Line::from(vec![
                Span::styled(format!("{} ", entry.time), Style::default().fg(Color::DarkGray)),
                Span::styled(format!("{:<5} ", entry.level), Style::default().fg(color)),
                Span::raw(entry.message.clone()),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Logs ")),
        area,
    );
}

fn draw_footer(f: &mut Frame, state: &DashboardState, area: Rect) {
    let status = if state.loading {
        Span::styled("loading...", Style::default().fg(Color::Cyan))
    } else if let Some(err) = &state.last_error {
        Span::styled(err.clone(), Style::default().fg(Color::Red))
    } else {
        match &state.last_refresh {
            Some(at) => Span::styled(
                format!("updated {}", at),
                Style::default().fg(Color::DarkGray),
            ),
            None => Span::styled("not loaded", Style::default().fg(Color::DarkGray)),
        }
    };
    let line = Line::from(vec![
        Span::styled(" q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit  "),
        Span::styled("r", Style::default().fg(Color::Yellow)),
        Span::raw(" refresh  "),
        Span::styled("Tab/1-4", Style::default().fg(Color::Yellow)),
        Span::raw(" views  | "),
        status,
    ]);
    f.render_widget(Paragraph::new(line), area);
}

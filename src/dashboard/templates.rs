use askama::Template;

use crate::database::models::EventOverview;

/// One event card on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct EventCard {
    pub name: String,
    pub taken: usize,
    pub max_positions: i64,
    pub entries: Vec<QueueItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QueueItem {
    pub position: i64,
    pub name: String,
}

impl From<&EventOverview> for EventCard {
    fn from(overview: &EventOverview) -> Self {
        Self {
            name: overview.event.name.clone(),
            taken: overview.taken,
            max_positions: overview.event.max_positions,
            entries: overview
                .queue
                .iter()
                .map(|entry| QueueItem {
                    position: entry.position,
                    name: entry.display_name().to_string(),
                })
                .collect(),
        }
    }
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub events: &'a [EventCard],
}

pub fn render_dashboard(overviews: &[EventOverview]) -> Result<String, askama::Error> {
    let events: Vec<EventCard> = overviews.iter().map(EventCard::from).collect();
    DashboardTemplate { events: &events }.render()
}

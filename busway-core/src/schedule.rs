use busway_shared::PopulatedSchedule;
use serde::{Deserialize, Serialize};

/// One scheduled trip seats are sold against. Read-only inside this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    #[serde(default)]
    pub fare: Option<f64>,
    #[serde(default)]
    pub route: Option<RouteSummary>,
    #[serde(default)]
    pub departure_time: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteSummary {
    pub source: String,
    pub destination: String,
}

impl Schedule {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fare: None,
            route: None,
            departure_time: None,
        }
    }

    pub fn with_fare(mut self, fare: f64) -> Self {
        self.fare = Some(fare);
        self
    }

    pub fn with_route(mut self, source: impl Into<String>, destination: impl Into<String>) -> Self {
        self.route = Some(RouteSummary {
            source: source.into(),
            destination: destination.into(),
        });
        self
    }
}

impl From<PopulatedSchedule> for Schedule {
    fn from(p: PopulatedSchedule) -> Self {
        let route = p.route_id.and_then(|r| match (r.source, r.destination) {
            (Some(source), Some(destination)) => Some(RouteSummary { source, destination }),
            _ => None,
        });
        Self {
            id: p.id,
            fare: p.fare,
            route,
            departure_time: p.departure_time,
        }
    }
}

//! Event domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// An event offered on the public site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    /// Seats still available for new reservations.
    pub spots: i32,
    /// Price per person in whole CZK.
    pub price: i32,
    pub photos: Vec<String>,
    /// Stored archive flag, reconciled hourly from `date`.
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    /// Returns true if the event is archived or already took place.
    pub fn is_archived_at(&self, now: DateTime<Utc>) -> bool {
        self.archived || self.date < now
    }
}

/// Event as returned by the API, with the archive flag derived from the date.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub title: String,
    pub description: String,
    pub date: DateTime<Utc>,
    pub location: String,
    pub capacity: i32,
    pub spots: i32,
    pub price: i32,
    pub photos: Vec<String>,
    pub archived: bool,
    pub sold_out: bool,
}

impl EventResponse {
    pub fn from_event(event: Event, now: DateTime<Utc>) -> Self {
        let archived = event.is_archived_at(now);
        Self {
            sold_out: event.spots <= 0,
            id: event.id,
            title: event.title,
            description: event.description,
            date: event.date,
            location: event.location,
            capacity: event.capacity,
            spots: event.spots,
            price: event.price,
            photos: event.photos,
            archived,
        }
    }
}

/// Query parameters for the public event listing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    #[serde(default)]
    pub include_archived: bool,
}

/// Request payload for creating an event.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Optional caller supplied id; a UUID is generated otherwise.
    #[validate(custom(function = "shared::validation::validate_slug"))]
    pub id: Option<String>,

    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: String,

    #[validate(length(max = 5000, message = "Description too long"))]
    #[serde(default)]
    pub description: String,

    pub date: DateTime<Utc>,

    #[validate(length(min = 1, max = 200, message = "Location must be between 1 and 200 characters"))]
    pub location: String,

    #[validate(range(min = 1, max = 10000, message = "Capacity must be between 1 and 10000"))]
    pub capacity: i32,

    /// Initial free seats; defaults to the capacity.
    pub spots: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub price: i32,

    #[serde(default)]
    pub photos: Vec<String>,
}

impl CreateEventRequest {
    /// Initial spots, clamped to `0..=capacity`.
    pub fn initial_spots(&self) -> i32 {
        self.spots.unwrap_or(self.capacity).clamp(0, self.capacity)
    }
}

/// Request payload for updating an event. Missing fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"))]
    pub title: Option<String>,

    #[validate(length(max = 5000, message = "Description too long"))]
    pub description: Option<String>,

    pub date: Option<DateTime<Utc>>,

    #[validate(length(min = 1, max = 200, message = "Location must be between 1 and 200 characters"))]
    pub location: Option<String>,

    #[validate(range(min = 1, max = 10000, message = "Capacity must be between 1 and 10000"))]
    pub capacity: Option<i32>,

    #[validate(custom(function = "shared::validation::validate_price"))]
    pub price: Option<i32>,

    pub photos: Option<Vec<String>>,

    pub archived: Option<bool>,
}

/// Spots after a capacity change: the free seat count moves by the same
/// delta as the capacity and stays within `0..=new_capacity`.
pub fn adjust_spots_for_capacity(spots: i32, old_capacity: i32, new_capacity: i32) -> i32 {
    (spots + (new_capacity - old_capacity)).clamp(0, new_capacity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(date: DateTime<Utc>) -> Event {
        Event {
            id: "deskovky-brno".to_string(),
            title: "Deskovky v Brně".to_string(),
            description: String::new(),
            date,
            location: "Brno".to_string(),
            capacity: 20,
            spots: 5,
            price: 250,
            photos: vec![],
            archived: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_archived_derived_from_date() {
        let now = Utc::now();
        assert!(!event(now + Duration::days(1)).is_archived_at(now));
        assert!(event(now - Duration::hours(1)).is_archived_at(now));
    }

    #[test]
    fn test_stored_flag_wins() {
        let now = Utc::now();
        let mut e = event(now + Duration::days(3));
        e.archived = true;
        assert!(e.is_archived_at(now));
    }

    #[test]
    fn test_response_reports_sold_out() {
        let now = Utc::now();
        let mut e = event(now + Duration::days(1));
        e.spots = 0;
        let response = EventResponse::from_event(e, now);
        assert!(response.sold_out);
        assert!(!response.archived);
    }

    #[test]
    fn test_response_serializes_camel_case() {
        let now = Utc::now();
        let response = EventResponse::from_event(event(now + Duration::days(1)), now);
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["soldOut"], false);
        assert_eq!(json["spots"], 5);
    }

    #[test]
    fn test_initial_spots_default_to_capacity() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Quiz",
            "date": "2030-05-01T18:00:00Z",
            "location": "Praha",
            "capacity": 30,
            "price": 100
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.initial_spots(), 30);
    }

    #[test]
    fn test_create_request_rejects_negative_price() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "title": "Quiz",
            "date": "2030-05-01T18:00:00Z",
            "location": "Praha",
            "capacity": 30,
            "price": -5
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rejects_bad_id() {
        let request: CreateEventRequest = serde_json::from_value(serde_json::json!({
            "id": "Not A Slug",
            "title": "Quiz",
            "date": "2030-05-01T18:00:00Z",
            "location": "Praha",
            "capacity": 30,
            "price": 0
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_adjust_spots_for_capacity() {
        // 20 capacity, 5 free: 15 seats held
        assert_eq!(adjust_spots_for_capacity(5, 20, 30), 15);
        assert_eq!(adjust_spots_for_capacity(5, 20, 18), 3);
        assert_eq!(adjust_spots_for_capacity(5, 20, 10), 0);
        assert_eq!(adjust_spots_for_capacity(20, 20, 20), 20);
    }
}

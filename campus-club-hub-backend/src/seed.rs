//! Sample clubs and events for a fresh install, so the first page load
//! shows something other than empty states. Only runs against empty
//! tables; user data is never touched.

use campus_club_hub_database::{Store, StoreError};
use chrono::{Days, NaiveDate, Utc};
use tracing::info;
use uuid::Uuid;

use crate::entities::{Club, Event};
use crate::registry::{CLUBS_TABLE, EVENTS_TABLE};

pub async fn initialize_sample_data(store: &Store) -> Result<(), StoreError> {
    let today = Utc::now().date_naive();
    store
        .mutate(move |txn| {
            if txn.find(CLUBS_TABLE, |_: &Club| true)?.is_empty() {
                info!("initializing sample clubs");
                for club in sample_clubs() {
                    txn.insert(CLUBS_TABLE, &club)?;
                }
            }
            if txn.find(EVENTS_TABLE, |_: &Event| true)?.is_empty() {
                info!("initializing sample events");
                for event in sample_events(today) {
                    txn.insert(EVENTS_TABLE, &event)?;
                }
            }
            Ok(())
        })
        .await
}

fn club(name: &str, description: &str, leader: &str, founded: &str) -> Club {
    Club {
        name: name.to_owned(),
        description: description.to_owned(),
        leader: leader.to_owned(),
        founded: founded.to_owned(),
        created_by: "system".to_owned(),
    }
}

fn sample_clubs() -> Vec<Club> {
    vec![
        club(
            "Campus Tech",
            "Coding, gadgets, and all things tech. We host hackathons and workshops.",
            "Alice System",
            "2023-01-15",
        ),
        club(
            "Drama Club",
            "Theater, improv, and stage production. Come express yourself!",
            "Bob System",
            "2023-03-10",
        ),
        club(
            "Green Earth",
            "Sustainability initiatives and community gardening.",
            "Charlie Green",
            "2023-04-22",
        ),
    ]
}

fn event(
    title: &str,
    club_name: &str,
    kind: &str,
    date: NaiveDate,
    location: &str,
    description: &str,
) -> Event {
    Event {
        id: Uuid::new_v4().to_string(),
        title: title.to_owned(),
        club_name: club_name.to_owned(),
        kind: kind.to_owned(),
        date: date.format("%Y-%m-%d").to_string(),
        location: location.to_owned(),
        description: description.to_owned(),
        created_by: "system".to_owned(),
    }
}

fn sample_events(today: NaiveDate) -> Vec<Event> {
    let in_days = |days| today.checked_add_days(Days::new(days)).unwrap_or(today);
    vec![
        event(
            "Mega Hackathon 2025",
            "Campus Tech",
            "Competition",
            in_days(14),
            "Engineering Block A",
            "A 24-hour coding marathon. Build amazing projects and win prizes! Open to all majors.",
        ),
        event(
            "Improv Comedy Night",
            "Drama Club",
            "Comedy",
            in_days(5),
            "Student Center Auditorium",
            "Join us for a night of laughs! Audience participation is encouraged but not required.",
        ),
        event(
            "Rust Workshop",
            "Campus Tech",
            "Workshop",
            in_days(2),
            "Lab 304",
            "Learn the basics of systems programming. No prior experience needed. Bring your laptop!",
        ),
        event(
            "Community Garden Cleanup",
            "Green Earth",
            "Social",
            in_days(7),
            "North Garden",
            "Help us prepare the garden for spring planting. Snacks provided!",
        ),
    ]
}

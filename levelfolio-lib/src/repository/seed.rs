//! Sample content for the in-memory backend.

use serde_json::{Value, json};
use uuid::Uuid;

use crate::repository::{entities::Table, store::MemoryStore};

/// Fill every table of `store` with sample rows.
pub fn seed(store: &MemoryStore) {
    store.insert_rows(Table::Profile, vec![profile()]);
    store.insert_rows(Table::SocialLinks, vec![social_links()]);
    store.insert_rows(Table::Skills, skills());
    store.insert_rows(Table::Education, education());
    store.insert_rows(Table::Experience, experience());
    store.insert_rows(Table::Projects, projects());
    store.insert_rows(Table::Achievements, achievements());
}

fn profile() -> Value {
    json!({
        "id": Uuid::new_v4(),
        "name": "ALEX RIVERA",
        "title": "Data Engineer",
        "level": 24,
        "hp": 870,
        "max_hp": 1000,
        "avatar": "https://example.com/avatar.png",
        "about": "A data engineer who treats every pipeline like a dungeon: map it, clear it, \
                  then automate the grind. Currently leveling up in distributed systems.",
    })
}

fn social_links() -> Value {
    json!({
        "id": Uuid::new_v4(),
        "linkedin": "https://www.linkedin.com/in/example",
        "github": "https://github.com/example",
        "email": "alex@example.com",
    })
}

fn skills() -> Vec<Value> {
    [("Python", 90), ("SQL", 85), ("Rust", 70), ("Cloud Platforms", 65)]
        .into_iter()
        .zip(1..)
        .map(|((name, level), order_index)| {
            json!({
                "id": Uuid::new_v4(),
                "name": name,
                "level": level,
                "order_index": order_index,
            })
        })
        .collect()
}

fn education() -> Vec<Value> {
    vec![
        json!({
            "id": Uuid::new_v4(),
            "degree": "BSc Computer Science",
            "institution": "Example University",
            "years": "2017 - 2021",
            "level_gain": 15,
            "order_index": 1,
        }),
        json!({
            "id": Uuid::new_v4(),
            "degree": "Cloud Data Certification",
            "institution": "Online Academy",
            "years": "2022",
            "level_gain": null,
            "order_index": 2,
        }),
    ]
}

fn experience() -> Vec<Value> {
    vec![
        json!({
            "id": Uuid::new_v4(),
            "title": "Data Engineer",
            "company": "Example Analytics",
            "period": "2023 - Present",
            "description": "Builds batch and streaming pipelines feeding the reporting stack.",
            "order_index": 1,
        }),
        json!({
            "id": Uuid::new_v4(),
            "title": "Data Analyst Intern",
            "company": "Sample Corp",
            "period": "2021 - 2022",
            "description": null,
            "order_index": 2,
        }),
    ]
}

fn projects() -> Vec<Value> {
    vec![
        json!({
            "id": Uuid::new_v4(),
            "title": "STREAMING LEDGER",
            "description": "Event sourced ledger with real-time balance projections.",
            "tech_stack": ["Rust", "Kafka", "PostgreSQL"],
            "status": "Ongoing",
            "progress": 60,
            "role": "Lead Developer",
            "order_index": 1,
        }),
        json!({
            "id": Uuid::new_v4(),
            "title": "WEATHER DASHBOARD",
            "description": "Dashboard over a decade of public weather station data.",
            "tech_stack": ["Python", "SQL"],
            "status": "Completed",
            "progress": 100,
            "role": null,
            "order_index": 2,
        }),
    ]
}

fn achievements() -> Vec<Value> {
    vec![
        json!({
            "id": Uuid::new_v4(),
            "title": "[Data Wizard]",
            "description": "Migrated a legacy warehouse without downtime.",
            "order_index": 1,
        }),
        json!({
            "id": Uuid::new_v4(),
            "title": "[Hackathon Victor]",
            "description": "First place at a regional open data hackathon.",
            "order_index": 2,
        }),
    ]
}

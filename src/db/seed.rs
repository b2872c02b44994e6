use sea_orm::DatabaseConnection;
use tracing::info;

use super::dao::{DaoBase, DaoContext, DaoResult, TicketFields};
use super::entities::TicketStatus;

const SAMPLE_USERS: [(&str, &str); 3] = [
    ("Alice Admin", "alice@example.com"),
    ("Bob Builder", "bob@example.com"),
    ("Carol Support", "carol@example.com"),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub users_inserted: usize,
    pub tickets_inserted: usize,
}

/// Fills empty tables with sample data. Each table is checked on its own, so
/// running this against a populated database is a no-op.
pub async fn ensure_seed_data(db: &DatabaseConnection) -> DaoResult<SeedReport> {
    let daos = DaoContext::new(db);
    let users = daos.user();
    let tickets = daos.ticket();
    let mut report = SeedReport::default();

    if users.count().await? == 0 {
        for (name, email) in SAMPLE_USERS {
            users.create_user(name, email).await?;
            report.users_inserted += 1;
        }
    }

    if tickets.count().await? == 0 {
        let existing = users.list_by_id().await?;
        let mut assignees = existing.iter().map(|user| user.id);
        let samples = [
            TicketFields {
                title: "Cannot connect to VPN".to_string(),
                description: Some("User reports VPN client failing to connect.".to_string()),
                status: TicketStatus::Open,
                assigned_user_id: assignees.next(),
            },
            TicketFields {
                title: "Email not syncing".to_string(),
                description: Some("Mobile device not syncing emails.".to_string()),
                status: TicketStatus::InProgress,
                assigned_user_id: assignees.next(),
            },
        ];
        for fields in samples {
            tickets.create_ticket(fields).await?;
            report.tickets_inserted += 1;
        }
    }

    info!(
        users = report.users_inserted,
        tickets = report.tickets_inserted,
        "sample data ensured"
    );
    Ok(report)
}

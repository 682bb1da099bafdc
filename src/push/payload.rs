use crate::types::matches::MatchId;
use crate::types::push::NotificationPayload;

/// Where a notification click should land.
pub(crate) const NOTIFICATION_URL: &str = "/";

/// Match state as reported by the admin flow when it asks for a notification.
#[derive(Debug, Clone, Default)]
pub struct MatchUpdate {
    pub title: Option<String>,
    pub body: Option<String>,
    pub home_team: Option<String>,
    pub away_team: Option<String>,
    pub home_score: Option<u32>,
    pub away_score: Option<u32>,
    pub status: Option<String>,
}

pub fn build_payload(match_id: MatchId, update: &MatchUpdate) -> NotificationPayload {
    let home = present(update.home_team.as_deref()).unwrap_or("Home");
    let away = present(update.away_team.as_deref()).unwrap_or("Away");

    let title = match present(update.title.as_deref()) {
        Some(title) => title.to_string(),
        None => format!("{home} vs {away}"),
    };
    let body = match present(update.body.as_deref()) {
        Some(body) => body.to_string(),
        None => default_body(home, away, update),
    };

    NotificationPayload {
        title,
        body,
        url: NOTIFICATION_URL.to_string(),
        match_id,
    }
}

fn default_body(home: &str, away: &str, update: &MatchUpdate) -> String {
    let status = present(update.status.as_deref());
    match ((update.home_score, update.away_score), status) {
        ((Some(home_score), Some(away_score)), Some(status)) => {
            format!("{home} {home_score} - {away_score} {away} • {status}")
        }
        ((Some(home_score), Some(away_score)), None) => {
            format!("{home} {home_score} - {away_score} {away}")
        }
        (_, Some(status)) => format!("{home} vs {away} • {status}"),
        (_, None) => format!("{home} vs {away}"),
    }
}

fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

use serde::Serialize;

use crate::types::matches::MatchSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleHint {
    Positive,
    Neutral,
    Alert,
    Warning,
    Negative,
    Info,
    Muted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringSide {
    Home,
    Away,
    Both,
}

/// What changed between two snapshots of the same match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BadgeKind {
    Goal { side: ScoringSide },
    Reset,
    Status { status: String },
}

impl BadgeKind {
    pub fn label(&self) -> String {
        match self {
            BadgeKind::Goal { .. } => "GOAL".to_string(),
            BadgeKind::Reset => "RESET".to_string(),
            BadgeKind::Status { status } => status_badge(status).0,
        }
    }

    pub fn style(&self) -> StyleHint {
        match self {
            BadgeKind::Goal { .. } => StyleHint::Positive,
            BadgeKind::Reset => StyleHint::Neutral,
            BadgeKind::Status { status } => status_badge(status).1,
        }
    }
}

/// Compares the previous snapshot of a match with the next one.
///
/// Score changes win over status changes: a reset that also flips the status
/// back to "in programma" is reported as [`BadgeKind::Reset`]. Without a prior
/// snapshot nothing can be compared and no badge is raised.
pub fn detect(prior: Option<&MatchSnapshot>, next: &MatchSnapshot) -> Option<BadgeKind> {
    let prior = prior?;

    let home_changed = prior.home_score != next.home_score;
    let away_changed = prior.away_score != next.away_score;
    if home_changed || away_changed {
        if next.is_nil_nil() {
            return Some(BadgeKind::Reset);
        }
        let side = match (home_changed, away_changed) {
            (true, false) => ScoringSide::Home,
            (false, true) => ScoringSide::Away,
            _ => ScoringSide::Both,
        };
        return Some(BadgeKind::Goal { side });
    }

    if prior.status != next.status {
        return Some(BadgeKind::Status {
            status: next.status.clone(),
        });
    }

    None
}

/// Human readable label and style for a raw match status.
pub fn status_badge(status: &str) -> (String, StyleHint) {
    let trimmed = status.trim();
    let (label, style) = match trimmed.to_lowercase().as_str() {
        "in programma" | "scheduled" => ("SCHEDULED", StyleHint::Info),
        "live" => ("LIVE", StyleHint::Alert),
        "live 1°t" => ("KICK-OFF", StyleHint::Alert),
        "live 2°t" => ("SECOND HALF", StyleHint::Alert),
        "halftime" => ("HALF-TIME", StyleHint::Warning),
        "final" => ("FULL-TIME", StyleHint::Negative),
        "sospesa" => ("SUSPENDED", StyleHint::Warning),
        "rinviata" => ("POSTPONED", StyleHint::Muted),
        _ => return (trimmed.to_string(), StyleHint::Muted),
    };
    (label.to_string(), style)
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;

    #[test]
    fn detect__should_ignore_first_observation() {
        // Given
        let next = MatchSnapshot::new("42", 3, 1, "live");

        // Then
        assert_eq!(detect(None, &next), None);
    }

    #[test]
    fn detect__should_ignore_identical_snapshots() {
        // Given
        let prior = MatchSnapshot::new("42", 1, 1, "halftime");

        // Then
        assert_eq!(detect(Some(&prior), &prior.clone()), None);
    }

    #[test]
    fn detect__should_raise_goal_for_home_score_change() {
        // Given
        let prior = MatchSnapshot::new("42", 1, 0, "live");
        let next = MatchSnapshot::new("42", 2, 0, "live");

        // When
        let badge = detect(Some(&prior), &next).expect("badge");

        // Then
        assert_eq!(
            badge,
            BadgeKind::Goal {
                side: ScoringSide::Home
            }
        );
        assert_eq!(badge.label(), "GOAL");
        assert_eq!(badge.style(), StyleHint::Positive);
    }

    #[test]
    fn detect__should_report_away_and_both_sides() {
        // Given
        let prior = MatchSnapshot::new("9", 1, 1, "live 2°t");

        // When
        let away = detect(Some(&prior), &MatchSnapshot::new("9", 1, 2, "live 2°t"));
        let both = detect(Some(&prior), &MatchSnapshot::new("9", 2, 2, "live 2°t"));

        // Then
        assert_eq!(
            away,
            Some(BadgeKind::Goal {
                side: ScoringSide::Away
            })
        );
        assert_eq!(
            both,
            Some(BadgeKind::Goal {
                side: ScoringSide::Both
            })
        );
    }

    #[test]
    fn detect__should_treat_score_correction_as_goal() {
        // Given
        let prior = MatchSnapshot::new("42", 2, 1, "live");
        let next = MatchSnapshot::new("42", 1, 1, "live");

        // Then
        assert_eq!(
            detect(Some(&prior), &next),
            Some(BadgeKind::Goal {
                side: ScoringSide::Home
            })
        );
    }

    #[test]
    fn detect__should_raise_reset_when_scores_return_to_nil_nil() {
        // Given
        let prior = MatchSnapshot::new("42", 2, 1, "live");
        let next = MatchSnapshot::new("42", 0, 0, "in programma");

        // When
        let badge = detect(Some(&prior), &next).expect("badge");

        // Then
        assert_eq!(badge, BadgeKind::Reset);
        assert_eq!(badge.label(), "RESET");
        assert_eq!(badge.style(), StyleHint::Neutral);
    }

    #[test]
    fn detect__should_label_status_changes() {
        // Given
        let prior = MatchSnapshot::new("42", 1, 1, "live 1°t");
        let next = MatchSnapshot::new("42", 1, 1, "halftime");

        // When
        let badge = detect(Some(&prior), &next).expect("badge");

        // Then
        assert_eq!(badge.label(), "HALF-TIME");
        assert_eq!(badge.style(), StyleHint::Warning);
    }

    #[test]
    fn detect__should_fall_back_to_raw_status() {
        // Given
        let prior = MatchSnapshot::new("42", 0, 0, "in programma");
        let next = MatchSnapshot::new("42", 0, 0, "abbandonata");

        // When
        let badge = detect(Some(&prior), &next).expect("badge");

        // Then
        assert_eq!(badge.label(), "abbandonata");
        assert_eq!(badge.style(), StyleHint::Muted);
    }

    #[test]
    fn status_badge__should_map_known_statuses_case_insensitively() {
        assert_eq!(status_badge("FINAL").0, "FULL-TIME");
        assert_eq!(status_badge(" Rinviata ").0, "POSTPONED");
        assert_eq!(status_badge("Live 2°T").0, "SECOND HALF");
        assert_eq!(status_badge("scheduled").1, StyleHint::Info);
    }
}

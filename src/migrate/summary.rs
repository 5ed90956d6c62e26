use tabled::Table;

use crate::{
    logger::{Level, SessionLog},
    migrate::{PlaylistOutcome, PlaylistStatus},
    types::SummaryTableRow,
};

/// One rendered line of the final report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryLine {
    pub level: Level,
    pub text: String,
}

/// Aggregated result of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    /// Non-zero counts, in [`PlaylistStatus::ALL`] order.
    pub counts: Vec<(PlaylistStatus, usize)>,
    /// One line per playlist, in processing order.
    pub lines: Vec<SummaryLine>,
}

/// Aggregates per-playlist outcomes into the final report.
///
/// # Arguments
///
/// * `outcomes` - Outcomes in processing order, one per playlist
///
/// # Returns
///
/// A [`Summary`] with a count per status that occurred and one detail line
/// per outcome. An empty input yields an empty summary.
///
/// # Example
///
/// ```
/// let summary = summarize(&[
///     PlaylistOutcome::complete("Focus", 12),
///     PlaylistOutcome::partial("Road Trip", 7),
/// ]);
/// assert_eq!(summary.count(PlaylistStatus::Complete), 1);
/// summary.report(&log);
/// ```
pub fn summarize(outcomes: &[PlaylistOutcome]) -> Summary {
    let counts = PlaylistStatus::ALL
        .iter()
        .map(|status| {
            let n = outcomes.iter().filter(|o| o.status == *status).count();
            (*status, n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();

    Summary {
        counts,
        lines: outcomes.iter().map(detail_line).collect(),
    }
}

/// Renders the report line for one outcome and picks the level it is
/// logged at.
///
/// `complete` is a success, `partial` and `empty_json` are warnings and
/// everything else is an error. A `crashed` outcome shows its reason when
/// one was recorded.
///
/// # Example
///
/// ```
/// let line = detail_line(&PlaylistOutcome::complete("Focus", 12));
/// assert_eq!(line.text, "✓ Focus - 12 songs added");
/// assert_eq!(line.level, Level::Success);
/// ```
pub fn detail_line(outcome: &PlaylistOutcome) -> SummaryLine {
    let name = &outcome.name;
    let added = outcome.added_count.unwrap_or(0);

    let (level, text) = match outcome.status {
        PlaylistStatus::Complete => (Level::Success, format!("✓ {} - {} songs added", name, added)),
        PlaylistStatus::Partial => (
            Level::Warn,
            format!("! {} - partial upload ({} songs)", name, added),
        ),
        PlaylistStatus::NoMatches => (Level::Error, format!("- {} - no matches found", name)),
        PlaylistStatus::MissingJson => (Level::Error, format!("✘ {} - playlist file missing", name)),
        PlaylistStatus::EmptyJson => (Level::Warn, format!("- {} - playlist file empty", name)),
        PlaylistStatus::YtmusicError => (Level::Error, format!("✘ {} - upload error", name)),
        PlaylistStatus::Crashed => match &outcome.reason {
            Some(reason) => (Level::Error, format!("✘ {} - crashed ({})", name, reason)),
            None => (Level::Error, format!("✘ {} - crashed", name)),
        },
        PlaylistStatus::Unknown => (Level::Error, format!("? {} - unknown error", name)),
    };

    SummaryLine { level, text }
}

impl Summary {
    /// Number of playlists processed.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|(_, n)| n).sum()
    }

    /// Playlists that ended with `status`; zero when none did.
    pub fn count(&self, status: PlaylistStatus) -> usize {
        self.counts
            .iter()
            .find(|(s, _)| *s == status)
            .map_or(0, |(_, n)| *n)
    }

    pub fn table(&self) -> Table {
        Table::new(self.counts.iter().map(|(status, n)| SummaryTableRow {
            status: status.to_string(),
            playlists: *n,
        }))
    }

    /// Prints the counts table and logs every detail line at its level.
    pub fn report(&self, log: &SessionLog) {
        if self.counts.is_empty() {
            log.info("No playlists were processed");
            return;
        }

        println!("{}", self.table());
        for line in &self.lines {
            log.log(line.level, &line.text);
        }
    }
}

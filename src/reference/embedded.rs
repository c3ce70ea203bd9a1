pub const TEAMS_FILE: &str = "teams.json";
pub const MANAGERS_FILE: &str = "managers.json";
pub const TRIAGE_FILE: &str = "triage.json";
pub const BACKLOG_FILE: &str = "backlog.json";
pub const PORTFOLIOS_FILE: &str = "portfolios.json";
pub const RELEASES_FILE: &str = "releases.json";

const TEAMS_TABLE: &str = include_str!("../../reference/teams.json");
const MANAGERS_TABLE: &str = include_str!("../../reference/managers.json");
const TRIAGE_TABLE: &str = include_str!("../../reference/triage.json");
const BACKLOG_TABLE: &str = include_str!("../../reference/backlog.json");
const PORTFOLIOS_TABLE: &str = include_str!("../../reference/portfolios.json");
const RELEASES_TABLE: &str = include_str!("../../reference/releases.json");

/// All embedded tables in load order.
const ALL_TABLES: &[(&str, &str)] = &[
    (TEAMS_FILE, TEAMS_TABLE),
    (MANAGERS_FILE, MANAGERS_TABLE),
    (TRIAGE_FILE, TRIAGE_TABLE),
    (BACKLOG_FILE, BACKLOG_TABLE),
    (PORTFOLIOS_FILE, PORTFOLIOS_TABLE),
    (RELEASES_FILE, RELEASES_TABLE),
];

/// Look up an embedded table by file name.
pub fn get_embedded(file: &str) -> Option<&'static str> {
    ALL_TABLES
        .iter()
        .find(|(name, _)| *name == file)
        .map(|(_, json)| *json)
}

/// File names of every embedded table.
pub fn table_names() -> Vec<&'static str> {
    ALL_TABLES.iter().map(|(name, _)| *name).collect()
}

//! PostgREST filter-string construction.
//!
//! Filters are query parameters of the form `column=eq.value`; disjunctions
//! use the `or=(...)` parameter. Factored out of the store so the read
//! contract is testable without a network.

/// `column=eq.{value}` — exact equality, no prefix or substring matching.
pub(crate) fn eq(column: &str, value: &str) -> (String, String) {
  (column.to_owned(), format!("eq.{value}"))
}

/// `or=(home_team_id.eq.{id},away_team_id.eq.{id})` — the team appears on
/// either side of the fixture. PostgREST returns each matching row once,
/// so a team drawn against itself still yields a single row.
pub(crate) fn either_side(team_id: &str) -> (String, String) {
  (
    "or".to_owned(),
    format!("(home_team_id.eq.{team_id},away_team_id.eq.{team_id})"),
  )
}

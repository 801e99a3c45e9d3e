use super::types::StepDefinition;

/// The stock Ekstraklasa collection pipeline, in execution order.
pub fn reference_pipeline() -> Vec<StepDefinition> {
    vec![
        step("01_collect_matches.R", "Match results from FBref", &["match_results.json"], true),
        step("02_collect_standings.R", "League table from FBref", &["standings.json"], true),
        step("03_collect_xg.R", "xG statistics from FBref", &["xg.json"], false),
        step("04_collect_players.R", "Player market values from Transfermarkt", &["players.json"], true),
        step("05_collect_transfers.R", "Transfers from Transfermarkt", &["transfers.json"], false),
        step("06_collect_injuries.R", "Injuries from Transfermarkt", &["injuries.json"], false),
        step("07_collect_form.R", "Team form (last 5)", &["form.json"], false),
        step("08_collect_contracts.R", "Player contracts", &["contracts.json"], false),
        step("09_collect_nationalities.R", "Nationality statistics", &["nationalities.json"], false),
        step("10_collect_suspensions.R", "Player suspensions", &["suspensions.json"], false),
        step("11_collect_young_talents.R", "Young talents (age 21 and under)", &["young_talents.json"], false),
        step(
            "12_collect_league_value_trend.R",
            "League value trend",
            &["league_value_trend.json", "ekstraklasa_clubs_cache.json"],
            false,
        ),
    ]
}

fn step(name: &str, description: &str, outputs: &[&str], critical: bool) -> StepDefinition {
    StepDefinition::new(name, description)
        .with_outputs(outputs.iter().copied())
        .critical(critical)
}

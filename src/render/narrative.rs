// Text-mode narratives for the LLM tools.

use crate::backend::PlayerReport;

pub const TEXT_WEAPONS: usize = 2;
pub const TEXT_VEHICLES: usize = 2;
pub const TEXT_SOLDIERS: usize = 1;

/// Describe a player report in prose, prefixed by the evaluation prompt.
pub fn player_narrative(prompt: &str, report: &PlayerReport) -> String {
    let mut text = format!("{prompt}, in {} {}", report.game, report.stats.to_llm_text());
    for weapon in report.weapons.iter().take(TEXT_WEAPONS) {
        text.push_str(" The player ");
        text.push_str(&weapon.to_llm_text());
        text.push('.');
    }
    for vehicle in report.vehicles.iter().take(TEXT_VEHICLES) {
        text.push_str(" The player ");
        text.push_str(&vehicle.to_llm_text());
        text.push('.');
    }
    for soldier in report.soldiers.iter().take(TEXT_SOLDIERS) {
        text.push_str(" The player ");
        text.push_str(&soldier.to_llm_text());
    }
    text
}

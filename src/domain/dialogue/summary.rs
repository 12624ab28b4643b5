//! Summary of the recorded answers, sent when the automated flow ends.

use super::prompts::SUMMARY_HEADER;
use crate::domain::conversation::{Selections, Step};
use crate::domain::validation::{company_type_options, main_menu_options, MenuOption, RegionCode};

fn label(step: Step) -> &'static str {
    match step {
        Step::MainMenu => "Opção escolhida",
        Step::CompanyType => "CRM",
        Step::State => "Estado",
        Step::City => "Município",
    }
}

fn menu_answer(options: &[MenuOption], key: &str) -> String {
    options
        .iter()
        .find(|o| o.key == key)
        .map(MenuOption::display_line)
        .unwrap_or_else(|| key.to_string())
}

fn render_answer(step: Step, answer: &str) -> String {
    match step {
        Step::MainMenu => menu_answer(main_menu_options(), answer),
        Step::CompanyType => menu_answer(company_type_options(), answer),
        Step::State => match RegionCode::parse(answer) {
            Some(region) => format!("{} - {}", region.code(), region.name()),
            None => answer.to_string(),
        },
        Step::City => answer.to_string(),
    }
}

/// One line per answered step, in flow order. Steps never reached are left out.
pub fn render_summary(selections: &Selections) -> String {
    let mut out = String::from(SUMMARY_HEADER);
    for (step, answer) in selections.iter() {
        out.push_str(&format!("\n- {}: {}", label(step), render_answer(step, answer)));
    }
    out
}

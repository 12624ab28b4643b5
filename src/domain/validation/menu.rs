//! Numbered menu catalogs and the menu-choice validator.

/// One numbered entry of a chat menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MenuOption {
    pub key: &'static str,
    pub label: &'static str,
}

impl MenuOption {
    /// Renders the option the way it is shown in chat: `"1- Label"`.
    pub fn display_line(&self) -> String {
        format!("{}- {}", self.key, self.label)
    }
}

const MAIN_MENU: [MenuOption; 4] = [
    MenuOption { key: "1", label: "Já tenho uma empresa médica constituída" },
    MenuOption { key: "2", label: "Quero abrir uma empresa" },
    MenuOption { key: "3", label: "Gostaria de tirar dúvidas" },
    MenuOption { key: "4", label: "Outros" },
];

const COMPANY_TYPE_MENU: [MenuOption; 2] = [
    MenuOption { key: "1", label: "Já tenho CRM" },
    MenuOption { key: "2", label: "Ainda não possuo CRM" },
];

/// The first menu every conversation sees.
pub fn main_menu_options() -> &'static [MenuOption] {
    &MAIN_MENU
}

/// The CRM sub-menu offered to users opening a new company.
pub fn company_type_options() -> &'static [MenuOption] {
    &COMPANY_TYPE_MENU
}

/// Keys of a menu, in display order.
pub fn menu_keys(options: &[MenuOption]) -> Vec<&'static str> {
    options.iter().map(|o| o.key).collect()
}

/// Trims `raw` and checks it exactly equals one of `allowed_keys`.
pub fn validate_menu_choice(raw: &str, allowed_keys: &[&str]) -> bool {
    let choice = raw.trim();
    allowed_keys.iter().any(|key| *key == choice)
}

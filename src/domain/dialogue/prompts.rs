//! Texts the bot sends, in Brazilian Portuguese.

use crate::domain::validation::{company_type_options, main_menu_options, MenuOption};

pub const COMPANY_TYPE_PROMPT: &str = "Digite a opção adequada:";
pub const STATE_PROMPT: &str = "Por favor, informe o estado (UF) onde você pretende atuar:";
pub const CITY_PROMPT: &str = "Por favor, informe o município onde você pretende atuar:";
pub const THANK_YOU: &str = "Obrigado pelas informações! Um de nossos consultores entrará em contato com você em breve para dar continuidade ao seu atendimento.";
pub const HANDOFF: &str =
    "Você será atendido por um de nossos consultores em breve. Agradecemos pela paciência.";

pub const INVALID_MAIN_MENU: &str =
    "Opção inválida. Por favor, escolha uma das opções disponíveis (1-4):";
pub const INVALID_COMPANY_TYPE: &str =
    "Opção inválida. Por favor, escolha uma das opções disponíveis (1-2):";
pub const INVALID_STATE: &str =
    "Estado não reconhecido. Por favor, informe a sigla (ex: SP) ou o nome do estado onde você pretende atuar:";
pub const INVALID_CITY: &str =
    "Município inválido. Por favor, informe o município onde você pretende atuar usando apenas letras:";

pub const SUMMARY_HEADER: &str = "Resumo das suas respostas:";

/// Greeting for the local hour: morning 05-11, afternoon 12-17, night otherwise.
pub fn greeting_for_hour(hour: u32) -> &'static str {
    match hour {
        5..=11 => "Bom dia",
        12..=17 => "Boa tarde",
        _ => "Boa noite",
    }
}

pub fn welcome_text(greeting: &str) -> String {
    format!(
        "{greeting}. A conta med é uma plataforma de contabilidade digital para empresas médicas.\n\
         Logo você será redirecionado para um de nossos consultores, mas antes, digite a opção que melhor te atende:"
    )
}

fn lines(options: &[MenuOption]) -> Vec<String> {
    options.iter().map(MenuOption::display_line).collect()
}

pub fn main_menu_lines() -> Vec<String> {
    lines(main_menu_options())
}

pub fn company_type_lines() -> Vec<String> {
    lines(company_type_options())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting_for_hour(4), "Boa noite");
        assert_eq!(greeting_for_hour(5), "Bom dia");
        assert_eq!(greeting_for_hour(11), "Bom dia");
        assert_eq!(greeting_for_hour(12), "Boa tarde");
        assert_eq!(greeting_for_hour(17), "Boa tarde");
        assert_eq!(greeting_for_hour(18), "Boa noite");
        assert_eq!(greeting_for_hour(0), "Boa noite");
    }

    #[test]
    fn welcome_starts_with_greeting() {
        let text = welcome_text("Boa tarde");
        assert!(text.starts_with("Boa tarde. A conta med"));
        assert!(text.contains('\n'));
    }

    #[test]
    fn menu_lines_are_numbered_in_order() {
        assert_eq!(
            main_menu_lines(),
            vec![
                "1- Já tenho uma empresa médica constituída",
                "2- Quero abrir uma empresa",
                "3- Gostaria de tirar dúvidas",
                "4- Outros",
            ]
        );
        assert_eq!(company_type_lines(), vec!["1- Já tenho CRM", "2- Ainda não possuo CRM"]);
    }
}

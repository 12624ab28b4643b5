//! Input validation for each dialogue step.
//!
//! Every validator here is pure and total: malformed input yields `false`
//! (or `None`), never a panic or an error.

mod free_text;
mod menu;
mod phone;
mod region;

pub use free_text::{validate_city_name, validate_free_text, CITY_MAX_LEN, CITY_MIN_LEN};
pub use menu::{
    company_type_options, main_menu_options, menu_keys, validate_menu_choice, MenuOption,
};
pub use phone::{digits_only, validate_identity};
pub use region::{
    brazilian_states, normalize_region_code, validate_region_code, RegionCode,
};

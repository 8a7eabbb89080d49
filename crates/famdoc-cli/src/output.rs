//! Terminal output formatting.

use chrono::NaiveDate;
use colored::{ColoredString, Colorize};
use famdoc_core::data_field::model::{CollectionType, DataField};
use famdoc_core::family::model::Family;
use famdoc_core::survey::model::Survey;
use famdoc_core::user::model::{Role, User};
use unicode_width::UnicodeWidthStr;

/// Print families as they appear in the family picker.
pub fn print_family_options(families: &[Family], today: NaiveDate) {
    if families.is_empty() {
        println!("{}", "No families found.".dimmed());
        return;
    }
    for family in families {
        println!("  {}", family.option_label(today));
    }
}

/// Print data fields as a table.
pub fn print_fields_table(fields: &[DataField], verbose: bool) {
    if fields.is_empty() {
        println!("{}", "No data fields found.".dimmed());
        return;
    }

    println!(
        "{} {} {}",
        pad_right("ID", 10),
        pad_right("Name", 32),
        "Type"
    );
    println!("{}", "─".repeat(52));

    for field in fields {
        println!(
            "{} {} {}",
            pad_right(short_id(&field.id), 10),
            pad_right(&truncate_visual(&field.name, 30), 32),
            type_colored(field.collection_type)
        );
        if verbose {
            for option in &field.select_options {
                let marker = if option.is_open { "✎" } else { "·" };
                println!("{}   {} {}", " ".repeat(10), marker.dimmed(), option.value);
            }
        }
    }

    println!();
    println!("{} field(s) total", fields.len());
}

/// Print surveys as a table.
pub fn print_surveys_table(surveys: &[Survey]) {
    if surveys.is_empty() {
        println!("{}", "No surveys found.".dimmed());
        return;
    }

    println!("{:<36} {} {:>6}", "ID", pad_right("Name", 30), "Fields");
    println!("{}", "─".repeat(75));
    for survey in surveys {
        println!(
            "{:<36} {} {:>6}",
            survey.id,
            pad_right(&truncate_visual(&survey.name, 28), 30),
            survey.data_field_ids.len()
        );
    }
}

/// Print users as a table.
pub fn print_users_table(users: &[User]) {
    if users.is_empty() {
        println!("{}", "No users found.".dimmed());
        return;
    }

    println!("{} {} {} {}", pad_right("ID", 10), pad_right("Email", 32), pad_right("Role", 14), "Organization");
    println!("{}", "─".repeat(75));
    for user in users {
        let org = user
            .organization
            .as_ref()
            .map(|o| o.name.as_str())
            .unwrap_or("-");
        println!(
            "{} {} {} {}",
            pad_right(short_id(&user.id), 10),
            pad_right(&truncate_visual(&user.email, 30), 32),
            pad_right_colored(role_colored(user.role), user.role.as_str(), 14),
            org
        );
    }
}

fn role_colored(role: Role) -> ColoredString {
    match role {
        Role::Admin => role.as_str().red().bold(),
        Role::OrgController => role.as_str().yellow(),
        Role::User => role.as_str().normal(),
    }
}

fn type_colored(collection_type: CollectionType) -> ColoredString {
    match collection_type {
        CollectionType::Select => collection_type.as_str().cyan(),
        CollectionType::Bool => collection_type.as_str().green(),
        CollectionType::Date => collection_type.as_str().magenta(),
        _ => collection_type.as_str().normal(),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

/// Pad a colored string using the width of its plain text.
fn pad_right_colored(colored: ColoredString, plain: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(plain);
    if visual >= width {
        colored.to_string()
    } else {
        format!("{}{}", colored, " ".repeat(width - visual))
    }
}

/// Truncate a string respecting visual width.
fn truncate_visual(s: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(s) <= max_width {
        return s.to_string();
    }
    if max_width <= 3 {
        return ".".repeat(max_width);
    }
    let mut result = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = unicode_width::UnicodeWidthChar::width(ch).unwrap_or(0);
        if current_width + ch_width > max_width - 2 {
            break;
        }
        result.push(ch);
        current_width += ch_width;
    }
    result.push_str("..");
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_visual() {
        assert_eq!(truncate_visual("Bezugsperson", 20), "Bezugsperson");
        assert_eq!(truncate_visual("Familiennummer", 8), "Famili..");
    }

    #[test]
    fn test_pad_right_counts_umlauts_once() {
        assert_eq!(pad_right("Käse", 6), "Käse  ");
    }
}

use std::iter::repeat_n;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub drink_type_name: String,
    pub size_name: String,
    pub size_abbreviation: String,
    pub milk_option_name: Option<String>,
    pub sugar: u32,
    pub notes: Option<String>,
}

/// One row of the pick-up list.
///
/// `notes` is the text of the first line seen for the group, not the normalized form used for
/// grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsolidatedItem {
    pub count: usize,
    pub drink_type_name: String,
    pub size_name: String,
    pub size_abbreviation: String,
    pub milk_option_name: Option<String>,
    pub sugar: u32,
    pub notes: Option<String>,
    pub display_text: String,
}

impl ConsolidatedItem {
    pub fn new(count: usize, line: &OrderLine) -> Self {
        Self {
            count,
            drink_type_name: line.drink_type_name.clone(),
            size_name: line.size_name.clone(),
            size_abbreviation: line.size_abbreviation.clone(),
            milk_option_name: line.milk_option_name.clone(),
            sugar: line.sugar,
            notes: line.notes.clone(),
            display_text: format_line(count, line),
        }
    }

    pub fn line(&self) -> OrderLine {
        OrderLine {
            drink_type_name: self.drink_type_name.clone(),
            size_name: self.size_name.clone(),
            size_abbreviation: self.size_abbreviation.clone(),
            milk_option_name: self.milk_option_name.clone(),
            sugar: self.sugar,
            notes: self.notes.clone(),
        }
    }

    /// Back to `count` identical lines.
    pub fn expand(&self) -> impl Iterator<Item = OrderLine> + '_ {
        repeat_n(self.line(), self.count)
    }
}

/// Renders `"<count>x <size> [milk] <drink>[, <n> sugar(s)][ (<notes>)]"`.
///
/// Empty milk or notes text is treated the same as absent.
pub fn format_line(count: usize, line: &OrderLine) -> String {
    let mut text = format!("{count}x {}", line.size_abbreviation);

    if let Some(milk) = line.milk_option_name.as_deref().filter(|m| !m.is_empty()) {
        text.push(' ');
        text.push_str(milk);
    }

    text.push(' ');
    text.push_str(&line.drink_type_name);

    if line.sugar > 0 {
        let plural = if line.sugar > 1 { "s" } else { "" };
        text.push_str(&format!(", {} sugar{plural}", line.sugar));
    }

    if let Some(notes) = line.notes.as_deref().filter(|n| !n.is_empty()) {
        text.push_str(&format!(" ({notes})"));
    }

    text
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn line(milk: Option<&str>, drink: &str, sugar: u32, notes: Option<&str>) -> OrderLine {
        OrderLine {
            drink_type_name: drink.to_string(),
            size_name: "Regular".to_string(),
            size_abbreviation: "Reg".to_string(),
            milk_option_name: milk.map(str::to_string),
            sugar,
            notes: notes.map(str::to_string),
        }
    }

    #[rstest]
    #[case(3, Some("Oat"), "Latte", 2, None, "3x Reg Oat Latte, 2 sugars")]
    #[case(1, None, "Espresso", 0, Some("extra hot"), "1x Reg Espresso (extra hot)")]
    #[case(1, Some("Soy"), "Mocha", 1, None, "1x Reg Soy Mocha, 1 sugar")]
    #[case(2, None, "Long Black", 0, None, "2x Reg Long Black")]
    #[case(4, Some("Skim"), "Flat White", 3, Some("half strength"), "4x Reg Skim Flat White, 3 sugars (half strength)")]
    fn test_format_line(
        #[case] count: usize,
        #[case] milk: Option<&str>,
        #[case] drink: &str,
        #[case] sugar: u32,
        #[case] notes: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(format_line(count, &line(milk, drink, sugar, notes)), expected);
    }

    #[test]
    fn test_empty_text_is_skipped() {
        assert_eq!(format_line(1, &line(Some(""), "Latte", 0, Some(""))), "1x Reg Latte");
    }

    #[test]
    fn test_notes_are_not_trimmed_for_display() {
        assert_eq!(
            format_line(1, &line(None, "Latte", 0, Some(" hot "))),
            "1x Reg Latte ( hot )"
        );
    }

    #[test]
    fn test_expand() {
        let item = ConsolidatedItem::new(3, &line(Some("Oat"), "Latte", 2, None));
        let lines: Vec<OrderLine> = item.expand().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| *l == item.line()));
    }
}

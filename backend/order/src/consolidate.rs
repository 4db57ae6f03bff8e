use indexmap::IndexMap;

use crate::line::{ConsolidatedItem, OrderLine};

/// Which drinks count as the same.
///
/// Absent notes and blank notes land in the same group.
#[derive(Debug, PartialEq, Eq, Hash)]
struct GroupKey<'a> {
    drink_type_name: &'a str,
    size_name: &'a str,
    size_abbreviation: &'a str,
    milk_option_name: Option<&'a str>,
    sugar: u32,
    notes: String,
}

impl<'a> From<&'a OrderLine> for GroupKey<'a> {
    fn from(line: &'a OrderLine) -> Self {
        Self {
            drink_type_name: &line.drink_type_name,
            size_name: &line.size_name,
            size_abbreviation: &line.size_abbreviation,
            milk_option_name: line.milk_option_name.as_deref(),
            sugar: line.sugar,
            notes: normalize_notes(line.notes.as_deref()),
        }
    }
}

fn normalize_notes(notes: Option<&str>) -> String {
    notes.unwrap_or_default().trim().to_lowercase()
}

struct Group<'a> {
    first: &'a OrderLine,
    count: usize,
}

pub fn consolidate(lines: &[OrderLine]) -> Vec<ConsolidatedItem> {
    let mut groups: IndexMap<GroupKey<'_>, Group<'_>> = IndexMap::new();

    for line in lines {
        groups
            .entry(GroupKey::from(line))
            .or_insert(Group {
                first: line,
                count: 0,
            })
            .count += 1;
    }

    let mut items: Vec<ConsolidatedItem> = groups
        .into_values()
        .map(|group| ConsolidatedItem::new(group.count, group.first))
        .collect();

    items.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.display_text.cmp(&b.display_text))
    });

    items
}

/// The pick-up list as plain text, one drink per line.
pub fn summary_text(items: &[ConsolidatedItem]) -> String {
    items
        .iter()
        .map(|item| item.display_text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn line(
        drink: &str,
        size: (&str, &str),
        milk: Option<&str>,
        sugar: u32,
        notes: Option<&str>,
    ) -> OrderLine {
        OrderLine {
            drink_type_name: drink.to_string(),
            size_name: size.0.to_string(),
            size_abbreviation: size.1.to_string(),
            milk_option_name: milk.map(str::to_string),
            sugar,
            notes: notes.map(str::to_string),
        }
    }

    const REGULAR: (&str, &str) = ("Regular", "Reg");
    const SMALL: (&str, &str) = ("Small", "Sm");
    const LARGE: (&str, &str) = ("Large", "Lrg");

    #[test]
    fn test_empty() {
        assert!(consolidate(&[]).is_empty());
        assert_eq!(summary_text(&[]), "");
    }

    #[test]
    fn test_identical_lines_merge() {
        let lines = vec![line("Latte", REGULAR, Some("Oat"), 2, None); 3];
        let items = consolidate(&lines);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].count, 3);
        assert_eq!(items[0].display_text, "3x Reg Oat Latte, 2 sugars");
    }

    #[test]
    fn test_notes_match_ignoring_case_and_first_wins() {
        let lines = vec![
            line("Espresso", SMALL, None, 0, Some("extra hot")),
            line("Espresso", SMALL, None, 0, Some("Extra Hot")),
        ];
        let items = consolidate(&lines);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].count, 2);
        assert_eq!(items[0].notes.as_deref(), Some("extra hot"));
        assert_eq!(items[0].display_text, "2x Sm Espresso (extra hot)");
    }

    #[test]
    fn test_notes_match_ignoring_surrounding_whitespace() {
        let lines = vec![
            line("Latte", REGULAR, None, 0, Some("  Decaf ")),
            line("Latte", REGULAR, None, 0, Some("decaf")),
        ];
        let items = consolidate(&lines);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].notes.as_deref(), Some("  Decaf "));
    }

    #[test]
    fn test_absent_and_blank_notes_group_together() {
        let lines = vec![
            line("Latte", REGULAR, None, 0, None),
            line("Latte", REGULAR, None, 0, Some("   ")),
        ];
        let items = consolidate(&lines);

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].notes, None);
        assert_eq!(items[0].display_text, "2x Reg Latte");
    }

    #[test]
    fn test_ties_sort_alphabetically() {
        let lines = vec![
            line("Mocha", LARGE, Some("Soy"), 0, None),
            line("Latte", LARGE, Some("Soy"), 0, None),
        ];
        let items = consolidate(&lines);

        let texts: Vec<&str> = items.iter().map(|i| i.display_text.as_str()).collect();
        assert_eq!(texts, ["1x Lrg Soy Latte", "1x Lrg Soy Mocha"]);
    }

    #[test]
    fn test_count_beats_alphabet() {
        let lines = vec![
            line("Cappuccino", REGULAR, None, 0, None),
            line("Mocha", REGULAR, None, 0, None),
            line("Mocha", REGULAR, None, 0, None),
        ];
        let items = consolidate(&lines);

        assert_eq!(
            summary_text(&items),
            "2x Reg Mocha\n1x Reg Cappuccino"
        );
    }

    #[test]
    fn test_milk_absent_differs_from_milk_present() {
        let lines = vec![
            line("Latte", REGULAR, None, 0, None),
            line("Latte", REGULAR, Some("Oat"), 0, None),
        ];

        assert_eq!(consolidate(&lines).len(), 2);
    }

    #[test]
    fn test_size_name_is_part_of_the_key() {
        let lines = vec![
            line("Latte", ("Regular", "R"), None, 0, None),
            line("Latte", ("Medium", "R"), None, 0, None),
        ];
        let items = consolidate(&lines);

        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.display_text == "1x R Latte"));
    }

    #[test]
    fn test_input_untouched() {
        let lines = vec![
            line("Latte", REGULAR, None, 0, Some("A")),
            line("Latte", REGULAR, None, 0, Some("a")),
        ];
        let before = lines.clone();
        consolidate(&lines);

        assert_eq!(lines, before);
    }

    fn arb_line() -> impl Strategy<Value = OrderLine> {
        (
            prop::sample::select(vec!["Latte", "Mocha", "Flat White"]),
            prop::sample::select(vec![SMALL, REGULAR, LARGE]),
            prop::option::of(prop::sample::select(vec!["Oat", "Soy", ""])),
            0u32..3,
            prop::option::of(prop::sample::select(vec![
                "hot", "HOT", " hot", "decaf", "", " ",
            ])),
        )
            .prop_map(|(drink, size, milk, sugar, notes)| line(drink, size, milk, sugar, notes))
    }

    fn key_of(line: &OrderLine) -> GroupKey<'_> {
        GroupKey::from(line)
    }

    proptest! {
        #[test]
        fn prop_counts_are_conserved(lines in prop::collection::vec(arb_line(), 0..40)) {
            let items = consolidate(&lines);
            prop_assert_eq!(items.iter().map(|i| i.count).sum::<usize>(), lines.len());
            prop_assert!(items.iter().all(|i| i.count >= 1));
        }

        #[test]
        fn prop_groups_partition_lines(lines in prop::collection::vec(arb_line(), 0..40)) {
            let items = consolidate(&lines);
            let item_lines: Vec<OrderLine> = items.iter().map(ConsolidatedItem::line).collect();

            for item_line in &item_lines {
                let members = lines.iter().filter(|l| key_of(l) == key_of(item_line)).count();
                let item = &items[item_lines.iter().position(|l| l == item_line).unwrap()];
                prop_assert_eq!(members, item.count);
            }

            for (i, a) in item_lines.iter().enumerate() {
                for b in &item_lines[i + 1..] {
                    prop_assert_ne!(key_of(a), key_of(b));
                }
            }
        }

        #[test]
        fn prop_sorted_and_deterministic(lines in prop::collection::vec(arb_line(), 0..40)) {
            let items = consolidate(&lines);

            for pair in items.windows(2) {
                prop_assert!(
                    pair[0].count > pair[1].count
                        || (pair[0].count == pair[1].count && pair[0].display_text <= pair[1].display_text)
                );
            }
            prop_assert_eq!(consolidate(&lines), items);
        }

        #[test]
        fn prop_reexpansion_is_stable(lines in prop::collection::vec(arb_line(), 0..40)) {
            for item in consolidate(&lines) {
                let expanded: Vec<OrderLine> = item.expand().collect();
                prop_assert_eq!(consolidate(&expanded), vec![item]);
            }
        }
    }
}

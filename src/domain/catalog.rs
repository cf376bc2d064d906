//! Item choices for search and currency listings across traders.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::entities::{ClassName, Trader};
use crate::infra::names::prettify_class_name;

/// One selectable item: display `name` for class `value`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemChoice {
    pub name: String,
    pub value: ClassName,
}

/// Choices for every known class name.
///
/// Classes missing from the name table come first with prettified names,
/// then table entries sorted by class name. Names shared by more than one
/// choice get the class name appended.
pub fn item_choices(
    resolved: &HashMap<ClassName, String>,
    not_in_item_list: &[ClassName],
) -> Vec<ItemChoice> {
    let sorted: BTreeMap<&ClassName, &String> = resolved.iter().collect();

    let choices: Vec<ItemChoice> = not_in_item_list
        .iter()
        .map(|class_name| ItemChoice {
            name: prettify_class_name(class_name),
            value: class_name.clone(),
        })
        .chain(sorted.into_iter().map(|(class_name, name)| ItemChoice {
            name: name.clone(),
            value: class_name.clone(),
        }))
        .collect();

    let mut name_counts: HashMap<&str, usize> = HashMap::new();
    for choice in &choices {
        *name_counts.entry(choice.name.as_str()).or_default() += 1;
    }
    let duplicated: Vec<String> = name_counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(name, _)| name.to_string())
        .collect();

    choices
        .into_iter()
        .map(|choice| {
            if duplicated.contains(&choice.name) {
                ItemChoice {
                    name: format!("{} ({})", choice.name, choice.value),
                    value: choice.value,
                }
            } else {
                choice
            }
        })
        .collect()
}

/// Choices whose name contains `query`, ignoring case.
pub fn search_choices<'a>(choices: &'a [ItemChoice], query: &str) -> Vec<&'a ItemChoice> {
    let query = query.to_lowercase();
    choices
        .iter()
        .filter(|choice| choice.name.to_lowercase().contains(&query))
        .collect()
}

/// Unique lowest currencies, first seen first.
pub fn lowest_currencies(traders: &[Trader]) -> Vec<ClassName> {
    unique(traders.iter().filter_map(|trader| trader.lowest_currency.as_ref()))
}

/// Unique currencies accepted by any trader, first seen first.
pub fn all_currencies(traders: &[Trader]) -> Vec<ClassName> {
    unique(traders.iter().flat_map(|trader| trader.currencies.iter()))
}

fn unique<'a>(names: impl Iterator<Item = &'a ClassName>) -> Vec<ClassName> {
    let mut seen: Vec<ClassName> = Vec::new();
    for name in names {
        if !seen.contains(name) {
            seen.push(name.clone());
        }
    }
    seen
}

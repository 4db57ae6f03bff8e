use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc};
use uuid::Uuid;

use crate::{
    models::Order,
    payloads::{ColleagueStat, DrinkStat, StatsOverview},
};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

/// Start of the last `days` days. `None` when it falls outside what chrono can represent.
fn cutoff(days: i64, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    now.checked_sub_signed(Duration::try_days(days)?)
}

/// Orders placed in the last `days` days, or all of them.
///
/// A window reaching past the earliest representable time covers every order.
pub fn within(orders: &[Order], days: Option<i64>, now: DateTime<Utc>) -> Vec<&Order> {
    let since = days.and_then(|days| cutoff(days, now));

    orders
        .iter()
        .filter(|order| since.is_none_or(|since| order.created_at >= since))
        .collect()
}

/// `busiest_day` and the week/month counts look at every order, regardless of `days`.
pub fn overview(orders: &[Order], days: Option<i64>, now: DateTime<Utc>) -> StatsOverview {
    let filtered = within(orders, days, now);

    let mut per_weekday = [0usize; 7];
    for order in orders {
        per_weekday[order.created_at.weekday().num_days_from_sunday() as usize] += 1;
    }

    // earliest weekday wins a tie
    let busiest_day = per_weekday
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .max_by(|(a_day, a), (b_day, b)| a.cmp(b).then_with(|| b_day.cmp(a_day)))
        .map(|(day, _)| DAY_NAMES[day].to_string());

    StatsOverview {
        total_orders: filtered.len(),
        total_coffees: filtered.iter().map(|order| order.items.len()).sum(),
        busiest_day,
        orders_this_week: within(orders, Some(7), now).len(),
        orders_this_month: within(orders, Some(30), now).len(),
    }
}

/// Most ordered drinks first, then by name.
fn ranked(counts: HashMap<&str, usize>) -> Vec<(String, usize)> {
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(name, count)| (name.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    ranked
}

pub fn drinks(orders: &[&Order], limit: usize) -> Vec<DrinkStat> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for item in orders.iter().flat_map(|order| &order.items) {
        *counts.entry(&item.drink_type_name).or_default() += 1;
    }

    ranked(counts)
        .into_iter()
        .take(limit)
        .map(|(drink_name, count)| DrinkStat { drink_name, count })
        .collect()
}

/// Grouped by colleague name. Items for colleagues that no longer exist are skipped.
pub fn colleagues(orders: &[&Order], names: &HashMap<Uuid, String>) -> Vec<ColleagueStat> {
    let mut drinks_by_name: HashMap<&str, HashMap<&str, usize>> = HashMap::new();

    for item in orders.iter().flat_map(|order| &order.items) {
        let Some(name) = names.get(&item.colleague_id) else {
            continue;
        };

        *drinks_by_name
            .entry(name)
            .or_default()
            .entry(&item.drink_type_name)
            .or_default() += 1;
    }

    let mut stats: Vec<ColleagueStat> = drinks_by_name
        .into_iter()
        .map(|(name, drinks)| {
            let order_count = drinks.values().sum();
            let favourite_drink = ranked(drinks).into_iter().next().map(|(drink, _)| drink);

            ColleagueStat {
                colleague_name: name.to_string(),
                order_count,
                favourite_drink,
            }
        })
        .collect();

    stats.sort_by(|a, b| {
        b.order_count
            .cmp(&a.order_count)
            .then_with(|| a.colleague_name.cmp(&b.colleague_name))
    });

    stats
}

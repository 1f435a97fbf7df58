//! Placement and consumption rules for ledger entries.
//!
//! Entries are kept oldest first. New credits land after every entry with an
//! equal or earlier timestamp, debits for one payer eat that payer's newest
//! entries, and spends walk the whole sequence from the front.

use super::{PayerId, Points, Timestamp, Transaction};

pub fn insert_position(entries: &[Transaction], timestamp: &Timestamp) -> usize {
    entries.partition_point(|entry| entry.timestamp <= *timestamp)
}

/// Absorbs `amount` from the entries of `payer`, newest entry first.
///
/// Returns the rebuilt sequence and whatever part of `amount` the payer's
/// entries could not cover (zero when the payer held enough).
pub fn merge_negative(
    entries: Vec<Transaction>,
    payer: &str,
    amount: Points,
) -> (Vec<Transaction>, Points) {
    let mut remaining = amount;
    let mut kept: Vec<Transaction> = entries
        .into_iter()
        .rev()
        .filter_map(|mut entry| {
            if remaining == 0 || entry.payer != payer {
                return Some(entry);
            }
            if entry.points <= remaining {
                remaining -= entry.points;
                None
            } else {
                entry.points -= remaining;
                remaining = 0;
                Some(entry)
            }
        })
        .collect();
    kept.reverse();
    (kept, remaining)
}

/// Draws `amount` from the front of `entries`.
///
/// Fully drawn entries are removed; the entry where the walk stops keeps what
/// is left of it. The result holds one total per payer, in the order payers
/// were first reached. The caller must make sure `entries` holds at least
/// `amount` points.
pub fn consume_oldest(entries: &mut Vec<Transaction>, amount: Points) -> Vec<(PayerId, Points)> {
    let mut remaining = amount;
    let mut drawn: Vec<(PayerId, Points)> = Vec::new();
    let mut exhausted = 0;

    for entry in entries.iter_mut() {
        if remaining == 0 {
            break;
        }
        let take = entry.points.min(remaining);
        entry.points -= take;
        remaining -= take;
        if entry.points == 0 {
            exhausted += 1;
        }
        match drawn.iter_mut().find(|(payer, _)| *payer == entry.payer) {
            Some((_, total)) => *total += take,
            None => drawn.push((entry.payer.clone(), take)),
        }
    }

    // only the last entry reached can survive, so the exhausted ones are a prefix
    entries.drain(..exhausted);
    drawn
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn at(day: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2020, 11, day, 0, 0, 0).unwrap()
    }

    fn entry(payer: &str, points: Points, day: u32) -> Transaction {
        Transaction {
            payer: payer.into(),
            points,
            timestamp: at(day),
        }
    }

    fn shape(entries: &[Transaction]) -> Vec<(&str, Points)> {
        entries
            .iter()
            .map(|e| (e.payer.as_str(), e.points))
            .collect()
    }

    #[test]
    fn insert_position_keeps_arrival_order_for_equal_timestamps() {
        let entries = vec![entry("a", 1, 1), entry("b", 1, 2), entry("c", 1, 2), entry("d", 1, 5)];
        assert_eq!(insert_position(&entries, &at(2)), 3);
        assert_eq!(insert_position(&entries, &at(1)), 1);
        assert_eq!(insert_position(&entries, &at(3)), 3);
        assert_eq!(insert_position(&[], &at(3)), 0);
        assert_eq!(insert_position(&entries, &at(9)), 4);
    }

    #[test]
    fn merge_negative_takes_newest_entries_of_the_payer_first() {
        let entries = vec![
            entry("dannon", 300, 1),
            entry("unilever", 200, 2),
            entry("dannon", 200, 3),
            entry("dannon", 100, 4),
        ];
        let (kept, left) = merge_negative(entries, "dannon", 250);
        assert_eq!(left, 0);
        assert_eq!(
            shape(&kept),
            vec![("dannon", 300), ("unilever", 200), ("dannon", 50)]
        );
    }

    #[test]
    fn merge_negative_removes_entries_driven_to_exactly_zero() {
        let entries = vec![entry("a", 300, 1), entry("a", 200, 2)];
        let (kept, left) = merge_negative(entries, "a", 200);
        assert_eq!(left, 0);
        assert_eq!(shape(&kept), vec![("a", 300)]);
    }

    #[test]
    fn merge_negative_reports_what_it_could_not_absorb() {
        let entries = vec![entry("a", 10, 1), entry("b", 50, 2)];
        let (kept, left) = merge_negative(entries, "a", 25);
        assert_eq!(left, 15);
        assert_eq!(shape(&kept), vec![("b", 50)]);
    }

    #[test]
    fn consume_oldest_walks_across_payers_in_time_order() {
        let mut entries = vec![entry("a", 300, 1), entry("b", 200, 2), entry("a", 100, 3)];
        let drawn = consume_oldest(&mut entries, 350);
        assert_eq!(drawn, vec![("a".to_string(), 300), ("b".to_string(), 50)]);
        assert_eq!(shape(&entries), vec![("b", 150), ("a", 100)]);
    }

    #[test]
    fn consume_oldest_aggregates_repeat_payers() {
        let mut entries = vec![entry("a", 100, 1), entry("b", 100, 2), entry("a", 100, 3)];
        let drawn = consume_oldest(&mut entries, 250);
        assert_eq!(drawn, vec![("a".to_string(), 150), ("b".to_string(), 100)]);
        assert_eq!(shape(&entries), vec![("a", 50)]);
    }

    #[test]
    fn consume_oldest_with_exact_amount_empties_the_sequence() {
        let mut entries = vec![entry("a", 100, 1), entry("b", 100, 2)];
        let drawn = consume_oldest(&mut entries, 200);
        assert_eq!(drawn.iter().map(|(_, p)| p).sum::<Points>(), 200);
        assert!(entries.is_empty());
    }

    #[test]
    fn consume_oldest_of_nothing_touches_nothing() {
        let mut entries = vec![entry("a", 100, 1)];
        assert!(consume_oldest(&mut entries, 0).is_empty());
        assert_eq!(shape(&entries), vec![("a", 100)]);
    }
}

//! Consecutive-reservation grouping.
//!
//! A member's bookings of one vehicle on adjacent days with the same
//! region, visit place, business type and period form one logical booking
//! that is canceled or returned as a unit.

use std::collections::BTreeMap;

use crate::dispatch::dates::days_between;
use crate::model::reservation::{Reservation, ReservationStatus};

/// Largest date difference still treated as the same booking.
///
/// Only next-day (or same-day) records join; weekends get no special
/// treatment, so Friday and Monday bookings stay separate.
pub const MAX_DAY_GAP: i64 = 1;

/// Adjacency + context predicate between the last member of a group and the
/// next candidate.
pub fn is_continuation(prev: &Reservation, curr: &Reservation) -> bool {
    days_between(prev.date, curr.date).abs() <= MAX_DAY_GAP
        && prev.region_key() == curr.region_key()
        && prev.visit_place_key() == curr.visit_place_key()
        && prev.business_type_key() == curr.business_type_key()
        && prev.period == curr.period
}

/// Splits an already sorted run into groups, comparing each record with the
/// last record of the open group.
fn split_runs(sorted: Vec<Reservation>) -> Vec<Vec<Reservation>> {
    let mut groups: Vec<Vec<Reservation>> = Vec::new();
    let mut current: Vec<Reservation> = Vec::new();

    for reservation in sorted {
        let joins = current
            .last()
            .map_or(true, |last| is_continuation(last, &reservation));
        if !joins {
            groups.push(std::mem::take(&mut current));
        }
        current.push(reservation);
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

fn sort_by_date(reservations: &mut [Reservation]) {
    reservations.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
}

/// The group the anchor belongs to, ascending by date.
///
/// Never empty: when the anchor is not part of any group (for example it is
/// no longer RESERVED in `all`) the anchor alone is returned.
pub fn group_consecutive(all: &[Reservation], anchor: &Reservation) -> Vec<Reservation> {
    let mut candidates: Vec<Reservation> = all
        .iter()
        .filter(|r| {
            r.vehicle_id == anchor.vehicle_id
                && r.member_id == anchor.member_id
                && r.status == ReservationStatus::Reserved
        })
        .cloned()
        .collect();
    sort_by_date(&mut candidates);

    split_runs(candidates)
        .into_iter()
        .find(|group| group.iter().any(|r| r.id == anchor.id))
        .unwrap_or_else(|| vec![anchor.clone()])
}

/// Every RESERVED record partitioned into groups, per (vehicle, member).
///
/// Groups come out ordered by vehicle, member and then date.
pub fn group_all(all: &[Reservation]) -> Vec<Vec<Reservation>> {
    let mut by_owner: BTreeMap<(&str, &str), Vec<Reservation>> = BTreeMap::new();
    for reservation in all.iter().filter(|r| r.status == ReservationStatus::Reserved) {
        by_owner
            .entry((reservation.vehicle_id.as_str(), reservation.member_id.as_str()))
            .or_default()
            .push(reservation.clone());
    }

    by_owner
        .into_values()
        .flat_map(|mut owned| {
            sort_by_date(&mut owned);
            split_runs(owned)
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::reservation::Period;
    use chrono::NaiveDate;
    use uuid::Uuid;

    pub(crate) fn reservation(day: u32) -> Reservation {
        Reservation {
            id: Uuid::new_v4(),
            vehicle_id: "12가3456".to_string(),
            member_id: "kim".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            period: Period::AllDay,
            region: Some("Seoul".to_string()),
            visit_place: Some("Plant A".to_string()),
            business_type: Some("SALES".to_string()),
            status: ReservationStatus::Reserved,
            start_mileage: None,
            end_mileage: None,
            return_date: None,
        }
    }

    fn ids(group: &[Reservation]) -> Vec<Uuid> {
        group.iter().map(|r| r.id).collect()
    }

    #[test]
    fn adjacent_days_group_whichever_is_anchor() {
        let a = reservation(4);
        let b = reservation(5);
        let all = vec![b.clone(), a.clone()];

        assert_eq!(ids(&group_consecutive(&all, &a)), vec![a.id, b.id]);
        assert_eq!(ids(&group_consecutive(&all, &b)), vec![a.id, b.id]);
    }

    #[test]
    fn context_change_splits_group() {
        let a = reservation(4);
        let mut b = reservation(5);
        b.visit_place = Some("Plant B".to_string());
        let all = vec![a.clone(), b.clone()];

        assert_eq!(ids(&group_consecutive(&all, &a)), vec![a.id]);
        assert_eq!(ids(&group_consecutive(&all, &b)), vec![b.id]);

        let mut c = reservation(5);
        c.period = Period::Morning;
        let all = vec![a.clone(), c.clone()];
        assert_eq!(ids(&group_consecutive(&all, &a)), vec![a.id]);
    }

    #[test]
    fn missing_and_empty_context_compare_equal() {
        let mut a = reservation(4);
        let mut b = reservation(5);
        a.region = None;
        b.region = Some(String::new());
        let all = vec![a.clone(), b.clone()];

        assert_eq!(ids(&group_consecutive(&all, &a)), vec![a.id, b.id]);
    }

    #[test]
    fn two_day_gap_splits_group() {
        let a = reservation(4);
        let b = reservation(6);
        let all = vec![a.clone(), b.clone()];

        assert_eq!(ids(&group_consecutive(&all, &a)), vec![a.id]);
        assert_eq!(ids(&group_consecutive(&all, &b)), vec![b.id]);
    }

    #[test]
    fn same_day_records_join() {
        let a = reservation(4);
        let b = reservation(4);
        let c = reservation(5);
        let all = vec![c.clone(), b.clone(), a.clone()];

        let group = group_consecutive(&all, &c);
        assert_eq!(group.len(), 3);
        assert_eq!(group.last().unwrap().id, c.id);
    }

    #[test]
    fn other_members_vehicles_and_statuses_are_ignored() {
        let anchor = reservation(4);
        let mut other_member = reservation(5);
        other_member.member_id = "lee".to_string();
        let mut other_vehicle = reservation(5);
        other_vehicle.vehicle_id = "34나5678".to_string();
        let mut canceled = reservation(5);
        canceled.status = ReservationStatus::Canceled;
        let all = vec![anchor.clone(), other_member, other_vehicle, canceled];

        assert_eq!(ids(&group_consecutive(&all, &anchor)), vec![anchor.id]);
    }

    #[test]
    fn anchor_missing_from_set_falls_back_to_itself() {
        let anchor = reservation(4);
        let all = vec![reservation(5), reservation(6)];

        let group = group_consecutive(&all, &anchor);
        assert_eq!(ids(&group), vec![anchor.id]);

        assert_eq!(ids(&group_consecutive(&[], &anchor)), vec![anchor.id]);
    }

    #[test]
    fn consecutive_run_with_separate_tail() {
        let day1 = reservation(1);
        let day2 = reservation(2);
        let day3 = reservation(3);
        let day5 = reservation(5);
        let all = vec![day5.clone(), day3.clone(), day1.clone(), day2.clone()];

        let group = group_consecutive(&all, &day2);
        assert_eq!(ids(&group), vec![day1.id, day2.id, day3.id]);
        assert!(group.windows(2).all(|w| w[0].date <= w[1].date));

        assert_eq!(ids(&group_consecutive(&all, &day5)), vec![day5.id]);
    }

    #[test]
    fn grouping_is_stable_across_calls() {
        let all: Vec<Reservation> = (1..=6).map(reservation).collect();
        let first = group_consecutive(&all, &all[2]);
        let second = group_consecutive(&all, &all[2]);
        assert_eq!(first, second);
    }

    #[test]
    fn group_all_partitions_every_reserved_record() {
        let day1 = reservation(1);
        let day2 = reservation(2);
        let day5 = reservation(5);
        let mut other = reservation(2);
        other.member_id = "lee".to_string();
        let mut returned = reservation(3);
        returned.status = ReservationStatus::Returned;
        let all = vec![day5.clone(), other.clone(), day2.clone(), returned, day1.clone()];

        let groups = group_all(&all);
        let grouped: Vec<Vec<Uuid>> = groups.iter().map(|g| ids(g)).collect();
        assert_eq!(grouped, vec![vec![day1.id, day2.id], vec![day5.id], vec![other.id]]);
    }
}

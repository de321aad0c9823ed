use super::common::*;
use crate::penalty::domain::{EmployeeId, Jabatan, MasaKerja};
use crate::penalty::roster::{Roster, RosterError};

#[test]
fn starts_with_one_blank_row() {
    let roster = Roster::new();
    assert_eq!(roster.len(), 1);
    assert!(roster.rows()[0].is_blank());
    assert_eq!(roster.named().count(), 0);
}

#[test]
fn first_employee_fills_the_blank_row() {
    let mut roster = Roster::new();
    let blank_id = roster.rows()[0].id;

    let id = roster.add_employee(employee("rina", Jabatan::HealthAdvisor, SENIOR));
    assert_eq!(id, blank_id);
    assert_eq!(roster.len(), 1);

    let second = roster.add_employee(employee("andi", Jabatan::Apoteker, JUNIOR));
    assert_ne!(second, id);
    assert_eq!(roster.len(), 2);
}

#[test]
fn update_keeps_the_row_identifier() {
    let mut roster = Roster::new();
    let id = roster.rows()[0].id;

    let row = roster
        .update(id, |row| {
            row.nama = "rina".to_string();
            row.id = EmployeeId(999);
            row.masa_kerja = Some(MasaKerja::LessThanThreeMonths);
        })
        .expect("row exists");
    assert_eq!(row.id, id);
    assert_eq!(row.nama, "rina");

    assert_eq!(
        roster.update(EmployeeId(42), |_| {}).unwrap_err(),
        RosterError::UnknownEmployee(EmployeeId(42))
    );
}

#[test]
fn the_last_row_cannot_be_removed() {
    let mut roster = Roster::new();
    let first = roster.rows()[0].id;
    let second = roster.add_blank();

    roster.remove(first).expect("two rows present");
    assert_eq!(roster.remove(second), Err(RosterError::LastRow));
    assert_eq!(roster.len(), 1);
}

#[test]
fn ids_are_not_reused_after_reset() {
    let mut roster = Roster::new();
    let first = roster.add_blank();
    roster.reset();

    assert_eq!(roster.len(), 1);
    assert!(roster.rows()[0].id > first);
    assert!(roster.rows()[0].is_blank());
}

#[test]
fn from_records_issues_fresh_ids() {
    let roster = Roster::from_records([
        employee("rina", Jabatan::HealthAdvisor, SENIOR),
        employee("andi", Jabatan::Apoteker, JUNIOR),
    ]);
    let ids: Vec<_> = roster.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![EmployeeId(1), EmployeeId(2)]);
    assert_eq!(roster.named().count(), 2);

    assert_eq!(Roster::from_records(Vec::new()).len(), 1);
}

#[test]
fn deserialized_roster_keeps_a_row() {
    let roster: Roster =
        serde_json::from_str(r#"{"rows":[],"next_id":1}"#).expect("roster deserializes");

    assert_eq!(roster.len(), 1);
    assert!(roster.rows()[0].is_blank());
    assert_eq!(roster.rows()[0].id, EmployeeId(1));
}

#[test]
fn deserialized_ids_stay_unique_and_ahead_of_the_counter() {
    let mut kept: Roster = serde_json::from_str(
        r#"{"rows":[{"id":4,"nama":"rina"},{"id":7,"nama":"andi"}],"next_id":2}"#,
    )
    .expect("roster deserializes");
    let ids: Vec<_> = kept.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![EmployeeId(4), EmployeeId(7)]);
    assert_eq!(kept.add_blank(), EmployeeId(8));

    let mut clashing: Roster = serde_json::from_str(
        r#"{"rows":[{"id":3,"nama":"rina"},{"id":3,"nama":"andi"},{"nama":"budi"}],"next_id":1}"#,
    )
    .expect("roster deserializes");
    let ids: Vec<_> = clashing.rows().iter().map(|row| row.id).collect();
    assert_eq!(ids, vec![EmployeeId(1), EmployeeId(2), EmployeeId(3)]);
    assert_eq!(clashing.rows()[1].nama, "andi");
    assert_eq!(clashing.add_blank(), EmployeeId(4));
}

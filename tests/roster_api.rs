#![forbid(unsafe_code)]
use chrono::{NaiveDate, NaiveTime};
use corex_roster::api::wire;
use corex_roster::{
    ApiError, EmployeeRef, JsonRosterApi, RosterApi, ShiftDraft, ShiftId, ShiftUpdate, Storage,
};
use tempfile::tempdir;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn seeded_api(dir: &std::path::Path) -> JsonRosterApi {
    let api = JsonRosterApi::open(dir.join("roster.json")).with_today(d(2025, 1, 6));
    api.register_employee(EmployeeRef::new("u-alice", "Alice")).unwrap();
    api.register_employee(EmployeeRef::new("u-bob", "Bob")).unwrap();
    api
}

#[test]
fn create_then_query_by_date_upcoming_and_month() {
    let dir = tempdir().unwrap();
    let api = seeded_api(dir.path());

    let created = api
        .create_shift(&ShiftDraft::new("u-alice", d(2025, 1, 6), t(9, 0), t(17, 0)))
        .unwrap();
    assert_eq!(created.message, "Shift added successfully");
    assert_eq!(created.data.employee.username, "Alice");
    api.create_shift(&ShiftDraft::new("u-alice", d(2025, 1, 10), t(12, 0), t(20, 0)))
        .unwrap();
    api.create_shift(&ShiftDraft::new("u-alice", d(2025, 2, 20), t(9, 0), t(13, 0)))
        .unwrap();
    api.create_shift(&ShiftDraft::new("u-bob", d(2025, 1, 6), t(6, 0), t(14, 0)))
        .unwrap();

    let on_monday = api.shifts_by_date(d(2025, 1, 6)).unwrap();
    assert_eq!(on_monday.len(), 2);

    let upcoming = api.upcoming_shifts("u-alice", 30).unwrap();
    assert_eq!(upcoming.message, "Upcoming shifts retrieved successfully");
    assert_eq!(upcoming.total_shifts, 2);
    assert_eq!(upcoming.upcoming_days, 2);
    assert!(upcoming.shifts_by_date.has_shifts(d(2025, 1, 10)));
    upcoming.validate().unwrap();

    let february = api.monthly_shifts("u-alice", 2, 2025).unwrap();
    assert_eq!(february.shifts.len(), 1);
    assert_eq!(february.shifts[0].start_time, t(9, 0));
}

#[test]
fn empty_upcoming_reports_the_window() {
    let dir = tempdir().unwrap();
    let api = seeded_api(dir.path());
    let upcoming = api.upcoming_shifts("u-bob", 14).unwrap();
    assert_eq!(upcoming.message, "No upcoming shifts found for this staff member");
    assert!(upcoming.shifts.is_empty());
    assert_eq!(upcoming.date, Some(d(2025, 1, 6)));
    assert_eq!(upcoming.end_date, Some(d(2025, 1, 20)));
}

#[test]
fn create_rejects_invalid_drafts() {
    let dir = tempdir().unwrap();
    let api = seeded_api(dir.path());

    let err = api
        .create_shift(&ShiftDraft::new("", d(2025, 1, 6), t(9, 0), t(9, 0)))
        .unwrap_err();
    match err {
        ApiError::Validation(errors) => {
            assert_eq!(
                errors,
                vec![
                    "Employee UID is required in employeeId".to_string(),
                    "startTime and endTime cannot be equal".to_string()
                ]
            );
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let err = api
        .create_shift(&ShiftDraft::new("u-ghost", d(2025, 1, 6), t(9, 0), t(17, 0)))
        .unwrap_err();
    assert!(matches!(err, ApiError::NotFound(msg) if msg == "Employee not found with given UID"));

    assert!(matches!(
        api.upcoming_shifts(" ", 30),
        Err(ApiError::BadRequest(_))
    ));
    assert!(matches!(
        api.monthly_shifts("u-alice", 13, 2025),
        Err(ApiError::BadRequest(_))
    ));
}

#[test]
fn update_and_delete_existing_shift() {
    let dir = tempdir().unwrap();
    let api = seeded_api(dir.path());
    let created = api
        .create_shift(&ShiftDraft::new("u-alice", d(2025, 1, 7), t(9, 0), t(17, 0)))
        .unwrap();

    let update = ShiftUpdate {
        end_time: Some(t(15, 30)),
        shift_note: Some("Stocktake".into()),
        ..ShiftUpdate::default()
    };
    let updated = api.update_shift(&created.id, &update).unwrap();
    assert_eq!(updated.message, "Shift updated successfully");
    assert_eq!(updated.updated_data.end_time, t(15, 30));

    let roster = api.storage().load().unwrap();
    let stored = roster.find_shift(&created.id).unwrap();
    assert_eq!(stored.shift_note.as_deref(), Some("Stocktake"));

    let clash = ShiftUpdate {
        start_time: Some(t(15, 30)),
        ..ShiftUpdate::default()
    };
    assert!(matches!(
        api.update_shift(&created.id, &clash),
        Err(ApiError::Validation(_))
    ));

    let deleted = api.delete_shift(&created.id).unwrap();
    assert_eq!(deleted.message, "Shift deleted successfully");
    assert!(matches!(
        api.delete_shift(&created.id),
        Err(ApiError::NotFound(_))
    ));
    assert!(matches!(
        api.update_shift(&ShiftId::new("missing"), &update),
        Err(ApiError::NotFound(_))
    ));
}

#[test]
fn wire_shift_list_accepts_backend_shapes() {
    let body = br#"[
        {
            "id": "s1",
            "employeeId": { "uid": "u-alice", "username": "Alice", "profilePicture": null },
            "date": "2025-01-06T00:00:00.000Z",
            "startTime": "09:00:00",
            "endTime": "17:30",
            "shiftNote": "",
            "createdAt": "2025-01-01T10:00:00.000Z"
        },
        {
            "id": "s2",
            "employeeId": { "uid": "u-bob" },
            "date": "2025-01-07",
            "startTime": "22:00",
            "endTime": "06:00",
            "notes": "Night fill"
        }
    ]"#;
    let shifts = wire::parse_shift_list(body).unwrap();
    assert_eq!(shifts.len(), 2);
    assert_eq!(shifts[0].date, d(2025, 1, 6));
    assert_eq!(shifts[0].start_time, t(9, 0));
    assert_eq!(shifts[0].shift_note, None);
    assert_eq!(shifts[1].employee.username, "");
    assert_eq!(shifts[1].shift_note.as_deref(), Some("Night fill"));
    assert!(shifts[1].is_overnight());
}

#[test]
fn wire_rejects_mismatched_shapes() {
    let string_employee = br#"[{"id":"s1","employeeId":"u-alice","date":"2025-01-06","startTime":"09:00","endTime":"17:00"}]"#;
    assert!(matches!(
        wire::parse_shift_list(string_employee),
        Err(ApiError::Schema(_))
    ));

    let bad_time = br#"[{"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"9am","endTime":"17:00"}]"#;
    assert!(matches!(
        wire::parse_shift_list(bad_time),
        Err(ApiError::Schema(_))
    ));

    let bad_date = br#"{"shifts":[{"id":"s1","employeeId":{"uid":"u"},"date":"06/01/2025","startTime":"09:00","endTime":"17:00"}]}"#;
    assert!(matches!(wire::parse_monthly(bad_date), Err(ApiError::Schema(_))));

    let activities = br#"{"activities":[]}"#;
    assert!(matches!(wire::parse_monthly(activities), Err(ApiError::Schema(_))));
}

#[test]
fn wire_upcoming_must_be_consistent() {
    let consistent = br#"{
        "message": "Upcoming shifts retrieved successfully",
        "totalShifts": 1,
        "upcomingDays": 1,
        "shiftsByDate": {
            "2025-01-06": [{"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"09:00","endTime":"17:00"}]
        },
        "shifts": [{"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"09:00","endTime":"17:00"}]
    }"#;
    let resp = wire::parse_upcoming(consistent).unwrap();
    assert_eq!(resp.shifts_by_date.total_shifts(), 1);

    let index_missing_day = br#"{
        "shiftsByDate": {},
        "shifts": [{"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"09:00","endTime":"17:00"}]
    }"#;
    assert!(matches!(
        wire::parse_upcoming(index_missing_day),
        Err(ApiError::Schema(_))
    ));

    let empty = br#"{"message":"No upcoming shifts found for this staff member","shifts":[],"date":"2025-01-06","endDate":"2025-02-05"}"#;
    let resp = wire::parse_upcoming(empty).unwrap();
    assert!(resp.shifts_by_date.is_empty());
}

#[test]
fn wire_upcoming_accepts_timestamp_keys() {
    let body = br#"{
        "totalShifts": 2,
        "shiftsByDate": {
            "2025-01-06T00:00:00.000Z": [{"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06T00:00:00.000Z","startTime":"09:00","endTime":"17:00"}],
            "2025-01-06T12:00:00.000Z": [{"id":"s2","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"18:00","endTime":"22:00"}]
        },
        "shifts": [
            {"id":"s1","employeeId":{"uid":"u"},"date":"2025-01-06T00:00:00.000Z","startTime":"09:00","endTime":"17:00"},
            {"id":"s2","employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"18:00","endTime":"22:00"}
        ]
    }"#;
    let resp = wire::parse_upcoming(body).unwrap();
    assert!(resp.shifts_by_date.has_shifts(d(2025, 1, 6)));
    assert_eq!(resp.shifts_by_date.len(), 1);
    assert_eq!(resp.shifts_by_date.shifts_on(d(2025, 1, 6)).len(), 2);

    let bad_key = br#"{"shiftsByDate": {"06/01/2025": []}, "shifts": []}"#;
    assert!(matches!(wire::parse_upcoming(bad_key), Err(ApiError::Schema(_))));
}

#[test]
fn wire_mutation_responses() {
    let created = br#"{"message":"Shift added successfully","id":"s9","data":{"employeeId":{"uid":"u","username":"U"},"date":"2025-01-06","startTime":"09:00","endTime":"17:00","shiftNote":"Cover"}}"#;
    let created = wire::parse_created(created).unwrap();
    let shift = created.shift();
    assert_eq!(shift.id, ShiftId::new("s9"));
    assert_eq!(shift.shift_note.as_deref(), Some("Cover"));

    let updated = br#"{"message":"Shift updated successfully","updatedData":{"employeeId":{"uid":"u"},"date":"2025-01-06","startTime":"10:00","endTime":"17:00"}}"#;
    assert_eq!(
        wire::parse_updated(updated).unwrap().updated_data.start_time,
        t(10, 0)
    );
    let deleted = br#"{"message":"Shift deleted successfully"}"#;
    assert_eq!(
        wire::parse_deleted(deleted).unwrap().message,
        "Shift deleted successfully"
    );
}

#[test]
fn status_codes_map_to_typed_errors() {
    let validation = wire::error_from_status(
        400,
        br#"{"error":"Validation failed","details":["startTime and endTime cannot be equal"]}"#,
    );
    assert!(matches!(validation, ApiError::Validation(d) if d.len() == 1));

    let bad = wire::error_from_status(400, br#"{"error":"Staff ID is required"}"#);
    assert!(matches!(bad, ApiError::BadRequest(m) if m == "Staff ID is required"));

    let missing = wire::error_from_status(404, br#"{"error":"Shift not found"}"#);
    assert!(matches!(missing, ApiError::NotFound(m) if m == "Shift not found"));

    let server = wire::error_from_status(500, b"Internal Server Error");
    assert!(matches!(server, ApiError::Transport(_)));
    assert_eq!(server.to_string(), "HTTP 500: Internal Server Error");
}

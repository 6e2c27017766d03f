#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use db::models::attendance_record;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use serde_json::{Value, json};

    use crate::helpers::app::{empty_request, json_request};
    use crate::helpers::{TestApp, make_test_app, make_test_app_at};

    async fn open_session(t: &TestApp) -> Value {
        let (status, json) = t
            .send(empty_request(
                "POST",
                &format!("/api/attendance/classes/{}/session", t.school.class.id),
                &t.school.teacher,
            ))
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        json["data"].clone()
    }

    #[tokio::test]
    async fn opening_twice_returns_the_same_session() {
        let t = make_test_app().await;
        let first = open_session(&t).await;
        let second = open_session(&t).await;

        assert_eq!(first["id"], second["id"]);
        assert_eq!(first["token"], second["token"]);
        assert_eq!(first["session_date"], "2025-09-08");
        assert_eq!(first["expires_at_local"], "11:15");
    }

    #[tokio::test]
    async fn weekend_sessions_are_rejected() {
        let saturday = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
        let t = make_test_app_at(saturday, 8, 0).await;

        let (status, json) = t
            .send(empty_request(
                "POST",
                &format!("/api/attendance/classes/{}/session", t.school.class.id),
                &t.school.teacher,
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn scan_then_duplicate_scan_conflicts() {
        let t = make_test_app().await;
        let session = open_session(&t).await;
        let student = &t.school.students[0];

        let body = json!({ "token": session["token"] });
        let (status, json) = t
            .send(json_request("POST", "/api/attendance/scan", student, body.clone()))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "present");
        assert_eq!(json["data"]["method"], "scan");

        let (status, json) = t
            .send(json_request("POST", "/api/attendance/scan", student, body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(json["message"], "Attendance already recorded today");
    }

    #[tokio::test]
    async fn scan_by_a_student_of_another_class_is_rejected() {
        let t = make_test_app().await;
        let session = open_session(&t).await;

        let (status, json) = t
            .send(json_request(
                "POST",
                "/api/attendance/scan",
                &t.school.outsider,
                json!({ "token": session["token"] }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"].as_str().unwrap().contains("XII RPL 1"));

        let (status, _) = t
            .send(json_request(
                "POST",
                "/api/attendance/scan",
                &t.school.outsider,
                json!({ "token": "not-a-token" }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn manual_batch_is_atomic_and_upserts() {
        let t = make_test_app().await;
        open_session(&t).await;
        let uri = format!("/api/attendance/classes/{}/manual", t.school.class.id);

        let mut entries: Vec<Value> = t.school.students[..5]
            .iter()
            .map(|s| json!({ "student_id": s.id, "status": "present" }))
            .collect();
        entries.push(json!({ "student_id": t.school.outsider.id, "status": "sick" }));

        let (status, _) = t
            .send(json_request(
                "POST",
                &uri,
                &t.school.teacher,
                json!({ "entries": entries }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            attendance_record::Entity::find().count(&t.db).await.unwrap(),
            0
        );

        entries.pop();
        let (status, json) = t
            .send(json_request(
                "POST",
                &uri,
                &t.school.teacher,
                json!({ "entries": entries }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["count"], 5);

        let revised: Vec<Value> = t.school.students[..5]
            .iter()
            .map(|s| json!({ "student_id": s.id, "status": "absent", "notes": "late bus" }))
            .collect();
        let (status, _) = t
            .send(json_request(
                "POST",
                &uri,
                &t.school.teacher,
                json!({ "entries": revised }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, json) = t
            .send(empty_request(
                "GET",
                &format!("/api/attendance/classes/{}/today", t.school.class.id),
                &t.school.teacher,
            ))
            .await;
        assert_eq!(json["data"]["marked"], 5);
        assert_eq!(json["data"]["unmarked"], 1);
        assert_eq!(
            attendance_record::Entity::find().count(&t.db).await.unwrap(),
            5
        );
    }

    #[tokio::test]
    async fn empty_manual_batch_is_a_validation_error() {
        let t = make_test_app().await;
        open_session(&t).await;

        let (status, json) = t
            .send(json_request(
                "POST",
                &format!("/api/attendance/classes/{}/manual", t.school.class.id),
                &t.school.teacher,
                json!({ "entries": [] }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "At least one entry is required");
    }

    #[tokio::test]
    async fn regenerate_and_delete_keep_history() {
        let t = make_test_app().await;
        let session = open_session(&t).await;
        let session_id = session["id"].as_i64().unwrap();
        let student = &t.school.students[0];

        t.send(json_request(
            "POST",
            "/api/attendance/scan",
            student,
            json!({ "token": session["token"] }),
        ))
        .await;

        let (status, json) = t
            .send(empty_request(
                "POST",
                &format!("/api/attendance/sessions/{session_id}/regenerate"),
                &t.school.teacher,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_ne!(json["data"]["token"], session["token"]);

        let uri = format!("/api/attendance/sessions/{session_id}");
        let (status, _) = t
            .send(empty_request("DELETE", &uri, &t.school.teacher))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);

        let (status, _) = t.send(empty_request("DELETE", &uri, &t.school.admin)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, json) = t
            .send(empty_request("GET", "/api/attendance/me/history", student))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
        assert_eq!(json["data"][0]["session_id"], session_id);
    }

    #[tokio::test]
    async fn teacher_sees_todays_lessons() {
        let t = make_test_app().await;
        open_session(&t).await;

        let (status, json) = t
            .send(empty_request(
                "GET",
                "/api/attendance/teachers/me/today",
                &t.school.teacher,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        let lessons = json["data"].as_array().unwrap();
        assert_eq!(lessons.len(), 1);
        assert_eq!(lessons[0]["class_name"], "XII RPL 1");
        assert_eq!(lessons[0]["enrolled"], 6);
        assert!(lessons[0]["session_id"].is_i64());
    }

    #[tokio::test]
    async fn rotation_blocks_then_allows_after_switching_week() {
        let t = make_test_app().await;
        let admin = &t.school.admin;

        // Move the only Monday lesson to week B.
        {
            use db::models::schedule::{self, WeekType};
            use sea_orm::{ActiveModelTrait, IntoActiveModel, Set};
            let mut slot: schedule::ActiveModel = t.school.schedule.clone().into_active_model();
            slot.week_type = Set(WeekType::B);
            slot.update(&t.db).await.unwrap();
        }

        t.send(json_request(
            "PUT",
            "/api/active-weeks",
            admin,
            json!({ "grade": 12, "week_type": "a" }),
        ))
        .await;

        let uri = format!("/api/attendance/classes/{}/session", t.school.class.id);
        let (status, json) = t.send(empty_request("POST", &uri, &t.school.teacher)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["message"]
            .as_str()
            .unwrap()
            .starts_with("No active schedule"));

        t.send(json_request(
            "PUT",
            "/api/active-weeks",
            admin,
            json!({ "grade": 12, "week_type": "b" }),
        ))
        .await;
        let (status, _) = t.send(empty_request("POST", &uri, &t.school.teacher)).await;
        assert_eq!(status, StatusCode::OK);
    }
}

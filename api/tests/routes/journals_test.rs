#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::helpers::app::{empty_request, json_request, monday};
    use crate::helpers::{make_test_app, make_test_app_at};

    #[tokio::test]
    async fn validate_reports_window_verdicts() {
        let t = make_test_app().await;
        let uri = format!(
            "/api/journals/schedules/{}/validate",
            t.school.schedule.id
        );

        let (status, json) = t.send(empty_request("GET", &uri, &t.school.teacher)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], true);
        assert_eq!(json["data"]["start_time"], "08:00:00");

        let late = make_test_app_at(monday(), 11, 45).await;
        let uri = format!(
            "/api/journals/schedules/{}/validate",
            late.school.schedule.id
        );
        let (status, json) = late
            .send(empty_request("GET", &uri, &late.school.teacher))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["valid"], false);
        assert_eq!(
            json["data"]["reason"],
            "Journal can only be filled between 07:30 and 11:30 (now 11:45)"
        );
    }

    #[tokio::test]
    async fn validate_hides_other_teachers_schedules() {
        let t = make_test_app().await;
        let (status, json) = t
            .send(empty_request(
                "GET",
                &format!("/api/journals/schedules/{}/validate", t.school.schedule.id),
                &t.school.students[0],
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "Schedule not found or not yours");
    }

    #[tokio::test]
    async fn create_list_and_fetch_a_journal() {
        let t = make_test_app().await;
        let teacher = &t.school.teacher;

        let session_uri = format!("/api/attendance/classes/{}/session", t.school.class.id);
        let (_, session) = t.send(empty_request("POST", &session_uri, teacher)).await;
        t.send(json_request(
            "POST",
            "/api/attendance/scan",
            &t.school.students[0],
            json!({ "token": session["data"]["token"] }),
        ))
        .await;

        let body = json!({
            "schedule_id": t.school.schedule.id,
            "journal_date": "2025-09-08",
            "topic": "Linear functions",
        });
        let (status, json) = t
            .send(json_request("POST", "/api/journals", teacher, body.clone()))
            .await;
        assert_eq!(status, StatusCode::OK, "{json}");
        let journal_id = json["data"]["id"].as_i64().unwrap();
        assert_eq!(json["data"]["attendance_session_id"], session["data"]["id"]);

        let (status, _) = t
            .send(json_request("POST", "/api/journals", teacher, body))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, json) = t
            .send(empty_request("GET", "/api/journals?date=2025-09-08", teacher))
            .await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let (status, json) = t
            .send(empty_request(
                "GET",
                &format!("/api/journals/{journal_id}"),
                teacher,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["attendance"]["present"], 1);

        let (status, _) = t
            .send(empty_request(
                "GET",
                &format!("/api/journals/{journal_id}"),
                &t.school.admin,
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn backdated_or_blank_journals_are_rejected() {
        let t = make_test_app().await;
        let teacher = &t.school.teacher;
        let yesterday = NaiveDate::from_ymd_opt(2025, 9, 7).unwrap();

        let (status, _) = t
            .send(json_request(
                "POST",
                "/api/journals",
                teacher,
                json!({
                    "schedule_id": t.school.schedule.id,
                    "journal_date": yesterday,
                    "topic": "Linear functions",
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, json) = t
            .send(json_request(
                "POST",
                "/api/journals",
                teacher,
                json!({
                    "schedule_id": t.school.schedule.id,
                    "journal_date": "2025-09-08",
                    "topic": "",
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Topic must be 1-255 characters");
    }
}

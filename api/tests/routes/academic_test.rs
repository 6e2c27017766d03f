#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::helpers::app::{empty_request, json_request};
    use crate::helpers::make_test_app;

    #[tokio::test]
    async fn admin_creates_and_activates_a_year() {
        let t = make_test_app().await;
        let admin = &t.school.admin;

        let (status, json) = t
            .send(json_request(
                "POST",
                "/api/academic-years",
                admin,
                json!({ "name": "2026/2027" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["active"], false);
        let new_id = json["data"]["id"].as_i64().unwrap();

        let (status, _) = t
            .send(json_request(
                "POST",
                "/api/academic-years",
                admin,
                json!({ "name": "2026/2027" }),
            ))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (status, json) = t
            .send(empty_request(
                "PUT",
                &format!("/api/academic-years/{new_id}/activate"),
                admin,
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["active"], true);

        let (_, json) = t
            .send(empty_request("GET", "/api/academic-years", admin))
            .await;
        let active: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|y| y["active"] == true)
            .collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0]["id"], new_id);
    }

    #[tokio::test]
    async fn configuration_writes_are_admin_only() {
        let t = make_test_app().await;

        let (status, json) = t
            .send(json_request(
                "PUT",
                "/api/active-weeks",
                &t.school.teacher,
                json!({ "grade": 12, "week_type": "a" }),
            ))
            .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(json["message"], "Admin access required");

        let (status, _) = t
            .send(empty_request("GET", "/api/active-weeks", &t.school.teacher))
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn set_active_week_validates_and_upserts() {
        let t = make_test_app().await;
        let admin = &t.school.admin;

        let (status, json) = t
            .send(json_request(
                "PUT",
                "/api/active-weeks",
                admin,
                json!({ "grade": 0, "week_type": "a" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Grade must be between 1 and 13");

        for week in ["a", "b"] {
            let (status, json) = t
                .send(json_request(
                    "PUT",
                    "/api/active-weeks",
                    admin,
                    json!({ "grade": 12, "week_type": week }),
                ))
                .await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(json["data"]["week_type"], week);
        }

        let (_, json) = t.send(empty_request("GET", "/api/active-weeks", admin)).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);
    }
}

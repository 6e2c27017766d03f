#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };

    use crate::helpers::app::monday;
    use crate::helpers::{make_test_app, make_test_app_at};

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn health_reports_database_and_school_time() {
        let t = make_test_app().await;

        let (status, json) = t.send(get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Health check passed");
        assert_eq!(json["data"]["database"], "ok");
        assert_eq!(json["data"]["school_date"], "2025-09-08");
        assert_eq!(json["data"]["school_time"], "08:15");
        assert_eq!(json["data"]["weekday"], "Mon");
    }

    #[tokio::test]
    async fn health_uses_the_school_clock_not_utc() {
        // 06:30 in UTC+7 is still the previous day (Sunday) in UTC.
        let t = make_test_app_at(monday(), 6, 30).await;

        let (status, json) = t.send(get("/api/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["school_date"], "2025-09-08");
        assert_eq!(json["data"]["weekday"], "Mon");
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let t = make_test_app().await;

        let (status, json) = t.send(get("/api/academic-years")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Authentication required");
    }
}

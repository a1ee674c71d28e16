pub mod health;
pub mod matchups;
pub mod participation;
pub mod players;
pub mod summary;

#[cfg(test)]
pub(crate) mod test_support {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::util::ServiceExt;

    use crate::analysis::TwAnalysis;
    use crate::api::state::AppState;
    use crate::classify::fixtures::{deploy, Attack, OUR_GUILD, THEIR_GUILD};
    use crate::config::AppConfig;

    pub async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    pub fn empty_state() -> AppState {
        let mut config = AppConfig::default();
        config.guild.id = OUR_GUILD.to_string();
        config.guild.name = "Test Guild".to_string();
        AppState::new(TwAnalysis::new(config))
    }

    pub fn loaded_state() -> AppState {
        let analysis = TwAnalysis::clone(&empty_state().analysis)
            .with_events(
                vec![
                    deploy("Carol", "GLLEIA:SEVEN_STAR", 90000.0),
                    Attack::win(OUR_GUILD, "Alice", "Xavier").banners(64).event(),
                    Attack::win(OUR_GUILD, "Alice", "Yuri").banners(58).event(),
                    Attack::win(OUR_GUILD, "Bob", "Xavier")
                        .leader("SEE:SEVEN_STAR")
                        .banners(40)
                        .event(),
                    Attack::win(THEIR_GUILD, "Xavier", "Bob").banners(55).event(),
                    Attack::hold(THEIR_GUILD, "Yuri", "Alice").event(),
                ],
                Some("0123456789abcdef".into()),
            )
            .with_roster(vec!["Alice".into(), "Bob".into(), "Dormant".into()]);
        AppState::new(analysis)
    }
}

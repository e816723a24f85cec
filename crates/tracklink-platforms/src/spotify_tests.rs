// SPDX-License-Identifier: GPL-3.0-or-later

#[cfg(test)]
mod tests {
    use crate::models::RawTrack;
    use crate::{PlatformClient, PlatformError, SpotifyClient};
    use tracklink_domain::Platform;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const TRACK_ID: &str = "2ltvvftNngVjO6xhqVQd9M";

    fn token_response(access_token: &str) -> serde_json::Value {
        serde_json::json!({
            "access_token": access_token,
            "token_type": "Bearer",
            "expires_in": 3600
        })
    }

    fn track_response() -> serde_json::Value {
        serde_json::json!({
            "id": TRACK_ID,
            "name": "Blinding Lights",
            "artists": [{ "name": "The Weeknd" }],
            "external_ids": { "isrc": "USUG11904206" }
        })
    }

    fn search_response(items: serde_json::Value) -> serde_json::Value {
        serde_json::json!({ "tracks": { "items": items } })
    }

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/token"))
            .and(body_string_contains("grant_type=client_credentials"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_response("test-token")))
            .mount(server)
            .await;
    }

    fn client(server: &MockServer) -> SpotifyClient {
        SpotifyClient::builder()
            .api_base_url(server.uri())
            .auth_base_url(server.uri())
            .build("test-client-id", "test-client-secret")
            .unwrap()
    }

    #[tokio::test]
    async fn fetch_by_id_uses_bearer_token() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{}", TRACK_ID)))
            .and(header("authorization", "Bearer test-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(track_response()))
            .mount(&server)
            .await;

        let client = client(&server);
        assert_eq!(client.platform(), Platform::Spotify);

        let raw = client.fetch_by_id(TRACK_ID).await.unwrap();

        let RawTrack::Spotify(track) = raw else {
            panic!("expected a Spotify payload");
        };
        assert_eq!(track.id, TRACK_ID);
        assert_eq!(track.name, "Blinding Lights");
        assert_eq!(track.artists[0].name, "The Weeknd");
        assert_eq!(track.external_ids.isrc.as_deref(), Some("USUG11904206"));
    }

    #[tokio::test]
    async fn token_is_cached_across_requests() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_response("test-token")))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{}", TRACK_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(track_response()))
            .mount(&server)
            .await;

        let client = client(&server);
        client.fetch_by_id(TRACK_ID).await.unwrap();
        client.fetch_by_id(TRACK_ID).await.unwrap();
    }

    #[tokio::test]
    async fn expired_token_refreshed_and_retried_once() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(token_response("test-token")))
            .expect(2)
            .mount(&server)
            .await;

        // First catalog call is rejected once, then succeeds on the retry.
        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{}", TRACK_ID)))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{}", TRACK_ID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(track_response()))
            .mount(&server)
            .await;

        let raw = client(&server).fetch_by_id(TRACK_ID).await.unwrap();
        assert_eq!(raw.id(), TRACK_ID);
    }

    #[tokio::test]
    async fn second_rejection_surfaces_auth_error() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path(format!("/v1/tracks/{}", TRACK_ID)))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = client(&server).fetch_by_id(TRACK_ID).await;
        assert!(matches!(result.unwrap_err(), PlatformError::Auth(_)));

        // Exactly one retry: two catalog requests in total.
        let catalog_requests = server
            .received_requests()
            .await
            .unwrap()
            .into_iter()
            .filter(|request| request.url.path().starts_with("/v1/tracks"))
            .count();
        assert_eq!(catalog_requests, 2);
    }

    #[tokio::test]
    async fn unknown_id_surfaces_not_found() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/tracks/nope"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = client(&server).fetch_by_id("nope").await;
        assert!(matches!(result.unwrap_err(), PlatformError::NotFound(_)));
    }

    #[tokio::test]
    async fn search_by_isrc_builds_filter_query() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "isrc:USUM71703861"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_response(serde_json::json!([track_response()]))),
            )
            .mount(&server)
            .await;

        let candidates = client(&server).search_by_isrc("USUM71703861").await.unwrap();
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].id(), TRACK_ID);
    }

    #[tokio::test]
    async fn empty_search_is_zero_candidates_not_an_error() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_response(serde_json::json!([]))),
            )
            .mount(&server)
            .await;

        let candidates = client(&server).search_by_isrc("USUM71703861").await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn search_by_metadata_is_bounded_to_five() {
        let server = MockServer::start().await;
        mount_token(&server).await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("q", "track:Blinding Lights artist:The Weeknd"))
            .and(query_param("type", "track"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(search_response(serde_json::json!([track_response()]))),
            )
            .mount(&server)
            .await;

        let candidates = client(&server)
            .search_by_metadata("Blinding Lights", "The Weeknd")
            .await
            .unwrap();
        assert_eq!(candidates.len(), 1);
    }

    #[tokio::test]
    async fn failed_token_request_surfaces_auth_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/token"))
            .respond_with(ResponseTemplate::new(400).set_body_string("invalid_client"))
            .mount(&server)
            .await;

        let result = client(&server).fetch_by_id(TRACK_ID).await;
        assert!(matches!(result.unwrap_err(), PlatformError::Auth(_)));
    }
}

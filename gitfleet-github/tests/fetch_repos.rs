use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use gitfleet_github::{GithubClient, GithubError, HttpResponse, Protocol, Transport};

/// Replays canned responses and records requested URLs.
#[derive(Default)]
struct Replay {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<(String, String)>>,
}

impl Replay {
    fn new(responses: Vec<HttpResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::default(),
        }
    }

    fn urls(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|(url, _)| url.clone())
            .collect()
    }
}

impl Transport for Replay {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, GithubError> {
        self.requests
            .lock()
            .unwrap()
            .push((url.to_string(), token.to_string()));
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GithubError::Transport {
                url: url.to_string(),
                message: "no more canned responses".to_string(),
            })
    }
}

impl Transport for &Replay {
    fn get(&self, url: &str, token: &str) -> Result<HttpResponse, GithubError> {
        (**self).get(url, token)
    }
}

fn page(names: &[(&str, bool)], next: Option<&str>) -> HttpResponse {
    let items: Vec<_> = names
        .iter()
        .map(|(name, archived)| {
            serde_json::json!({
                "name": name,
                "ssh_url": format!("git@github.com:acme/{name}.git"),
                "clone_url": format!("https://github.com/acme/{name}.git"),
                "archived": archived,
            })
        })
        .collect();
    let body = serde_json::json!({
        "total_count": items.len(),
        "incomplete_results": false,
        "items": items,
    });
    HttpResponse {
        status: 200,
        link: next.map(|n| format!(r#"<{n}>; rel="next", <{n}>; rel="last""#)),
        retry_after: None,
        body: body.to_string(),
    }
}

fn rate_limited(retry_after: Option<u64>) -> HttpResponse {
    HttpResponse {
        status: 403,
        link: None,
        retry_after,
        body: r#"{"message":"You have exceeded a secondary rate limit."}"#.to_string(),
    }
}

fn client(replay: &Replay) -> GithubClient<&Replay> {
    GithubClient::with_transport("s3cret", replay)
        .expect("client")
        .with_backoff(Duration::ZERO)
}

#[test]
fn single_page_maps_to_descriptors() {
    let replay = Replay::new(vec![page(&[("api", false), ("old", true)], None)]);

    let repos = client(&replay).fetch_repos("acme", "").expect("fetch");

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name.as_str(), "api");
    assert_eq!(repos[0].clone_url, "git@github.com:acme/api.git");
    assert!(!repos[0].archived);
    assert!(repos[1].archived);

    let requests = replay.requests.lock().unwrap();
    assert_eq!(requests[0].1, "s3cret");
    assert_eq!(
        requests[0].0,
        "https://api.github.com/search/repositories?q=user%3Aacme+fork%3Atrue&per_page=100"
    );
}

#[test]
fn extra_search_qualifiers_are_appended() {
    let replay = Replay::new(vec![page(&[], None)]);
    client(&replay)
        .fetch_repos("acme", "language:rust")
        .expect("fetch");
    assert_eq!(
        replay.urls(),
        vec!["https://api.github.com/search/repositories?q=user%3Aacme+fork%3Atrue+language%3Arust&per_page=100"]
    );
}

#[test]
fn https_protocol_uses_clone_url() {
    let replay = Replay::new(vec![page(&[("api", false)], None)]);
    let repos = client(&replay)
        .with_protocol(Protocol::Https)
        .fetch_repos("acme", "")
        .expect("fetch");
    assert_eq!(repos[0].clone_url, "https://github.com/acme/api.git");
}

#[test]
fn follows_next_links_until_exhausted() {
    let page2 = "https://api.github.com/search/repositories?q=user%3Aacme&per_page=100&page=2";
    let page3 = "https://api.github.com/search/repositories?q=user%3Aacme&per_page=100&page=3";
    let replay = Replay::new(vec![
        page(&[("a", false)], Some(page2)),
        page(&[("b", false)], Some(page3)),
        page(&[("c", true)], None),
    ]);

    let repos = client(&replay).fetch_repos("acme", "").expect("fetch");

    let names: Vec<_> = repos.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["a", "b", "c"]);
    let urls = replay.urls();
    assert_eq!(urls.len(), 3);
    assert_eq!(urls[1], page2);
    assert_eq!(urls[2], page3);
}

#[test]
fn rate_limited_page_is_retried() {
    let replay = Replay::new(vec![
        rate_limited(None),
        rate_limited(Some(0)),
        page(&[("api", false)], None),
    ]);

    let repos = client(&replay).fetch_repos("acme", "").expect("fetch");

    assert_eq!(repos.len(), 1);
    let urls = replay.urls();
    assert_eq!(urls.len(), 3);
    assert!(urls.iter().all(|u| u == &urls[0]));
}

#[test]
fn gives_up_after_max_retries() {
    let replay = Replay::new(vec![rate_limited(None), rate_limited(None), rate_limited(None)]);

    let err = client(&replay)
        .with_max_retries(2)
        .fetch_repos("acme", "")
        .unwrap_err();

    assert!(matches!(err, GithubError::RateLimited { attempts: 3, .. }), "got: {err}");
}

#[test]
fn server_error_is_fatal() {
    let replay = Replay::new(vec![HttpResponse {
        status: 502,
        body: "Bad Gateway".to_string(),
        ..HttpResponse::default()
    }]);

    let err = client(&replay).fetch_repos("acme", "").unwrap_err();

    match err {
        GithubError::Status { status, body, .. } => {
            assert_eq!(status, 502);
            assert_eq!(body, "Bad Gateway");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn bad_credentials_are_not_retried() {
    let replay = Replay::new(vec![HttpResponse {
        status: 401,
        body: r#"{"message":"Bad credentials"}"#.to_string(),
        ..HttpResponse::default()
    }]);

    let err = client(&replay).fetch_repos("acme", "").unwrap_err();

    assert!(matches!(err, GithubError::Status { status: 401, .. }));
    assert_eq!(replay.urls().len(), 1);
}

#[test]
fn malformed_json_is_reported_with_url() {
    let replay = Replay::new(vec![HttpResponse {
        status: 200,
        body: "<html>".to_string(),
        ..HttpResponse::default()
    }]);

    let err = client(&replay).fetch_repos("acme", "").unwrap_err();

    assert!(matches!(err, GithubError::Json { .. }));
    assert!(err.to_string().contains("api.github.com"), "got: {err}");
}

#[test]
fn blank_token_is_rejected() {
    let replay = Replay::default();
    let err = GithubClient::with_transport("  ", &replay).err().expect("error");
    assert!(matches!(err, GithubError::MissingToken));
    assert!(err.to_string().contains("GITHUB_TOKEN"));
}

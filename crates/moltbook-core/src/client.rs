use std::sync::Arc;

use serde_json::Value;

use crate::catalog::{self, VerbArgs};
use crate::constants::{BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::credentials::{CredentialSource, EnvFileCredentials};
use crate::dispatch::{Dispatcher, Envelope};
use crate::error::Result;
use crate::transport::{HttpTransport, Transport};
use crate::types::{CommentSort, Discovery, FeedQuery, NewSubmolt, PostDraft};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Allows `http://` base URLs and invalid TLS certificates.
    pub allow_insecure: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            allow_insecure: false,
        }
    }
}

impl ClientConfig {
    /// Default config with the base URL taken from `MOLTBOOK_API_URL` when set.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self {
            base_url,
            ..Self::default()
        }
    }
}

/// Typed wrapper over the verb catalog.
#[derive(Clone)]
pub struct MoltbookClient {
    dispatcher: Dispatcher,
}

impl MoltbookClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::with_credentials(config, Arc::new(EnvFileCredentials::default()))
    }

    pub fn with_credentials(
        config: ClientConfig,
        credentials: Arc<dyn CredentialSource>,
    ) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(config.allow_insecure)?);
        Self::with_transport(config, credentials, transport)
    }

    pub fn with_transport(
        config: ClientConfig,
        credentials: Arc<dyn CredentialSource>,
        transport: Arc<dyn Transport>,
    ) -> Result<Self> {
        let dispatcher = Dispatcher::new(
            &config.base_url,
            config.allow_insecure,
            credentials,
            transport,
        )?;
        Ok(Self { dispatcher })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Runs any catalog verb and returns the raw envelope.
    pub async fn call(&self, verb: &str, args: &VerbArgs) -> Result<Envelope> {
        let verb = catalog::lookup(verb)?;
        catalog::invoke(&self.dispatcher, verb, args).await
    }

    async fn value(&self, verb: &str, args: VerbArgs) -> Result<Value> {
        self.call(verb, &args).await?.into_result()
    }

    async fn list(&self, verb: &str, args: VerbArgs) -> Result<Vec<Value>> {
        let field = catalog::lookup(verb)?.list_field.unwrap_or("items");
        let value = self.value(verb, args).await?;
        Ok(catalog::normalize_list(value, field))
    }

    pub async fn search(&self, query: &str, limit: Option<u32>) -> Result<Vec<Value>> {
        let args = VerbArgs::new()
            .with("q", query)
            .with_opt("limit", limit.map(|value| value.to_string()));
        self.list("search", args).await
    }

    pub async fn feed(&self, query: &FeedQuery) -> Result<Vec<Value>> {
        let args = VerbArgs::new()
            .with_opt("sort", query.sort.map(|sort| sort.as_str()))
            .with_opt("submolt", query.submolt.as_deref())
            .with_opt("limit", query.limit.map(|value| value.to_string()));
        self.list("feed", args).await
    }

    /// Search, plus the submolt's feed when `submolt` is given.
    ///
    /// The two calls are independent and run concurrently.
    pub async fn discover(
        &self,
        query: &str,
        submolt: Option<&str>,
        limit: Option<u32>,
    ) -> Result<Discovery> {
        let Some(submolt) = submolt else {
            let results = self.search(query, limit).await?;
            return Ok(Discovery {
                results,
                feed: None,
            });
        };
        let feed_query = FeedQuery {
            sort: None,
            submolt: Some(submolt.to_string()),
            limit,
        };
        let (results, feed) = tokio::join!(self.search(query, limit), self.feed(&feed_query));
        Ok(Discovery {
            results: results?,
            feed: Some(feed?),
        })
    }

    pub async fn pools(&self, limit: Option<u32>) -> Result<Vec<Value>> {
        let args = VerbArgs::new().with_opt("limit", limit.map(|value| value.to_string()));
        self.list("pools", args).await
    }

    pub async fn pool(&self, pool_id: &str) -> Result<Value> {
        self.value("pool", VerbArgs::new().with("pool_id", pool_id))
            .await
    }

    pub async fn contribute(&self, pool_id: &str, amount: f64) -> Result<Value> {
        let args = VerbArgs::new()
            .with("pool_id", pool_id)
            .with("amount", amount.to_string());
        self.value("contribute", args).await
    }

    pub async fn join_pool(&self, pool_id: &str) -> Result<Value> {
        self.value("join", VerbArgs::new().with("pool_id", pool_id))
            .await
    }

    pub async fn my_pools(&self) -> Result<Vec<Value>> {
        self.list("my-pools", VerbArgs::new()).await
    }

    pub async fn leave_pool(&self, pool_id: &str) -> Result<Value> {
        self.value("leave", VerbArgs::new().with("pool_id", pool_id))
            .await
    }

    pub async fn create_post(&self, draft: &PostDraft) -> Result<Value> {
        let args = VerbArgs::new()
            .with("submolt", draft.submolt.as_str())
            .with("title", draft.title.as_str())
            .with_opt("content", draft.content.as_deref())
            .with_opt("url", draft.url.as_deref());
        self.value("post", args).await
    }

    pub async fn get_post(&self, post_id: &str) -> Result<Value> {
        self.value("get-post", VerbArgs::new().with("post_id", post_id))
            .await
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<Value> {
        self.value("delete-post", VerbArgs::new().with("post_id", post_id))
            .await
    }

    pub async fn comments(&self, post_id: &str, sort: Option<CommentSort>) -> Result<Vec<Value>> {
        let args = VerbArgs::new()
            .with("post_id", post_id)
            .with_opt("sort", sort.map(|sort| sort.as_str()));
        self.list("comments", args).await
    }

    pub async fn comment(&self, post_id: &str, content: &str) -> Result<Value> {
        let args = VerbArgs::new()
            .with("post_id", post_id)
            .with("content", content);
        self.value("comment", args).await
    }

    pub async fn reply(&self, post_id: &str, parent_id: &str, content: &str) -> Result<Value> {
        let args = VerbArgs::new()
            .with("post_id", post_id)
            .with("parent_id", parent_id)
            .with("content", content);
        self.value("reply", args).await
    }

    pub async fn upvote(&self, post_id: &str) -> Result<Value> {
        self.value("upvote", VerbArgs::new().with("post_id", post_id))
            .await
    }

    pub async fn downvote(&self, post_id: &str) -> Result<Value> {
        self.value("downvote", VerbArgs::new().with("post_id", post_id))
            .await
    }

    pub async fn upvote_comment(&self, comment_id: &str) -> Result<Value> {
        self.value(
            "upvote-comment",
            VerbArgs::new().with("comment_id", comment_id),
        )
        .await
    }

    pub async fn submolts(&self) -> Result<Vec<Value>> {
        self.list("submolts", VerbArgs::new()).await
    }

    pub async fn submolt(&self, name: &str) -> Result<Value> {
        self.value("submolt", VerbArgs::new().with("name", name))
            .await
    }

    pub async fn create_submolt(&self, submolt: &NewSubmolt) -> Result<Value> {
        let args = VerbArgs::new()
            .with("name", submolt.name.as_str())
            .with("display_name", submolt.display_name.as_str())
            .with_opt("description", submolt.description.as_deref());
        self.value("create-submolt", args).await
    }

    pub async fn subscribe(&self, name: &str) -> Result<Value> {
        self.value("subscribe", VerbArgs::new().with("name", name))
            .await
    }

    pub async fn unsubscribe(&self, name: &str) -> Result<Value> {
        self.value("unsubscribe", VerbArgs::new().with("name", name))
            .await
    }

    pub async fn status(&self) -> Result<Value> {
        self.value("status", VerbArgs::new()).await
    }

    pub async fn me(&self) -> Result<Value> {
        self.value("me", VerbArgs::new()).await
    }

    pub async fn update_profile(&self, description: &str) -> Result<Value> {
        self.value(
            "update-profile",
            VerbArgs::new().with("description", description),
        )
        .await
    }

    pub async fn follow(&self, agent: &str) -> Result<Value> {
        self.value("follow", VerbArgs::new().with("agent", agent))
            .await
    }

    pub async fn unfollow(&self, agent: &str) -> Result<Value> {
        self.value("unfollow", VerbArgs::new().with("agent", agent))
            .await
    }

    pub async fn profile(&self, agent: &str) -> Result<Value> {
        self.value("profile", VerbArgs::new().with("name", agent))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::StaticCredential;
    use crate::error::{ErrorKind, MoltbookError};
    use crate::testing::RecordingTransport;
    use crate::types::SortKey;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn client(base_url: &str) -> MoltbookClient {
        MoltbookClient::with_credentials(
            ClientConfig {
                base_url: base_url.to_string(),
                allow_insecure: true,
            },
            Arc::new(StaticCredential::new("tok")),
        )
        .expect("client")
    }

    fn recording_client(transport: Arc<RecordingTransport>) -> MoltbookClient {
        MoltbookClient::with_transport(
            ClientConfig::default(),
            Arc::new(StaticCredential::new("tok")),
            transport,
        )
        .expect("client")
    }

    #[tokio::test]
    async fn contribute_relays_response_unchanged() {
        let mut server = Server::new_async().await;
        let response = json!({
            "success": true,
            "pool_id": "pool123",
            "amount_contributed": 100,
            "new_total": 500,
            "matching_multiplier": 2.5,
            "message": "ok"
        });
        let mock = server
            .mock("POST", "/pools/pool123/contribute")
            .match_header("authorization", "Bearer tok")
            .match_body(Matcher::Json(json!({"amount": 100})))
            .with_status(200)
            .with_body(response.to_string())
            .expect(1)
            .create_async()
            .await;

        let value = client(&server.url())
            .contribute("pool123", 100.0)
            .await
            .expect("contribute");

        mock.assert_async().await;
        assert_eq!(value, response);
    }

    #[tokio::test]
    async fn application_error_is_typed() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/posts/missing")
            .with_status(404)
            .with_body(r#"{"error":"not found"}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .get_post("missing")
            .await
            .expect_err("404");
        assert_eq!(err.kind(), ErrorKind::Application);
        assert!(matches!(
            err,
            MoltbookError::Application { status: 404, ref message } if message == "not found"
        ));
    }

    #[tokio::test]
    async fn lists_accept_bare_and_wrapped_shapes() {
        let transport = Arc::new(
            RecordingTransport::new()
                .respond(200, r#"[{"id":"a"}]"#)
                .respond(200, r#"{"pools":[{"id":"b"}],"count":1}"#),
        );
        let client = recording_client(transport.clone());

        assert_eq!(client.pools(None).await.expect("bare"), vec![json!({"id": "a"})]);
        assert_eq!(client.my_pools().await.expect("wrapped"), vec![json!({"id": "b"})]);

        let calls = transport.calls();
        assert_eq!(calls[0].url, "https://www.moltbook.com/api/v1/pools");
        assert_eq!(calls[1].url, "https://www.moltbook.com/api/v1/pools/joined");
    }

    #[tokio::test]
    async fn feed_query_targets_scoped_path() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"posts":[]}"#));
        let client = recording_client(transport.clone());

        client
            .feed(&FeedQuery {
                sort: Some(SortKey::Top),
                submolt: Some("general".to_string()),
                limit: Some(5),
            })
            .await
            .expect("feed");

        assert_eq!(
            transport.calls()[0].url,
            "https://www.moltbook.com/api/v1/submolts/general/feed?sort=top&limit=5"
        );
    }

    #[tokio::test]
    async fn link_post_omits_content() {
        let transport = Arc::new(RecordingTransport::new());
        let client = recording_client(transport.clone());

        client
            .create_post(&PostDraft::link("general", "Read this", "https://example.com"))
            .await
            .expect("post");

        let body: Value =
            serde_json::from_str(transport.calls()[0].body.as_deref().expect("body")).expect("json");
        assert_eq!(
            body,
            json!({"submolt": "general", "title": "Read this", "url": "https://example.com"})
        );
    }

    #[tokio::test]
    async fn discover_with_submolt_issues_search_and_feed() {
        let mut server = Server::new_async().await;
        let search = server
            .mock("GET", "/search")
            .match_query(Matcher::UrlEncoded("q".into(), "quadratic funding".into()))
            .with_status(200)
            .with_body(r#"{"results":[{"id":"r1"}]}"#)
            .create_async()
            .await;
        let feed = server
            .mock("GET", "/submolts/general/feed")
            .with_status(200)
            .with_body(r#"[{"id":"p1"}]"#)
            .create_async()
            .await;

        let discovery = client(&server.url())
            .discover("quadratic funding", Some("general"), None)
            .await
            .expect("discover");

        search.assert_async().await;
        feed.assert_async().await;
        assert_eq!(discovery.results, vec![json!({"id": "r1"})]);
        assert_eq!(discovery.feed, Some(vec![json!({"id": "p1"})]));
    }

    #[tokio::test]
    async fn discover_without_submolt_only_searches() {
        let transport = Arc::new(RecordingTransport::new().respond(200, r#"{"results":[]}"#));
        let client = recording_client(transport.clone());

        let discovery = client.discover("rust", None, Some(3)).await.expect("discover");

        assert_eq!(transport.call_count(), 1);
        assert!(discovery.feed.is_none());
        assert_eq!(
            serde_json::to_value(&discovery).expect("json"),
            json!({"results": []})
        );
    }

    #[tokio::test]
    async fn empty_search_query_fails_before_io() {
        let transport = Arc::new(RecordingTransport::new());
        let err = recording_client(transport.clone())
            .search("  ", None)
            .await
            .expect_err("empty query");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(transport.call_count(), 0);
    }
}

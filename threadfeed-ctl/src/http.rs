use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use threadfeed_client::api::{Comment, CommentId, CommentService, Error, NewComment, PostId};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Comment service reached over the REST api
pub struct HttpCommentService {
    client: reqwest::Client,
    host: String,
    token: String,
}

impl HttpCommentService {
    pub fn new(host: String, token: String) -> anyhow::Result<HttpCommentService> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("building http client")?;
        Ok(HttpCommentService {
            client,
            host: String::from(host.trim_end_matches('/')),
            token,
        })
    }

    async fn send(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = req
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp
            .bytes()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        Err(Error::parse(&body).unwrap_or_else(|e| {
            tracing::debug!(%status, error = ?e, "server sent an unparseable error body");
            match status {
                reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => {
                    Error::PermissionDenied
                }
                _ => Error::Unknown(format!("server answered {status}")),
            }
        }))
    }

    async fn fetch<R>(&self, req: reqwest::RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        self.send(req)
            .await?
            .json()
            .await
            .map_err(|e| Error::Unknown(format!("parsing server response: {e}")))
    }
}

#[async_trait]
impl CommentService for HttpCommentService {
    async fn fetch_comments(&self, post: &PostId) -> Result<Vec<Comment>, Error> {
        let req = self
            .client
            .get(format!("{}/comments", self.host))
            .query(&[("post_id", &post.0)]);
        self.fetch(req).await
    }

    async fn fetch_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error> {
        let req = self
            .client
            .get(format!("{}/comments/{}/replies", self.host, anchor));
        self.fetch(req).await
    }

    async fn fetch_deep_replies(&self, anchor: &CommentId) -> Result<Vec<Comment>, Error> {
        let req = self
            .client
            .get(format!("{}/comments/{}/deep-replies", self.host, anchor));
        self.fetch(req).await
    }

    async fn create_comment(&self, c: NewComment) -> Result<Comment, Error> {
        let req = self.client.post(format!("{}/comments", self.host)).json(&c);
        self.fetch(req).await
    }

    async fn delete_comment(&self, id: &CommentId) -> Result<(), Error> {
        let req = self.client.delete(format!("{}/comments/{}", self.host, id));
        self.send(req).await?;
        Ok(())
    }
}

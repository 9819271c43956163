// ==========================================
// 学校管理系统 - HTTP 传输层
// ==========================================
// 职责: GET/POST/PUT/DELETE、查询参数序列化、JSON/二进制响应
// 鉴权: 本地存储中有令牌时自动附加 Authorization: Bearer
// 红线: 非 2xx 一律返回 TransportError::Status，不在这一层解释业务含义
// ==========================================

use crate::config::ClientConfig;
use crate::storage::{KeyValueStore, TOKEN_KEY};
use crate::transport::error::{TransportError, TransportResult};
use bytes::Bytes;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;

/// 查询参数: (键, 值)，值为 None 时跳过
pub type QueryPair<'a> = (&'a str, Option<String>);

#[derive(Clone)]
pub struct HttpTransport {
    base_url: String,
    http: Client,
    token_store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl HttpTransport {
    /// 按配置创建（超时取自配置）
    pub fn new(config: &ClientConfig, token_store: Arc<dyn KeyValueStore>) -> TransportResult<Self> {
        let http = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self::with_client(&config.base_url, http, token_store))
    }

    /// 使用外部构建的 reqwest Client
    pub fn with_client(base_url: &str, http: Client, token_store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
            token_store,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ==========================================
    // 动词
    // ==========================================

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[QueryPair<'_>],
    ) -> TransportResult<T> {
        let url = self.url(path, query)?;
        tracing::debug!("GET {}", url);
        let response = self.authorized(self.http.get(url)).send().await?;
        Self::json_response(response).await
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        tracing::debug!("POST {}", url);
        let response = self
            .authorized(self.http.post(url))
            .json(body)
            .send()
            .await?;
        Self::json_response(response).await
    }

    pub async fn put<B, T>(&self, path: &str, body: &B) -> TransportResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.url(path, &[])?;
        tracing::debug!("PUT {}", url);
        let response = self
            .authorized(self.http.put(url))
            .json(body)
            .send()
            .await?;
        Self::json_response(response).await
    }

    pub async fn del<T: DeserializeOwned>(&self, path: &str) -> TransportResult<T> {
        let url = self.url(path, &[])?;
        tracing::debug!("DELETE {}", url);
        let response = self.authorized(self.http.delete(url)).send().await?;
        Self::json_response(response).await
    }

    /// 下载二进制内容（导出接口）
    pub async fn get_blob(&self, path: &str, query: &[QueryPair<'_>]) -> TransportResult<Bytes> {
        let url = self.url(path, query)?;
        tracing::debug!("GET(blob) {}", url);
        let response = self.authorized(self.http.get(url)).send().await?;
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        Ok(response.bytes().await?)
    }

    // ==========================================
    // 查询参数
    // ==========================================

    /// 序列化查询参数
    ///
    /// - None 值跳过，保持输入顺序
    /// - 结果为空返回 ""，否则返回 "?k=v&..."（form-urlencoded）
    pub fn build_query(params: &[QueryPair<'_>]) -> String {
        let present: Vec<(&str, &str)> = params
            .iter()
            .filter_map(|(k, v)| v.as_deref().map(|v| (*k, v)))
            .collect();
        if present.is_empty() {
            return String::new();
        }

        let Ok(mut encoder) = Url::parse("http://query.local/") else {
            return String::new();
        };
        encoder.query_pairs_mut().extend_pairs(present);
        match encoder.query() {
            Some(q) => format!("?{}", q),
            None => String::new(),
        }
    }

    // ==========================================
    // Helpers
    // ==========================================

    fn url(&self, path: &str, query: &[QueryPair<'_>]) -> TransportResult<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        let raw = format!("{}{}{}", self.base_url, path, Self::build_query(query));
        Url::parse(&raw).map_err(|e| TransportError::InvalidUrl(format!("{}: {}", raw, e)))
    }

    /// 附加 Bearer 令牌；读取失败时按未登录处理
    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.token_store.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => builder.bearer_auth(token),
            Ok(_) => builder,
            Err(e) => {
                tracing::warn!("读取本地令牌失败，按未登录发送请求: {}", e);
                builder
            }
        }
    }

    async fn json_response<T: DeserializeOwned>(response: Response) -> TransportResult<T> {
        if !response.status().is_success() {
            return Err(Self::status_error(response).await);
        }
        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))
    }

    async fn status_error(response: Response) -> TransportError {
        let status = response.status().as_u16();
        let body = match response.text().await {
            Ok(text) if text.trim().is_empty() => None,
            Ok(text) => Some(
                serde_json::from_str::<serde_json::Value>(&text)
                    .unwrap_or(serde_json::Value::String(text)),
            ),
            Err(e) => {
                tracing::debug!("读取错误响应体失败: status={}, error={}", status, e);
                None
            }
        };
        TransportError::Status { status, body }
    }
}

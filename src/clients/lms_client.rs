//! LMS API 客户端
//!
//! 封装所有与 LMS 后端的 HTTP 交互。Bearer 凭证通过配置显式注入，
//! 每个请求都带上，绝不从全局存储读取。

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::clients::ExamApi;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{
    AttemptHistoryEntry, AttemptRequest, AttemptResult, CertificateRequest, Exam, ModuleInfo,
};

/// LMS API 客户端
pub struct LmsClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl LmsClient {
    /// 创建新的 LMS 客户端
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(ApiError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            bearer_token: config.bearer_token.clone(),
        })
    }

    /// 发送 GET 请求并解析 JSON 响应
    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, ApiError> {
        debug!("GET {}", endpoint);

        let response = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Self::decode(endpoint, response).await
    }

    /// 发送 POST 请求并解析 JSON 响应
    async fn post_json<B: Serialize, T: DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        debug!("POST {}", endpoint);

        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.bearer_token)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        Self::decode(endpoint, response).await
    }

    /// 发送 POST 请求，只关心成功与否，不解析响应体
    async fn post_unit<B: Serialize>(&self, endpoint: &str, body: &B) -> Result<(), ApiError> {
        debug!("POST {}", endpoint);

        let response = self
            .http
            .post(format!("{}{}", self.base_url, endpoint))
            .bearer_auth(&self.bearer_token)
            .json(body)
            .send()
            .await
            .map_err(|source| ApiError::RequestFailed {
                endpoint: endpoint.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(())
    }

    /// 校验状态码并把响应体解析为强类型结构
    async fn decode<T: DeserializeOwned>(
        endpoint: &str,
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::BadStatus {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|source| ApiError::DecodeFailed {
                endpoint: endpoint.to_string(),
                source,
            })
    }
}

#[async_trait]
impl ExamApi for LmsClient {
    async fn fetch_exam(&self, exam_id: u64) -> Result<Exam, ApiError> {
        self.get_json(&format!("/examenes/examenes/{}", exam_id)).await
    }

    async fn fetch_my_attempts(&self, exam_id: u64) -> Result<Vec<AttemptHistoryEntry>, ApiError> {
        self.get_json(&format!("/examenes/examenes/{}/mis-intentos", exam_id))
            .await
    }

    async fn submit_attempt(
        &self,
        exam_id: u64,
        request: &AttemptRequest,
    ) -> Result<AttemptResult, ApiError> {
        self.post_json(&format!("/examenes/examenes/{}/responder", exam_id), request)
            .await
    }

    async fn fetch_module(&self, module_id: u64) -> Result<ModuleInfo, ApiError> {
        self.get_json(&format!("/examenes/modulos/{}", module_id)).await
    }

    async fn issue_certificate(&self, user_id: u64, course_id: u64) -> Result<(), ApiError> {
        self.post_unit(
            "/certificados/emitir",
            &CertificateRequest { user_id, course_id },
        )
        .await
    }
}

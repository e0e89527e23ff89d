// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed entry points for every backend endpoint.
//!
//! Each call goes through [`HttpClient`], so all of them get credential
//! injection, retry and token refresh. Bodies are returned as JSON.

use serde_json::{json, Map, Value};

use crate::endpoints;
use crate::error::ApiResult;
use crate::http::{
    Body, FilePart, HttpClient, Method, ProgressSink, ReqwestTransport, RequestOptions, Transport,
};

/// The backend API.
pub struct Api<T: Transport = ReqwestTransport> {
    http: HttpClient<T>,
}

impl<T: Transport> Api<T> {
    pub fn new(http: HttpClient<T>) -> Self {
        Api { http }
    }

    pub fn http(&self) -> &HttpClient<T> {
        &self.http
    }

    pub fn auth(&self) -> AuthApi<'_, T> {
        AuthApi { http: &self.http }
    }

    pub fn projects(&self) -> ProjectsApi<'_, T> {
        ProjectsApi { http: &self.http }
    }

    pub fn payments(&self) -> PaymentsApi<'_, T> {
        PaymentsApi { http: &self.http }
    }

    pub fn images(&self) -> ImagesApi<'_, T> {
        ImagesApi { http: &self.http }
    }

    pub fn user(&self) -> UserApi<'_, T> {
        UserApi { http: &self.http }
    }
}

pub struct AuthApi<'a, T: Transport> {
    http: &'a HttpClient<T>,
}

impl<T: Transport> AuthApi<'_, T> {
    /// Exchanges an OAuth authorization code for a session.
    pub async fn callback(&self, code: &str) -> ApiResult<Value> {
        self.http
            .send(Method::Post, endpoints::AUTH_CALLBACK, Some(json!({ "code": code })))
            .await
    }

    pub async fn verify(&self) -> ApiResult<Value> {
        self.http.send(Method::Get, endpoints::AUTH_VERIFY, None).await
    }

    pub async fn logout(&self) -> ApiResult<Value> {
        self.http.send(Method::Post, endpoints::AUTH_LOGOUT, None).await
    }

    pub async fn refresh(&self, refresh_token: &str) -> ApiResult<Value> {
        self.http
            .send(
                Method::Post,
                endpoints::AUTH_REFRESH,
                Some(json!({ "refresh_token": refresh_token })),
            )
            .await
    }
}

pub struct ProjectsApi<'a, T: Transport> {
    http: &'a HttpClient<T>,
}

impl<T: Transport> ProjectsApi<'_, T> {
    pub async fn list(&self) -> ApiResult<Value> {
        self.http.send(Method::Get, endpoints::PROJECTS, None).await
    }

    pub async fn get(&self, id: &str) -> ApiResult<Value> {
        self.http.send(Method::Get, &endpoints::project(id), None).await
    }

    pub async fn create(&self, data: Value) -> ApiResult<Value> {
        self.http.send(Method::Post, endpoints::PROJECTS, Some(data)).await
    }

    /// Updates a project. The id travels in the body, not the path.
    pub async fn update(&self, id: &str, data: Value) -> ApiResult<Value> {
        let body = with_fields([("id", json!(id))], data);
        self.http.send(Method::Put, endpoints::PROJECTS, Some(body)).await
    }

    pub async fn delete(&self, id: &str) -> ApiResult<Value> {
        self.http
            .send(Method::Delete, &endpoints::project(id), None)
            .await
    }

    pub async fn publish(&self, id: &str, data: Value) -> ApiResult<Value> {
        self.http
            .send(Method::Post, &endpoints::project_publish(id), Some(data))
            .await
    }
}

pub struct PaymentsApi<'a, T: Transport> {
    http: &'a HttpClient<T>,
}

impl<T: Transport> PaymentsApi<'_, T> {
    pub async fn create_order(&self, plan_type: &str) -> ApiResult<Value> {
        self.http
            .send(
                Method::Post,
                endpoints::PAYMENT_CREATE_ORDER,
                Some(json!({ "plan_type": plan_type })),
            )
            .await
    }

    pub async fn complete_order(&self, order_id: &str, payment: Value) -> ApiResult<Value> {
        let body = with_fields([("order_id", json!(order_id))], payment);
        self.http
            .send(Method::Post, endpoints::PAYMENT_COMPLETE_ORDER, Some(body))
            .await
    }

    pub async fn verify_apple(
        &self,
        receipt: &str,
        product_id: &str,
        transaction_id: &str,
    ) -> ApiResult<Value> {
        let body = json!({
            "receipt": receipt,
            "productId": product_id,
            "transactionId": transaction_id,
        });
        self.http
            .send(Method::Post, endpoints::PAYMENT_VERIFY_APPLE, Some(body))
            .await
    }

    pub async fn verify_google(&self, purchase_token: &str, product_id: &str) -> ApiResult<Value> {
        let body = json!({ "purchaseToken": purchase_token, "productId": product_id });
        self.http
            .send(Method::Post, endpoints::PAYMENT_VERIFY_GOOGLE, Some(body))
            .await
    }
}

/// An image to upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub data: Vec<u8>,
    pub file_name: String,
    pub content_type: String,
    pub folder: Option<String>,
}

pub struct ImagesApi<'a, T: Transport> {
    http: &'a HttpClient<T>,
}

impl<T: Transport> ImagesApi<'_, T> {
    /// Uploads an image as `multipart/form-data`.
    ///
    /// `progress` receives whole percentages as the body is sent.
    pub async fn upload(
        &self,
        image: ImageUpload,
        progress: Option<ProgressSink>,
    ) -> ApiResult<Value> {
        let fields = image
            .folder
            .map(|folder| vec![("folder".to_string(), folder)])
            .unwrap_or_default();
        let body = Body::Multipart {
            fields,
            file: FilePart {
                field: "file".to_string(),
                file_name: image.file_name,
                content_type: image.content_type,
                data: image.data,
            },
        };
        let mut options = RequestOptions::default();
        if let Some(sink) = progress {
            options = options.progress(sink);
        }
        self.http
            .send_with(Method::Post, endpoints::IMAGES_UPLOAD, Some(body), options)
            .await
    }

    pub async fn list(&self, folder: Option<&str>) -> ApiResult<Value> {
        let mut options = RequestOptions::default();
        if let Some(folder) = folder {
            options = options.query("folder", folder);
        }
        self.http
            .send_with(Method::Get, endpoints::IMAGES_LIST, None, options)
            .await
    }
}

pub struct UserApi<'a, T: Transport> {
    http: &'a HttpClient<T>,
}

impl<T: Transport> UserApi<'_, T> {
    pub async fn profile(&self) -> ApiResult<Value> {
        self.http.send(Method::Get, endpoints::USER_PROFILE, None).await
    }

    pub async fn update_profile(&self, data: Value) -> ApiResult<Value> {
        self.http
            .send(Method::Post, endpoints::USER_PROFILE, Some(data))
            .await
    }

    pub async fn preferences(&self) -> ApiResult<Value> {
        self.http
            .send(Method::Get, endpoints::USER_PREFERENCES, None)
            .await
    }

    pub async fn update_preferences(&self, data: Value) -> ApiResult<Value> {
        self.http
            .send(Method::Post, endpoints::USER_PREFERENCES, Some(data))
            .await
    }

    pub async fn register_push_token(&self, token: &str) -> ApiResult<Value> {
        self.http
            .send(
                Method::Post,
                endpoints::USER_PUSH_TOKEN,
                Some(json!({ "push_token": token })),
            )
            .await
    }
}

/// Merges `fields` into `data`. Fields in `data` win; non-object data is
/// dropped.
fn with_fields<const N: usize>(fields: [(&str, Value); N], data: Value) -> Value {
    let mut body: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    if let Value::Object(extra) = data {
        body.extend(extra);
    }
    Value::Object(body)
}

#[cfg(test)]
#[path = "api_tests.rs"]
mod tests;

//! HTTP client for the storefront REST API.
//!
//! Wraps `reqwest` with the storefront's `{ "data": ... }` envelope, typed
//! errors and request tracing. Reads are retried on transient failures. Cart
//! mutations are sent exactly once.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use treadline_core::{
    AppConfig, Brand, Cart, Category, Diameter, DrivingType, Make, Model, Product, ProductType,
    Ratio, RefId, SizeCatalog, TireProduct, TireSize, Trim, WheelProduct, Width, Year,
};
use uuid::Uuid;

use crate::error::ClientError;
use crate::retry::RetryPolicy;
use crate::types::{Envelope, QuantityUpdate, ServiceSync};

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Reads one record from the `product_type` collection. A record whose own
/// `productType` names the other type is refused; an untagged record takes the
/// collection's type.
fn parse_product(value: serde_json::Value, product_type: ProductType) -> Result<Product, String> {
    if let Some(tag) = value.get("productType").and_then(serde_json::Value::as_str) {
        if !tag.trim().eq_ignore_ascii_case(&product_type.to_string()) {
            return Err(format!(
                "record tagged \"{tag}\" returned by /{}",
                product_type.collection()
            ));
        }
    }
    let parsed = match product_type {
        ProductType::Tire => serde_json::from_value::<TireProduct>(value).map(Product::Tire),
        ProductType::Wheel => serde_json::from_value::<WheelProduct>(value).map(Product::Wheel),
    };
    parsed.map_err(|e| e.to_string())
}

/// Client for the storefront REST API.
///
/// Use [`ApiClient::from_config`] in the binary or [`ApiClient::with_base_url`]
/// to point at a mock server in tests.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
    api_token: Option<String>,
    retry: RetryPolicy,
}

impl ApiClient {
    /// Builds a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn from_config(config: &AppConfig) -> Result<Self, ClientError> {
        let mut client = Self::build(
            &config.api_base_url,
            config.http_timeout_secs,
            &config.user_agent,
        )?
        .with_retry_policy(RetryPolicy::from_config(config));
        client.api_token.clone_from(&config.api_token);
        Ok(client)
    }

    /// Creates a client with a custom base URL and no retries (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`ApiClient::from_config`].
    pub fn with_base_url(base_url: &str, timeout_secs: u64) -> Result<Self, ClientError> {
        Self::build(base_url, timeout_secs, "treadline-test/0.1")
    }

    fn build(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Normalise to exactly one trailing slash so path segments are appended
        // below the API root rather than replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            base_url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: "URL cannot carry a path".to_owned(),
            });
        }

        Ok(Self {
            client,
            base_url: parsed,
            api_token: None,
            retry: RetryPolicy::default(),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(token.into());
        self
    }

    // ---------------------------------------------------------------------
    // Reference data
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn years(&self) -> Result<Vec<Year>, ClientError> {
        self.get_data(&["years"], &[], "years").await
    }

    /// Makes offered for `year`.
    ///
    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn makes(&self, year: &str) -> Result<Vec<Make>, ClientError> {
        self.get_data(&["makes"], &[("year", year)], "makes").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn models(&self, year: &str, make: &str) -> Result<Vec<Model>, ClientError> {
        self.get_data(&["models"], &[("year", year), ("make", make)], "models")
            .await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn trims(
        &self,
        year: &str,
        make: &str,
        model: &str,
    ) -> Result<Vec<Trim>, ClientError> {
        self.get_data(
            &["trims"],
            &[("year", year), ("make", make), ("model", model)],
            "trims",
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn tire_sizes(
        &self,
        year: &str,
        make: &str,
        model: &str,
        trim: &str,
    ) -> Result<Vec<TireSize>, ClientError> {
        self.get_data(
            &["tire-sizes"],
            &[
                ("year", year),
                ("make", make),
                ("model", model),
                ("trim", trim),
            ],
            "tire sizes",
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn widths(&self) -> Result<Vec<Width>, ClientError> {
        self.get_data(&["widths"], &[], "widths").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn ratios(&self) -> Result<Vec<Ratio>, ClientError> {
        self.get_data(&["ratios"], &[], "ratios").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn diameters(&self) -> Result<Vec<Diameter>, ClientError> {
        self.get_data(&["diameters"], &[], "diameters").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn brands(&self) -> Result<Vec<Brand>, ClientError> {
        self.get_data(&["brands"], &[], "brands").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_data(&["categories"], &[], "categories").await
    }

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn driving_types(&self) -> Result<Vec<DrivingType>, ClientError> {
        self.get_data(&["driving-types"], &[], "driving types").await
    }

    /// Fetches widths, ratios and diameters concurrently.
    ///
    /// The three requests are independent; whichever fails first aborts the
    /// others and its error is returned.
    ///
    /// # Errors
    ///
    /// Propagates the first error from any of the three requests.
    pub async fn size_catalog(&self) -> Result<SizeCatalog, ClientError> {
        let (widths, ratios, diameters) =
            futures::try_join!(self.widths(), self.ratios(), self.diameters())?;
        Ok(SizeCatalog {
            widths,
            ratios,
            diameters,
        })
    }

    // ---------------------------------------------------------------------
    // Products
    // ---------------------------------------------------------------------

    /// Fetches every product of `product_type`.
    ///
    /// Each record is validated individually. Records that do not match the
    /// product shape are skipped with a warning rather than failing the list.
    ///
    /// # Errors
    ///
    /// Propagates request and status errors, and [`ClientError::Deserialize`]
    /// if the envelope itself is not a list.
    pub async fn products(&self, product_type: ProductType) -> Result<Vec<Product>, ClientError> {
        let raw: Vec<serde_json::Value> = self
            .get_data(&[product_type.collection()], &[], product_type.collection())
            .await?;
        let total = raw.len();

        let products: Vec<Product> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let parsed = parse_product(value, product_type);
                match parsed {
                    Ok(product) => Some(product),
                    Err(reason) => {
                        tracing::warn!(
                            %product_type,
                            index,
                            %reason,
                            "skipping product record"
                        );
                        None
                    }
                }
            })
            .collect();

        tracing::debug!(
            %product_type,
            total,
            kept = products.len(),
            "fetched product list"
        );
        Ok(products)
    }

    // ---------------------------------------------------------------------
    // Cart
    // ---------------------------------------------------------------------

    /// # Errors
    ///
    /// Propagates request, status and deserialization errors.
    pub async fn get_cart(&self, user: &str) -> Result<Cart, ClientError> {
        self.get_data(&["cart", user], &[], "cart").await
    }

    /// # Errors
    ///
    /// Propagates request and status errors. Not retried.
    pub async fn update_item(
        &self,
        user: &str,
        product: &RefId,
        quantity: u32,
    ) -> Result<(), ClientError> {
        self.send_mutation(
            Method::PUT,
            &["cart", user, "items", product.as_str()],
            Some(&QuantityUpdate { quantity }),
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates request and status errors. Not retried.
    pub async fn update_services(
        &self,
        user: &str,
        product: &RefId,
        services: &ServiceSync,
    ) -> Result<(), ClientError> {
        self.send_mutation(
            Method::PUT,
            &["cart", user, "items", product.as_str(), "services"],
            Some(services),
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates request and status errors. Not retried.
    pub async fn remove_item(&self, user: &str, product: &RefId) -> Result<(), ClientError> {
        self.send_mutation::<()>(
            Method::DELETE,
            &["cart", user, "items", product.as_str()],
            None,
        )
        .await
    }

    /// # Errors
    ///
    /// Propagates request and status errors. Not retried.
    pub async fn clear_cart(&self, user: &str) -> Result<(), ClientError> {
        self.send_mutation::<()>(Method::DELETE, &["cart", user], None)
            .await
    }

    // ---------------------------------------------------------------------
    // Plumbing
    // ---------------------------------------------------------------------

    /// Builds an endpoint URL below the API root. Path segments are
    /// percent-encoded; empty query values are omitted.
    fn endpoint(&self, segments: &[&str], query: &[(&str, &str)]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidBaseUrl {
                base_url: self.base_url.to_string(),
                reason: "URL cannot carry a path".to_owned(),
            })?
            .pop_if_empty()
            .extend(segments);

        let params: Vec<_> = query.iter().filter(|(_, v)| !v.is_empty()).collect();
        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        tracing::debug!(%method, %url, request_id, "storefront API request");
        let builder = self
            .client
            .request(method, url)
            .header(REQUEST_ID_HEADER, request_id);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn check_status(response: Response) -> Result<Response, ClientError> {
        let status = response.status();
        let url = response.url().to_string();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound { url });
        }
        if !status.is_success() {
            return Err(ClientError::UnexpectedStatus {
                status: status.as_u16(),
                url,
            });
        }
        Ok(response)
    }

    async fn get_data<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
        context: &str,
    ) -> Result<T, ClientError> {
        let url = self.endpoint(segments, query)?;

        self.retry.run(|| {
            let url = url.clone();
            async move {
                let response = self.request(Method::GET, url).send().await?;
                let body = Self::check_status(response)?.text().await?;
                let envelope: Envelope<T> =
                    serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                        context: context.to_owned(),
                        source: e,
                    })?;
                Ok(envelope.data)
            }
        })
        .await
    }

    async fn send_mutation<B: Serialize + ?Sized>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> Result<(), ClientError> {
        let url = self.endpoint(segments, &[])?;
        let mut request = self.request(method, url);
        if let Some(body) = body {
            request = request.json(body);
        }
        Self::check_status(request.send().await?)?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;

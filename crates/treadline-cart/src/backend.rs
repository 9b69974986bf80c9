//! The cart operations a [`CartSession`](crate::CartSession) needs from the
//! backend, abstracted so sessions can be driven against a test double.

use std::future::Future;

use treadline_client::{ApiClient, ClientError, ServiceSync};
use treadline_core::{Cart, RefId};

pub trait CartBackend: Send + Sync {
    fn get_cart(&self, user: &str) -> impl Future<Output = Result<Cart, ClientError>> + Send;

    fn update_item(
        &self,
        user: &str,
        product: &RefId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn update_services(
        &self,
        user: &str,
        product: &RefId,
        services: &ServiceSync,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn remove_item(
        &self,
        user: &str,
        product: &RefId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send;

    fn clear_cart(&self, user: &str) -> impl Future<Output = Result<(), ClientError>> + Send;
}

impl CartBackend for ApiClient {
    fn get_cart(&self, user: &str) -> impl Future<Output = Result<Cart, ClientError>> + Send {
        ApiClient::get_cart(self, user)
    }

    fn update_item(
        &self,
        user: &str,
        product: &RefId,
        quantity: u32,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        ApiClient::update_item(self, user, product, quantity)
    }

    fn update_services(
        &self,
        user: &str,
        product: &RefId,
        services: &ServiceSync,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        ApiClient::update_services(self, user, product, services)
    }

    fn remove_item(
        &self,
        user: &str,
        product: &RefId,
    ) -> impl Future<Output = Result<(), ClientError>> + Send {
        ApiClient::remove_item(self, user, product)
    }

    fn clear_cart(&self, user: &str) -> impl Future<Output = Result<(), ClientError>> + Send {
        ApiClient::clear_cart(self, user)
    }
}

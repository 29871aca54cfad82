//! Product registration.

use tracing::{debug, info};

use super::rejected;
use crate::error::CoreResult;
use crate::repository::ProductRepository;
use crate::request::ProductRequest;
use crate::types::Product;
use crate::validation::{validate_name, validate_price};

#[derive(Debug, Clone)]
pub struct ProductService<P> {
    products: P,
}

impl<P: ProductRepository> ProductService<P> {
    pub fn new(products: P) -> Self {
        ProductService { products }
    }

    /// Registers a product with a valid name and a non-negative price.
    pub async fn create(&self, request: ProductRequest) -> CoreResult<Product> {
        debug!(name = %request.name, price = %request.price, "Creating product");

        validate_name("name", &request.name).map_err(rejected)?;
        validate_price("price", request.price).map_err(rejected)?;

        let product = self
            .products
            .save(Product {
                id: None,
                name: request.name,
                price: request.price,
            })
            .await?;

        info!(product_id = ?product.id, name = %product.name, "Product created");
        Ok(product)
    }

    pub async fn list(&self) -> CoreResult<Vec<Product>> {
        Ok(self.products.find_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::ValidationError;
    use crate::money::Money;
    use crate::repository::memory::MemoryStore;
    use crate::request::ProductRequest;

    fn request(name: &str, price: i64) -> ProductRequest {
        ProductRequest {
            name: name.to_string(),
            price: Money::from_minor(price),
        }
    }

    #[tokio::test]
    async fn test_create_and_list_products() {
        let store = MemoryStore::new();
        let service = store.product_service();

        let product = service.create(request("Fried chicken", 16000)).await.unwrap();
        assert_eq!(product.id, Some(1));

        service.create(request("Free pickles", 0)).await.unwrap();
        assert_eq!(service.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_products_are_rejected() {
        let store = MemoryStore::new();
        let service = store.product_service();

        let err = service.create(request("Fried chicken", -1)).await.unwrap_err();
        assert!(matches!(
            err.validation(),
            Some(ValidationError::NegativePrice { value: -1, .. })
        ));

        let err = service.create(request(" ", 1000)).await.unwrap_err();
        assert!(err.is_invalid_argument());

        let err = service
            .create(request(&"x".repeat(256), 1000))
            .await
            .unwrap_err();
        assert!(err.is_invalid_argument());

        assert!(store.products.is_empty().await);
    }
}

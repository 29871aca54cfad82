//! # Menu Service
//!
//! Menu registration. A menu bundles products under a menu group and may
//! be priced at or below what its products cost separately:
//!
//! ```text
//!   menu.price  <=  Σ product.price × menu_product.quantity
//! ```

use tracing::{debug, info};

use super::{assigned_id, rejected};
use crate::error::{CoreResult, ValidationError};
use crate::money::Money;
use crate::repository::{
    MenuGroupRepository, MenuProductRepository, MenuRepository, ProductRepository,
};
use crate::request::MenuRequest;
use crate::types::{Menu, MenuProduct};
use crate::validation::{
    add_menu_product_price, validate_menu_price, validate_name, validate_price,
};

#[derive(Debug, Clone)]
pub struct MenuService<M, P, G, MP> {
    menus: M,
    products: P,
    menu_groups: G,
    menu_products: MP,
}

impl<M, P, G, MP> MenuService<M, P, G, MP>
where
    M: MenuRepository,
    P: ProductRepository,
    G: MenuGroupRepository,
    MP: MenuProductRepository,
{
    pub fn new(menus: M, products: P, menu_groups: G, menu_products: MP) -> Self {
        MenuService {
            menus,
            products,
            menu_groups,
            menu_products,
        }
    }

    /// Registers a menu and its products.
    ///
    /// ## Rejected When
    /// - The name is blank or too long, or the price is negative
    /// - The menu group does not exist
    /// - A referenced product does not exist
    /// - The price exceeds the sum of its products
    /// - The sum of its products overflows
    pub async fn create(&self, request: MenuRequest) -> CoreResult<Menu> {
        debug!(
            name = %request.name,
            price = %request.price,
            menu_group_id = request.menu_group_id,
            "Creating menu"
        );

        validate_name("name", &request.name).map_err(rejected)?;
        validate_price("price", request.price).map_err(rejected)?;

        if !self.menu_groups.exists_by_id(request.menu_group_id).await? {
            return Err(rejected(ValidationError::MenuGroupNotFound(
                request.menu_group_id,
            )));
        }

        let mut products_sum = Money::zero();
        for menu_product in &request.menu_products {
            let product = self
                .products
                .find_by_id(menu_product.product_id)
                .await?
                .ok_or(ValidationError::ProductNotFound(menu_product.product_id))
                .map_err(rejected)?;
            products_sum = add_menu_product_price(
                products_sum,
                menu_product.product_id,
                product.price,
                menu_product.quantity,
            )
            .map_err(rejected)?;
        }
        validate_menu_price(request.price, products_sum).map_err(rejected)?;

        let mut menu = self
            .menus
            .save(Menu {
                id: None,
                name: request.name,
                price: request.price,
                menu_group_id: request.menu_group_id,
                menu_products: Vec::new(),
            })
            .await?;
        let menu_id = assigned_id(&menu)?;

        let mut saved = Vec::with_capacity(request.menu_products.len());
        for menu_product in request.menu_products {
            saved.push(
                self.menu_products
                    .save(MenuProduct {
                        seq: None,
                        menu_id: Some(menu_id),
                        product_id: menu_product.product_id,
                        quantity: menu_product.quantity,
                    })
                    .await?,
            );
        }
        menu.menu_products = saved;

        info!(menu_id, name = %menu.name, products = menu.menu_products.len(), "Menu created");
        Ok(menu)
    }

    /// Lists every menu with its products.
    pub async fn list(&self) -> CoreResult<Vec<Menu>> {
        let mut menus = self.menus.find_all().await?;
        for menu in &mut menus {
            let menu_id = assigned_id(menu)?;
            menu.menu_products = self.menu_products.find_all_by_menu_id(menu_id).await?;
        }
        Ok(menus)
    }
}

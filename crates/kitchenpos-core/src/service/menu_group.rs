//! Menu group registration.

use tracing::info;

use super::rejected;
use crate::error::CoreResult;
use crate::repository::MenuGroupRepository;
use crate::request::MenuGroupRequest;
use crate::types::MenuGroup;
use crate::validation::validate_name;

#[derive(Debug, Clone)]
pub struct MenuGroupService<G> {
    menu_groups: G,
}

impl<G: MenuGroupRepository> MenuGroupService<G> {
    pub fn new(menu_groups: G) -> Self {
        MenuGroupService { menu_groups }
    }

    pub async fn create(&self, request: MenuGroupRequest) -> CoreResult<MenuGroup> {
        validate_name("name", &request.name).map_err(rejected)?;

        let group = self
            .menu_groups
            .save(MenuGroup {
                id: None,
                name: request.name,
            })
            .await?;

        info!(menu_group_id = ?group.id, name = %group.name, "Menu group created");
        Ok(group)
    }

    pub async fn list(&self) -> CoreResult<Vec<MenuGroup>> {
        Ok(self.menu_groups.find_all().await?)
    }
}

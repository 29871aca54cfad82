//! End-to-end restaurant flow against an in-memory SQLite database.

use kitchenpos_core::{
    CoreError, Id, MenuGroupRequest, MenuProductRequest, MenuRequest, Money, NumberOfGuestsRequest,
    OrderLineItemRequest, OrderRequest, OrderStatus, OrderStatusRequest, OrderTableRequest,
    ProductRequest, TableEmptyRequest, TableGroupRequest, ValidationError,
};
use kitchenpos_core::repository::Repository;
use kitchenpos_db::{Database, DbConfig};

async fn setup() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn temp_db_path(name: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!(
        "kitchenpos-{}-{}.db",
        name,
        std::process::id()
    ));
    remove_db_files(&path);
    path
}

fn remove_db_files(path: &std::path::Path) {
    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
    }
}

async fn menu(db: &Database) -> Id {
    let product = db
        .product_service()
        .create(ProductRequest {
            name: "Fried Chicken".into(),
            price: Money::from_minor(16_000),
        })
        .await
        .unwrap();
    let group = db
        .menu_group_service()
        .create(MenuGroupRequest {
            name: "Double Menus".into(),
        })
        .await
        .unwrap();

    let menu = db
        .menu_service()
        .create(MenuRequest {
            name: "Fried Double".into(),
            price: Money::from_minor(30_000),
            menu_group_id: group.id.unwrap(),
            menu_products: vec![MenuProductRequest {
                product_id: product.id.unwrap(),
                quantity: 2,
            }],
        })
        .await
        .unwrap();
    assert_eq!(menu.menu_products.len(), 1);
    menu.id.unwrap()
}

async fn empty_table(db: &Database) -> Id {
    db.table_service()
        .create(OrderTableRequest {
            number_of_guests: 0,
            empty: true,
        })
        .await
        .unwrap()
        .id
        .unwrap()
}

#[tokio::test]
async fn test_dinner_service_from_seating_to_completion() {
    let db = setup().await;
    let menu_id = menu(&db).await;
    let table_id = empty_table(&db).await;
    let tables = db.table_service();
    let orders = db.order_service();

    // Guests sit down
    tables
        .change_empty(table_id, TableEmptyRequest { empty: false })
        .await
        .unwrap();
    let seated = tables
        .change_number_of_guests(table_id, NumberOfGuestsRequest { number_of_guests: 4 })
        .await
        .unwrap();
    assert_eq!(seated.number_of_guests, 4);

    let order = orders
        .create(OrderRequest {
            order_table_id: table_id,
            order_line_items: vec![OrderLineItemRequest { menu_id, quantity: 2 }],
        })
        .await
        .unwrap();
    let order_id = order.id.unwrap();
    assert_eq!(order.order_status, OrderStatus::Cooking);
    assert_eq!(order.order_line_items.len(), 1);
    assert_eq!(order.order_line_items[0].order_id, Some(order_id));

    // The table cannot be cleared while the kitchen is busy
    let err = tables
        .change_empty(table_id, TableEmptyRequest { empty: true })
        .await
        .unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::OrderInProgress(table_id)));

    for status in [OrderStatus::Meal, OrderStatus::Completion] {
        let changed = orders
            .change_order_status(order_id, OrderStatusRequest { order_status: status })
            .await
            .unwrap();
        assert_eq!(changed.order_status, status);
    }

    let err = orders
        .change_order_status(
            order_id,
            OrderStatusRequest {
                order_status: OrderStatus::Cooking,
            },
        )
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let cleared = tables
        .change_empty(table_id, TableEmptyRequest { empty: true })
        .await
        .unwrap();
    assert!(cleared.empty);
    assert_eq!(cleared.number_of_guests, 4);

    let listed = orders.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].order_status, OrderStatus::Completion);
    assert_eq!(listed[0].order_line_items.len(), 1);
}

#[tokio::test]
async fn test_order_for_unknown_menu_writes_nothing() {
    let db = setup().await;
    let table_id = empty_table(&db).await;
    db.table_service()
        .change_empty(table_id, TableEmptyRequest { empty: false })
        .await
        .unwrap();

    let err = db
        .order_service()
        .create(OrderRequest {
            order_table_id: table_id,
            order_line_items: vec![OrderLineItemRequest {
                menu_id: 42,
                quantity: 1,
            }],
        })
        .await
        .unwrap_err();

    assert!(err.is_invalid_argument());
    assert!(db.order_service().list().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_group_and_ungroup_tables() {
    let db = setup().await;
    let menu_id = menu(&db).await;
    let first = empty_table(&db).await;
    let second = empty_table(&db).await;
    let groups = db.table_group_service();

    let group = groups
        .create(TableGroupRequest::of([first, second]))
        .await
        .unwrap();
    let group_id = group.id.unwrap();
    assert_eq!(group.order_tables.len(), 2);
    for table in &group.order_tables {
        assert_eq!(table.table_group_id, Some(group_id));
        assert!(!table.empty);
    }

    // A grouped table can neither be emptied nor joined to another group
    let err = db
        .table_service()
        .change_empty(first, TableEmptyRequest { empty: true })
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    let third = empty_table(&db).await;
    let err = groups
        .create(TableGroupRequest::of([first, third]))
        .await
        .unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::OrderTableNotGroupable(first)));

    // An order in the kitchen blocks ungrouping
    let order = db
        .order_service()
        .create(OrderRequest {
            order_table_id: second,
            order_line_items: vec![OrderLineItemRequest { menu_id, quantity: 1 }],
        })
        .await
        .unwrap();
    let err = groups.ungroup(group_id).await.unwrap_err();
    assert_eq!(
        err.validation(),
        Some(&ValidationError::TableGroupOrderInProgress(group_id))
    );

    db.order_service()
        .change_order_status(
            order.id.unwrap(),
            OrderStatusRequest {
                order_status: OrderStatus::Completion,
            },
        )
        .await
        .unwrap();
    groups.ungroup(group_id).await.unwrap();

    let tables = db.table_service().list().await.unwrap();
    assert!(tables.iter().all(|t| t.table_group_id.is_none()));
    assert!(tables
        .iter()
        .filter(|t| t.id == Some(first) || t.id == Some(second))
        .all(|t| !t.empty));
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    let path = temp_db_path("lifecycle");

    {
        let db = Database::new(DbConfig::new(&path)).await.unwrap();
        empty_table(&db).await;
        db.close().await;
    }

    let db = Database::new(DbConfig::new(&path)).await.unwrap();
    let tables = db.table_service().list().await.unwrap();
    assert_eq!(tables.len(), 1);
    assert!(tables[0].empty);
    db.close().await;

    remove_db_files(&path);
}

#[tokio::test]
async fn test_concurrent_groups_cannot_share_a_table() {
    let db = setup().await;
    let first = empty_table(&db).await;
    let shared = empty_table(&db).await;
    let third = empty_table(&db).await;
    let groups = db.table_group_service();

    let (left, right) = tokio::join!(
        groups.create(TableGroupRequest::of([first, shared])),
        groups.create(TableGroupRequest::of([shared, third])),
    );

    let created: Vec<_> = [&left, &right].into_iter().filter_map(|r| r.as_ref().ok()).collect();
    assert_eq!(created.len(), 1);
    let loser = [left.as_ref(), right.as_ref()]
        .into_iter()
        .find_map(|r| r.err())
        .unwrap();
    assert_eq!(loser.validation(), Some(&ValidationError::OrderTableNotGroupable(shared)));

    let group = created[0];
    let group_id = group.id.unwrap();
    assert_eq!(db.table_groups().find_all().await.unwrap().len(), 1);

    let tables = db.table_service().list().await.unwrap();
    let members: Vec<_> = tables
        .iter()
        .filter(|t| t.table_group_id == Some(group_id))
        .collect();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|t| t.id == Some(shared)));
    assert!(members.iter().all(|t| !t.empty));

    // The table left out is still free
    let outsider = tables
        .iter()
        .find(|t| t.table_group_id.is_none())
        .unwrap();
    assert!(outsider.empty);
}

#[tokio::test]
async fn test_concurrent_order_and_clearing_on_file_database() {
    let path = temp_db_path("concurrent");
    let db = Database::new(DbConfig::new(&path).max_connections(4))
        .await
        .unwrap();
    let menu_id = menu(&db).await;
    let table_id = empty_table(&db).await;
    db.table_service()
        .change_empty(table_id, TableEmptyRequest { empty: false })
        .await
        .unwrap();

    let orders = db.order_service();
    let tables = db.table_service();
    let (ordered, cleared) = tokio::join!(
        orders.create(OrderRequest {
            order_table_id: table_id,
            order_line_items: vec![OrderLineItemRequest { menu_id, quantity: 1 }],
        }),
        tables.change_empty(table_id, TableEmptyRequest { empty: true }),
    );

    // Whichever runs second sees the first one's commit
    match (&ordered, &cleared) {
        (Ok(_), Err(err)) => {
            assert_eq!(err.validation(), Some(&ValidationError::OrderInProgress(table_id)));
            assert_eq!(orders.list().await.unwrap().len(), 1);
        }
        (Err(err), Ok(table)) => {
            assert_eq!(err.validation(), Some(&ValidationError::OrderTableEmpty(table_id)));
            assert!(table.empty);
            assert!(orders.list().await.unwrap().is_empty());
        }
        other => panic!("expected exactly one call to succeed, got {:?}", other),
    }

    db.close().await;
    remove_db_files(&path);
}

#[tokio::test]
async fn test_failed_unit_of_work_leaves_tables_untouched() {
    let db = setup().await;
    let first = empty_table(&db).await;
    let second = empty_table(&db).await;

    let err = db
        .transaction(|session| async move {
            let group = session
                .table_group_service()
                .create(TableGroupRequest::of([first, second]))
                .await?;
            let group_id = group.id.unwrap_or_default();
            Err::<(), CoreError>(ValidationError::TableGroupOrderInProgress(group_id).into())
        })
        .await
        .unwrap_err();
    assert!(err.is_invalid_argument());

    assert!(db.table_groups().find_all().await.unwrap().is_empty());
    let tables = db.table_service().list().await.unwrap();
    assert_eq!(tables.len(), 2);
    for table in tables {
        assert!(table.empty);
        assert_eq!(table.table_group_id, None);
    }
}

#[tokio::test]
async fn test_rejected_group_leaves_tables_untouched() {
    let db = setup().await;
    let free = empty_table(&db).await;
    let occupied = empty_table(&db).await;
    db.table_service()
        .change_empty(occupied, TableEmptyRequest { empty: false })
        .await
        .unwrap();

    let err = db
        .table_group_service()
        .create(TableGroupRequest::of([free, occupied]))
        .await
        .unwrap_err();
    assert_eq!(err.validation(), Some(&ValidationError::OrderTableNotGroupable(occupied)));

    assert!(db.table_groups().find_all().await.unwrap().is_empty());
    let tables = db.table_service().list().await.unwrap();
    let free_table = tables.iter().find(|t| t.id == Some(free)).unwrap();
    assert!(free_table.empty);
    assert_eq!(free_table.table_group_id, None);
}

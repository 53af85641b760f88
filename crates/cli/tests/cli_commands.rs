//! Command dispatch against an in-memory backend and a temporary data dir.

use cli::{App, CliError, Command};
use client::{ClientError, InMemoryStorefrontApi, User};
use common::{CategoryId, ProductId, UserId};
use domain::{Category, DomainError, Money, Product, SortOrder};
use tempfile::TempDir;

fn product(id: i64, name: &str, cents: i64, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        description: Some(format!("About {name}")),
        price: Money::from_cents(cents),
        stock,
        category_id: Some(CategoryId::new(1)),
        supplier_id: None,
        image_url: None,
        created_at: None,
    }
}

fn setup() -> (App<InMemoryStorefrontApi>, InMemoryStorefrontApi, TempDir) {
    let api = InMemoryStorefrontApi::with_catalog(
        vec![
            product(1, "Elden Ring", 5999, 10),
            product(2, "Celeste", 1999, 10),
            product(3, "Sold Out", 999, 0),
        ],
        vec![Category {
            id: CategoryId::new(1),
            name: "Games".to_string(),
        }],
    );
    api.add_user(
        "ada@example.com",
        "pw",
        User {
            id: UserId::new(4),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            role_id: None,
            role: None,
        },
    );
    let dir = tempfile::tempdir().unwrap();
    (App::new(api.clone(), dir.path()), api, dir)
}

async fn run(app: &App<InMemoryStorefrontApi>, command: Command) -> Result<String, CliError> {
    let mut out = Vec::new();
    app.run(command, &mut out).await?;
    Ok(String::from_utf8(out).unwrap())
}

fn add(id: i64, quantity: u32) -> Command {
    Command::Add {
        id: ProductId::new(id),
        quantity,
    }
}

#[tokio::test]
async fn catalog_lists_sorted_products() {
    let (app, _, _dir) = setup();

    let text = run(
        &app,
        Command::Catalog {
            category: None,
            min_price: None,
            max_price: Some(Money::from_cents(6000)),
            sort: SortOrder::PriceAscending,
        },
    )
    .await
    .unwrap();

    let sold_out = text.find("Sold Out").unwrap();
    let celeste = text.find("Celeste").unwrap();
    let elden = text.find("Elden Ring").unwrap();
    assert!(sold_out < celeste && celeste < elden);
    assert!(text.contains("3 product(s)"));
}

#[tokio::test]
async fn catalog_rejects_inverted_price_range() {
    let (app, _, _dir) = setup();

    let result = run(
        &app,
        Command::Catalog {
            category: None,
            min_price: Some(Money::from_cents(5000)),
            max_price: Some(Money::from_cents(1000)),
            sort: SortOrder::Name,
        },
    )
    .await;

    assert!(matches!(result, Err(CliError::Domain(DomainError::Catalog(_)))));
}

#[tokio::test]
async fn add_shows_notification_and_persists() {
    let (app, _, _dir) = setup();

    let text = run(&app, add(1, 1)).await.unwrap();
    assert!(text.contains("Added to cart: Elden Ring"));
    assert!(text.contains("Cart: 1 item(s), 59.99€"));

    run(&app, add(1, 2)).await.unwrap();
    let cart = run(&app, Command::Cart).await.unwrap();
    assert!(cart.contains("  3 x"));
    assert!(cart.contains("179.97€"));
}

#[tokio::test]
async fn add_refuses_out_of_stock_and_unknown_products() {
    let (app, _, _dir) = setup();

    assert!(matches!(
        run(&app, add(3, 1)).await,
        Err(CliError::OutOfStock(_))
    ));
    assert!(matches!(
        run(&app, add(42, 1)).await,
        Err(CliError::Client(ClientError::NotFound(_)))
    ));
    assert!(matches!(
        run(&app, add(1, 0)).await,
        Err(CliError::Domain(DomainError::Cart(_)))
    ));

    let cart = run(&app, Command::Cart).await.unwrap();
    assert_eq!(cart, "Your cart is empty.\n");
}

#[tokio::test]
async fn set_quantity_remove_and_clear() {
    let (app, _, _dir) = setup();
    run(&app, add(1, 1)).await.unwrap();
    run(&app, add(2, 1)).await.unwrap();

    let text = run(
        &app,
        Command::SetQuantity {
            id: ProductId::new(2),
            quantity: -1,
        },
    )
    .await
    .unwrap();
    assert!(text.contains("Cart: 1 item(s)"));

    run(&app, Command::Remove { id: ProductId::new(1) }).await.unwrap();
    assert_eq!(run(&app, Command::Cart).await.unwrap(), "Your cart is empty.\n");

    run(&app, add(2, 4)).await.unwrap();
    run(&app, Command::Clear).await.unwrap();
    assert_eq!(run(&app, Command::Cart).await.unwrap(), "Your cart is empty.\n");
}

#[tokio::test]
async fn session_commands() {
    let (app, _, _dir) = setup();

    assert_eq!(run(&app, Command::Whoami).await.unwrap(), "Not logged in.\n");

    let text = run(
        &app,
        Command::Login {
            email: "ada@example.com".to_string(),
            password: "pw".to_string(),
        },
    )
    .await
    .unwrap();
    assert!(text.starts_with("Logged in as Ada"));
    assert!(run(&app, Command::Whoami).await.unwrap().contains("ada@example.com"));

    run(&app, Command::Logout).await.unwrap();
    assert_eq!(run(&app, Command::Whoami).await.unwrap(), "Not logged in.\n");
}

#[tokio::test]
async fn checkout_flow() {
    let (app, api, _dir) = setup();

    assert!(matches!(
        run(&app, Command::Checkout).await,
        Err(CliError::Client(ClientError::EmptyCart))
    ));

    run(&app, add(1, 2)).await.unwrap();
    assert!(matches!(
        run(&app, Command::Checkout).await,
        Err(CliError::Client(ClientError::NotAuthenticated))
    ));

    run(
        &app,
        Command::Login {
            email: "ada@example.com".to_string(),
            password: "pw".to_string(),
        },
    )
    .await
    .unwrap();

    let text = run(&app, Command::Checkout).await.unwrap();
    assert!(text.contains("https://pay.invalid/session/"));
    assert_eq!(api.payment_session_count(), 1);

    run(&app, Command::CheckoutCancel).await.unwrap();
    assert!(run(&app, Command::Cart).await.unwrap().contains("Elden Ring"));

    run(&app, Command::CheckoutComplete).await.unwrap();
    assert_eq!(run(&app, Command::Cart).await.unwrap(), "Your cart is empty.\n");

    let orders = run(&app, Command::Orders).await.unwrap();
    assert!(orders.contains("2 unit(s)"));
    assert!(orders.contains("119.98€"));
}

#[tokio::test]
async fn lists_are_empty_when_backend_is_down() {
    let (app, api, _dir) = setup();
    api.set_fail_requests(true);

    assert_eq!(
        run(&app, Command::Featured).await.unwrap(),
        "No products found.\n"
    );
    assert_eq!(
        run(&app, Command::Categories).await.unwrap(),
        "No categories found.\n"
    );
    assert!(run(&app, Command::Product { id: ProductId::new(1) }).await.is_err());
}

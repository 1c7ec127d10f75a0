//! Shopfront — state managers and platform services for a server-rendered
//! e-commerce storefront.
//!
//! Entry point: runs a console demo exercising each component against a
//! temporary data directory.

use std::time::Duration;

use shopfront::database::connection::Database;
use shopfront::managers::cart_manager::{CartManager, CartManagerTrait};
use shopfront::managers::favorites_manager::{FavoritesManager, FavoritesManagerTrait};
use shopfront::managers::session_monitor::SessionMonitor;
use shopfront::services::payment_webhook::{signature_header, PaymentWebhook};
use shopfront::services::preferences::{PreferencesService, PreferencesServiceTrait};
use shopfront::storage::local_store::LocalStore;
use shopfront::types::cart::UpdateType;
use shopfront::types::preferences::ThemeMode;
use shopfront::types::product::{Product, ProductVariant};
use shopfront::types::session::SessionConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shopfront=info".into()),
        )
        .init();

    println!();
    println!("Shopfront v{} — component demo", env!("CARGO_PKG_VERSION"));
    println!();

    let data_dir = std::env::temp_dir().join("shopfront-demo");
    let _ = std::fs::remove_dir_all(&data_dir);

    demo_database();
    demo_cart(&data_dir);
    demo_favorites(&data_dir);
    demo_preferences(&data_dir);
    demo_session_monitor();
    demo_webhook();

    println!("All components demonstrated.");
}

fn section(name: &str) {
    println!("--- {} ---", name);
}

fn demo_database() {
    section("Database");
    let db = Database::open_in_memory().expect("failed to open database");
    let tables: Vec<String> = {
        let conn = db.connection();
        let mut stmt = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .expect("prepare");
        stmt.query_map([], |row| row.get(0))
            .expect("query")
            .filter_map(|r| r.ok())
            .collect()
    };
    println!("  Tables: {}", tables.join(", "));
    println!();
}

fn demo_cart(data_dir: &std::path::Path) {
    section("Cart Manager");
    let mut cart = CartManager::new(LocalStore::new(data_dir));
    cart.initialize(None);

    let tee = Product {
        id: "prod-tee".into(),
        name: "Logo Tee".into(),
        handle: "logo-tee".into(),
        image_url: "/images/logo-tee.png".into(),
    };
    let variant = ProductVariant {
        id: "var-tee-m".into(),
        price: 24.0,
    };

    cart.add_item(&variant, &tee);
    cart.add_item(&variant, &tee);
    let state = cart.cart().expect("initialized");
    println!(
        "  {} items, total {:.2} after two adds",
        state.total_items, state.total_price
    );

    cart.update_item("var-tee-m", UpdateType::Minus);
    let state = cart.cart().expect("initialized");
    println!(
        "  {} items, total {:.2} after minus",
        state.total_items, state.total_price
    );
    println!();
}

fn demo_favorites(data_dir: &std::path::Path) {
    section("Favorites Manager");
    let mut favorites = FavoritesManager::new(LocalStore::new(data_dir));
    favorites.initialize();

    let mug = Product {
        id: "prod-mug".into(),
        name: "Camp Mug".into(),
        handle: "camp-mug".into(),
        image_url: "/images/camp-mug.png".into(),
    };
    println!("  Toggled on: {}", favorites.toggle_favorite(&mug));
    println!("  Toggled off: {}", !favorites.toggle_favorite(&mug));
    println!();
}

fn demo_preferences(data_dir: &std::path::Path) {
    section("Preferences");
    let prefs = PreferencesService::new(LocalStore::new(data_dir));
    println!("  Default theme: {:?}", prefs.theme());
    prefs.set_theme(ThemeMode::Dark).expect("persist theme");
    println!("  Theme now: {:?}", prefs.theme());
    prefs.set_cookie_consent(true).expect("persist consent");
    println!(
        "  Cookie consent: {:?}",
        prefs.cookie_consent().map(|c| c.accepted)
    );
    println!();
}

fn demo_session_monitor() {
    section("Session Monitor");
    let config = SessionConfig::new(
        Duration::from_secs(30),
        Duration::from_secs(10),
        Duration::from_secs(3600),
        Duration::from_secs(60),
    );
    let mut monitor = SessionMonitor::new(config);
    let t0 = std::time::Instant::now();
    monitor.start(t0);

    let events = monitor.poll(t0 + Duration::from_secs(21));
    println!("  At 21s idle: {:?}", events);
    let events = monitor.record_activity(t0 + Duration::from_secs(22));
    println!("  After activity: {:?}", events);
    let events = monitor.poll(t0 + Duration::from_secs(52));
    println!("  At 30s idle: {:?}", events);
    println!();
}

fn demo_webhook() {
    section("Payment Webhook");
    let secret = b"demo-endpoint-secret";
    let webhook = PaymentWebhook::new(secret);
    let payload =
        br#"{"id":"evt_1","type":"payment_intent.succeeded","amount":2400,"currency":"usd"}"#;
    let now = 1_700_000_000;

    let header = signature_header(secret, now, payload);
    match webhook.verify_and_parse(payload, &header, now) {
        Ok(event) => {
            webhook.handle_event(&event);
            println!("  Verified event {} ({:?})", event.id, event.status);
        }
        Err(e) => println!("  Unexpected rejection: {}", e),
    }

    let tampered = webhook.verify_and_parse(b"{}", &header, now);
    println!("  Tampered payload rejected: {}", tampered.is_err());
    println!();
}

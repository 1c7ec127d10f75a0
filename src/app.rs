//! App Core for Shopfront.
//!
//! Central struct holding all managers and services, managing application
//! lifecycle. The session service and auth service are injected with an
//! explicit [`AuthProvider`] instance rather than reaching for a global.

use std::path::Path;
use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::cart_manager::{CartManager, CartManagerTrait};
use crate::managers::favorites_manager::{FavoritesManager, FavoritesManagerTrait};
use crate::services::auth_service::{AuthProvider, AuthService};
use crate::services::order_notifier::OrderNotifier;
use crate::services::payment_webhook::PaymentWebhook;
use crate::services::preferences::PreferencesService;
use crate::services::session_service::SessionService;
use crate::storage::local_store::LocalStore;
use crate::types::cart::Cart;
use crate::types::session::SessionConfig;

/// Central application struct holding all managers and services.
pub struct App {
    pub db: Arc<Database>,
    pub cart_manager: CartManager,
    pub favorites_manager: FavoritesManager,
    pub preferences: PreferencesService,
    pub auth_service: AuthService,
    pub session_service: SessionService,
    pub order_notifier: OrderNotifier,
    /// `None` when no webhook secret is configured in the environment.
    pub payment_webhook: Option<PaymentWebhook>,
}

impl App {
    /// Creates a new App rooted at `data_dir`, initializing all managers
    /// and services. The cart and favorites managers run their load
    /// protocol immediately; `initial_cart` is the server-fetched fallback
    /// used when no local cart slot exists.
    pub fn new(
        data_dir: &Path,
        provider: Arc<dyn AuthProvider>,
        initial_cart: Option<Cart>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(data_dir.join("shopfront.db"))?);
        let store = LocalStore::new(data_dir);

        let mut cart_manager = CartManager::new(store.clone());
        cart_manager.initialize(initial_cart);

        let mut favorites_manager = FavoritesManager::new(store.clone());
        favorites_manager.initialize();

        let preferences = PreferencesService::new(store);
        let auth_service = AuthService::new(provider.clone());
        let session_service =
            SessionService::new(db.clone(), provider, SessionConfig::default());

        Ok(Self {
            db,
            cart_manager,
            favorites_manager,
            preferences,
            auth_service,
            session_service,
            order_notifier: OrderNotifier::from_env(),
            payment_webhook: PaymentWebhook::from_env(),
        })
    }

    /// Shuts down background work. Safe to call more than once.
    pub fn shutdown(&self) {
        self.session_service.stop();
    }
}

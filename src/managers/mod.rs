// Shopfront state managers
// Managers handle stateful operations: the cart reducer, the favorites set,
// and the session idle/timeout state machine.

pub mod cart_manager;
pub mod favorites_manager;
pub mod session_monitor;

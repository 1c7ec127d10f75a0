use shopfront::services::order_notifier::{NotifierConfig, OrderNotifier};
use shopfront::types::errors::NotifyError;
use shopfront::types::payment::OrderConfirmation;

fn confirmation() -> OrderConfirmation {
    OrderConfirmation {
        order_id: "order-1".to_string(),
        recipient: "buyer@example.com".to_string(),
        subject: "Order confirmed".to_string(),
        body: "Thanks for your order.".to_string(),
    }
}

#[tokio::test]
async fn test_unconfigured_send_is_a_no_op() {
    let notifier = OrderNotifier::new(None);
    assert!(!notifier.is_configured());

    // Missing relay credentials must never fail the caller
    notifier.send_order_confirmation(&confirmation()).await.unwrap();
}

#[tokio::test]
async fn test_unreachable_relay_is_a_network_error() {
    let notifier = OrderNotifier::new(Some(NotifierConfig {
        endpoint: "http://127.0.0.1:1/notify".to_string(),
        username: "relay".to_string(),
        password: "secret".to_string(),
    }));
    assert!(notifier.is_configured());

    let err = notifier
        .send_order_confirmation(&confirmation())
        .await
        .unwrap_err();
    assert!(matches!(err, NotifyError::NetworkError(_)));
}

// Env combinations live in one test: the variables are process-global.
#[test]
fn test_from_env_requires_all_three_variables() {
    std::env::remove_var("SMTP_RELAY_URL");
    std::env::remove_var("SMTP_USER");
    std::env::remove_var("SMTP_PASS");
    assert!(!OrderNotifier::from_env().is_configured());

    // Partial credentials still yield an unconfigured notifier
    std::env::set_var("SMTP_RELAY_URL", "http://relay.example.com/send");
    assert!(!OrderNotifier::from_env().is_configured());
    std::env::set_var("SMTP_USER", "relay");
    assert!(!OrderNotifier::from_env().is_configured());

    std::env::set_var("SMTP_PASS", "secret");
    assert!(OrderNotifier::from_env().is_configured());

    std::env::remove_var("SMTP_RELAY_URL");
    std::env::remove_var("SMTP_USER");
    std::env::remove_var("SMTP_PASS");
}

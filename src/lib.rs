pub mod config;
pub mod domain {
    pub mod payment;
    pub mod summary;
}
pub mod health;
pub mod http {
    pub mod handlers {
        pub mod ops;
        pub mod payments;
        pub mod processors_health;
    }
    pub mod routes;
}
pub mod processors;
pub mod repo {
    pub mod payments_memory;
    pub mod payments_repo;
}
pub mod router {
    pub mod selector;
}
pub mod service {
    pub mod dispatcher;
}

use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: service::dispatcher::PaymentDispatcher,
    pub payment_store: Arc<dyn repo::payments_repo::PaymentStore>,
    pub health_store: Arc<dyn health::HealthStateStore>,
}

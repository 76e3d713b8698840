use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{ApiKey, ApiKeyValue, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::orders::{
        CreateOrderRequest, DeleteConfirmation, OrderList, OrderListQuery, PayOrderRequest,
    },
    metrics::MetricsSnapshot,
    models::{OrderSnapshot, OrderStatus},
    routes::{health, metrics, orders},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_key",
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        metrics::metrics_snapshot,
        orders::create_order,
        orders::get_order,
        orders::pay_order,
        orders::list_orders,
        orders::delete_order
    ),
    components(
        schemas(
            OrderSnapshot,
            OrderStatus,
            CreateOrderRequest,
            PayOrderRequest,
            OrderListQuery,
            OrderList,
            DeleteConfirmation,
            MetricsSnapshot,
            health::HealthData
        )
    ),
    security(
        ("api_key" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Metrics", description = "Process counters"),
        (name = "Orders", description = "Order lifecycle endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

//! Order status lookup over a fixed table

use parlor_agent::tool::parse_args;
use parlor_agent::{AgentError, FunctionTool};
use serde::{Deserialize, Serialize};
use serde_json::json;

const ORDERS: &[(&str, &str, &str, &str)] = &[
    ("123", "Shipped", "Laptop", "$1000"),
    ("456", "Processing", "Mobile Phone", "$500"),
    ("789", "Delivered", "Headphones", "$100"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderStatus {
    pub order_id: String,
    pub status: String,
    pub product: String,
    pub price: String,
}

/// Look up an order; unknown ids get a `Not Found` record
pub fn get_order_status(order_id: &str) -> OrderStatus {
    let (status, product, price) = ORDERS
        .iter()
        .find(|(id, ..)| *id == order_id)
        .map(|&(_, status, product, price)| (status, product, price))
        .unwrap_or(("Not Found", "N/A", "N/A"));

    OrderStatus {
        order_id: order_id.to_string(),
        status: status.to_string(),
        product: product.to_string(),
        price: price.to_string(),
    }
}

#[derive(Deserialize)]
struct OrderArgs {
    order_id: String,
}

pub fn order_status_tool() -> FunctionTool {
    FunctionTool::new(
        "get_order_status",
        "Fetch the status of an order by its id.",
        json!({
            "type": "object",
            "properties": { "order_id": { "type": "string" } },
            "required": ["order_id"],
            "additionalProperties": false
        }),
        |_ctx, args| {
            let OrderArgs { order_id } = parse_args(args)?;
            let order = get_order_status(order_id.trim());
            tracing::debug!(order_id = %order.order_id, status = %order.status, "Order lookup");
            serde_json::to_string(&order).map_err(AgentError::from)
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_agent::{RunContext, Tool};

    #[test]
    fn test_known_orders() {
        let order = get_order_status("456");
        assert_eq!(order.status, "Processing");
        assert_eq!(order.product, "Mobile Phone");
        assert_eq!(order.price, "$500");

        assert_eq!(get_order_status("123").product, "Laptop");
        assert_eq!(get_order_status("789").status, "Delivered");
    }

    #[test]
    fn test_unknown_order() {
        assert_eq!(
            get_order_status("999"),
            OrderStatus {
                order_id: "999".to_string(),
                status: "Not Found".to_string(),
                product: "N/A".to_string(),
                price: "N/A".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_tool_returns_json_record() {
        let out = order_status_tool()
            .invoke(&RunContext::new(), r#"{"order_id": "123"}"#)
            .await
            .unwrap();
        let order: OrderStatus = serde_json::from_str(&out).unwrap();
        assert_eq!(order.status, "Shipped");
        assert_eq!(order.price, "$1000");
    }
}

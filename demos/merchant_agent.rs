//! Merchant agent demo
//!
//! Wires a catalog-backed merchant behind the JSON-RPC server: searching the
//! catalog into a cart, updating the cart with shipping and tax, and
//! forwarding a payment mandate to a processor agent over the A2A client.
//! Set `GOOGLE_API_KEY` to route instructions through the LLM classifier;
//! without it the resolver falls back to literal name matching.
//!
//! Run with: cargo run --example merchant_agent

use std::sync::Arc;

use anyhow::Context as _;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use commerce_a2a::{
    executor::{BaseExecutor, FunctionResolver, ToolInfo},
    llm::GeminiClassifier,
    prelude::*,
    protocol::{
        agent::{AgentCapabilities, Extension, Skill},
        message::{find_data_part, DataMap},
    },
    store::{MerchantStore, Product},
};

const TAX_RATE: f64 = 0.08;
const FLAT_SHIPPING: f64 = 4.99;

/// Shopping agents this merchant accepts requests from
const TRUSTED_SHOPPING_AGENTS: &[&str] = &["trusted_shopping_agent", "demo_shopping_agent"];

fn catalog() -> Vec<Product> {
    vec![
        Product {
            sku: "SHOE-RED-42".to_string(),
            name: "Red Running Shoes".to_string(),
            description: "Lightweight red trainers for daily runs".to_string(),
            price: 89.99,
            category: "footwear".to_string(),
        },
        Product {
            sku: "SHOE-BLU-42".to_string(),
            name: "Blue Running Shoes".to_string(),
            description: "Cushioned blue trainers".to_string(),
            price: 94.99,
            category: "footwear".to_string(),
        },
        Product {
            sku: "SOCK-WHT-M".to_string(),
            name: "White Crew Socks".to_string(),
            description: "Cotton socks, pack of three".to_string(),
            price: 9.99,
            category: "accessories".to_string(),
        },
    ]
}

fn merchant_card() -> AgentCard {
    AgentCard {
        name: "merchant_agent".to_string(),
        description: "Finds catalog items, manages carts, and initiates payment".to_string(),
        url: "http://localhost:8080".to_string(),
        preferred_transport: "JSONRPC".to_string(),
        protocol_version: "0.3.0".to_string(),
        version: "1.0.0".to_string(),
        default_input_modes: vec!["application/json".to_string()],
        default_output_modes: vec!["application/json".to_string()],
        capabilities: AgentCapabilities {
            extensions: vec![Extension {
                uri: "https://example.com/commerce/cart/v1".to_string(),
                description: "Cart mandate payloads".to_string(),
                required: true,
            }],
        },
        skills: vec![
            Skill {
                id: "find_items".to_string(),
                name: "Find items".to_string(),
                description: "Searches the catalog and builds a cart".to_string(),
                parameters: None,
                tags: Some(vec!["commerce".to_string()]),
            },
            Skill {
                id: "update_cart".to_string(),
                name: "Update cart".to_string(),
                description: "Adds shipping and tax to an existing cart".to_string(),
                parameters: None,
                tags: Some(vec!["commerce".to_string()]),
            },
            Skill {
                id: "initiate_payment".to_string(),
                name: "Initiate payment".to_string(),
                description: "Forwards a payment mandate to the processor".to_string(),
                parameters: None,
                tags: Some(vec!["payments".to_string()]),
            },
        ],
    }
}

/// Search the catalog for the requested query and store the result as a cart
fn find_items_tool(store: MerchantStore) -> ToolInfo {
    ToolInfo::new(
        "find_items",
        "Searches the merchant catalog for items matching a shopping query and returns a cart proposal",
        move |parts: Vec<DataMap>, updater: Arc<TaskUpdater>| {
            let store = store.clone();
            Box::pin(async move {
                let query = find_data_part("query", &parts)
                    .and_then(|v| v.as_str())
                    .unwrap_or("shoes")
                    .to_string();

                let matches = store.search_products(&query);
                if matches.is_empty() {
                    updater.fail(format!("No items matched '{}'", query));
                    return Ok(());
                }

                let items: Vec<_> = matches
                    .iter()
                    .map(|p| json!({"sku": p.sku, "name": p.name, "price": p.price, "quantity": 1}))
                    .collect();
                let subtotal: f64 = matches.iter().map(|p| p.price).sum();

                let contents = json!({"items": items, "subtotal": subtotal});
                let cart_id = store.create_cart(contents.clone());

                let cart = MessageBuilder::new()
                    .add_data("", json!({"cartId": cart_id, "cart": contents}))
                    .build();
                updater.add_artifact(cart.parts);
                updater.complete();
                Ok(())
            })
        },
    )
}

/// Price shipping and tax into a previously created cart
fn update_cart_tool(store: MerchantStore) -> ToolInfo {
    ToolInfo::new(
        "update_cart",
        "Updates an existing cart with the buyer's shipping address, shipping cost, and tax",
        move |parts: Vec<DataMap>, updater: Arc<TaskUpdater>| {
            let store = store.clone();
            Box::pin(async move {
                let cart_id = match find_data_part("cartId", &parts).and_then(|v| v.as_str()) {
                    Some(id) => id.to_string(),
                    None => {
                        updater.fail("No cartId provided");
                        return Ok(());
                    }
                };

                let mut contents = match store.get_cart(&cart_id) {
                    Some(contents) => contents,
                    None => {
                        updater.fail(format!("Cart {} not found or expired", cart_id));
                        return Ok(());
                    }
                };

                let subtotal = contents["subtotal"].as_f64().unwrap_or(0.0);
                let tax = subtotal * TAX_RATE;
                contents["shipping"] = json!(FLAT_SHIPPING);
                contents["tax"] = json!(tax);
                contents["total"] = json!(subtotal + tax + FLAT_SHIPPING);
                if let Some(address) = find_data_part("shippingAddress", &parts) {
                    contents["shippingAddress"] = address.clone();
                }

                store.put_cart(&cart_id, contents.clone());

                let cart = MessageBuilder::new()
                    .add_data("", json!({"cartId": cart_id, "cart": contents}))
                    .build();
                updater.add_artifact(cart.parts);
                updater.complete();
                Ok(())
            })
        },
    )
}

/// Forward the payment mandate to the processor agent and relay its answer
fn initiate_payment_tool(processor_url: url::Url) -> ToolInfo {
    ToolInfo::new(
        "initiate_payment",
        "Sends the signed payment mandate to the payment processor agent and reports the outcome",
        move |parts: Vec<DataMap>, updater: Arc<TaskUpdater>| {
            let processor_url = processor_url.clone();
            Box::pin(async move {
                let mandate = match find_data_part("paymentMandate", &parts) {
                    Some(mandate) => mandate.clone(),
                    None => {
                        updater.fail("No paymentMandate provided");
                        return Ok(());
                    }
                };

                let mut client = A2AClientBuilder::new_http(processor_url).build()?;

                let request = MessageBuilder::new()
                    .role(Role::User)
                    .context_id(updater.context_id())
                    .add_text("process this payment")
                    .add_data("paymentMandate", mandate)
                    .build();

                match client.send_message(request).await {
                    Ok(processor_task) => {
                        let receipt = MessageBuilder::new()
                            .add_data(
                                "",
                                json!({
                                    "processorTaskId": processor_task.id,
                                    "state": processor_task.status.state,
                                }),
                            )
                            .build();
                        updater.add_artifact(receipt.parts);
                        updater.complete();
                    }
                    Err(err) => {
                        tracing::warn!(error = %err, "payment processor call failed");
                        updater.fail(format!("Payment initiation failed: {}", err));
                    }
                }
                Ok(())
            })
        },
    )
}

/// Only accept requests carrying a trusted shopping agent identity
fn validate_shopping_agent(parts: &[DataMap], updater: &TaskUpdater) -> bool {
    let agent_id = find_data_part("shoppingAgentId", parts).and_then(|v| v.as_str());
    match agent_id {
        Some(id) if TRUSTED_SHOPPING_AGENTS.contains(&id) => true,
        Some(id) => {
            updater.fail(format!("Unknown shopping agent: {}", id));
            false
        }
        None => {
            updater.fail("No shoppingAgentId provided");
            false
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let processor_url: url::Url = std::env::var("PAYMENT_PROCESSOR_URL")
        .unwrap_or_else(|_| "http://localhost:8081".to_string())
        .parse()
        .context("invalid PAYMENT_PROCESSOR_URL")?;

    let store = MerchantStore::with_products(catalog());

    let tools = vec![
        find_items_tool(store.clone()),
        update_cart_tool(store),
        initiate_payment_tool(processor_url),
    ];

    let mut resolver = FunctionResolver::new(
        tools,
        "You are a merchant agent. Select the single function that best serves \
         the shopper's instruction.",
    );
    if let Some(classifier) = GeminiClassifier::from_env() {
        resolver = resolver.with_classifier(Arc::new(classifier));
    }

    let executor = Arc::new(
        BaseExecutor::new(Arc::new(resolver)).with_validator(validate_shopping_agent),
    );

    let server = AgentServer::new(executor, merchant_card());
    server.serve("0.0.0.0:8080").await?;

    Ok(())
}

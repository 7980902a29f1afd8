use anyhow::{Context, Result, anyhow};
use rand::rngs::OsRng;
use serde::Serialize;

use crate::codec;
use crate::domain::{Address, Hash32, Order, OrderParams};
use crate::fragments::{self, PartialPodFailure};
use crate::ingress::{self, OpenOrderRequest};
use crate::pods;
use crate::registry::{DEFAULT_PAGE_SIZE, RegistrySnapshot};

/// Fragments of one order, ready for the ingress, plus what could not be built
#[derive(Debug)]
pub struct BuildOutput {
    pub order_id: Hash32,
    pub request: OpenOrderRequest,
    pub failures: Vec<PartialPodFailure>,
}

/// A pod as printed by the `pods` command
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PodSummary {
    pub id: Hash32,
    pub darknodes: Vec<Address>,
}

fn parse_order(order_json: &str) -> Result<Order> {
    let params: OrderParams =
        serde_json::from_str(order_json).context("Failed to parse order JSON")?;
    Order::new(params).context("Order rejected")
}

fn parse_registry(registry_json: &str) -> Result<RegistrySnapshot> {
    let source: RegistrySnapshot =
        serde_json::from_str(registry_json).context("Failed to parse registry JSON")?;
    RegistrySnapshot::capture(&source, DEFAULT_PAGE_SIZE).context("Failed to snapshot registry")
}

/// Builds the open-order request for `order_json` against `registry_json`
///
/// # Errors
/// Returns an error if either document is malformed, the order is out of
/// bounds, the registry cannot form pods, or no fragment at all could be
/// encrypted
pub fn build_fragments(order_json: &str, registry_json: &str, address: Address) -> Result<BuildOutput> {
    let order = parse_order(order_json)?;
    let snapshot = parse_registry(registry_json)?;

    let set = fragments::build(&order, &snapshot, &mut OsRng).context("Failed to build fragments")?;
    let request = OpenOrderRequest::new(address, &set);
    if request.fragment_count() == 0 {
        return Err(anyhow!(
            "No deliverable fragments: all {} darknodes lack usable keys",
            set.failures().len()
        ));
    }

    Ok(BuildOutput {
        order_id: set.order_id(),
        request,
        failures: set.failures().to_vec(),
    })
}

/// Derived id of the order in `order_json`
///
/// # Errors
/// Returns an error if the order is malformed or out of bounds
pub fn order_id(order_json: &str) -> Result<Hash32> {
    let order = parse_order(order_json)?;
    Ok(codec::order_id(&order))
}

/// Pods for the registry state in `registry_json`
///
/// # Errors
/// Returns an error if the registry is malformed or cannot form pods
pub fn list_pods(registry_json: &str) -> Result<Vec<PodSummary>> {
    let snapshot = parse_registry(registry_json)?;
    let pools = pods::assign_pods(&snapshot).context("Failed to assign pods")?;
    Ok(pools
        .into_iter()
        .map(|pool| PodSummary {
            id: pool.id(),
            darknodes: pool.darknodes().to_vec(),
        })
        .collect())
}

/// Hex encoding of the cancel message a wallet must sign for `order_id`
///
/// # Errors
/// Returns an error if `order_id` is not a base64 256-bit id
pub fn cancel_message(order_id: &str) -> Result<String> {
    let id: Hash32 = order_id
        .trim()
        .parse()
        .with_context(|| format!("Invalid order id {order_id:?}"))?;
    Ok(hex::encode(ingress::cancel_message(id)))
}

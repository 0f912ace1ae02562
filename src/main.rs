use smart_vending::domain::{MachineCreate, ProductCreate, UserCreate};
use smart_vending::{setup_tracing, Config, VendingSystem};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::from_env();
    info!("Starting vending backend demo");

    let system = VendingSystem::from_config(&config);

    let machine = system
        .machine_client
        .create_machine(MachineCreate::new("Library Lobby", "North Campus", 12.9716, 77.5946))
        .await
        .map_err(|e| e.to_string())?;
    info!(machine_id = machine.id, "Machine registered");

    let user = system
        .user_client
        .create_user(UserCreate {
            name: "Alice".into(),
            email: "alice@example.com".into(),
            password_hash: "$argon2id$demo".into(),
        })
        .await
        .map_err(|e| e.to_string())?;
    system
        .user_client
        .update_fcm_token(user.id, "demo-device-token".into())
        .await
        .map_err(|e| e.to_string())?;
    info!(user_id = user.id, "User registered");

    let product = system
        .inventory_client
        .create_product(ProductCreate::new("Soda", 20.0, 1, Some(machine.id)))
        .await
        .map_err(|e| e.to_string())?;
    info!(product_id = product.id, stock = product.stock, "Product stocked");

    let mut feed = system.dispatcher.subscribe();

    // The machine sells its last can while offline, then syncs
    let span = tracing::info_span!("offline_sync");
    async {
        match system.purchase_client.sync_offline_sale(product.id).await {
            Ok(updated) => info!(stock = updated.stock, "Offline sale applied"),
            Err(e) => error!(error = %e, "Offline sale rejected"),
        }
    }
    .instrument(span)
    .await;

    if let Some(event) = feed.try_next() {
        match event.to_json() {
            Ok(json) => info!(%json, "Live feed event"),
            Err(e) => error!(error = %e, "Could not encode live feed event"),
        }
    }

    // Alice asks for more, then the vendor restocks
    system
        .demand_client
        .record_demand(user.id, machine.id, "soda".into())
        .await
        .map_err(|e| e.to_string())?;

    let span = tracing::info_span!("restock");
    let restock = async { system.restock_client.restock(product.id, 12).await }
        .instrument(span)
        .await;
    match restock {
        Ok(outcome) => info!(
            stock = outcome.product.stock,
            notified_users = outcome.notified_users,
            "Restock processed"
        ),
        Err(e) => error!(error = %e, "Restock failed"),
    }

    match system.machine_client.nearest_machine(12.9720, 77.5950).await {
        Ok(found) => info!(machine = %found.machine.name, distance_km = found.distance_km, "Nearest machine"),
        Err(e) => error!(error = %e, "Machine lookup failed"),
    }

    drop(feed);
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}

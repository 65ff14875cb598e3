use serde_json::{Value, json};

use tfjuju_client::MemoryController;
use tfjuju_client::credentials::CredentialsApi;
use tfjuju_client::models::ModelsApi;
use tfjuju_core::models::credential::CredentialScope;
use tfjuju_provider::resources::{
    ApplicationResource, CredentialResource, IntegrationResource, KubernetesCloudResource, MachineResource,
    ModelResource, OfferResource, SshKeyResource, UserResource,
};
use tfjuju_provider::{ProviderError, Resource, UpdateRequest};

const KEY_A: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIKkeyone alice@laptop";
const KEY_B: &str = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIKkeytwo alice@laptop";

async fn with_model(controller: &MemoryController) -> Value {
    ModelResource::new(controller.client())
        .create(json!({"name": "dev"}))
        .await
        .unwrap()
}

async fn with_application(controller: &MemoryController, charm: &str) -> Value {
    ApplicationResource::new(controller.client())
        .create(json!({"model": "dev", "charm": {"name": charm}}))
        .await
        .unwrap()
}

fn update(plan: Value, state: &Value) -> UpdateRequest {
    UpdateRequest {
        plan,
        state: state.clone(),
    }
}

#[tokio::test]
async fn model_create_update_delete() {
    let controller = MemoryController::new();
    let models = ModelResource::new(controller.client());

    let state = models
        .create(json!({
            "name": "dev",
            "config": {"update-status-hook-interval": "5m"},
            "annotations": {"team": "data"}
        }))
        .await
        .unwrap();
    assert_eq!(state["id"], "dev");
    assert_eq!(state["type"], "iaas");
    assert_eq!(state["cloud"]["name"], "localhost");
    assert!(state["uuid"].as_str().is_some_and(|u| !u.is_empty()));
    assert_eq!(state["annotations"], json!({"team": "data"}));

    let mut plan = state.clone();
    plan["config"] = json!({});
    plan["annotations"] = Value::Null;
    plan["constraints"] = json!("mem=4G");
    let state = models.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["config"], json!({}));
    assert!(state["annotations"].is_null());
    assert_eq!(state["constraints"], "mem=4G");

    let info = controller.client().models.read_model("dev").await.unwrap();
    assert!(info.config.is_empty());
    assert!(info.annotations.is_empty());

    models.delete(state.clone()).await.unwrap();
    assert!(models.read(state.clone()).await.unwrap().is_none());
    models.delete(state).await.unwrap();
}

#[tokio::test]
async fn model_import_by_name() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    let models = ModelResource::new(controller.client());

    let state = models.import("dev").await.unwrap();
    assert_eq!(state["name"], "dev");
    assert!(state["config"].is_null());

    assert!(matches!(models.import("dev:extra").await, Err(ProviderError::ImportId { .. })));
    assert!(matches!(models.import("missing").await, Err(ProviderError::ReadFailed(_))));
}

#[tokio::test]
async fn application_defaults_and_scaling() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    let apps = ApplicationResource::new(controller.client());

    let state = with_application(&controller, "postgresql").await;
    assert_eq!(state["id"], "dev:postgresql");
    assert_eq!(state["name"], "postgresql");
    assert_eq!(state["units"], 1);
    assert_eq!(state["charm"]["channel"], "latest/stable");
    assert_eq!(state["principal"], true);

    controller.clear_calls().await;
    let mut plan = state.clone();
    plan["units"] = json!(3);
    plan["config"] = json!({"profile": "testing"});
    let state = apps.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["units"], 3);
    assert_eq!(state["config"], json!({"profile": "testing"}));
    assert_eq!(controller.calls().await, vec!["update_application:dev:postgresql"]);

    let imported = apps.import("dev:postgresql").await.unwrap();
    assert_eq!(imported["units"], 3);
    assert!(matches!(apps.import("dev").await, Err(ProviderError::ImportId { .. })));

    apps.delete(state.clone()).await.unwrap();
    assert!(apps.read(state).await.unwrap().is_none());
}

#[tokio::test]
async fn unchanged_application_makes_no_calls() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    let apps = ApplicationResource::new(controller.client());
    let state = with_application(&controller, "postgresql").await;

    controller.clear_calls().await;
    apps.update(update(state.clone(), &state)).await.unwrap();
    assert!(controller.calls().await.is_empty());
}

#[tokio::test]
async fn integration_endpoint_change_replaces_integration() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    with_application(&controller, "postgresql").await;
    with_application(&controller, "wordpress").await;
    let integrations = IntegrationResource::new(controller.client());

    let state = integrations
        .create(json!({
            "model": "dev",
            "application": [
                {"name": "wordpress", "endpoint": "db"},
                {"name": "postgresql", "endpoint": "db"}
            ]
        }))
        .await
        .unwrap();
    assert_eq!(state["id"], "dev:postgresql:db:wordpress:db");

    controller.clear_calls().await;
    let plan = json!({
        "id": state["id"].clone(),
        "model": "dev",
        "application": [
            {"name": "wordpress", "endpoint": "db"},
            {"name": "postgresql", "endpoint": "database"}
        ]
    });
    let state = integrations.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["id"], "dev:postgresql:database:wordpress:db");
    assert_eq!(
        controller.calls().await,
        vec![
            "destroy_integration:dev:postgresql:db:wordpress:db",
            "create_integration:dev:postgresql:database:wordpress:db",
        ]
    );

    let imported = integrations.import("dev:postgresql:database:wordpress:db").await.unwrap();
    assert_eq!(imported["id"], state["id"]);
}

#[tokio::test]
async fn integration_needs_two_well_formed_endpoints() {
    let integrations = IntegrationResource::new(MemoryController::new().client());

    let err = integrations
        .validate(&json!({"model": "dev", "application": [{"name": "wordpress"}]}))
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));

    let err = integrations
        .validate(&json!({
            "model": "dev",
            "application": [
                {"name": "wordpress", "offer_url": "admin/db.postgresql"},
                {"name": "postgresql"}
            ]
        }))
        .unwrap_err();
    assert!(err.to_string().contains("offer_url"), "{err}");
}

#[tokio::test]
async fn offer_defaults_name_and_url() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    with_application(&controller, "postgresql").await;
    let offers = OfferResource::new(controller.client());

    let state = offers
        .create(json!({"model": "dev", "application_name": "postgresql", "endpoints": ["db"]}))
        .await
        .unwrap();
    assert_eq!(state["url"], "admin/dev.postgresql");
    assert_eq!(state["name"], "postgresql");

    let imported = offers.import("admin/dev.postgresql").await.unwrap();
    assert_eq!(imported, state);
    assert!(matches!(offers.import("postgresql").await, Err(ProviderError::ImportId { .. })));

    offers.delete(state.clone()).await.unwrap();
    assert!(offers.read(state).await.unwrap().is_none());
}

#[tokio::test]
async fn machine_rename_is_local() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    let machines = MachineResource::new(controller.client());

    let state = machines
        .create(json!({"model": "dev", "name": "db-host"}))
        .await
        .unwrap();
    assert_eq!(state["machine_id"], "0");
    assert_eq!(state["id"], "dev:0:db-host");

    controller.clear_calls().await;
    let mut plan = state.clone();
    plan["name"] = json!("db-primary");
    let state = machines.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["id"], "dev:0:db-primary");
    assert!(controller.calls().await.is_empty());
}

#[tokio::test]
async fn credential_targets_follow_flags() {
    let controller = MemoryController::new();
    let credentials = CredentialResource::new(controller.client());

    let state = credentials
        .create(json!({
            "name": "ops",
            "cloud": {"name": "aws"},
            "auth_type": "access-key",
            "attributes": {"access-key": "AKIA", "secret-key": "s"}
        }))
        .await
        .unwrap();
    assert_eq!(state["id"], "ops:aws:false:true");
    assert_eq!(state["controller_credential"], true);

    controller.clear_calls().await;
    let mut plan = state.clone();
    plan["client_credential"] = json!(true);
    let state = credentials.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["id"], "ops:aws:true:true");
    assert_eq!(controller.calls().await.len(), 1);

    let err = credentials
        .validate(&json!({
            "name": "ops",
            "cloud": {"name": "aws"},
            "auth_type": "access-key",
            "client_credential": false,
            "controller_credential": false
        }))
        .unwrap_err();
    assert!(matches!(err, ProviderError::Validation(_)));

    credentials.delete(state.clone()).await.unwrap();
    assert!(credentials.read(state).await.unwrap().is_none());
}

#[tokio::test]
async fn credential_delete_tolerates_missing_copy() {
    let controller = MemoryController::new();
    let credentials = CredentialResource::new(controller.client());
    let state = credentials
        .create(json!({
            "name": "ops",
            "cloud": {"name": "aws"},
            "auth_type": "userpass",
            "client_credential": true
        }))
        .await
        .unwrap();
    controller
        .client()
        .credentials
        .remove_credential("aws", "ops", CredentialScope::Client)
        .await
        .unwrap();

    controller.fail_on("remove_credential").await;
    let err = credentials.delete(state.clone()).await.unwrap_err();
    assert!(matches!(err, ProviderError::DeleteFailed(_)));
    assert!(err.to_string().contains("juju_credential (ops:aws:true:true)"), "{err}");

    controller.clear_failures().await;
    credentials.delete(state.clone()).await.unwrap();
    assert!(credentials.read(state).await.unwrap().is_none());
}

#[tokio::test]
async fn ssh_key_change_swaps_key() {
    let controller = MemoryController::new();
    with_model(&controller).await;
    let keys = SshKeyResource::new(controller.client());

    let state = keys.create(json!({"model": "dev", "payload": KEY_A})).await.unwrap();
    assert_eq!(state["id"], "dev:alice@laptop");

    controller.clear_calls().await;
    let mut plan = state.clone();
    plan["payload"] = json!(KEY_B);
    let state = keys.update(update(plan, &state)).await.unwrap();
    assert_eq!(state["payload"], KEY_B);
    assert_eq!(
        controller.calls().await,
        vec!["remove_key:dev:alice@laptop", "add_key:dev:alice@laptop"]
    );

    let imported = keys.import("dev:alice@laptop").await.unwrap();
    assert_eq!(imported["payload"], KEY_B);
}

#[tokio::test]
async fn user_password_is_kept_from_state() {
    let controller = MemoryController::new();
    let users = UserResource::new(controller.client());

    let state = users
        .create(json!({"name": "bob", "display_name": "Bob", "password": "hunter2"}))
        .await
        .unwrap();
    let read = users.read(state.clone()).await.unwrap().unwrap();
    assert_eq!(read["password"], "hunter2");

    controller.clear_calls().await;
    let mut plan = state.clone();
    plan["password"] = json!("correct horse");
    users.update(update(plan, &state)).await.unwrap();
    assert_eq!(controller.calls().await, vec!["set_password:bob"]);

    let imported = users.import("bob").await.unwrap();
    assert!(imported["password"].is_null());
}

#[tokio::test]
async fn kubernetes_cloud_reports_credential() {
    let controller = MemoryController::new();
    let clouds = KubernetesCloudResource::new(controller.client());

    let state = clouds
        .create(json!({"name": "k8s", "kubernetes_config": "apiVersion: v1\nkind: Config\n"}))
        .await
        .unwrap();
    assert_eq!(state["id"], "k8s");
    assert_eq!(state["credential"], "k8s");

    clouds.delete(state.clone()).await.unwrap();
    assert!(clouds.read(state).await.unwrap().is_none());
}

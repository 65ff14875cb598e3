use std::collections::BTreeMap;

use tfjuju_client::applications::ApplicationsApi;
use tfjuju_client::integrations::IntegrationsApi;
use tfjuju_client::jaas::JaasApi;
use tfjuju_client::models::ModelsApi;
use tfjuju_client::offers::OffersApi;
use tfjuju_client::ssh_keys::SshKeysApi;
use tfjuju_client::{ClientError, MemoryController};
use tfjuju_core::models::access::{ModelAccess, OfferAccess};
use tfjuju_core::models::application::{CharmSpec, DeployInput};
use tfjuju_core::models::integration::{CreateIntegrationInput, EndpointSpec};
use tfjuju_core::models::jaas::{JaasTarget, Principal, RelationFilter, RelationTuple};
use tfjuju_core::models::model::{CreateModelInput, ModelInfo, ModelType, UpdateModelInput};
use tfjuju_core::models::offer::CreateOfferInput;

async fn model(controller: &MemoryController, name: &str) -> ModelInfo {
    controller
        .client()
        .models
        .create_model(CreateModelInput {
            name: name.to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
}

async fn deploy(controller: &MemoryController, model: &str, name: &str) {
    controller
        .client()
        .applications
        .deploy(DeployInput {
            model: model.to_string(),
            name: name.to_string(),
            charm: CharmSpec {
                name: name.to_string(),
                channel: "latest/stable".to_string(),
                revision: None,
                base: None,
            },
            units: 1,
            config: BTreeMap::new(),
            constraints: None,
            trust: false,
            expose: None,
        })
        .await
        .unwrap();
}

fn access_of(model: &ModelInfo, user: &str) -> Option<ModelAccess> {
    model
        .users
        .iter()
        .find(|u| u.user == user)
        .map(|u| u.access)
}

#[tokio::test]
async fn create_model_defaults_to_iaas_on_localhost() {
    let controller = MemoryController::new();
    let info = model(&controller, "dev").await;

    assert_eq!(info.model_type, ModelType::Iaas);
    assert_eq!(info.cloud, "localhost");
    assert_eq!(info.region.as_deref(), Some("localhost"));
    assert_eq!(access_of(&info, "admin"), Some(ModelAccess::Admin));
}

#[tokio::test]
async fn duplicate_model_is_rejected() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;

    let err = controller
        .client()
        .models
        .create_model(CreateModelInput {
            name: "dev".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::AlreadyExists { kind: "model", .. }));
}

#[tokio::test]
async fn update_model_removes_annotation_with_empty_value() {
    let controller = MemoryController::new();
    let client = controller.client();
    let info = client
        .models
        .create_model(CreateModelInput {
            name: "dev".to_string(),
            annotations: BTreeMap::from([("team".to_string(), "infra".to_string())]),
            config: BTreeMap::from([("logging-config".to_string(), "<root>=INFO".to_string())]),
            ..Default::default()
        })
        .await
        .unwrap();

    client
        .models
        .update_model(UpdateModelInput {
            uuid: info.uuid.clone(),
            annotations: BTreeMap::from([("team".to_string(), String::new())]),
            unset: vec!["logging-config".to_string()],
            ..Default::default()
        })
        .await
        .unwrap();

    let info = client.models.read_model("dev").await.unwrap();
    assert!(info.annotations.is_empty());
    assert!(info.config.is_empty());
}

#[tokio::test]
async fn grant_keeps_the_highest_level() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    let models = controller.client().models;

    models.grant_model("dev", "bob", ModelAccess::Write).await.unwrap();
    models.grant_model("dev", "bob", ModelAccess::Read).await.unwrap();

    let info = models.read_model("dev").await.unwrap();
    assert_eq!(access_of(&info, "bob"), Some(ModelAccess::Write));
}

#[tokio::test]
async fn revoke_drops_to_the_level_below() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    let models = controller.client().models;

    models.grant_model("dev", "bob", ModelAccess::Admin).await.unwrap();
    models.revoke_model("dev", "bob", ModelAccess::Write).await.unwrap();
    let info = models.read_model("dev").await.unwrap();
    assert_eq!(access_of(&info, "bob"), Some(ModelAccess::Read));

    models.revoke_model("dev", "bob", ModelAccess::Read).await.unwrap();
    let info = models.read_model("dev").await.unwrap();
    assert_eq!(access_of(&info, "bob"), None);
}

#[tokio::test]
async fn destroy_model_cascades() {
    let controller = MemoryController::new();
    let info = model(&controller, "dev").await;
    deploy(&controller, "dev", "postgresql").await;
    let client = controller.client();

    client.models.destroy_model(&info.uuid).await.unwrap();

    assert!(client.models.read_model("dev").await.unwrap_err().is_not_found());
    assert!(
        client
            .applications
            .read_application("dev", "postgresql")
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn injected_failure_matches_prefix_and_is_not_recorded() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    controller.fail_on("grant_model:dev:bob").await;
    let models = controller.client().models;

    let err = models
        .grant_model("dev", "bob", ModelAccess::Read)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::Api(_)));
    models.grant_model("dev", "carol", ModelAccess::Read).await.unwrap();

    assert_eq!(
        controller.calls().await,
        vec!["create_model:dev", "grant_model:dev:carol:read"]
    );
}

#[tokio::test]
async fn offer_url_defaults_owner_and_name() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    deploy(&controller, "dev", "postgresql").await;
    let offers = controller.client().offers;

    let offer = offers
        .create_offer(CreateOfferInput {
            model: "dev".to_string(),
            application_name: "postgresql".to_string(),
            endpoints: vec!["db".to_string()],
            name: None,
        })
        .await
        .unwrap();
    assert_eq!(offer.url, "admin/dev.postgresql");

    // Owner may be omitted when reading back.
    let read = offers.read_offer("dev.postgresql").await.unwrap();
    assert_eq!(read.url, offer.url);

    offers
        .grant_offer(&offer.url, "bob", OfferAccess::Consume)
        .await
        .unwrap();
    let read = offers.read_offer(&offer.url).await.unwrap();
    assert!(
        read.users
            .iter()
            .any(|u| u.user == "bob" && u.access == OfferAccess::Consume)
    );
}

#[tokio::test]
async fn consumed_offer_needs_force_to_destroy() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    model(&controller, "prod").await;
    deploy(&controller, "dev", "postgresql").await;
    deploy(&controller, "prod", "app").await;
    let client = controller.client();

    let offer = client
        .offers
        .create_offer(CreateOfferInput {
            model: "dev".to_string(),
            application_name: "postgresql".to_string(),
            endpoints: vec!["db".to_string()],
            name: None,
        })
        .await
        .unwrap();
    client
        .integrations
        .create_integration(CreateIntegrationInput {
            model: "prod".to_string(),
            endpoints: vec![
                EndpointSpec {
                    application: Some("app".to_string()),
                    endpoint: Some("db".to_string()),
                    offer_url: None,
                },
                EndpointSpec {
                    offer_url: Some(offer.url.clone()),
                    ..Default::default()
                },
            ],
            via: None,
        })
        .await
        .unwrap();

    let err = client.offers.destroy_offer(&offer.url, false).await.unwrap_err();
    assert!(matches!(err, ClientError::InvalidRequest(_)));

    client.offers.destroy_offer(&offer.url, true).await.unwrap();
    assert!(client.offers.read_offer(&offer.url).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn integration_is_found_regardless_of_endpoint_order() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    deploy(&controller, "dev", "wordpress").await;
    deploy(&controller, "dev", "mysql").await;
    let integrations = controller.client().integrations;

    let wordpress = EndpointSpec {
        application: Some("wordpress".to_string()),
        endpoint: Some("db".to_string()),
        offer_url: None,
    };
    let mysql = EndpointSpec {
        application: Some("mysql".to_string()),
        ..Default::default()
    };
    let created = integrations
        .create_integration(CreateIntegrationInput {
            model: "dev".to_string(),
            endpoints: vec![wordpress.clone(), mysql.clone()],
            via: None,
        })
        .await
        .unwrap();
    assert!(created.endpoints.iter().any(|e| e.endpoint == "juju-info"));

    let reversed = [mysql, wordpress];
    let read = integrations.read_integration("dev", &reversed).await.unwrap();
    assert_eq!(read, created);

    integrations.destroy_integration("dev", &reversed).await.unwrap();
    assert!(
        integrations
            .read_integration("dev", &reversed)
            .await
            .unwrap_err()
            .is_not_found()
    );
}

#[tokio::test]
async fn jaas_api_is_only_present_on_jaas_controllers() {
    assert!(!MemoryController::new().client().is_jaas());
    assert!(MemoryController::jaas().client().is_jaas());
}

#[tokio::test]
async fn relation_writes_are_idempotent() {
    let controller = MemoryController::jaas();
    let jaas = controller.client().jaas.unwrap();
    let tuple = RelationTuple::new(
        &Principal::User("alice@canonical.com".to_string()),
        "administrator",
        &JaasTarget::Controller,
    );

    jaas.add_relations(vec![tuple.clone()]).await.unwrap();
    jaas.add_relations(vec![tuple.clone()]).await.unwrap();
    assert_eq!(controller.tuples().await, vec![tuple.clone()]);

    let found = jaas
        .read_relations(RelationFilter {
            target: Some("controller-jimm".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(found, vec![tuple.clone()]);

    jaas.delete_relations(vec![tuple.clone()]).await.unwrap();
    jaas.delete_relations(vec![tuple]).await.unwrap();
    assert!(controller.tuples().await.is_empty());
}

#[tokio::test]
async fn removing_a_group_drops_its_tuples() {
    let controller = MemoryController::jaas();
    let jaas = controller.client().jaas.unwrap();
    let group = jaas.add_group("devops").await.unwrap();

    jaas.add_relations(vec![
        RelationTuple::new(
            &Principal::Group(group.uuid.clone()),
            "administrator",
            &JaasTarget::Controller,
        ),
        RelationTuple::new(
            &Principal::User("bob".to_string()),
            "member",
            &JaasTarget::Group(group.uuid.clone()),
        ),
    ])
    .await
    .unwrap();

    jaas.rename_group(&group.uuid, "platform").await.unwrap();
    assert_eq!(jaas.read_group_by_name("platform").await.unwrap().uuid, group.uuid);

    jaas.remove_group(&group.uuid).await.unwrap();
    assert!(controller.tuples().await.is_empty());
    assert!(jaas.read_group(&group.uuid).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn ssh_keys_are_identified_by_comment() {
    let controller = MemoryController::new();
    model(&controller, "dev").await;
    let keys = controller.client().ssh_keys;
    let payload = "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIB alice@laptop";

    keys.add_key("dev", payload).await.unwrap();
    let err = keys.add_key("dev", payload).await.unwrap_err();
    assert!(matches!(err, ClientError::AlreadyExists { .. }));
    assert_eq!(keys.list_keys("dev").await.unwrap(), vec![payload.to_string()]);

    keys.remove_key("dev", "alice@laptop").await.unwrap();
    assert!(keys.list_keys("dev").await.unwrap().is_empty());
}

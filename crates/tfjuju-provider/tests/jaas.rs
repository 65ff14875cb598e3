use serde_json::{Value, json};

use tfjuju_client::MemoryController;
use tfjuju_client::jaas::JaasApi;
use tfjuju_client::models::ModelsApi;
use tfjuju_core::models::jaas::{JaasTarget, Principal, RelationTuple};
use tfjuju_core::models::model::CreateModelInput;
use tfjuju_provider::resources::{JaasAccessResource, JaasGroupResource, JaasTargetKind};
use tfjuju_provider::{ProviderError, Resource, Side, UpdateRequest};

async fn model_uuid(controller: &MemoryController) -> String {
    controller
        .client()
        .models
        .create_model(CreateModelInput {
            name: "dev".to_string(),
            ..Default::default()
        })
        .await
        .unwrap()
        .uuid
}

async fn group(controller: &MemoryController, name: &str) -> String {
    let state = JaasGroupResource::new(&controller.client())
        .create(json!({"name": name}))
        .await
        .unwrap();
    state["uuid"].as_str().unwrap().to_string()
}

fn tuple(principal: Principal, relation: &str, target: JaasTarget) -> RelationTuple {
    RelationTuple::new(&principal, relation, &target)
}

fn model_access(uuid: &str, users: &[&str], groups: &[&str]) -> Value {
    json!({
        "model_uuid": uuid,
        "access": "writer",
        "users": users,
        "groups": groups,
        "service_accounts": ["ci-bot"]
    })
}

#[tokio::test]
async fn create_adds_one_batch_of_tuples() {
    let controller = MemoryController::jaas();
    let uuid = model_uuid(&controller).await;
    let devops = group(&controller, "devops").await;
    controller.clear_calls().await;
    let access = JaasAccessResource::new(JaasTargetKind::Model, &controller.client());

    let state = access
        .create(model_access(&uuid, &["alice@canonical.com"], &[&devops]))
        .await
        .unwrap();
    assert_eq!(state["id"], format!("{uuid}:writer"));
    assert_eq!(controller.calls().await.len(), 1);

    let target = JaasTarget::Model(uuid.clone());
    let tuples = controller.tuples().await;
    assert_eq!(tuples.len(), 3);
    assert!(tuples.contains(&tuple(Principal::User("alice@canonical.com".into()), "writer", target.clone())));
    assert!(tuples.contains(&tuple(Principal::Group(devops.clone()), "writer", target.clone())));
    assert!(tuples.contains(&tuple(Principal::ServiceAccount("ci-bot".into()), "writer", target)));
}

#[tokio::test]
async fn update_deletes_then_adds() {
    let controller = MemoryController::jaas();
    let uuid = model_uuid(&controller).await;
    let access = JaasAccessResource::new(JaasTargetKind::Model, &controller.client());
    let state = access
        .create(model_access(&uuid, &["alice@canonical.com"], &[]))
        .await
        .unwrap();
    controller.clear_calls().await;

    access
        .update(UpdateRequest {
            plan: model_access(&uuid, &["bob@canonical.com"], &[]),
            state,
        })
        .await
        .unwrap();

    let calls = controller.calls().await;
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("delete_relations:user-alice@canonical.com#writer"));
    assert!(calls[1].starts_with("add_relations:user-bob@canonical.com#writer"));
}

#[tokio::test]
async fn failed_batch_reports_every_principal() {
    let controller = MemoryController::jaas();
    let uuid = model_uuid(&controller).await;
    let access = JaasAccessResource::new(JaasTargetKind::Model, &controller.client());
    controller.fail_on("add_relations").await;

    let err = access
        .create(model_access(&uuid, &["alice@canonical.com", "bob@canonical.com"], &[]))
        .await
        .unwrap_err();
    let err = match err {
        ProviderError::Converge(e) => e,
        other => panic!("expected a convergence error, got {other}"),
    };
    assert_eq!(err.principals(Side::Grant).len(), 3);
    assert!(controller.tuples().await.is_empty());
}

#[tokio::test]
async fn failed_delete_batch_still_adds() {
    let controller = MemoryController::jaas();
    let uuid = model_uuid(&controller).await;
    let access = JaasAccessResource::new(JaasTargetKind::Model, &controller.client());
    let state = access
        .create(model_access(&uuid, &["alice@canonical.com"], &[]))
        .await
        .unwrap();
    controller.clear_calls().await;
    controller.fail_on("delete_relations").await;

    let err = access
        .update(UpdateRequest {
            plan: model_access(&uuid, &["bob@canonical.com"], &[]),
            state,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("juju_jaas_access_model"), "{err}");
    let err = match err {
        ProviderError::Converge(e) => e,
        other => panic!("expected a convergence error, got {other}"),
    };
    let revoked = err.principals(Side::Revoke);
    assert_eq!(revoked.len(), 1);
    assert!(revoked[0].contains("alice@canonical.com"));
    assert!(err.principals(Side::Grant).is_empty());

    let calls = controller.calls().await;
    assert_eq!(calls.len(), 1);
    assert!(calls[0].starts_with("add_relations:user-bob@canonical.com#writer"));
    let target = JaasTarget::Model(uuid);
    let tuples = controller.tuples().await;
    assert!(tuples.contains(&tuple(Principal::User("alice@canonical.com".into()), "writer", target.clone())));
    assert!(tuples.contains(&tuple(Principal::User("bob@canonical.com".into()), "writer", target)));
}

#[tokio::test]
async fn read_reports_every_principal_on_the_target() {
    let controller = MemoryController::jaas();
    let access = JaasAccessResource::new(JaasTargetKind::Cloud, &controller.client());
    let state = access
        .create(json!({"cloud_name": "aws", "access": "can_addmodel", "users": ["alice@canonical.com"]}))
        .await
        .unwrap();

    let role = "4a2b7f1c-0d5e-4c3b-9a8f-6e1d2c3b4a5f";
    let jaas = controller.client().jaas.unwrap();
    jaas.add_relations(vec![
        tuple(Principal::Role(role.into()), "can_addmodel", JaasTarget::Cloud("aws".into())),
        tuple(Principal::User("zed@canonical.com".into()), "administrator", JaasTarget::Cloud("aws".into())),
    ])
    .await
    .unwrap();

    let read = access.read(state).await.unwrap().unwrap();
    assert_eq!(read["users"], json!(["alice@canonical.com"]));
    assert_eq!(read["roles"], json!([role]));
    assert!(read["groups"].is_null());
    assert_eq!(read["id"], "aws:can_addmodel");
}

#[tokio::test]
async fn principals_are_validated() {
    let access = JaasAccessResource::new(JaasTargetKind::Group, &MemoryController::jaas().client());
    let group_id = "0f3e2d1c-b4a5-4968-8776-5a4b3c2d1e0f";

    let err = access
        .validate(&json!({
            "group_id": group_id,
            "access": "member",
            "users": ["not a user"],
            "groups": ["devops"],
            "roles": ["admins"],
            "service_accounts": ["bad@id"]
        }))
        .unwrap_err();
    let ProviderError::Validation(errors) = err else {
        panic!("expected validation errors");
    };
    assert_eq!(errors.len(), 4, "{errors:?}");

    access
        .validate(&json!({"group_id": group_id, "access": "member", "groups": [group_id]}))
        .unwrap();

    let err = access
        .validate(&json!({"group_id": group_id, "access": "administrator"}))
        .unwrap_err();
    assert!(err.to_string().contains("access"), "{err}");
}

#[tokio::test]
async fn import_controller_access() {
    let controller = MemoryController::jaas();
    let access = JaasAccessResource::new(JaasTargetKind::Controller, &controller.client());
    access
        .create(json!({"access": "administrator", "users": ["alice@canonical.com"]}))
        .await
        .unwrap();

    let state = access.import("controller-jimm:administrator").await.unwrap();
    assert_eq!(state["users"], json!(["alice@canonical.com"]));
    assert_eq!(state["id"], "controller-jimm:administrator");

    assert!(matches!(access.import("jimm:administrator").await, Err(ProviderError::ImportId { .. })));
    assert!(matches!(
        access.import("controller-jimm:reader").await,
        Err(ProviderError::ImportId { .. })
    ));
}

#[tokio::test]
async fn import_offer_access_splits_on_last_separator() {
    let controller = MemoryController::jaas();
    let access = JaasAccessResource::new(JaasTargetKind::Offer, &controller.client());
    let url = "jaas:admin/dev.postgresql";
    access
        .create(json!({"offer_url": url, "access": "consumer", "users": ["alice@canonical.com"]}))
        .await
        .unwrap();

    let state = access.import(&format!("{url}:consumer")).await.unwrap();
    assert_eq!(state["offer_url"], url);
    assert_eq!(state["users"], json!(["alice@canonical.com"]));
}

#[tokio::test]
async fn delete_removes_managed_tuples() {
    let controller = MemoryController::jaas();
    let uuid = model_uuid(&controller).await;
    let access = JaasAccessResource::new(JaasTargetKind::Model, &controller.client());
    let state = access
        .create(model_access(&uuid, &["alice@canonical.com"], &[]))
        .await
        .unwrap();

    access.delete(state).await.unwrap();
    assert!(controller.tuples().await.is_empty());
}

#[tokio::test]
async fn group_rename_and_remove() {
    let controller = MemoryController::jaas();
    let groups = JaasGroupResource::new(&controller.client());
    let state = groups.create(json!({"name": "devops"})).await.unwrap();
    let uuid = state["uuid"].as_str().unwrap().to_string();
    assert_eq!(state["id"], uuid);

    let member = JaasAccessResource::new(JaasTargetKind::Group, &controller.client());
    member
        .create(json!({"group_id": uuid, "access": "member", "users": ["alice@canonical.com"]}))
        .await
        .unwrap();

    let mut plan = state.clone();
    plan["name"] = json!("platform");
    let state = groups.update(UpdateRequest { plan, state }).await.unwrap();
    assert_eq!(state["name"], "platform");
    assert_eq!(groups.import(&uuid).await.unwrap()["name"], "platform");
    assert!(matches!(groups.import("platform").await, Err(ProviderError::ImportId { .. })));

    groups.delete(state.clone()).await.unwrap();
    assert!(controller.tuples().await.is_empty());
    assert!(groups.read(state).await.unwrap().is_none());
}

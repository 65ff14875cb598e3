use serde_json::{Value, json};

use tfjuju_client::MemoryController;
use tfjuju_client::models::ModelsApi;
use tfjuju_client::offers::OffersApi;
use tfjuju_core::models::access::{ModelAccess, OfferAccess};
use tfjuju_provider::resources::{
    AccessModelResource, AccessOfferResource, ApplicationResource, ModelResource, OfferResource,
};
use tfjuju_provider::{ProviderError, Resource, Side, UpdateRequest};

const OFFER: &str = "admin/dev.postgresql";

async fn model_users(controller: &MemoryController) -> Vec<(String, ModelAccess)> {
    let info = controller.client().models.read_model("dev").await.unwrap();
    let mut users: Vec<_> = info.users.into_iter().map(|u| (u.user, u.access)).collect();
    users.sort();
    users
}

async fn offer_users(controller: &MemoryController) -> Vec<(String, OfferAccess)> {
    let info = controller.client().offers.read_offer(OFFER).await.unwrap();
    let mut users: Vec<_> = info.users.into_iter().map(|u| (u.user, u.access)).collect();
    users.sort();
    users
}

async fn setup() -> MemoryController {
    let controller = MemoryController::new();
    ModelResource::new(controller.client())
        .create(json!({"name": "dev"}))
        .await
        .unwrap();
    ApplicationResource::new(controller.client())
        .create(json!({"model": "dev", "charm": {"name": "postgresql"}}))
        .await
        .unwrap();
    OfferResource::new(controller.client())
        .create(json!({"model": "dev", "application_name": "postgresql", "endpoints": ["db"]}))
        .await
        .unwrap();
    controller.clear_calls().await;
    controller
}

fn access_model(users: &[&str]) -> Value {
    json!({"model": "dev", "access": "write", "users": users})
}

#[tokio::test]
async fn access_model_grants_on_create() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());

    let state = access.create(access_model(&["bob", "alice"])).await.unwrap();
    assert_eq!(state["id"], "dev:write:alice,bob");
    assert_eq!(
        controller.calls().await,
        vec!["grant_model:dev:alice:write", "grant_model:dev:bob:write"]
    );
}

#[tokio::test]
async fn access_model_update_revokes_then_grants() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    let state = access.create(access_model(&["alice", "bob"])).await.unwrap();
    controller.clear_calls().await;

    let state = access
        .update(UpdateRequest {
            plan: access_model(&["bob", "carol"]),
            state,
        })
        .await
        .unwrap();

    assert_eq!(state["id"], "dev:write:bob,carol");
    assert_eq!(
        controller.calls().await,
        vec!["revoke_model:dev:alice:read", "grant_model:dev:carol:write"]
    );
    assert_eq!(
        model_users(&controller).await,
        vec![
            ("admin".to_string(), ModelAccess::Admin),
            ("bob".to_string(), ModelAccess::Write),
            ("carol".to_string(), ModelAccess::Write),
        ]
    );
}

#[tokio::test]
async fn access_model_partial_failure_converges_on_rerun() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    let state = access.create(access_model(&["bob", "carol"])).await.unwrap();
    controller.fail_on("grant_model:dev:dave").await;

    let request = UpdateRequest {
        plan: access_model(&["carol", "dave", "erin"]),
        state,
    };
    let err = access.update(request.clone()).await.unwrap_err();
    let err = match err {
        ProviderError::Converge(e) => e,
        other => panic!("expected a convergence error, got {other}"),
    };
    assert_eq!(err.principals(Side::Grant), vec!["dave"]);
    assert!(err.principals(Side::Revoke).is_empty());

    let users = model_users(&controller).await;
    assert!(!users.iter().any(|(u, _)| u == "bob"));
    assert!(users.contains(&("erin".to_string(), ModelAccess::Write)));

    controller.clear_failures().await;
    let state = access.update(request).await.unwrap();
    assert_eq!(state["id"], "dev:write:carol,dave,erin");
    assert!(model_users(&controller).await.contains(&("dave".to_string(), ModelAccess::Write)));
}

#[tokio::test]
async fn access_model_failed_revoke_still_grants() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    let state = access.create(access_model(&["bob", "carol"])).await.unwrap();
    controller.fail_on("revoke_model:dev:bob").await;

    let err = access
        .update(UpdateRequest {
            plan: access_model(&["carol", "dave"]),
            state,
        })
        .await
        .unwrap_err();
    assert!(err.to_string().contains("juju_access_model (dev)"), "{err}");
    let err = match err {
        ProviderError::Converge(e) => e,
        other => panic!("expected a convergence error, got {other}"),
    };
    assert_eq!(err.principals(Side::Revoke), vec!["bob"]);
    assert!(err.principals(Side::Grant).is_empty());

    let users = model_users(&controller).await;
    assert!(users.contains(&("bob".to_string(), ModelAccess::Write)));
    assert!(users.contains(&("dave".to_string(), ModelAccess::Write)));
}

#[tokio::test]
async fn access_model_read_ignores_unmanaged_users() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    let state = access.create(access_model(&["alice", "bob"])).await.unwrap();
    controller
        .client()
        .models
        .grant_model("dev", "zed", ModelAccess::Write)
        .await
        .unwrap();
    controller
        .client()
        .models
        .revoke_model("dev", "bob", ModelAccess::Read)
        .await
        .unwrap();

    let read = access.read(state).await.unwrap().unwrap();
    assert_eq!(read["users"], json!(["alice"]));
    assert_eq!(read["id"], "dev:write:alice");
}

#[tokio::test]
async fn access_model_delete_revokes_everyone() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    let state = access.create(access_model(&["alice", "bob"])).await.unwrap();
    controller.clear_calls().await;

    access.delete(state).await.unwrap();
    assert_eq!(
        controller.calls().await,
        vec!["revoke_model:dev:alice:read", "revoke_model:dev:bob:read"]
    );
    assert_eq!(
        model_users(&controller).await,
        vec![("admin".to_string(), ModelAccess::Admin)]
    );
}

#[tokio::test]
async fn access_model_import() {
    let controller = setup().await;
    let access = AccessModelResource::new(controller.client());
    access.create(access_model(&["alice", "bob"])).await.unwrap();

    let state = access.import("dev:write:bob,alice,nobody").await.unwrap();
    assert_eq!(state["users"], json!(["alice", "bob"]));
    assert_eq!(state["id"], "dev:write:alice,bob");

    assert!(matches!(access.import("dev:owner:alice").await, Err(ProviderError::ImportId { .. })));
    assert!(matches!(access.import("dev:write").await, Err(ProviderError::ImportId { .. })));
    assert!(matches!(access.import("prod:write:alice").await, Err(ProviderError::ReadFailed(_))));
}

#[tokio::test]
async fn access_offer_level_change_revokes_then_grants() {
    let controller = setup().await;
    let access = AccessOfferResource::new(controller.client());

    let state = access
        .create(json!({"offer_url": OFFER, "consume_users": ["alice"], "read_users": ["bob"]}))
        .await
        .unwrap();
    assert_eq!(state["id"], OFFER);
    assert_eq!(
        controller.calls().await,
        vec![
            format!("grant_offer:{OFFER}:alice:consume"),
            format!("grant_offer:{OFFER}:bob:read"),
        ]
    );

    controller.clear_calls().await;
    let state = access
        .update(UpdateRequest {
            plan: json!({"offer_url": OFFER, "admin_users": ["alice"], "read_users": ["bob"]}),
            state,
        })
        .await
        .unwrap();
    assert_eq!(state["admin_users"], json!(["alice"]));
    assert_eq!(
        controller.calls().await,
        vec![
            format!("revoke_offer:{OFFER}:alice:read"),
            format!("grant_offer:{OFFER}:alice:admin"),
        ]
    );
    assert_eq!(
        offer_users(&controller).await,
        vec![
            ("admin".to_string(), OfferAccess::Admin),
            ("alice".to_string(), OfferAccess::Admin),
            ("bob".to_string(), OfferAccess::Read),
        ]
    );

    let read = access.read(state.clone()).await.unwrap().unwrap();
    assert_eq!(read, state);
}

#[tokio::test]
async fn access_offer_user_in_one_set_only() {
    let access = AccessOfferResource::new(MemoryController::new().client());
    let err = access
        .validate(&json!({"offer_url": OFFER, "admin_users": ["alice"], "read_users": ["alice"]}))
        .unwrap_err();
    assert!(err.to_string().contains("alice"), "{err}");
}

#[tokio::test]
async fn access_offer_import_skips_owner() {
    let controller = setup().await;
    let access = AccessOfferResource::new(controller.client());
    access
        .create(json!({"offer_url": OFFER, "consume_users": ["alice"]}))
        .await
        .unwrap();

    let state = access.import(OFFER).await.unwrap();
    assert!(state["admin_users"].is_null());
    assert_eq!(state["consume_users"], json!(["alice"]));
    assert!(state["read_users"].is_null());

    assert!(matches!(access.import("no-dot").await, Err(ProviderError::ImportId { .. })));
}

#[tokio::test]
async fn access_offer_delete_removes_managed_users() {
    let controller = setup().await;
    let access = AccessOfferResource::new(controller.client());
    let state = access
        .create(json!({"offer_url": OFFER, "consume_users": ["alice"], "read_users": ["bob"]}))
        .await
        .unwrap();

    access.delete(state).await.unwrap();
    assert_eq!(
        offer_users(&controller).await,
        vec![("admin".to_string(), OfferAccess::Admin)]
    );
}

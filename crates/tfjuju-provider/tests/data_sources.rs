use serde_json::json;

use tfjuju_client::MemoryController;
use tfjuju_provider::data_sources::{
    ApplicationDataSource, JaasGroupDataSource, MachineDataSource, ModelDataSource, OfferDataSource,
};
use tfjuju_provider::resources::{
    ApplicationResource, JaasGroupResource, MachineResource, ModelResource, OfferResource,
};
use tfjuju_provider::{DataSource, ProviderError, Resource};

async fn populated() -> MemoryController {
    let controller = MemoryController::jaas();
    let client = controller.client();
    ModelResource::new(client.clone())
        .create(json!({"name": "dev"}))
        .await
        .unwrap();
    ApplicationResource::new(client.clone())
        .create(json!({"model": "dev", "charm": {"name": "postgresql"}, "units": 2}))
        .await
        .unwrap();
    OfferResource::new(client.clone())
        .create(json!({"model": "dev", "application_name": "postgresql", "endpoints": ["db"]}))
        .await
        .unwrap();
    MachineResource::new(client.clone())
        .create(json!({"model": "dev", "constraints": "cores=2"}))
        .await
        .unwrap();
    JaasGroupResource::new(&client)
        .create(json!({"name": "devops"}))
        .await
        .unwrap();
    controller
}

#[tokio::test]
async fn model_by_name_or_uuid() {
    let controller = populated().await;
    let models = ModelDataSource::new(controller.client());

    let by_name = models.read(json!({"name": "dev"})).await.unwrap();
    assert_eq!(by_name["type"], "iaas");
    let uuid = by_name["uuid"].clone();

    let by_uuid = models.read(json!({"uuid": uuid})).await.unwrap();
    assert_eq!(by_uuid, by_name);

    let err = models
        .validate(&json!({"name": "dev", "uuid": by_name["uuid"].clone()}))
        .unwrap_err();
    assert!(err.to_string().contains("exactly one of name or uuid"), "{err}");
    assert!(models.validate(&json!({})).is_err());

    let blank_name = json!({"name": "  ", "uuid": by_name["uuid"].clone()});
    models.validate(&blank_name).unwrap();
    let found = models.read(blank_name).await.unwrap();
    assert_eq!(found["name"], "dev");
}

#[tokio::test]
async fn application_offer_and_machine_lookups() {
    let controller = populated().await;

    let app = ApplicationDataSource::new(controller.client())
        .read(json!({"model": "dev", "name": "postgresql"}))
        .await
        .unwrap();
    assert_eq!(app["units"], 2);
    assert_eq!(app["charm"]["name"], "postgresql");
    assert_eq!(app["principal"], true);

    let offer = OfferDataSource::new(controller.client())
        .read(json!({"url": "admin/dev.postgresql"}))
        .await
        .unwrap();
    assert_eq!(offer["application_name"], "postgresql");
    assert_eq!(offer["endpoints"], json!(["db"]));

    let machine = MachineDataSource::new(controller.client())
        .read(json!({"model": "dev", "machine_id": "0"}))
        .await
        .unwrap();
    assert_eq!(machine["constraints"], "cores=2");
}

#[tokio::test]
async fn missing_entities_are_errors() {
    let controller = populated().await;
    let err = ApplicationDataSource::new(controller.client())
        .read(json!({"model": "dev", "name": "mysql"}))
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::ReadFailed(_)));
}

#[tokio::test]
async fn jaas_group_by_name() {
    let controller = populated().await;
    let groups = JaasGroupDataSource::new(&controller.client());

    let found = groups.read(json!({"name": "devops"})).await.unwrap();
    let uuid = found["uuid"].as_str().unwrap().to_string();
    let again = groups.read(json!({"uuid": uuid})).await.unwrap();
    assert_eq!(again["name"], "devops");

    let blank_uuid = groups.read(json!({"name": "devops", "uuid": ""})).await.unwrap();
    assert_eq!(blank_uuid["uuid"], found["uuid"]);
}

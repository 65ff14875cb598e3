use tfjuju_core::models::access::{ModelAccess, ModelUserAccess};
use tfjuju_core::models::model::{CreateModelInput, ModelInfo, ModelType, UpdateModelInput};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::models::ModelsApi;

const DEFAULT_CLOUD: &str = "localhost";
const DEFAULT_REGION: &str = "localhost";

fn level_below(access: ModelAccess) -> Option<ModelAccess> {
    match access {
        ModelAccess::Admin => Some(ModelAccess::Write),
        ModelAccess::Write => Some(ModelAccess::Read),
        ModelAccess::Read => None,
    }
}

impl ModelsApi for MemoryController {
    fn create_model(&self, input: CreateModelInput) -> BoxFuture<'_, Result<ModelInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if inner.models.contains_key(&input.name) {
                return Err(ClientError::already_exists("model", &input.name));
            }
            inner.call(format!("create_model:{}", input.name))?;

            let cloud = input.cloud.unwrap_or_else(|| DEFAULT_CLOUD.to_string());
            let model_type = if inner.clouds.contains_key(&cloud) {
                ModelType::Caas
            } else {
                ModelType::Iaas
            };
            let region = input
                .region
                .or_else(|| (model_type == ModelType::Iaas).then(|| DEFAULT_REGION.to_string()));

            let model = ModelInfo {
                uuid: uuid::Uuid::new_v4().to_string(),
                name: input.name,
                owner: self.owner().to_string(),
                model_type,
                cloud,
                region,
                credential: input.credential,
                config: input.config,
                constraints: input.constraints.unwrap_or_default(),
                annotations: input.annotations,
                users: vec![ModelUserAccess {
                    user: self.owner().to_string(),
                    access: ModelAccess::Admin,
                }],
            };
            inner.models.insert(model.name.clone(), model.clone());
            Ok(model)
        })
    }

    fn read_model<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<ModelInfo, ClientError>> {
        Box::pin(async move { self.lock().await.require_model(name).cloned() })
    }

    fn read_model_by_uuid<'a>(
        &'a self,
        uuid: &'a str,
    ) -> BoxFuture<'a, Result<ModelInfo, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .models
                .values()
                .find(|m| m.uuid == uuid)
                .cloned()
                .ok_or_else(|| ClientError::not_found("model", uuid))
        })
    }

    fn update_model(&self, input: UpdateModelInput) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let name = inner
                .models
                .values()
                .find(|m| m.uuid == input.uuid)
                .map(|m| m.name.clone())
                .ok_or_else(|| ClientError::not_found("model", &input.uuid))?;
            inner.call(format!("update_model:{name}"))?;

            let Some(model) = inner.models.get_mut(&name) else {
                return Err(ClientError::not_found("model", &name));
            };
            model.config.extend(input.config);
            for key in &input.unset {
                model.config.remove(key);
            }
            if let Some(constraints) = input.constraints {
                model.constraints = constraints;
            }
            if let Some(credential) = input.credential {
                model.credential = Some(credential);
            }
            for (key, value) in input.annotations {
                if value.is_empty() {
                    model.annotations.remove(&key);
                } else {
                    model.annotations.insert(key, value);
                }
            }
            Ok(())
        })
    }

    fn destroy_model<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let name = inner
                .models
                .values()
                .find(|m| m.uuid == uuid)
                .map(|m| m.name.clone())
                .ok_or_else(|| ClientError::not_found("model", uuid))?;
            inner.call(format!("destroy_model:{name}"))?;

            inner.models.remove(&name);
            inner.applications.retain(|(model, _), _| *model != name);
            inner.machines.retain(|(model, _), _| *model != name);
            inner.offers.retain(|_, offer| offer.model != name);
            inner.integrations.retain(|i| i.model != name);
            inner.ssh_keys.remove(&name);
            Ok(())
        })
    }

    fn grant_model<'a>(
        &'a self,
        model: &'a str,
        user: &'a str,
        access: ModelAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.require_model(model)?;
            inner.call(format!("grant_model:{model}:{user}:{access}"))?;

            let Some(info) = inner.models.get_mut(model) else {
                return Err(ClientError::not_found("model", model));
            };
            match info.users.iter_mut().find(|u| u.user == user) {
                Some(existing) => existing.access = existing.access.max(access),
                None => info.users.push(ModelUserAccess {
                    user: user.to_string(),
                    access,
                }),
            }
            Ok(())
        })
    }

    fn revoke_model<'a>(
        &'a self,
        model: &'a str,
        user: &'a str,
        access: ModelAccess,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.require_model(model)?;
            inner.call(format!("revoke_model:{model}:{user}:{access}"))?;

            let Some(info) = inner.models.get_mut(model) else {
                return Err(ClientError::not_found("model", model));
            };
            let Some(idx) = info.users.iter().position(|u| u.user == user) else {
                return Ok(());
            };
            match level_below(access) {
                Some(below) => {
                    let entry = &mut info.users[idx];
                    entry.access = entry.access.min(below);
                }
                None => {
                    info.users.remove(idx);
                }
            }
            Ok(())
        })
    }
}

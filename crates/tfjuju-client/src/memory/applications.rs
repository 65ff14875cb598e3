use tfjuju_core::models::application::{ApplicationInfo, DeployInput, UpdateApplicationInput};

use super::MemoryController;
use crate::applications::ApplicationsApi;
use crate::client::BoxFuture;
use crate::error::ClientError;

impl ApplicationsApi for MemoryController {
    fn deploy(&self, input: DeployInput) -> BoxFuture<'_, Result<ApplicationInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.require_model(&input.model)?;
            let key = (input.model.clone(), input.name.clone());
            if inner.applications.contains_key(&key) {
                return Err(ClientError::already_exists(
                    "application",
                    format!("{}/{}", input.model, input.name),
                ));
            }
            inner.call(format!("deploy:{}:{}", input.model, input.name))?;

            let app = ApplicationInfo {
                model: input.model,
                name: input.name,
                charm: input.charm,
                units: input.units,
                principal: true,
                trust: input.trust,
                config: input.config,
                constraints: input.constraints.unwrap_or_default(),
                expose: input.expose,
            };
            inner.applications.insert(key, app.clone());
            Ok(app)
        })
    }

    fn read_application<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<ApplicationInfo, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .applications
                .get(&(model.to_string(), name.to_string()))
                .cloned()
                .ok_or_else(|| ClientError::not_found("application", format!("{model}/{name}")))
        })
    }

    fn update_application(
        &self,
        input: UpdateApplicationInput,
    ) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (input.model.clone(), input.name.clone());
            if !inner.applications.contains_key(&key) {
                return Err(ClientError::not_found(
                    "application",
                    format!("{}/{}", input.model, input.name),
                ));
            }
            inner.call(format!("update_application:{}:{}", input.model, input.name))?;

            let Some(app) = inner.applications.get_mut(&key) else {
                return Err(ClientError::not_found("application", &input.name));
            };
            if let Some(channel) = input.charm_channel {
                app.charm.channel = channel;
            }
            if let Some(revision) = input.charm_revision {
                app.charm.revision = Some(revision);
            }
            if let Some(units) = input.units {
                app.units = units;
            }
            app.config.extend(input.config);
            for key in &input.unset {
                app.config.remove(key);
            }
            if let Some(constraints) = input.constraints {
                app.constraints = constraints;
            }
            if let Some(trust) = input.trust {
                app.trust = trust;
            }
            if input.unexpose {
                app.expose = None;
            }
            if let Some(expose) = input.expose {
                app.expose = Some(expose);
            }
            Ok(())
        })
    }

    fn destroy_application<'a>(
        &'a self,
        model: &'a str,
        name: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (model.to_string(), name.to_string());
            if !inner.applications.contains_key(&key) {
                return Err(ClientError::not_found("application", format!("{model}/{name}")));
            }
            inner.call(format!("destroy_application:{model}:{name}"))?;

            inner.applications.remove(&key);
            inner
                .integrations
                .retain(|i| i.model != model || i.endpoints.iter().all(|e| e.application != name));
            Ok(())
        })
    }
}

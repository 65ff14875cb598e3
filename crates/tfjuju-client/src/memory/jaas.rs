use tfjuju_core::models::jaas::{JaasGroup, JaasTarget, RelationFilter, RelationTuple};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::jaas::JaasApi;

fn join(tuples: &[RelationTuple]) -> String {
    tuples
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

impl JaasApi for MemoryController {
    fn add_relations(&self, tuples: Vec<RelationTuple>) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.call(format!("add_relations:{}", join(&tuples)))?;
            inner.tuples.extend(tuples);
            Ok(())
        })
    }

    fn delete_relations(&self, tuples: Vec<RelationTuple>) -> BoxFuture<'_, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.call(format!("delete_relations:{}", join(&tuples)))?;
            for tuple in &tuples {
                inner.tuples.remove(tuple);
            }
            Ok(())
        })
    }

    fn read_relations(
        &self,
        filter: RelationFilter,
    ) -> BoxFuture<'_, Result<Vec<RelationTuple>, ClientError>> {
        Box::pin(async move {
            Ok(self
                .lock()
                .await
                .tuples
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect())
        })
    }

    fn add_group<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if inner.groups.values().any(|g| g.name == name) {
                return Err(ClientError::already_exists("group", name));
            }
            inner.call(format!("add_group:{name}"))?;
            let group = JaasGroup {
                uuid: uuid::Uuid::new_v4().to_string(),
                name: name.to_string(),
            };
            inner.groups.insert(group.uuid.clone(), group.clone());
            Ok(group)
        })
    }

    fn read_group<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .groups
                .get(uuid)
                .cloned()
                .ok_or_else(|| ClientError::not_found("group", uuid))
        })
    }

    fn read_group_by_name<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<JaasGroup, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .groups
                .values()
                .find(|g| g.name == name)
                .cloned()
                .ok_or_else(|| ClientError::not_found("group", name))
        })
    }

    fn rename_group<'a>(
        &'a self,
        uuid: &'a str,
        new_name: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.groups.contains_key(uuid) {
                return Err(ClientError::not_found("group", uuid));
            }
            if inner.groups.values().any(|g| g.name == new_name && g.uuid != uuid) {
                return Err(ClientError::already_exists("group", new_name));
            }
            inner.call(format!("rename_group:{uuid}:{new_name}"))?;
            if let Some(group) = inner.groups.get_mut(uuid) {
                group.name = new_name.to_string();
            }
            Ok(())
        })
    }

    fn remove_group<'a>(&'a self, uuid: &'a str) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            if !inner.groups.contains_key(uuid) {
                return Err(ClientError::not_found("group", uuid));
            }
            inner.call(format!("remove_group:{uuid}"))?;
            inner.groups.remove(uuid);

            let target = JaasTarget::Group(uuid.to_string()).tag();
            let member = format!("{target}#member");
            inner
                .tuples
                .retain(|t| t.target != target && t.object != member);
            Ok(())
        })
    }
}

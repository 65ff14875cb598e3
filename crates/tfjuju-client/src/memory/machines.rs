use tfjuju_core::models::machine::{AddMachineInput, MachineInfo};

use super::MemoryController;
use crate::client::BoxFuture;
use crate::error::ClientError;
use crate::machines::MachinesApi;

const DEFAULT_BASE: &str = "ubuntu@22.04";

impl MachinesApi for MemoryController {
    fn add_machine(&self, input: AddMachineInput) -> BoxFuture<'_, Result<MachineInfo, ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            inner.require_model(&input.model)?;
            let seq = inner.machine_seq.get(&input.model).copied().unwrap_or(0);
            let machine_id = seq.to_string();
            inner.call(format!("add_machine:{}:{machine_id}", input.model))?;
            inner.machine_seq.insert(input.model.clone(), seq + 1);

            let machine = MachineInfo {
                hostname: Some(format!("juju-{}-{machine_id}", input.model)),
                model: input.model,
                machine_id,
                base: input.base.unwrap_or_else(|| DEFAULT_BASE.to_string()),
                constraints: input.constraints.unwrap_or_default(),
                placement: input.placement,
            };
            inner.machines.insert(
                (machine.model.clone(), machine.machine_id.clone()),
                machine.clone(),
            );
            Ok(machine)
        })
    }

    fn read_machine<'a>(
        &'a self,
        model: &'a str,
        machine_id: &'a str,
    ) -> BoxFuture<'a, Result<MachineInfo, ClientError>> {
        Box::pin(async move {
            self.lock()
                .await
                .machines
                .get(&(model.to_string(), machine_id.to_string()))
                .cloned()
                .ok_or_else(|| ClientError::not_found("machine", format!("{model}/{machine_id}")))
        })
    }

    fn destroy_machine<'a>(
        &'a self,
        model: &'a str,
        machine_id: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>> {
        Box::pin(async move {
            let mut inner = self.lock().await;
            let key = (model.to_string(), machine_id.to_string());
            if !inner.machines.contains_key(&key) {
                return Err(ClientError::not_found("machine", format!("{model}/{machine_id}")));
            }
            inner.call(format!("destroy_machine:{model}:{machine_id}"))?;
            inner.machines.remove(&key);
            Ok(())
        })
    }
}

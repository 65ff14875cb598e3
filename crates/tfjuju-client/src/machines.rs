use tfjuju_core::models::machine::{AddMachineInput, MachineInfo};

use crate::client::BoxFuture;
use crate::error::ClientError;

pub trait MachinesApi: Send + Sync {
    fn add_machine(&self, input: AddMachineInput) -> BoxFuture<'_, Result<MachineInfo, ClientError>>;

    fn read_machine<'a>(
        &'a self,
        model: &'a str,
        machine_id: &'a str,
    ) -> BoxFuture<'a, Result<MachineInfo, ClientError>>;

    fn destroy_machine<'a>(
        &'a self,
        model: &'a str,
        machine_id: &'a str,
    ) -> BoxFuture<'a, Result<(), ClientError>>;
}

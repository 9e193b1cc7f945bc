//! Compute-node and layer-2 models.

use std::sync::Arc;

use nbdb_core::{
    FieldDef, FieldType, FrameworkConfig, ModelBuilder, ModelClass, ModelHooks, Record, Result,
    ScalarType,
};

use super::mixins::{basic_events, tenant_object};

/// Port bound to a VM on the local chassis.
pub const BIND_LOCAL: &str = "bind_local";
/// Port no longer bound locally.
pub const UNBIND_LOCAL: &str = "unbind_local";
/// Port bound on a remote chassis.
pub const BIND_REMOTE: &str = "bind_remote";
/// Port no longer bound remotely.
pub const UNBIND_REMOTE: &str = "unbind_remote";

/// Tunnel encapsulations a chassis may advertise.
pub const TUNNEL_TYPES: &[&str] = &["geneve", "vxlan", "gre"];

/// A compute node running a local controller.
pub fn chassis(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    ModelBuilder::new("Chassis")
        .config(config)
        .table("chassis")
        .extends(&basic_events(config)?)
        .fields([
            FieldDef::optional("ip", FieldType::scalar(ScalarType::IpAddress)),
            FieldDef::optional("external_host_ip", FieldType::scalar(ScalarType::IpAddress)),
            FieldDef::optional(
                "tunnel_types",
                FieldType::list(FieldType::enum_type("tunnel_type", TUNNEL_TYPES)),
            ),
        ])
        .build()
}

/// A layer-2 broadcast domain.
pub fn logical_switch(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    tenant_object(ModelBuilder::new("LogicalSwitch"), config)?
        .config(config)
        .table("lswitch")
        .fields([
            FieldDef::optional("is_external", FieldType::scalar(ScalarType::Bool))
                .with_default(false),
            FieldDef::optional("mtu", FieldType::scalar(ScalarType::Int)),
            FieldDef::optional("segmentation_id", FieldType::scalar(ScalarType::Int)),
            FieldDef::optional(
                "network_type",
                FieldType::enum_type("network_type", &["local", "flat", "vlan", "vxlan", "geneve", "gre"]),
            ),
            FieldDef::optional("physical_network", FieldType::scalar(ScalarType::String)),
        ])
        .build()
}

/// Fills in `enabled` for ports created without it: the northbound API
/// treats an unspecified admin state as up.
#[derive(Debug, Default)]
pub struct LogicalPortHooks;

impl ModelHooks for LogicalPortHooks {
    fn on_create_pre(&self, record: &mut Record) -> Result<()> {
        if record.get("enabled")?.is_none() {
            record.set("enabled", true)?;
        }
        Ok(())
    }
}

/// A port on a logical switch.
pub fn logical_port(config: &FrameworkConfig) -> Result<Arc<ModelClass>> {
    tenant_object(ModelBuilder::new("LogicalPort"), config)?
        .config(config)
        .table("lport")
        .fields([
            FieldDef::optional("lswitch", FieldType::reference("LogicalSwitch")),
            FieldDef::optional("chassis", FieldType::reference("Chassis")),
            FieldDef::optional("macs", FieldType::list(FieldType::scalar(ScalarType::MacAddress))),
            FieldDef::optional("ips", FieldType::list(FieldType::scalar(ScalarType::IpAddress))),
            FieldDef::optional("enabled", FieldType::scalar(ScalarType::Bool)),
            FieldDef::optional("device_owner", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("device_id", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("port_security_enabled", FieldType::scalar(ScalarType::Bool)),
            FieldDef::optional("allowed_address_pairs", FieldType::list(FieldType::Dict)),
            FieldDef::optional(
                "security_groups",
                FieldType::list(FieldType::reference("SecurityGroup")),
            ),
        ])
        .index("chassis_id", "chassis")
        .index("lswitch_id", "lswitch")
        .index("switch,owner", ["lswitch", "device_owner"])
        .events([BIND_LOCAL, UNBIND_LOCAL, BIND_REMOTE, UNBIND_REMOTE])
        .hooks(LogicalPortHooks)
        .build()
}

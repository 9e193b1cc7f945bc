//! Models still persisted under their pre-framework table names.
//!
//! These have no event support and no hooks; they exist so that data written
//! by older controllers can still be decoded.

use std::sync::Arc;

use nbdb_core::{
    FieldDef, FieldType, FrameworkConfig, LegacyModels, ModelBuilder, ModelClass, Result,
    ScalarType,
};

fn legacy_model(
    name: &str,
    table: &str,
    fields: impl IntoIterator<Item = FieldDef>,
    config: &FrameworkConfig,
) -> Result<Arc<ModelClass>> {
    ModelBuilder::new(name)
        .config(config)
        .table(table)
        .field(FieldDef::optional("topic", FieldType::scalar(ScalarType::String)))
        .field(FieldDef::optional("name", FieldType::scalar(ScalarType::String)))
        .field(FieldDef::optional("version", FieldType::scalar(ScalarType::Int)))
        .fields(fields)
        .build()
}

/// Build the legacy table mapping.
///
/// `lport` is listed as well, but the current `LogicalPort` model registers
/// the same table name and always shadows it.
pub fn legacy_models(config: &FrameworkConfig) -> Result<LegacyModels> {
    let secgroup = legacy_model(
        "SecurityGroup",
        "secgroup",
        [
            FieldDef::optional("unique_keyid", FieldType::scalar(ScalarType::Int)),
            FieldDef::optional("rules", FieldType::list(FieldType::Dict)),
        ],
        config,
    )?;
    let floatingip = legacy_model(
        "Floatingip",
        "floatingip",
        [
            FieldDef::optional("status", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("floating_ip_address", FieldType::scalar(ScalarType::IpAddress)),
            FieldDef::optional("fixed_ip_address", FieldType::scalar(ScalarType::IpAddress)),
            FieldDef::optional("port_id", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("router_id", FieldType::scalar(ScalarType::String)),
        ],
        config,
    )?;
    let publisher = legacy_model(
        "Publisher",
        "publisher",
        [
            FieldDef::optional("uri", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("last_activity_timestamp", FieldType::scalar(ScalarType::Float)),
        ],
        config,
    )?;
    let qospolicy = legacy_model(
        "QosPolicy",
        "qospolicy",
        [FieldDef::optional("rules", FieldType::list(FieldType::Dict))],
        config,
    )?;
    let lport = legacy_model(
        "LegacyLogicalPort",
        "lport",
        [
            FieldDef::optional("lswitch_id", FieldType::scalar(ScalarType::String)),
            FieldDef::optional("chassis", FieldType::scalar(ScalarType::String)),
        ],
        config,
    )?;

    Ok(LegacyModels::new()
        .with_table("secgroup", &secgroup)
        .with_table("floatingip", &floatingip)
        .with_table("publisher", &publisher)
        .with_table("qospolicy", &qospolicy)
        .with_table("lport", &lport))
}

use endpoint_graphql_dyn::{
    schema::Converter,
    store::{load_tables, EmptyRowSource},
};
use endpoint_graphql_lib::{
    config::{ConverterArgs, ConverterConfig},
    utils::init_logging,
};
use std::sync::Arc;
use tracing::info;

pub async fn exec(args: ConverterArgs) -> anyhow::Result<()> {
    let tables_path = args.tables.clone();
    let print_excluded = args.excluded;
    let config = ConverterConfig::from_opts(args)?;

    init_logging(&config)?;

    info!("Configuration: {:?}", config);

    let tables = load_tables(&tables_path)?;
    let converter = Converter::from_config(&config)?;
    let schema = converter.build(&tables, Arc::new(EmptyRowSource))?;

    info!(
        "Built schema for project {:?} with {} of {} tables",
        schema.project(),
        schema.schema_type().tables.len(),
        tables.len()
    );

    if print_excluded {
        for table in schema.excluded() {
            let line = serde_json::json!({
                "id": table.id,
                "reason": table.reason.to_string(),
            });
            println!("{line}");
        }
    } else {
        println!("{}", schema.sdl());
    }

    Ok(())
}

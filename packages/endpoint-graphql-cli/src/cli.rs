pub(crate) use crate::commands::build;
use clap::{Parser, Subcommand};
use endpoint_graphql_lib::config::ConverterArgs;

#[derive(Parser, Debug)]
#[clap(
    name = "endpoint-graphql",
    about = "Endpoint GraphQL schema converter",
    version,
    rename_all = "kebab-case"
)]
pub struct Opt {
    #[clap(subcommand)]
    command: EndpointGraphQL,
}

#[derive(Debug, Subcommand)]
pub enum EndpointGraphQL {
    /// Build the schema of a table batch and print its SDL.
    Build(ConverterArgs),
}

pub async fn run_cli() -> anyhow::Result<()> {
    let opt = Opt::try_parse();

    match opt {
        Ok(opt) => match opt.command {
            EndpointGraphQL::Build(args) => build::exec(args).await,
        },
        Err(e) => {
            // Prints the error and exits.
            e.exit()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_build_takes_converter_args() {
        let opt = Opt::try_parse_from([
            "endpoint-graphql",
            "build",
            "--tables",
            "tables.yaml",
            "--project",
            "blog",
            "--excluded",
        ])
        .unwrap();

        let EndpointGraphQL::Build(args) = opt.command;
        assert_eq!(args.tables, PathBuf::from("tables.yaml"));
        assert_eq!(args.project.as_deref(), Some("blog"));
        assert!(args.excluded);
    }
}

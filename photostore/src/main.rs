use clap::{arg, command, crate_name, ArgMatches, Command};
use cli::client::ConnectionParams;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "photostore=info,client=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = command!(crate_name!())
        .version(clap::crate_version!())
        .about(clap::crate_description!())
        .subcommand(with_connection_args(
            Command::new(cli::UPLOAD_SUBCOMMAND)
                .about(cli::UPLOAD_DESCRIPTION)
                .arg(
                    arg!(-f --file <FILE>)
                        .required(true)
                        .help("Path to image file to upload"),
                )
                .arg(
                    arg!(-l --labels <LABELS>)
                        .required(false)
                        .help("Comma separated custom labels attached as object metadata"),
                ),
        ))
        .subcommand(with_connection_args(
            Command::new(cli::SEARCH_SUBCOMMAND)
                .about(cli::SEARCH_DESCRIPTION)
                .arg(arg!(<TERM>).help("Keyword to search for")),
        ))
        .subcommand(with_connection_args(
            Command::new(cli::CONFIG_SUBCOMMAND).about(cli::CONFIG_DESCRIPTION),
        ))
        .subcommand(Command::new(cli::VERSION_SUBCOMMAND).about(cli::VERSION_DESCRIPTION))
        .subcommand(Command::new(cli::BUGREPORT_SUBCOMMAND).about(cli::BUGREPORT_DESCRIPTION))
        .arg_required_else_help(true)
        .disable_version_flag(true)
        .get_matches();

    if cli.subcommand_matches(cli::VERSION_SUBCOMMAND).is_some() {
        cli::version::run();
    } else if cli.subcommand_matches(cli::BUGREPORT_SUBCOMMAND).is_some() {
        cli::bugreport::run();
    } else if let Some(upload_matches) = cli.subcommand_matches(cli::UPLOAD_SUBCOMMAND) {
        let params = connection_params(upload_matches);
        let file = upload_matches.get_one::<String>("file").unwrap();
        let labels = upload_matches.get_one::<String>("labels").map(String::as_str);
        cli::client::upload(params, file, labels).await;
    } else if let Some(search_matches) = cli.subcommand_matches(cli::SEARCH_SUBCOMMAND) {
        let params = connection_params(search_matches);
        let term = search_matches.get_one::<String>("TERM").unwrap();
        cli::client::search(params, term).await;
    } else if let Some(config_matches) = cli.subcommand_matches(cli::CONFIG_SUBCOMMAND) {
        let params = connection_params(config_matches);
        cli::client::show_config(params).await;
    }
}

fn with_connection_args(cmd: Command) -> Command {
    cmd.arg(
        arg!(-u --uri <URI>)
            .required(false)
            .help("API root URI (defaults to PHOTOSTORE_API_ROOT)"),
    )
    .arg(
        arg!(-r --region <REGION>)
            .required(false)
            .help("Object store region (defaults to PHOTOSTORE_REGION)"),
    )
    .arg(
        arg!(-b --bucket <BUCKET>)
            .required(false)
            .help("Object store bucket (defaults to PHOTOSTORE_BUCKET)"),
    )
    .arg(
        arg!(-k --key <KEY>)
            .required(false)
            .help("API key (defaults to PHOTOSTORE_API_KEY)"),
    )
}

fn connection_params(matches: &ArgMatches) -> ConnectionParams {
    ConnectionParams {
        uri: matches.get_one::<String>("uri").cloned(),
        region: matches.get_one::<String>("region").cloned(),
        bucket: matches.get_one::<String>("bucket").cloned(),
        api_key: matches.get_one::<String>("key").cloned(),
    }
}
